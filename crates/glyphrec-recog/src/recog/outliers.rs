//! Outlier detection against class averages
//!
//! A sample is an outlier when its best-matching class average belongs to
//! another class, or when even the best match scores below a threshold.
//! Detection never modifies the recognizer: callers drop flagged samples
//! from the generating collection and build a new recognizer from it.

use std::collections::BTreeMap;

use glyphrec_core::{Pix, Pixa};
use tracing::{debug, info};

use crate::error::{RecogError, RecogResult};

use super::correlation::score;
use super::types::{Recog, RecogConfig};

/// A flagged training sample
#[derive(Debug, Clone, PartialEq)]
pub struct Outlier {
    /// Declared class index
    pub class: usize,
    /// Declared class label
    pub label: String,
    /// Index of the sample within its declared class
    pub sample: usize,
    /// Class whose average matched best
    pub best_class: usize,
    /// Score against that average
    pub score: f32,
}

impl Recog {
    /// Find the class average that best matches `sample`
    ///
    /// The sample is binarized, clipped, and brought to the configured
    /// template size and type before scoring. Averages are used whatever
    /// the `templ_use` setting.
    ///
    /// # Returns
    ///
    /// `(class index, score)` of the best average.
    ///
    /// # Errors
    ///
    /// - [`RecogError::AveragesNotBuilt`] if the averages are stale
    /// - [`RecogError::NoContent`] if the sample has no foreground
    pub fn classify_against_averages(&self, sample: &Pix) -> RecogResult<(usize, f32)> {
        if !self.ave_done {
            return Err(RecogError::AveragesNotBuilt);
        }
        let query = self.prepare_query(sample)?;

        let mut best = (0usize, -1.0f32);
        for (index, ave) in self.averages.iter().enumerate() {
            let m = score(&query, ave, self.config.max_y_shift)?;
            if m.score > best.1 {
                best = (index, m.score);
            }
        }
        Ok((best.0, best.1.max(0.0)))
    }

    /// Flag samples that match another class average better than their
    /// own, or whose best score is below `score_threshold`
    ///
    /// Results are in class order, then sample order.
    pub fn find_outliers(&self, score_threshold: f32) -> RecogResult<Vec<Outlier>> {
        if !self.ave_done {
            return Err(RecogError::AveragesNotBuilt);
        }
        let mut outliers = Vec::new();
        for (class, samples) in self.samples_u.iter().enumerate() {
            for (sample, t) in samples.iter().enumerate() {
                let (best_class, best_score) = self.classify_against_averages(&t.pix)?;
                if best_class != class || best_score < score_threshold {
                    let label = self.class_label(class)?.to_string();
                    debug!(
                        label = label.as_str(),
                        sample,
                        best_class,
                        score = best_score,
                        "outlier"
                    );
                    outliers.push(Outlier {
                        class,
                        label,
                        sample,
                        best_class,
                        score: best_score,
                    });
                }
            }
        }
        info!(
            outliers = outliers.len(),
            samples = self.num_samples(),
            "outlier check"
        );
        Ok(outliers)
    }
}

/// Remove outliers from a labeled generating collection
///
/// Builds a training recognizer from `pixa`, flags outliers with
/// [`Recog::find_outliers`] and returns the cleaned samples (labeled
/// through their text) together with the removed outliers. A class never
/// loses its last sample: if every sample of a class is flagged, the one
/// with the highest score is kept.
pub fn remove_outliers(
    pixa: &Pixa,
    config: &RecogConfig,
    min_score: f32,
) -> RecogResult<(Pixa, Vec<Outlier>)> {
    let mut recog = Recog::new(config.clone())?;
    for pix in pixa.iter() {
        if let Some(label) = pix.text().filter(|t| !t.is_empty()) {
            recog.train_labeled(pix, label)?;
        }
    }
    recog.build_averages()?;
    let flagged = recog.find_outliers(min_score)?;

    let mut by_class: BTreeMap<usize, Vec<&Outlier>> = BTreeMap::new();
    for o in &flagged {
        by_class.entry(o.class).or_default().push(o);
    }
    let counts = recog.sample_counts();
    let mut removed = Vec::new();
    for (class, mut outs) in by_class {
        if outs.len() == counts[class] {
            // Keep the best-scoring sample; ties keep the earliest.
            let keep = outs
                .iter()
                .enumerate()
                .fold((0, f32::NEG_INFINITY), |acc, (i, o)| {
                    if o.score > acc.1 { (i, o.score) } else { acc }
                })
                .0;
            outs.remove(keep);
        }
        removed.extend(outs.into_iter().cloned());
    }

    let mut cleaned = Pixa::new();
    for (class, samples) in recog.samples_u.iter().enumerate() {
        let label = recog.class_label(class)?;
        for (sample, t) in samples.iter().enumerate() {
            if !removed
                .iter()
                .any(|o| o.class == class && o.sample == sample)
            {
                cleaned.push(t.pix.with_text(label));
            }
        }
    }
    info!(
        removed = removed.len(),
        kept = cleaned.len(),
        "outliers removed"
    );
    Ok((cleaned, removed))
}
