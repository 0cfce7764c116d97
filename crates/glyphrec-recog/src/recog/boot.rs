//! Bootstrap training
//!
//! With too few labeled samples, a generic recognizer (the boot
//! recognizer) labels a first pass of unlabeled glyphs, which are then
//! trained on together with the labeled ones. Classes with very few
//! labeled samples can also be padded with boot samples.

use std::collections::BTreeMap;

use glyphrec_core::{Pix, Pixa, threshold_to_binary};
use glyphrec_morph::erode_brick;
use glyphrec_transform::scale_to_size;
use tracing::{debug, info, warn};

use crate::error::{RecogError, RecogResult};

use super::types::{Recog, RecogConfig};

/// Source of a finalized boot recognizer
pub trait BootSource {
    /// Builds the boot recognizer
    fn boot_recog(&self) -> RecogResult<Recog>;
}

/// Boot recognizer built from labeled in-memory collections
///
/// All collections are joined. Every sample is binarized and, when
/// `boot_iters` is nonzero, eroded that many times with a 2x2 brick so
/// that heavy boot fonts better match thinner text.
#[derive(Debug, Clone)]
pub struct PixaBootSource {
    pixas: Vec<Pixa>,
    config: RecogConfig,
}

impl PixaBootSource {
    /// Creates a source with no samples
    pub fn new(config: RecogConfig) -> Self {
        Self {
            pixas: Vec::new(),
            config,
        }
    }

    /// Adds a labeled collection
    pub fn with_pixa(mut self, pixa: Pixa) -> Self {
        self.pixas.push(pixa);
        self
    }

    fn thin(&self, pix: &Pix) -> RecogResult<Pix> {
        let mut out = threshold_to_binary(pix, self.config.threshold)?;
        for _ in 0..self.config.boot_iters {
            out = erode_brick(&out, 2, 2)?;
        }
        Ok(out)
    }
}

impl BootSource for PixaBootSource {
    fn boot_recog(&self) -> RecogResult<Recog> {
        let mut joined = Pixa::new();
        for pixa in &self.pixas {
            joined.join(pixa);
        }
        let mut samples = Pixa::with_capacity(joined.len());
        for (i, pix) in joined.iter().enumerate() {
            let thinned = self.thin(pix)?;
            if thinned.count_pixels()? == 0 {
                warn!(index = i, "boot sample vanished under erosion");
                continue;
            }
            match pix.text() {
                Some(label) => samples.push(thinned.with_text(label)),
                None => samples.push(thinned),
            }
        }
        let recog = Recog::from_pixa(&samples, self.config.clone())?;
        info!(
            classes = recog.num_classes(),
            samples = recog.num_samples(),
            "boot recognizer built"
        );
        Ok(recog)
    }
}

/// Labels glyphs with the boot recognizer's class averages
///
/// Glyphs matching their best average with a score of at least
/// `min_score` are returned with the class label as text; the others,
/// and glyphs without foreground, are dropped.
pub fn bootstrap_label(boot: &Recog, unlabeled: &Pixa, min_score: f32) -> RecogResult<Pixa> {
    let mut labeled = Pixa::new();
    for pix in unlabeled {
        let (class, score) = match boot.classify_against_averages(pix) {
            Ok(best) => best,
            Err(RecogError::NoContent(_)) => continue,
            Err(e) => return Err(e),
        };
        if score >= min_score {
            labeled.push(pix.with_text(boot.class_label(class)?));
        }
    }
    info!(
        labeled = labeled.len(),
        unlabeled = unlabeled.len(),
        min_score,
        "bootstrap labeling"
    );
    Ok(labeled)
}

fn count_labeled(pixa: &Pixa) -> usize {
    pixa.iter()
        .filter(|p| p.text().is_some_and(|t| !t.is_empty()))
        .count()
}

/// Trains a recognizer, bootstrapping labels when too few are given
///
/// With at least `min_samples` labeled samples the recognizer is built
/// from `labeled` alone. Otherwise `unlabeled` is labeled by the boot
/// recognizer (see [`bootstrap_label`]) and joined to `labeled`.
pub fn train_with_boot(
    labeled: &Pixa,
    unlabeled: &Pixa,
    boot: &dyn BootSource,
    config: RecogConfig,
    min_score: f32,
) -> RecogResult<Recog> {
    let nlabeled = count_labeled(labeled);
    if nlabeled >= config.min_samples {
        return Recog::from_pixa(labeled, config);
    }
    debug!(
        labeled = nlabeled,
        min_samples = config.min_samples,
        "bootstrapping labels"
    );
    let boot_recog = boot.boot_recog()?;
    let extra = bootstrap_label(&boot_recog, unlabeled, min_score)?;
    let mut all = labeled.clone();
    all.join(&extra);
    Recog::from_pixa(&all, config)
}

/// Pads sparse classes with boot samples
///
/// Every class of `labeled` with fewer than `min_nopad` samples receives
/// samples of the same class from `boot`, scaled to the median height of
/// the labeled set, until it has `max_afterpad`. Classes the boot
/// recognizer does not know stay as they are. The labeled samples come
/// first in the result, followed by the padding.
pub fn pad_samples(labeled: &Pixa, boot: &Recog, config: &RecogConfig) -> RecogResult<Pixa> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut heights = Vec::new();
    for pix in labeled {
        if let Some(label) = pix.text().filter(|t| !t.is_empty()) {
            *counts.entry(label).or_default() += 1;
            heights.push(pix.height());
        }
    }
    let mut padded = labeled.clone();
    if heights.is_empty() {
        return Ok(padded);
    }
    heights.sort_unstable();
    let height = heights[heights.len() / 2];

    for (label, count) in counts {
        if count >= config.min_nopad {
            continue;
        }
        let Some(class) = boot.classes().index(label) else {
            debug!(label, "no boot samples for class");
            continue;
        };
        let want = config.max_afterpad.saturating_sub(count);
        let mut added = 0;
        for t in boot.samples_u[class].iter().take(want) {
            let scaled = scale_to_size(&t.pix, 0, height)?;
            padded.push(scaled.with_text(label));
            added += 1;
        }
        debug!(label, count, added, "padded class");
    }
    Ok(padded)
}
