//! Template training for character recognition
//!
//! A recognizer starts in [`RecogState::Training`]. Samples are added per
//! class, [`Recog::build_averages`] computes one centroid-aligned average
//! per class at both native and configured scale, and
//! [`Recog::finalize_training`] builds the scaled sample set and freezes
//! the recognizer.
//!
//! A finalized recognizer never accepts samples again. To extend it, take
//! the generating collection with [`Recog::extract_pixa`], append to it
//! and build a new recognizer with [`Recog::from_pixa`].

use glyphrec_core::{Pix, PixMut, PixelDepth, Pixa, threshold_to_binary};
use glyphrec_morph::set_stroke_width;
use glyphrec_region::{ConnectivityType, remove_small_components};
use glyphrec_transform::scale_to_size;
use tracing::{debug, info, warn};

use crate::error::{RecogError, RecogResult};

use super::types::{
    ClassTable, Recog, RecogConfig, RecogState, Template, TemplateSizes, TemplateType,
};

impl Recog {
    /// Creates an empty recognizer
    ///
    /// Classes are registered as their first sample arrives. A configured
    /// charset only sets the class count that [`Recog::check_charset`]
    /// expects.
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::InvalidParameter`] if the configuration does
    /// not validate.
    pub fn new(config: RecogConfig) -> RecogResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: RecogState::Training,
            classes: ClassTable::new(),
            samples_u: Vec::new(),
            samples: Vec::new(),
            averages_u: Vec::new(),
            averages: Vec::new(),
            ave_done: false,
            sizes: TemplateSizes::default(),
        })
    }

    /// Creates a finalized recognizer from a labeled generating collection
    ///
    /// The label of each image is its text. Images without text are
    /// skipped.
    pub fn from_pixa(pixa: &Pixa, config: RecogConfig) -> RecogResult<Self> {
        let mut recog = Self::new(config)?;
        for (i, pix) in pixa.iter().enumerate() {
            match pix.text() {
                Some(label) if !label.is_empty() => recog.train_labeled(pix, label)?,
                _ => warn!(index = i, "skipping unlabeled sample"),
            }
        }
        recog.build_averages()?;
        recog.finalize_training()?;
        Ok(recog)
    }

    /// The configuration this recognizer was built with
    pub fn config(&self) -> &RecogConfig {
        &self.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> RecogState {
        self.state
    }

    /// Returns true once training is finalized
    pub fn is_finalized(&self) -> bool {
        self.state == RecogState::Finalized
    }

    /// Returns true if the averaged templates match the current samples
    pub fn averages_current(&self) -> bool {
        self.ave_done
    }

    /// The class table
    pub fn classes(&self) -> &ClassTable {
        &self.classes
    }

    /// Number of classes
    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// Total number of unscaled samples
    pub fn num_samples(&self) -> usize {
        self.samples_u.iter().map(Vec::len).sum()
    }

    /// Number of samples in each class, in class order
    pub fn sample_counts(&self) -> Vec<usize> {
        self.samples_u.iter().map(Vec::len).collect()
    }

    /// Index of the class labeled `label`
    pub fn class_index(&self, label: &str) -> RecogResult<usize> {
        self.classes
            .index(label)
            .ok_or_else(|| RecogError::UnknownClass(label.to_string()))
    }

    /// Label of class `index`
    pub fn class_label(&self, index: usize) -> RecogResult<&str> {
        self.classes
            .label(index)
            .ok_or_else(|| RecogError::UnknownClass(format!("index {}", index)))
    }

    /// Unscaled samples of class `index`
    pub fn samples(&self, index: usize) -> RecogResult<&[Template]> {
        self.samples_u
            .get(index)
            .map(Vec::as_slice)
            .ok_or_else(|| RecogError::UnknownClass(format!("index {}", index)))
    }

    /// Scaled averaged templates, one per class
    pub fn averages(&self) -> RecogResult<&[Template]> {
        if !self.ave_done {
            return Err(RecogError::AveragesNotBuilt);
        }
        Ok(&self.averages)
    }

    /// Unscaled averaged templates, one per class
    pub fn unscaled_averages(&self) -> RecogResult<&[Template]> {
        if !self.ave_done {
            return Err(RecogError::AveragesNotBuilt);
        }
        Ok(&self.averages_u)
    }

    /// Size range of the averaged templates
    pub fn template_sizes(&self) -> RecogResult<TemplateSizes> {
        if !self.ave_done {
            return Err(RecogError::AveragesNotBuilt);
        }
        Ok(self.sizes)
    }

    /// Binarize with the configured threshold; 1 bpp input is shared.
    pub(crate) fn binarize(&self, pix: &Pix) -> RecogResult<Pix> {
        Ok(threshold_to_binary(pix, self.config.threshold)?)
    }

    /// Scale a bitmap to the configured template size
    pub(crate) fn scale_template(&self, pix: &Pix) -> RecogResult<Pix> {
        let (sw, sh) = (self.config.scale_w, self.config.scale_h);
        if sw == 0 && sh == 0 {
            return Ok(pix.clone());
        }
        Ok(scale_to_size(pix, sw, sh)?)
    }

    /// Redraw with strokes `line_w` wide if outline templates are configured
    pub(crate) fn outline(&self, pix: &Pix) -> RecogResult<Pix> {
        match self.config.templ_type {
            TemplateType::Image => Ok(pix.clone()),
            TemplateType::Outline => Ok(set_stroke_width(pix, self.config.line_w)?),
        }
    }

    /// Scale a bitmap and convert it to the configured template type
    pub fn modify_template(&self, pix: &Pix) -> RecogResult<Pix> {
        let scaled = self.scale_template(pix)?;
        self.outline(&scaled)
    }

    /// Adds a labeled sample after cleaning it
    ///
    /// The image is binarized, isolated single pixels are removed and the
    /// result is clipped to its foreground.
    ///
    /// # Errors
    ///
    /// - [`RecogError::NotTraining`] if training is finalized
    /// - [`RecogError::NoContent`] if nothing is left after cleaning
    pub fn train_labeled(&mut self, pix: &Pix, label: &str) -> RecogResult<()> {
        if self.is_finalized() {
            return Err(RecogError::NotTraining);
        }
        let processed = self.process_labeled(pix)?;
        self.add_sample(label, &processed)
    }

    fn process_labeled(&self, pix: &Pix) -> RecogResult<Pix> {
        let pix1 = self.binarize(pix)?;
        let pix2 = remove_small_components(&pix1, 2, ConnectivityType::EightWay)?;
        let (pix3, _) = pix2
            .clip_to_foreground()?
            .ok_or_else(|| RecogError::NoContent("sample has no foreground".to_string()))?;
        Ok(pix3)
    }

    /// Index of class `label`, registering it (with no samples) if new
    pub(crate) fn register_class(&mut self, label: &str) -> usize {
        let index = self.classes.insert(label);
        if self.samples_u.len() <= index {
            self.samples_u.resize_with(index + 1, Vec::new);
        }
        index
    }

    /// Adds a 1 bpp sample to class `label`, creating the class if new
    ///
    /// The averaged templates become stale.
    pub fn add_sample(&mut self, label: &str, pix: &Pix) -> RecogResult<()> {
        if self.is_finalized() {
            return Err(RecogError::NotTraining);
        }
        if label.is_empty() {
            return Err(RecogError::InvalidParameter(
                "label cannot be empty".to_string(),
            ));
        }
        let template = Template::new(pix.clone())?;
        let index = self.register_class(label);
        self.samples_u[index].push(template);
        if self.ave_done {
            debug!(label, "averages invalidated");
        }
        self.ave_done = false;
        self.averages_u.clear();
        self.averages.clear();
        Ok(())
    }

    /// Computes the averaged template of every class
    ///
    /// Each class gets an unscaled average and one at the configured
    /// scale. Calling this again without adding samples leaves the
    /// averages unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::EmptyClass`] if there are no classes or any
    /// class has no samples.
    pub fn build_averages(&mut self) -> RecogResult<()> {
        if self.ave_done {
            return Ok(());
        }
        if self.classes.is_empty() {
            return Err(RecogError::EmptyClass {
                class: "<none>".to_string(),
            });
        }

        let scaling = self.config.scale_w > 0 || self.config.scale_h > 0;
        let mut averages_u = Vec::with_capacity(self.classes.len());
        let mut averages = Vec::with_capacity(self.classes.len());
        for (index, samples) in self.samples_u.iter().enumerate() {
            if samples.is_empty() {
                return Err(RecogError::EmptyClass {
                    class: self.classes.label(index).unwrap_or_default().to_string(),
                });
            }
            let ave_u = compute_class_average(samples)?;
            let ave = if scaling {
                let scaled = samples
                    .iter()
                    .map(|t| Template::new(self.scale_template(&t.pix)?))
                    .collect::<RecogResult<Vec<_>>>()?;
                compute_class_average(&scaled)?
            } else {
                ave_u.clone()
            };
            let ave = match self.config.templ_type {
                TemplateType::Image => ave,
                TemplateType::Outline => Template::new(self.outline(&ave.pix)?)?,
            };
            debug!(
                class = index,
                samples = samples.len(),
                width = ave.width(),
                height = ave.height(),
                "averaged class"
            );
            averages_u.push(ave_u);
            averages.push(ave);
        }

        self.sizes = TemplateSizes {
            min_width_u: averages_u.iter().map(Template::width).min().unwrap_or(0),
            max_width_u: averages_u.iter().map(Template::width).max().unwrap_or(0),
            min_height_u: averages_u.iter().map(Template::height).min().unwrap_or(0),
            max_height_u: averages_u.iter().map(Template::height).max().unwrap_or(0),
            min_width: averages.iter().map(Template::width).min().unwrap_or(0),
            max_width: averages.iter().map(Template::width).max().unwrap_or(0),
        };
        self.averages_u = averages_u;
        self.averages = averages;
        self.ave_done = true;
        Ok(())
    }

    /// Finishes training and prepares for identification
    ///
    /// Builds the scaled sample set and freezes the recognizer. Calling it
    /// on a finalized recognizer does nothing.
    ///
    /// # Errors
    ///
    /// - [`RecogError::AveragesNotBuilt`] unless the averages are current
    /// - [`RecogError::InvalidGeometry`] if the averaged template heights
    ///   differ by more than `max_ht_ratio`
    pub fn finalize_training(&mut self) -> RecogResult<()> {
        if self.is_finalized() {
            return Ok(());
        }
        if !self.ave_done {
            return Err(RecogError::AveragesNotBuilt);
        }

        let ratio = self.sizes.max_height_u as f32 / self.sizes.min_height_u.max(1) as f32;
        if ratio > self.config.max_ht_ratio {
            return Err(RecogError::InvalidGeometry(format!(
                "template height ratio {:.2} exceeds maximum {:.2}",
                ratio, self.config.max_ht_ratio
            )));
        }

        let samples = self
            .samples_u
            .iter()
            .map(|class| {
                class
                    .iter()
                    .map(|t| Template::new(self.modify_template(&t.pix)?))
                    .collect::<RecogResult<Vec<_>>>()
            })
            .collect::<RecogResult<Vec<_>>>()?;
        self.samples = samples;
        self.state = RecogState::Finalized;

        self.check_charset();
        info!(
            classes = self.num_classes(),
            samples = self.num_samples(),
            "training finalized"
        );
        Ok(())
    }

    /// Returns the generating collection
    ///
    /// Every unscaled sample, labeled through its text, in class and then
    /// sample order.
    pub fn extract_pixa(&self) -> Pixa {
        let mut pixa = Pixa::with_capacity(self.num_samples());
        for (label, samples) in self.classes.labels().iter().zip(&self.samples_u) {
            for t in samples {
                pixa.push(t.pix.with_text(label.as_str()));
            }
        }
        pixa
    }

    /// Checks the number of classes against the configured charset size
    ///
    /// Returns false, and logs a warning, when a nonzero `charset_size`
    /// differs from the number of classes.
    pub fn check_charset(&self) -> bool {
        let expected = self.config.charset_size;
        if expected == 0 || expected == self.num_classes() {
            return true;
        }
        warn!(
            expected,
            actual = self.num_classes(),
            "class count differs from charset size"
        );
        false
    }
}

/// Average a set of templates after centroid alignment
///
/// Each template is placed on a canvas large enough for any alignment so
/// that its centroid lands on the canvas center. A pixel is ON in the
/// average if it is ON in more than half of the templates; if no pixel
/// reaches a majority, every pixel covered by any template is kept. The
/// result is clipped to its foreground.
pub(crate) fn compute_class_average(templates: &[Template]) -> RecogResult<Template> {
    let n = templates.len() as u32;
    if n == 0 {
        return Err(RecogError::NoContent(
            "cannot average an empty class".to_string(),
        ));
    }
    let max_w = templates.iter().map(Template::width).max().unwrap_or(1);
    let max_h = templates.iter().map(Template::height).max().unwrap_or(1);
    let (cw, ch) = (2 * max_w + 1, 2 * max_h + 1);
    let mut accum = vec![0u32; cw as usize * ch as usize];

    for t in templates {
        let ox = (max_w as f32 - t.centroid.0).round() as i32;
        let oy = (max_h as f32 - t.centroid.1).round() as i32;
        for y in 0..t.height() {
            let dy = y as i32 + oy;
            if dy < 0 || dy >= ch as i32 {
                continue;
            }
            for x in 0..t.width() {
                let dx = x as i32 + ox;
                if dx < 0 || dx >= cw as i32 || t.pix.get_pixel_unchecked(x, y) == 0 {
                    continue;
                }
                accum[(dy as u32 * cw + dx as u32) as usize] += 1;
            }
        }
    }

    let min_count = if accum.iter().any(|&c| 2 * c > n) {
        n / 2 + 1
    } else {
        1
    };
    let mut pm = PixMut::new(cw, ch, PixelDepth::Bit1)?;
    for y in 0..ch {
        for x in 0..cw {
            if accum[(y * cw + x) as usize] >= min_count {
                pm.set_pixel_unchecked(x, y, 1);
            }
        }
    }
    let canvas: Pix = pm.into();
    let (average, _) = canvas
        .clip_to_foreground()?
        .ok_or_else(|| RecogError::NoContent("average has no foreground".to_string()))?;
    Template::new(average)
}
