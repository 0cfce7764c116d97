//! Identification of isolated glyphs
//!
//! A finalized recognizer is read-only, so any number of identifications
//! may run at once over a shared `&Recog`. [`Recog::identify_batch`] does
//! exactly that with rayon.

use glyphrec_core::{Pix, Pixa};
use glyphrec_region::{ConnectivityType, extract_components};
use rayon::prelude::*;
use tracing::debug;

use crate::error::{RecogError, RecogResult};

use super::correlation::score;
use super::debug::RecogSink;
use super::types::{Rch, Rcha, Recog, Template, TemplateUse};

impl Recog {
    pub(crate) fn require_finalized(&self) -> RecogResult<()> {
        if !self.is_finalized() {
            return Err(RecogError::NotFinalized);
        }
        Ok(())
    }

    /// Binarize, clip and normalize an input glyph for matching
    pub(crate) fn prepare_query(&self, pix: &Pix) -> RecogResult<Template> {
        let binary = self.binarize(pix)?;
        let (clipped, _) = binary
            .clip_to_foreground()?
            .ok_or_else(|| RecogError::NoContent("glyph has no foreground".to_string()))?;
        Template::new(self.modify_template(&clipped)?)
    }

    /// Best match of a prepared query under the `templ_use` policy
    pub(crate) fn best_match(&self, query: &Template) -> RecogResult<Rch> {
        let max_y_shift = self.config.max_y_shift;
        let mut best = Rch::default();
        let mut consider = |class: usize, sample: i32, t: &Template| -> RecogResult<()> {
            let m = score(query, t, max_y_shift)?;
            if best.index < 0 || m.score > best.score {
                best = Rch {
                    index: class as i32,
                    score: m.score,
                    text: String::new(),
                    sample,
                    xloc: m.delx,
                    yloc: m.dely,
                    width: t.width() as i32,
                };
            }
            Ok(())
        };
        match self.config.templ_use {
            TemplateUse::All => {
                for (class, samples) in self.samples.iter().enumerate() {
                    for (j, t) in samples.iter().enumerate() {
                        consider(class, j as i32, t)?;
                    }
                }
            }
            TemplateUse::Average => {
                for (class, t) in self.averages.iter().enumerate() {
                    consider(class, -1, t)?;
                }
            }
        }
        if best.index >= 0 {
            best.text = self.class_label(best.index as usize)?.to_string();
        }
        Ok(best)
    }

    /// Identifies a single glyph
    ///
    /// The glyph is binarized, clipped to its foreground, scaled and
    /// converted like the templates, then matched against every scaled
    /// sample (`TemplateUse::All`) or every class average
    /// (`TemplateUse::Average`). `xloc`/`yloc` of the result place the
    /// matched template in the normalized glyph.
    ///
    /// # Errors
    ///
    /// - [`RecogError::NotFinalized`] if training is not finished
    /// - [`RecogError::NoContent`] if the image has no foreground
    pub fn identify_pix(&self, pix: &Pix) -> RecogResult<Rch> {
        self.identify_pix_with_sink(pix, None)
    }

    /// [`Recog::identify_pix`], reporting the result to `sink`
    pub fn identify_pix_with_sink(
        &self,
        pix: &Pix,
        sink: Option<&mut dyn RecogSink>,
    ) -> RecogResult<Rch> {
        self.require_finalized()?;
        let query = self.prepare_query(pix)?;
        let rch = self.best_match(&query)?;
        if let Some(sink) = sink {
            sink.on_identify(&query.pix, &rch);
        }
        Ok(rch)
    }

    /// Identifies each image of `pixa` in order
    pub fn identify_pixa(&self, pixa: &Pixa) -> RecogResult<Rcha> {
        let mut rcha = Rcha::new();
        for pix in pixa {
            rcha.push(&self.identify_pix(pix)?);
        }
        Ok(rcha)
    }

    /// Identifies many glyphs in parallel
    ///
    /// Each input gets its own result, in input order; one failure does
    /// not affect the others.
    pub fn identify_batch(&self, pixs: &[Pix]) -> Vec<RecogResult<Rch>> {
        pixs.par_iter().map(|pix| self.identify_pix(pix)).collect()
    }

    /// Identifies every character in a line image
    ///
    /// The image is split into 8-connected components, filtered by
    /// `min_split_w`, `min_split_h` and `max_split_h`, and sorted left to
    /// right. Components wider than `max_wh_ratio` times their height are
    /// decoded as a run of touching characters; the others are identified
    /// singly. Locations in the result are in input image coordinates.
    pub fn identify_multiple(&self, pix: &Pix) -> RecogResult<Rcha> {
        self.require_finalized()?;
        let binary = self.binarize(pix)?;
        let components = extract_components(&binary, ConnectivityType::EightWay)?;
        let c = &self.config;

        let mut kept: Vec<(usize, glyphrec_core::Box)> = components
            .boxes()
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, b)| {
                b.w as u32 >= c.min_split_w
                    && b.h as u32 >= c.min_split_h
                    && b.h as u32 <= c.max_split_h
            })
            .collect();
        kept.sort_by_key(|&(i, b)| (b.x, b.y, i));
        debug!(
            components = components.len(),
            kept = kept.len(),
            "split line image"
        );

        let mut rcha = Rcha::new();
        for (i, b) in kept {
            let comp = &components[i];
            if b.w as f32 > c.max_wh_ratio * b.h as f32 {
                let decoding = self.decode_detailed(comp)?;
                let factor = self.strip_scale_factor(comp.height());
                let r = &decoding.rescored;
                for k in 0..r.len() {
                    if let Some(mut rch) = r.get(k) {
                        rch.xloc = b.x + (rch.xloc as f32 * factor).round() as i32;
                        rch.yloc = b.y + (rch.yloc as f32 * factor).round() as i32;
                        rch.width = (rch.width as f32 * factor).round() as i32;
                        rcha.push(&rch);
                    }
                }
            } else {
                let mut rch = self.identify_pix(comp)?;
                rch.xloc = b.x;
                rch.yloc = b.y;
                rch.width = b.w;
                rcha.push(&rch);
            }
        }
        Ok(rcha)
    }
}
