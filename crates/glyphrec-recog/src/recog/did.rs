//! Line decoding
//!
//! Decodes a strip of touching or adjacent glyphs on one baseline. A
//! trellis over the strip columns records, for every right edge, the best
//! cumulative score of covering the columns to its left either with a
//! background column or with an averaged class template. Placements are
//! weighted by template width so that one full match outscores a cover of
//! small partial matches.
//!
//! The best path is then rescored: every segment found by the trellis is
//! clipped from the strip and identified under the full template policy.
//! Segment boundaries are never moved by rescoring.

use glyphrec_core::{Box, Pix, PixMut, PixelDepth};
use glyphrec_transform::scale_to_size;
use tracing::debug;

use crate::error::{RecogError, RecogResult};

use super::correlation::score_at;
use super::debug::RecogSink;
use super::types::{Decoding, Rch, Rcha, Rdid, Recog, Template, TemplateType, TrellisStep};

/// Strip prepared for decoding
struct Strip {
    /// Binarized strip at decoding scale
    plain: Pix,
    /// `plain` with background columns added on both sides
    padded: Pix,
    /// `padded`, converted like the templates
    matching: Pix,
    pad: u32,
}

/// A segment of the best path, in padded strip coordinates
struct Segment {
    left: usize,
    right: usize,
    class: usize,
    dely: i32,
    score: f32,
}

impl Recog {
    /// Ratio of an input strip height to the decoding height
    ///
    /// Strips are rescaled to `scale_h` when templates are scaled to a
    /// fixed height only; decoding locations multiplied by this factor are
    /// in input coordinates.
    pub fn strip_scale_factor(&self, height: u32) -> f32 {
        let (sw, sh) = (self.config.scale_w, self.config.scale_h);
        if sw == 0 && sh > 0 && height != sh {
            height as f32 / sh as f32
        } else {
            1.0
        }
    }

    fn decoding_templates(&self) -> &[Template] {
        if self.config.scale_w == 0 {
            &self.averages
        } else {
            &self.averages_u
        }
    }

    fn prepare_strip(&self, pix: &Pix) -> RecogResult<Strip> {
        let binary = self.binarize(pix)?;
        let (sw, sh) = (self.config.scale_w, self.config.scale_h);
        let plain = if sw == 0 && sh > 0 && binary.height() != sh {
            if !self.config.allow_strip_scaling {
                return Err(RecogError::InvalidGeometry(format!(
                    "strip height {} differs from template height {}",
                    binary.height(),
                    sh
                )));
            }
            scale_to_size(&binary, 0, sh)?
        } else {
            binary
        };

        let max_tw = self
            .decoding_templates()
            .iter()
            .map(Template::width)
            .max()
            .unwrap_or(0);
        let pad = (max_tw / 10).max(2);
        let mut pm = PixMut::new(plain.width() + 2 * pad, plain.height(), PixelDepth::Bit1)?;
        pm.or_at(&plain, pad as i32, 0)?;
        let padded: Pix = pm.into();

        let matching = if sw == 0 && self.config.templ_type == TemplateType::Outline {
            self.outline(&padded)?
        } else {
            padded.clone()
        };
        Ok(Strip {
            plain,
            padded,
            matching,
            pad,
        })
    }

    /// Fill the trellis of `rdid` with the given templates
    fn fill_trellis(&self, rdid: &mut Rdid, templates: &[Template]) -> RecogResult<()> {
        let max_y_shift = self.config.max_y_shift;
        for c in 1..=rdid.width() {
            let mut best = rdid.trellis[c - 1];
            let mut step = TrellisStep::Skip;
            for (class, t) in templates.iter().enumerate() {
                let tw = t.width() as usize;
                if tw > c {
                    continue;
                }
                let left = c - tw;
                let Some(cy) = rdid.stats.centroid_y_in(left, c) else {
                    continue;
                };
                let area = rdid.stats.count_in(left, c);
                let dely = (cy - t.centroid.1).round() as i32;
                let m = score_at(&rdid.pix, area, t, left as i32, dely, max_y_shift)?;
                let candidate = rdid.trellis[left] + tw as f32 * m.score;
                if candidate > best {
                    best = candidate;
                    step = TrellisStep::Place {
                        class,
                        width: tw as u32,
                        dely: m.dely,
                        score: m.score,
                    };
                }
            }
            rdid.trellis[c] = best;
            rdid.steps[c] = step;
        }
        Ok(())
    }

    /// Segments of the best path, left to right
    fn backtrack(rdid: &Rdid) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut c = rdid.width();
        while c > 0 {
            match rdid.steps[c] {
                TrellisStep::Start => break,
                TrellisStep::Skip => c -= 1,
                TrellisStep::Place {
                    class,
                    width,
                    dely,
                    score,
                } => {
                    let left = c - width as usize;
                    segments.push(Segment {
                        left,
                        right: c,
                        class,
                        dely,
                        score,
                    });
                    c = left;
                }
            }
        }
        segments.reverse();
        segments
    }

    /// Identify one frozen segment under the full template policy
    fn rescore(&self, strip: &Strip, seg: &Segment, initial: &Rch) -> RecogResult<Rch> {
        let region = Box::new(
            seg.left as i32,
            0,
            (seg.right - seg.left) as i32,
            strip.padded.height() as i32,
        )?;
        let clip = strip.padded.clip_rectangle(&region)?;
        let Some((fg, fg_box)) = clip.clip_to_foreground()? else {
            return Ok(initial.clone());
        };
        let query = Template::new(self.modify_template(&fg)?)?;
        let mut rch = self.best_match(&query)?;
        rch.xloc = initial.xloc;
        rch.width = initial.width;
        rch.yloc = fg_box.y;
        if rch.index != initial.index {
            debug!(
                xloc = rch.xloc,
                from = initial.text.as_str(),
                to = rch.text.as_str(),
                "rescoring changed class"
            );
        }
        Ok(rch)
    }

    /// Single guess for a strip where the trellis placed nothing
    fn guess(&self, plain: &Pix) -> RecogResult<Decoding> {
        let Some((fg, fg_box)) = plain.clip_to_foreground()? else {
            return Ok(Decoding::default());
        };
        let query = Template::new(self.modify_template(&fg)?)?;
        let mut rch = self.best_match(&query)?;
        rch.xloc = fg_box.x;
        rch.yloc = fg_box.y;
        rch.width = fg_box.w;
        let mut rcha = Rcha::new();
        rcha.push(&rch);
        debug!(text = rch.text.as_str(), score = rch.score, "no admissible placement");
        Ok(Decoding {
            initial: rcha.clone(),
            rescored: rcha,
            total: 0.0,
        })
    }

    /// Decodes a strip of glyphs
    ///
    /// Returns the rescored characters; see [`Recog::decode_detailed`].
    pub fn decode(&self, pix: &Pix) -> RecogResult<Rcha> {
        Ok(self.decode_detailed(pix)?.rescored)
    }

    /// [`Recog::decode`], reporting the decoding to `sink`
    pub fn decode_with_sink(
        &self,
        pix: &Pix,
        sink: Option<&mut dyn RecogSink>,
    ) -> RecogResult<Rcha> {
        Ok(self.decode_detailed_with_sink(pix, sink)?.rescored)
    }

    /// Decodes a strip of glyphs, returning both passes
    ///
    /// # Errors
    ///
    /// - [`RecogError::NotFinalized`] if training is not finished
    /// - [`RecogError::InvalidGeometry`] if the strip height differs from
    ///   `scale_h` and strip scaling is not allowed
    ///
    /// An empty strip decodes to an empty result. Locations are in the
    /// coordinates of the strip at decoding scale
    /// ([`Recog::strip_scale_factor`]).
    pub fn decode_detailed(&self, pix: &Pix) -> RecogResult<Decoding> {
        self.decode_detailed_with_sink(pix, None)
    }

    /// [`Recog::decode_detailed`], reporting the decoding to `sink`
    pub fn decode_detailed_with_sink(
        &self,
        pix: &Pix,
        sink: Option<&mut dyn RecogSink>,
    ) -> RecogResult<Decoding> {
        self.require_finalized()?;
        let strip = self.prepare_strip(pix)?;
        let decoding = self.decode_strip(&strip)?;
        if let Some(sink) = sink {
            sink.on_decode(&strip.plain, &decoding);
        }
        Ok(decoding)
    }

    fn decode_strip(&self, strip: &Strip) -> RecogResult<Decoding> {
        if strip.plain.count_pixels()? == 0 {
            return Ok(Decoding::default());
        }
        let templates = self.decoding_templates();
        let mut rdid = Rdid::new(strip.matching.clone())?;
        self.fill_trellis(&mut rdid, templates)?;
        let segments = Self::backtrack(&rdid);
        let total = rdid.trellis[rdid.width()];
        if segments.is_empty() {
            return self.guess(&strip.plain);
        }

        let pad = strip.pad as usize;
        let width = strip.plain.width() as usize;
        let mut initial = Rcha::new();
        let mut rescored = Rcha::new();
        for seg in &segments {
            let x0 = seg.left.saturating_sub(pad);
            let x1 = seg.right.saturating_sub(pad).min(width);
            let rch = Rch {
                index: seg.class as i32,
                score: seg.score,
                text: self.class_label(seg.class)?.to_string(),
                sample: -1,
                xloc: x0 as i32,
                yloc: seg.dely,
                width: x1.saturating_sub(x0) as i32,
            };
            rescored.push(&self.rescore(strip, seg, &rch)?);
            initial.push(&rch);
        }
        debug!(
            segments = segments.len(),
            total,
            text = %rescored,
            "decoded strip"
        );
        Ok(Decoding {
            initial,
            rescored,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recog::RecogConfig;
    use glyphrec_core::Pixa;

    fn bar(w: u32, h: u32, hole: bool) -> Pix {
        let mut pm = PixMut::new(w, h, PixelDepth::Bit1).unwrap();
        for y in 0..h {
            for x in 0..w {
                let edge = x < 2 || y < 2 || x + 2 >= w || y + 2 >= h;
                if !hole || edge {
                    pm.set_pixel(x, y, 1).unwrap();
                }
            }
        }
        pm.into()
    }

    fn trained() -> Recog {
        let mut pixa = Pixa::new();
        pixa.push(bar(4, 20, false).with_text("l"));
        pixa.push(bar(14, 20, true).with_text("o"));
        Recog::from_pixa(&pixa, RecogConfig::new().with_scale(0, 20)).unwrap()
    }

    fn strip(parts: &[(u32, bool)], gap: u32) -> Pix {
        let width: u32 = parts.iter().map(|p| p.0).sum::<u32>() + gap * (parts.len() as u32 - 1);
        let mut pm = PixMut::new(width, 20, PixelDepth::Bit1).unwrap();
        let mut x = 0;
        for &(w, hole) in parts {
            pm.or_at(&bar(w, 20, hole), x, 0).unwrap();
            x += (w + gap) as i32;
        }
        pm.into()
    }

    #[test]
    fn test_decode_requires_finalized() {
        let mut recog = Recog::new(RecogConfig::default()).unwrap();
        recog.add_sample("l", &bar(4, 20, false)).unwrap();
        assert!(matches!(
            recog.decode(&bar(4, 20, false)),
            Err(RecogError::NotFinalized)
        ));
    }

    #[test]
    fn test_decode_two_glyphs() {
        let recog = trained();
        let decoding = recog.decode_detailed(&strip(&[(14, true), (4, false)], 3)).unwrap();
        assert_eq!(decoding.rescored.texts, vec!["o", "l"]);
        assert_eq!(decoding.rescored.xlocs, vec![0, 17]);
        assert_eq!(decoding.rescored.widths, vec![14, 4]);
        assert_eq!(decoding.initial.xlocs, decoding.rescored.xlocs);
        assert!((decoding.total - 18.0).abs() < 1e-4);
    }

    #[test]
    fn test_decode_touching_glyphs() {
        let recog = trained();
        let rcha = recog.decode(&strip(&[(4, false), (14, true)], 0)).unwrap();
        assert_eq!(rcha.to_string(), "lo");
    }

    #[test]
    fn test_decode_empty_strip() {
        let recog = trained();
        let blank = Pix::new(30, 20, PixelDepth::Bit1).unwrap();
        let decoding = recog.decode_detailed(&blank).unwrap();
        assert!(decoding.initial.is_empty());
        assert!(decoding.rescored.is_empty());
        assert_eq!(decoding.total, 0.0);
    }

    #[test]
    fn test_decode_geometry() {
        let mut pixa = Pixa::new();
        pixa.push(bar(4, 20, false).with_text("l"));
        let config = RecogConfig::new().with_scale(0, 20).with_strip_scaling(false);
        let recog = Recog::from_pixa(&pixa, config).unwrap();
        assert!(matches!(
            recog.decode(&bar(8, 40, false)),
            Err(RecogError::InvalidGeometry(_))
        ));
        assert_eq!(recog.strip_scale_factor(40), 2.0);
        assert_eq!(recog.strip_scale_factor(20), 1.0);
    }

    #[test]
    fn test_decode_rescales_strip() {
        let recog = trained();
        let tall = scale_to_size(&strip(&[(14, true), (4, false)], 3), 0, 40).unwrap();
        assert_eq!(recog.decode(&tall).unwrap().to_string(), "ol");
    }

    #[test]
    fn test_backtrack_follows_predecessors() {
        let mut rdid = Rdid::new(Pix::new(6, 2, PixelDepth::Bit1).unwrap()).unwrap();
        rdid.steps[6] = TrellisStep::Skip;
        rdid.steps[5] = TrellisStep::Place {
            class: 1,
            width: 3,
            dely: 0,
            score: 0.5,
        };
        rdid.steps[2] = TrellisStep::Place {
            class: 0,
            width: 2,
            dely: 1,
            score: 1.0,
        };
        let segs = Recog::backtrack(&rdid);
        assert_eq!(segs.len(), 2);
        assert_eq!((segs[0].left, segs[0].right, segs[0].class), (0, 2, 0));
        assert_eq!((segs[1].left, segs[1].right, segs[1].class), (2, 5, 1));
    }
}
