//! Debug sinks
//!
//! Identification and decoding can report their results to an optional
//! [`RecogSink`]. Sinks only observe: results are the same with or
//! without one.

use glyphrec_core::{Pix, PixMut, Pixa};

use super::types::{Decoding, Rch};

/// Observer of identification and decoding results
pub trait RecogSink {
    /// Called after a single glyph is identified.
    ///
    /// `query` is the normalized bitmap the match coordinates refer to.
    fn on_identify(&mut self, _query: &Pix, _rch: &Rch) {}

    /// Called after a strip is decoded.
    ///
    /// `strip` is the normalized strip the segment coordinates refer to.
    fn on_decode(&mut self, _strip: &Pix, _decoding: &Decoding) {}
}

/// Collects one overlay image per reported result
///
/// Each overlay is a 1 bpp copy of the reported bitmap with a 1-pixel box
/// outline drawn around every match.
#[derive(Debug, Default)]
pub struct OverlayCollector {
    overlays: Pixa,
}

impl OverlayCollector {
    /// Creates an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// The collected overlays, in reporting order
    pub fn overlays(&self) -> &Pixa {
        &self.overlays
    }

    /// Takes the collected overlays
    pub fn into_pixa(self) -> Pixa {
        self.overlays
    }
}

fn draw_box(pm: &mut PixMut, x: i32, y: i32, w: i32, h: i32) {
    if w <= 0 || h <= 0 {
        return;
    }
    let (x1, y1) = (x + w - 1, y + h - 1);
    for xx in x..=x1 {
        pm.set_pixel_clipped(xx, y, 1);
        pm.set_pixel_clipped(xx, y1, 1);
    }
    for yy in y..=y1 {
        pm.set_pixel_clipped(x, yy, 1);
        pm.set_pixel_clipped(x1, yy, 1);
    }
}

impl RecogSink for OverlayCollector {
    fn on_identify(&mut self, query: &Pix, rch: &Rch) {
        let mut pm = query.to_mut();
        draw_box(&mut pm, rch.xloc, rch.yloc, rch.width, query.height() as i32);
        pm.set_text(Some(rch.text.clone()));
        self.overlays.push(pm.into());
    }

    fn on_decode(&mut self, strip: &Pix, decoding: &Decoding) {
        let mut pm = strip.to_mut();
        let h = strip.height() as i32;
        for (&x, &w) in decoding.rescored.xlocs.iter().zip(&decoding.rescored.widths) {
            draw_box(&mut pm, x, 0, w, h);
        }
        pm.set_text(Some(decoding.rescored.to_string()));
        self.overlays.push(pm.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recog::Rcha;
    use glyphrec_core::PixelDepth;

    #[test]
    fn test_decode_overlay_boxes() {
        let strip = Pix::new(20, 6, PixelDepth::Bit1).unwrap();
        let mut rescored = Rcha::new();
        rescored.push(&Rch {
            index: 0,
            score: 1.0,
            text: "a".into(),
            sample: 0,
            xloc: 2,
            yloc: 0,
            width: 5,
        });
        let decoding = Decoding {
            initial: rescored.clone(),
            rescored,
            total: 5.0,
        };
        let mut sink = OverlayCollector::new();
        sink.on_decode(&strip, &decoding);
        let overlay = &sink.overlays()[0];
        // 5x6 outline: 2 * 5 + 2 * 4 pixels.
        assert_eq!(overlay.count_pixels().unwrap(), 18);
        assert_eq!(overlay.get_pixel(2, 0), Some(1));
        assert_eq!(overlay.get_pixel(3, 2), Some(0));
        assert_eq!(overlay.text(), Some("a"));
        // The reported strip itself is not modified.
        assert_eq!(strip.count_pixels().unwrap(), 0);
    }
}
