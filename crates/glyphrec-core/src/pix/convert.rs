//! Depth conversion
//!
//! Grayscale input is turned into binary glyph bitmaps by a fixed
//! threshold: dark pixels (value below the threshold) become foreground.

use super::{Pix, PixMut, PixelDepth};
use crate::error::{Error, Result};

/// Threshold an image to 1 bpp.
///
/// 8 bpp pixels with value `< thresh` become 1 (foreground). A 1 bpp input
/// is returned unchanged (shared, not copied). Text is carried over.
///
/// # Arguments
///
/// * `pix` - 1 or 8 bpp image
/// * `thresh` - threshold in 1..=255
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] if `thresh` is out of range.
pub fn threshold_to_binary(pix: &Pix, thresh: u32) -> Result<Pix> {
    if thresh == 0 || thresh > 255 {
        return Err(Error::InvalidParameter(format!(
            "threshold must be in 1..=255, got {}",
            thresh
        )));
    }
    match pix.depth() {
        PixelDepth::Bit1 => Ok(pix.clone()),
        PixelDepth::Bit8 => {
            let mut pm = PixMut::new(pix.width(), pix.height(), PixelDepth::Bit1)?;
            pm.set_text(pix.text().map(str::to_owned));
            for y in 0..pix.height() {
                for x in 0..pix.width() {
                    if pix.get_pixel_unchecked(x, y) < thresh {
                        pm.set_pixel_unchecked(x, y, 1);
                    }
                }
            }
            Ok(pm.into())
        }
    }
}

impl Pix {
    /// Expand a binary image to 8 bpp, mapping 0 to `val0` and 1 to `val1`.
    pub fn convert_1_to_8(&self, val0: u8, val1: u8) -> Result<Pix> {
        self.require_depth(PixelDepth::Bit1)?;
        let mut pm = PixMut::new(self.width(), self.height(), PixelDepth::Bit8)?;
        pm.set_text(self.text().map(str::to_owned));
        for y in 0..self.height() {
            for x in 0..self.width() {
                let v = if self.get_pixel_unchecked(x, y) != 0 {
                    val1
                } else {
                    val0
                };
                pm.set_pixel_unchecked(x, y, v as u32);
            }
        }
        Ok(pm.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_dark_is_foreground() {
        let mut pm = PixMut::new(3, 1, PixelDepth::Bit8).unwrap();
        pm.set_pixel(0, 0, 10).unwrap();
        pm.set_pixel(1, 0, 150).unwrap();
        pm.set_pixel(2, 0, 255).unwrap();
        let gray: Pix = pm.into();
        let bin = threshold_to_binary(&gray, 150).unwrap();
        assert_eq!(bin.depth(), PixelDepth::Bit1);
        assert_eq!(bin.get_pixel(0, 0), Some(1));
        assert_eq!(bin.get_pixel(1, 0), Some(0));
        assert_eq!(bin.get_pixel(2, 0), Some(0));
    }

    #[test]
    fn test_threshold_range() {
        let gray = Pix::new(2, 2, PixelDepth::Bit8).unwrap();
        assert!(threshold_to_binary(&gray, 0).is_err());
        assert!(threshold_to_binary(&gray, 256).is_err());
    }

    #[test]
    fn test_convert_1_to_8() {
        let mut pm = PixMut::new(2, 1, PixelDepth::Bit1).unwrap();
        pm.set_pixel(1, 0, 1).unwrap();
        let pix: Pix = pm.into();
        let gray = pix.convert_1_to_8(255, 0).unwrap();
        assert_eq!(gray.get_pixel(0, 0), Some(255));
        assert_eq!(gray.get_pixel(1, 0), Some(0));
    }
}
