//! Clipping and border operations

use super::{Pix, PixMut, PixelDepth, get_data_bit, set_data_bit};
use crate::box_::Box;
use crate::error::{Error, Result};

impl Pix {
    /// Extract the part of the image covered by `region`.
    ///
    /// The region is clipped to the image first. Text is carried over.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the region does not overlap
    /// the image.
    pub fn clip_rectangle(&self, region: &Box) -> Result<Pix> {
        let full = Box::new_unchecked(0, 0, self.width() as i32, self.height() as i32);
        let r = full.intersect(region).ok_or_else(|| {
            Error::InvalidParameter(format!(
                "clip region {:?} outside {}x{} image",
                region,
                self.width(),
                self.height()
            ))
        })?;
        let mut pm = PixMut::new(r.w as u32, r.h as u32, self.depth())?;
        pm.set_text(self.text().map(str::to_owned));
        for dy in 0..r.h as u32 {
            let sy = r.y as u32 + dy;
            for dx in 0..r.w as u32 {
                let v = self.get_pixel_unchecked(r.x as u32 + dx, sy);
                if v != 0 {
                    pm.set_pixel_unchecked(dx, dy, v);
                }
            }
        }
        Ok(pm.into())
    }

    /// Clip a binary image to the bounding box of its foreground pixels.
    ///
    /// Returns `None` if no foreground pixels are found.
    ///
    /// # Errors
    ///
    /// Returns an error if the image is not 1 bpp.
    pub fn clip_to_foreground(&self) -> Result<Option<(Pix, Box)>> {
        let Some(bounds) = self.foreground_bounds()? else {
            return Ok(None);
        };
        let pix = self.clip_rectangle(&bounds)?;
        Ok(Some((pix, bounds)))
    }

    /// Add a border of `npix` background pixels on every side (1 bpp).
    pub fn add_border(&self, npix: u32) -> Result<Pix> {
        self.require_depth(PixelDepth::Bit1)?;
        let mut pm = PixMut::new(self.width() + 2 * npix, self.height() + 2 * npix, PixelDepth::Bit1)?;
        pm.set_text(self.text().map(str::to_owned));
        for y in 0..self.height() {
            let sline = self.row_data(y);
            let dline = pm.row_data_mut(y + npix);
            for x in 0..self.width() {
                if get_data_bit(sline, x) != 0 {
                    set_data_bit(dline, x + npix);
                }
            }
        }
        Ok(pm.into())
    }

    /// Remove `npix` pixels from every side.
    pub fn remove_border(&self, npix: u32) -> Result<Pix> {
        if 2 * npix >= self.width() || 2 * npix >= self.height() {
            return Err(Error::InvalidParameter(format!(
                "border {} too large for {}x{} image",
                npix,
                self.width(),
                self.height()
            )));
        }
        self.clip_rectangle(&Box::new_unchecked(
            npix as i32,
            npix as i32,
            (self.width() - 2 * npix) as i32,
            (self.height() - 2 * npix) as i32,
        ))
    }
}
