//! Raster operations (ROP)
//!
//! Bitwise operations on binary images:
//!
//! - AND, OR, subtract of two same-sized images
//! - Invert, which gives the background mask for hit-miss matching
//! - OR of a source image painted at an offset into a destination
//!
//! Padding bits beyond the image width are kept at zero so that word-level
//! pixel counts stay exact.

use super::{Pix, PixMut, PixelDepth, get_data_bit, set_data_bit};
use crate::error::{Error, Result};

/// Raster operation type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RopOp {
    /// Source AND destination
    And,
    /// Source OR destination
    Or,
    /// Destination AND (NOT source)
    Subtract,
}

impl RopOp {
    #[inline]
    fn apply(self, d: u32, s: u32) -> u32 {
        match self {
            RopOp::And => d & s,
            RopOp::Or => d | s,
            RopOp::Subtract => d & !s,
        }
    }
}

/// Mask selecting the valid bits in the last word of a 1 bpp row.
#[inline]
pub(crate) fn end_mask(width: u32) -> u32 {
    let leftover = width % 32;
    if leftover == 0 {
        u32::MAX
    } else {
        !0u32 << (32 - leftover)
    }
}

fn check_binary_pair(a: &Pix, b: &Pix) -> Result<()> {
    a.require_depth(PixelDepth::Bit1)?;
    b.require_depth(PixelDepth::Bit1)?;
    if a.width() != b.width() || a.height() != b.height() {
        return Err(Error::IncompatibleSizes(
            a.width(),
            a.height(),
            b.width(),
            b.height(),
        ));
    }
    Ok(())
}

impl Pix {
    /// Bitwise AND of two images.
    ///
    /// # Errors
    ///
    /// Returns error if images are not 1 bpp or have different dimensions.
    pub fn and(&self, other: &Pix) -> Result<Pix> {
        self.rop(other, RopOp::And)
    }

    /// Bitwise OR of two images.
    pub fn or(&self, other: &Pix) -> Result<Pix> {
        self.rop(other, RopOp::Or)
    }

    /// Pixels set in `self` but not in `other`.
    pub fn subtract(&self, other: &Pix) -> Result<Pix> {
        self.rop(other, RopOp::Subtract)
    }

    /// Apply a raster operation with `self` as destination.
    pub fn rop(&self, other: &Pix, op: RopOp) -> Result<Pix> {
        let mut pm = self.to_mut();
        pm.rop_inplace(other, op)?;
        Ok(pm.into())
    }

    /// Invert a binary image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] if not 1 bpp.
    pub fn invert(&self) -> Result<Pix> {
        self.require_depth(PixelDepth::Bit1)?;
        let mut pm = self.to_mut();
        let wpl = pm.wpl() as usize;
        let mask = end_mask(pm.width());
        for row in pm.data_mut().chunks_mut(wpl) {
            for w in row.iter_mut() {
                *w = !*w;
            }
            if let Some(last) = row.last_mut() {
                *last &= mask;
            }
        }
        Ok(pm.into())
    }
}

impl PixMut {
    /// In-place raster operation with `self` as destination.
    ///
    /// # Errors
    ///
    /// Returns error if images are not 1 bpp or have different dimensions.
    pub fn rop_inplace(&mut self, other: &Pix, op: RopOp) -> Result<()> {
        if self.depth() != PixelDepth::Bit1 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        other.require_depth(PixelDepth::Bit1)?;
        if self.width() != other.width() || self.height() != other.height() {
            return Err(Error::IncompatibleSizes(
                self.width(),
                self.height(),
                other.width(),
                other.height(),
            ));
        }
        for (d, &s) in self.data_mut().iter_mut().zip(other.data()) {
            *d = op.apply(*d, s);
        }
        Ok(())
    }

    /// OR a 1 bpp source into `self` with its origin at `(dx, dy)`.
    ///
    /// Parts of the source falling outside `self` are dropped.
    pub fn or_at(&mut self, src: &Pix, dx: i32, dy: i32) -> Result<()> {
        if self.depth() != PixelDepth::Bit1 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        src.require_depth(PixelDepth::Bit1)?;
        let (dw, dh) = (self.width() as i32, self.height() as i32);
        for sy in 0..src.height() {
            let y = sy as i32 + dy;
            if y < 0 || y >= dh {
                continue;
            }
            let sline = src.row_data(sy);
            let dline = self.row_data_mut(y as u32);
            for sx in 0..src.width() {
                let x = sx as i32 + dx;
                if x < 0 || x >= dw {
                    continue;
                }
                if get_data_bit(sline, sx) != 0 {
                    set_data_bit(dline, x as u32);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pix_from_points(w: u32, h: u32, pts: &[(u32, u32)]) -> Pix {
        let mut pm = PixMut::new(w, h, PixelDepth::Bit1).unwrap();
        for &(x, y) in pts {
            pm.set_pixel(x, y, 1).unwrap();
        }
        pm.into()
    }

    #[test]
    fn test_and_or_subtract() {
        let a = pix_from_points(5, 5, &[(0, 0), (1, 1)]);
        let b = pix_from_points(5, 5, &[(1, 1), (2, 2)]);
        assert_eq!(a.and(&b).unwrap().count_pixels().unwrap(), 1);
        assert_eq!(a.or(&b).unwrap().count_pixels().unwrap(), 3);
        assert_eq!(a.subtract(&b).unwrap().count_pixels().unwrap(), 1);
        assert_eq!(a.subtract(&b).unwrap().get_pixel(0, 0), Some(1));
    }

    #[test]
    fn test_rop_size_mismatch() {
        let a = pix_from_points(5, 5, &[]);
        let b = pix_from_points(6, 5, &[]);
        assert!(a.and(&b).is_err());
    }

    #[test]
    fn test_invert_keeps_padding_clear() {
        let a = pix_from_points(10, 3, &[(0, 0)]);
        let inv = a.invert().unwrap();
        assert_eq!(inv.count_pixels().unwrap(), 29);
        assert_eq!(inv.data()[0] & !end_mask(10), 0);
    }

    #[test]
    fn test_or_at_clips() {
        let src = pix_from_points(3, 3, &[(0, 0), (2, 2)]);
        let mut dst = PixMut::new(4, 4, PixelDepth::Bit1).unwrap();
        dst.or_at(&src, 2, 2).unwrap();
        let dst: Pix = dst.into();
        assert_eq!(dst.get_pixel(2, 2), Some(1));
        assert_eq!(dst.count_pixels().unwrap(), 1);
    }
}
