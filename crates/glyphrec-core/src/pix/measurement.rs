//! Foreground measurements on binary images
//!
//! Pixel counts, centroids, per-column statistics and translated overlap
//! counts. All functions require 1 bpp input.

use super::rop::end_mask;
use super::{Pix, PixelDepth, get_data_bit};
use crate::box_::Box;
use crate::error::Result;

/// Per-column foreground statistics of a binary image
///
/// `counts[x]` is the number of ON pixels in column `x`, `moments[x]` the
/// sum of their row indices. Together they give each column's vertical
/// centroid without another pass over the raster.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnStats {
    /// ON pixel count per column
    pub counts: Vec<u32>,
    /// Sum of the y coordinates of ON pixels per column
    pub moments: Vec<u64>,
}

impl ColumnStats {
    /// Total foreground in the half-open column range `[x0, x1)`.
    pub fn count_in(&self, x0: usize, x1: usize) -> u32 {
        self.counts[x0..x1].iter().sum()
    }

    /// Vertical centroid of the foreground in `[x0, x1)`, if any.
    pub fn centroid_y_in(&self, x0: usize, x1: usize) -> Option<f32> {
        let n = self.count_in(x0, x1);
        if n == 0 {
            return None;
        }
        let m: u64 = self.moments[x0..x1].iter().sum();
        Some(m as f32 / n as f32)
    }
}

impl Pix {
    /// Count the ON pixels of a binary image.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnsupportedDepth`] if not 1 bpp.
    pub fn count_pixels(&self) -> Result<u32> {
        self.require_depth(PixelDepth::Bit1)?;
        let mask = end_mask(self.width());
        let wpl = self.wpl() as usize;
        let mut total = 0u32;
        for row in self.data().chunks(wpl) {
            let last = row.len() - 1;
            for (i, &w) in row.iter().enumerate() {
                let w = if i == last { w & mask } else { w };
                total += w.count_ones();
            }
        }
        Ok(total)
    }

    /// Count the ON pixels inside a rectangle (clipped to the image).
    pub fn count_pixels_in_rect(&self, region: &Box) -> Result<u32> {
        self.require_depth(PixelDepth::Bit1)?;
        let full = Box::new_unchecked(0, 0, self.width() as i32, self.height() as i32);
        let Some(r) = full.intersect(region) else {
            return Ok(0);
        };
        let mut total = 0u32;
        for y in r.y..r.bottom() {
            let line = self.row_data(y as u32);
            for x in r.x..r.right() {
                total += get_data_bit(line, x as u32);
            }
        }
        Ok(total)
    }

    /// Centroid `(cx, cy)` of the ON pixels, or `None` if the image is empty.
    pub fn centroid(&self) -> Result<Option<(f32, f32)>> {
        self.require_depth(PixelDepth::Bit1)?;
        let (mut n, mut sx, mut sy) = (0u64, 0u64, 0u64);
        for y in 0..self.height() {
            let line = self.row_data(y);
            for (wi, &word) in line.iter().enumerate() {
                if word == 0 {
                    continue;
                }
                for b in 0..32u32 {
                    if word & (0x8000_0000 >> b) != 0 {
                        let x = wi as u64 * 32 + b as u64;
                        n += 1;
                        sx += x;
                        sy += y as u64;
                    }
                }
            }
        }
        if n == 0 {
            return Ok(None);
        }
        Ok(Some((sx as f32 / n as f32, sy as f32 / n as f32)))
    }

    /// Per-column ON pixel counts and first moments.
    pub fn column_stats(&self) -> Result<ColumnStats> {
        self.require_depth(PixelDepth::Bit1)?;
        let w = self.width() as usize;
        let mut stats = ColumnStats {
            counts: vec![0; w],
            moments: vec![0; w],
        };
        for y in 0..self.height() {
            let line = self.row_data(y);
            for x in 0..self.width() {
                if get_data_bit(line, x) != 0 {
                    stats.counts[x as usize] += 1;
                    stats.moments[x as usize] += y as u64;
                }
            }
        }
        Ok(stats)
    }

    /// Bounding box of the ON pixels, or `None` if the image is empty.
    pub fn foreground_bounds(&self) -> Result<Option<Box>> {
        self.require_depth(PixelDepth::Bit1)?;
        let (mut x0, mut y0) = (u32::MAX, u32::MAX);
        let (mut x1, mut y1) = (0u32, 0u32);
        let mut found = false;
        for y in 0..self.height() {
            let line = self.row_data(y);
            for x in 0..self.width() {
                if get_data_bit(line, x) != 0 {
                    found = true;
                    x0 = x0.min(x);
                    x1 = x1.max(x);
                    y0 = y0.min(y);
                    y1 = y1.max(y);
                }
            }
        }
        if !found {
            return Ok(None);
        }
        Ok(Some(Box::new_unchecked(
            x0 as i32,
            y0 as i32,
            (x1 - x0 + 1) as i32,
            (y1 - y0 + 1) as i32,
        )))
    }

    /// Count ON pixels shared by `self` and `other` placed at `(dx, dy)`.
    ///
    /// `other`'s pixel `(x, y)` lands on `self`'s pixel `(x + dx, y + dy)`;
    /// pixels falling outside `self` never count.
    pub fn count_and_at(&self, other: &Pix, dx: i32, dy: i32) -> Result<u32> {
        self.require_depth(PixelDepth::Bit1)?;
        other.require_depth(PixelDepth::Bit1)?;
        let (w1, h1) = (self.width() as i32, self.height() as i32);
        let mut count = 0u32;
        for oy in 0..other.height() {
            let sy = oy as i32 + dy;
            if sy < 0 || sy >= h1 {
                continue;
            }
            let oline = other.row_data(oy);
            let sline = self.row_data(sy as u32);
            for (wi, &word) in oline.iter().enumerate() {
                if word == 0 {
                    continue;
                }
                for b in 0..32u32 {
                    if word & (0x8000_0000 >> b) == 0 {
                        continue;
                    }
                    let sx = (wi as u32 * 32 + b) as i32 + dx;
                    if sx >= 0 && sx < w1 && get_data_bit(sline, sx as u32) != 0 {
                        count += 1;
                    }
                }
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pix::PixMut;

    fn block(w: u32, h: u32, x0: u32, y0: u32, bw: u32, bh: u32) -> Pix {
        let mut pm = PixMut::new(w, h, PixelDepth::Bit1).unwrap();
        for y in y0..y0 + bh {
            for x in x0..x0 + bw {
                pm.set_pixel(x, y, 1).unwrap();
            }
        }
        pm.into()
    }

    #[test]
    fn test_count_and_centroid() {
        let pix = block(40, 10, 30, 2, 6, 4);
        assert_eq!(pix.count_pixels().unwrap(), 24);
        let (cx, cy) = pix.centroid().unwrap().unwrap();
        assert!((cx - 32.5).abs() < 1e-4);
        assert!((cy - 3.5).abs() < 1e-4);
        assert_eq!(
            pix.foreground_bounds().unwrap(),
            Some(Box::new_unchecked(30, 2, 6, 4))
        );
    }

    #[test]
    fn test_empty_image_measurements() {
        let pix = Pix::new(8, 8, PixelDepth::Bit1).unwrap();
        assert_eq!(pix.count_pixels().unwrap(), 0);
        assert!(pix.centroid().unwrap().is_none());
        assert!(pix.foreground_bounds().unwrap().is_none());
    }

    #[test]
    fn test_column_stats() {
        let pix = block(5, 6, 1, 2, 2, 3);
        let cs = pix.column_stats().unwrap();
        assert_eq!(cs.counts, vec![0, 3, 3, 0, 0]);
        assert_eq!(cs.moments[1], 2 + 3 + 4);
        assert_eq!(cs.count_in(0, 5), 6);
        assert!((cs.centroid_y_in(0, 5).unwrap() - 3.0).abs() < 1e-6);
        assert!(cs.centroid_y_in(3, 5).is_none());
    }

    #[test]
    fn test_count_and_at_translation() {
        let a = block(10, 10, 2, 2, 4, 4);
        let b = block(4, 4, 0, 0, 4, 4);
        assert_eq!(a.count_and_at(&b, 2, 2).unwrap(), 16);
        assert_eq!(a.count_and_at(&b, 3, 2).unwrap(), 12);
        assert_eq!(a.count_and_at(&b, 20, 0).unwrap(), 0);
        assert_eq!(a.count_pixels_in_rect(&Box::new_unchecked(0, 0, 4, 4)).unwrap(), 4);
    }

    #[test]
    fn test_depth_checked() {
        let pix = Pix::new(4, 4, PixelDepth::Bit8).unwrap();
        assert!(pix.count_pixels().is_err());
    }
}
