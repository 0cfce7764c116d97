//! Raster container
//!
//! `Pix` holds a binary (1 bpp) or grayscale (8 bpp) raster. Glyph
//! samples, templates and text-line strips are all `Pix`.
//!
//! # Pixel layout
//!
//! - Image data is stored in 32-bit words
//! - Every row starts on a 32-bit boundary
//! - Pixels are packed MSB to LSB within each word
//!
//! # Ownership model
//!
//! `Pix` uses `Arc` for cheap cloning (shared ownership).
//! To modify pixel data, convert to `PixMut` via [`Pix::try_into_mut`]
//! or [`Pix::to_mut`], then convert back with `Into<Pix>`.

mod access;
mod clip;
pub mod convert;
mod measurement;
pub mod rop;
pub mod serial;

pub use access::*;
pub use measurement::ColumnStats;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Pixel depth (bits per pixel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PixelDepth {
    /// 1-bit binary image
    Bit1 = 1,
    /// 8-bit grayscale
    Bit8 = 8,
}

impl PixelDepth {
    /// Depth for a raw bit count
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDepth`] if `bits` is not 1 or 8.
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            1 => Ok(PixelDepth::Bit1),
            8 => Ok(PixelDepth::Bit8),
            _ => Err(Error::InvalidDepth(bits)),
        }
    }

    /// Bits per pixel
    pub fn bits(self) -> u32 {
        self as u32
    }

}

/// Shared raster storage
#[derive(Debug, Clone)]
struct PixData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Depth in bits per pixel
    depth: PixelDepth,
    /// 32-bit words per line
    wpl: u32,
    /// Class label carried by training samples
    text: Option<String>,
    /// Packed rows, MSB first
    data: Vec<u32>,
}

/// Immutable, cheaply cloneable raster
///
/// # Examples
///
/// ```
/// use glyphrec_core::{Pix, PixelDepth};
///
/// let pix = Pix::new(20, 30, PixelDepth::Bit1).unwrap();
/// assert_eq!(pix.width(), 20);
/// assert_eq!(pix.wpl(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Pix {
    inner: Arc<PixData>,
}

impl Pix {
    /// Allocates an all-zero raster.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for an empty size.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let wpl = Self::compute_wpl(width, depth)?;
        let data = vec![0u32; wpl as usize * height as usize];
        Ok(Pix {
            inner: Arc::new(PixData {
                width,
                height,
                depth,
                wpl,
                text: None,
                data,
            }),
        })
    }

    /// Wraps packed raster words. Padding bits of 1 bpp rows are cleared.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `data` does not hold exactly
    /// `wpl * height` words.
    pub fn from_raw(width: u32, height: u32, depth: PixelDepth, data: Vec<u32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let wpl = Self::compute_wpl(width, depth)?;
        let expected = wpl as usize * height as usize;
        if data.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "raster has {} words, expected {}",
                data.len(),
                expected
            )));
        }
        let mut data = data;
        if depth == PixelDepth::Bit1 {
            let mask = rop::end_mask(width);
            for row in data.chunks_mut(wpl as usize) {
                if let Some(last) = row.last_mut() {
                    *last &= mask;
                }
            }
        }
        Ok(Pix {
            inner: Arc::new(PixData {
                width,
                height,
                depth,
                wpl,
                text: None,
                data,
            }),
        })
    }

    #[inline]
    fn compute_wpl(width: u32, depth: PixelDepth) -> Result<u32> {
        let bits_per_line = u64::from(width) * u64::from(depth.bits());
        u32::try_from(bits_per_line.div_ceil(32)).map_err(|_| Error::InvalidDimension {
            width,
            height: 0,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// 32-bit words per row
    #[inline]
    pub fn wpl(&self) -> u32 {
        self.inner.wpl
    }

    /// Class label, if any
    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.inner.text.as_deref()
    }

    /// Packed raster words, row after row
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Packed words of row `y`
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data(&self, y: u32) -> &[u32] {
        let start = (y * self.inner.wpl) as usize;
        let end = start + self.inner.wpl as usize;
        &self.inner.data[start..end]
    }

    /// Same width, height and depth
    pub fn sizes_equal(&self, other: &Pix) -> bool {
        self.inner.width == other.inner.width
            && self.inner.height == other.inner.height
            && self.inner.depth == other.inner.depth
    }

    /// Same geometry and raster; labels are not compared.
    pub fn equals(&self, other: &Pix) -> bool {
        self.sizes_equal(other) && self.inner.data == other.inner.data
    }

    /// Copy of this raster labeled with `text`
    pub fn with_text(&self, text: impl Into<String>) -> Pix {
        let mut pm = self.to_mut();
        pm.set_text(Some(text.into()));
        pm.into()
    }

    /// Takes the raster for in-place editing when it is not shared.
    pub fn try_into_mut(self) -> std::result::Result<PixMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(PixMut { inner: data }),
            Err(arc) => Err(Pix { inner: arc }),
        }
    }

    /// Editable copy
    pub fn to_mut(&self) -> PixMut {
        PixMut {
            inner: (*self.inner).clone(),
        }
    }

    pub(crate) fn require_depth(&self, depth: PixelDepth) -> Result<()> {
        if self.inner.depth != depth {
            return Err(Error::UnsupportedDepth(self.inner.depth.bits()));
        }
        Ok(())
    }
}

/// Exclusively owned, editable raster
///
/// Freeze it into a [`Pix`] with `Into<Pix>`.
#[derive(Debug)]
pub struct PixMut {
    inner: PixData,
}

impl PixMut {
    /// Allocates an all-zero editable raster.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        Ok(Pix::new(width, height, depth)?.to_mut())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    #[inline]
    pub fn wpl(&self) -> u32 {
        self.inner.wpl
    }

    /// Class label, if any
    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.inner.text.as_deref()
    }

    /// Replaces the class label
    pub fn set_text(&mut self, text: Option<String>) {
        self.inner.text = text;
    }

    /// Packed raster words, row after row
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.inner.data
    }

    /// Mutable packed words of row `y`
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data_mut(&mut self, y: u32) -> &mut [u32] {
        let start = (y * self.inner.wpl) as usize;
        let end = start + self.inner.wpl as usize;
        &mut self.inner.data[start..end]
    }

}

impl From<PixMut> for Pix {
    fn from(pm: PixMut) -> Self {
        Pix {
            inner: Arc::new(pm.inner),
        }
    }
}
