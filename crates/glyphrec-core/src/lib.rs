//! glyphrec-core - Bitmap containers for template character recognition
//!
//! This crate provides the data structures shared by every other crate in
//! the workspace:
//!
//! - [`Pix`] / [`PixMut`] - The image container (immutable / mutable),
//!   limited to 1 bpp (binary) and 8 bpp (grayscale) pixels
//! - [`Box`] - Rectangle regions
//! - [`Pixa`] - Arrays of images, optionally labeled through their text
//!
//! Binary images follow the usual document-image convention: a pixel value
//! of 1 is foreground (ink), 0 is background.
//!
//! # Example
//!
//! ```
//! use glyphrec_core::{Pix, PixelDepth};
//!
//! let pix = Pix::new(16, 24, PixelDepth::Bit1).unwrap();
//! let mut pm = pix.try_into_mut().unwrap();
//! pm.set_pixel(3, 4, 1).unwrap();
//! let pix: Pix = pm.into();
//! assert_eq!(pix.count_pixels().unwrap(), 1);
//! ```

pub mod box_;
pub mod error;
pub mod pix;
pub mod pixa;

pub use box_::Box;
pub use error::{Error, Result};
pub use pix::convert::threshold_to_binary;
pub use pix::serial::SpixHeader;
pub use pix::{ColumnStats, Pix, PixMut, PixelDepth};
pub use pixa::Pixa;
