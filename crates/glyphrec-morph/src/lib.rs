//! glyphrec-morph - Binary morphology for glyph bitmaps
//!
//! This crate provides the few morphological operations the recognizer
//! needs:
//!
//! - Dilation and erosion with rectangular (brick) structuring elements
//! - Connectivity-preserving thinning to a one-pixel skeleton
//! - Stroke width normalization (thin, then dilate), which turns glyphs
//!   into outline templates
//!
//! All operations work on 1 bpp images and use asymmetric boundary
//! conditions: pixels outside the image are background, so erosion eats
//! into foreground touching the image edge.

pub mod binary;
mod error;
pub mod thin;
pub mod thin_sels;

pub use binary::{dilate_brick, erode_brick};
pub use error::{MorphError, MorphResult};
pub use thin::{set_stroke_width, thin_connected, thin_connected_by_set};
pub use thin_sels::{Connectivity, ThinSel, thin_sels};
