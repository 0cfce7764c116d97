//! glyphrec-transform - Geometric transformations for glyph bitmaps
//!
//! Scaling is the only transformation the recognizer needs: samples and
//! text-line strips are brought to the template height (or to a fixed
//! width and height) before matching.

mod error;
pub mod scale;

pub use error::{TransformError, TransformResult};
pub use scale::{scale_to_size, target_size};
