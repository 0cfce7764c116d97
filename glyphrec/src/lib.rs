//! glyphrec - Template-matching character recognition
//!
//! A trainable recognizer for isolated machine-printed glyphs and for
//! strips of touching glyphs on one baseline.
//!
//! # Overview
//!
//! - Bitmap containers and primitives (1 and 8 bpp)
//! - Binary morphology (brick erosion/dilation, outlines)
//! - Scaling to template size
//! - Connected components
//! - Training, correlation matching, outlier removal, line decoding,
//!   bootstrap labeling and serialization of recognizers
//!
//! # Example
//!
//! ```
//! use glyphrec::recog::{Recog, RecogConfig};
//! use glyphrec::{PixMut, PixelDepth, Pixa};
//!
//! let mut pm = PixMut::new(4, 20, PixelDepth::Bit1).unwrap();
//! for y in 0..20 {
//!     for x in 0..4 {
//!         pm.set_pixel(x, y, 1).unwrap();
//!     }
//! }
//! let bar: glyphrec::Pix = pm.into();
//!
//! let mut training = Pixa::new();
//! training.push(bar.with_text("l"));
//! let recog = Recog::from_pixa(&training, RecogConfig::default()).unwrap();
//! assert_eq!(recog.identify_pix(&bar).unwrap().text, "l");
//! ```

// Re-export core types (primary data structures used everywhere)
pub use glyphrec_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use glyphrec_morph as morph;
pub use glyphrec_recog as recog;
pub use glyphrec_region as region;
pub use glyphrec_transform as transform;
