//! Character recognition module
//!
//! Template-matching recognition of machine-printed glyphs.
//!
//! # Overview
//!
//! The recognizer works by:
//! 1. Training on labeled glyph images to build per-class templates
//! 2. Computing a centroid-aligned averaged template for each class
//! 3. Matching new glyphs against templates by normalized correlation
//! 4. Decoding strips of touching glyphs with a trellis over the strip
//!    columns, then rescoring every segment found
//!
//! # Example
//!
//! ```
//! use glyphrec_core::{Pix, PixMut, PixelDepth, Pixa};
//! use glyphrec_recog::recog::{Recog, RecogConfig};
//!
//! fn bar(w: u32, h: u32) -> Pix {
//!     let mut pm = PixMut::new(w, h, PixelDepth::Bit1).unwrap();
//!     for y in 0..h {
//!         for x in 0..w {
//!             pm.set_pixel(x, y, 1).unwrap();
//!         }
//!     }
//!     pm.into()
//! }
//!
//! let mut pixa = Pixa::new();
//! pixa.push(bar(4, 20).with_text("l"));
//! pixa.push(bar(16, 4).with_text("-"));
//!
//! let config = RecogConfig::new().with_scale(0, 0).with_max_ht_ratio(5.0);
//! let recog = Recog::from_pixa(&pixa, config).unwrap();
//!
//! let rch = recog.identify_pix(&bar(4, 20)).unwrap();
//! assert_eq!(rch.text, "l");
//! ```

mod boot;
mod correlation;
mod debug;
mod did;
mod ident;
mod outliers;
mod serial;
mod train;
mod types;

pub use boot::{BootSource, PixaBootSource, bootstrap_label, pad_samples, train_with_boot};
pub use correlation::{CorrelationMatch, score, score_at};
pub use debug::{OverlayCollector, RecogSink};
pub use outliers::{Outlier, remove_outliers};
pub use types::*;
