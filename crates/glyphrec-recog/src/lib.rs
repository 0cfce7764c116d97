//! glyphrec-recog - Template-matching character recognition
//!
//! This crate builds recognizers from labeled glyph bitmaps and uses them
//! to identify isolated glyphs and strips of touching glyphs:
//!
//! - **Training**: template store, per-class averaging, finalization
//! - **Outliers**: mislabeled samples found against class averages
//! - **Identification**: single glyphs, batches, and line images
//! - **Line decoding**: trellis search over strip columns with rescoring
//! - **Bootstrap**: first-pass labeling from a generic recognizer
//! - **Serialization**: binary storage of the generating samples
//!
//! # Quick Start
//!
//! ```no_run
//! use glyphrec_core::{Pix, PixelDepth, Pixa};
//! use glyphrec_recog::{Recog, RecogConfig};
//!
//! // Labeled glyphs carry their class label as text
//! let training = Pixa::new();
//! let recog = Recog::from_pixa(&training, RecogConfig::default()).unwrap();
//!
//! let line = Pix::new(200, 40, PixelDepth::Bit1).unwrap();
//! let result = recog.identify_multiple(&line).unwrap();
//! println!("{} (mean score {})", result, result.mean_score());
//! ```
//!
//! # Modules
//!
//! - [`recog`]: Recognizer, matching, decoding and bootstrap

mod error;
pub mod recog;

pub use error::{RecogError, RecogResult};

// Re-export commonly used types
pub use recog::{
    CharsetType, Decoding, Rch, Rcha, Recog, RecogConfig, RecogSink, RecogState, TemplateType,
    TemplateUse,
};

// Re-export core for convenience
pub use glyphrec_core;
