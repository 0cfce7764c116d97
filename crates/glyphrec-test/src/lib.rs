//! glyphrec-test - Regression test framework for glyphrec
//!
//! Two pieces:
//!
//! - [`RegParams`]: a regression-test tracker that counts checks, records
//!   failures and reports them at the end of a test
//! - [`synth`]: deterministic synthetic glyph bitmaps, so tests need no
//!   image files
//!
//! # Usage
//!
//! ```
//! use glyphrec_test::RegParams;
//!
//! let mut rp = RegParams::new("example");
//! rp.compare_values(4.0, 2.0 + 2.0, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "display" to print extra diagnostics

mod error;
mod params;
pub mod synth;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};
