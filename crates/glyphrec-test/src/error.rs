//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur while building test inputs
#[derive(Debug, Error)]
pub enum TestError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] glyphrec_core::Error),

    /// Morphology error
    #[error("morph error: {0}")]
    Morph(#[from] glyphrec_morph::MorphError),

    /// No synthetic pattern exists for a character
    #[error("no synthetic glyph for {0:?}")]
    UnknownGlyph(char),

    /// Invalid generator parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
