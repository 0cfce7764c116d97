//! Error types for glyphrec-recog

use thiserror::Error;

/// Errors that can occur during training and recognition
#[derive(Debug, Error)]
pub enum RecogError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] glyphrec_core::Error),

    /// Morphology library error
    #[error("morph error: {0}")]
    Morph(#[from] glyphrec_morph::MorphError),

    /// Transform library error
    #[error("transform error: {0}")]
    Transform(#[from] glyphrec_transform::TransformError),

    /// Region library error
    #[error("region error: {0}")]
    Region(#[from] glyphrec_region::RegionError),

    /// I/O error while reading or writing a recognizer
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A sample was added to a recognizer that has finished training
    #[error("recognizer is not accepting samples: training is finished")]
    NotTraining,

    /// Averaged templates are missing or stale
    #[error("averaged templates have not been built")]
    AveragesNotBuilt,

    /// A class has no samples
    #[error("class {class:?} has no samples")]
    EmptyClass { class: String },

    /// Identification was requested before training finished
    #[error("recognizer has not finished training")]
    NotFinalized,

    /// Input dimensions do not fit the recognizer configuration
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// No class with this index or label
    #[error("unknown class: {0}")]
    UnknownClass(String),

    /// Invalid parameter provided
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// No foreground found in the input
    #[error("no content found: {0}")]
    NoContent(String),

    /// Malformed serialized recognizer
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for recognition operations
pub type RecogResult<T> = Result<T, RecogError>;
