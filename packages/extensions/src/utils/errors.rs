// packages/extensions/src/utils/errors.rs
//! Error types for the extension kit
//!
//! Only configuration and I/O paths return errors. The interception path is
//! infallible by construction: a wrapped call always returns the original
//! result and the sink never reports failure back.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ExtensionError>;

/// Extension kit errors
#[derive(Debug, Error)]
pub enum ExtensionError {
    /// An extension asked for zero event codes
    #[error("extension '{0}' reserves zero event codes")]
    ZeroLengthRange(String),

    /// The shared code space cannot hold the requested range
    #[error("event code space exhausted: '{name}' requested {requested} codes, {available} available")]
    CodeSpaceExhausted {
        name: String,
        requested: u16,
        available: u16,
    },

    /// Two different extensions use the same name
    #[error("extension name '{0}' is already registered")]
    NameCollision(String),

    /// Two extensions claim overlapping event codes
    #[error("event code range of '{first}' overlaps '{second}'")]
    RangeOverlap { first: String, second: String },

    /// Extension name is empty or contains characters unusable in a file name
    #[error("invalid extension name '{0}'")]
    InvalidName(String),

    /// Range starts inside the recorder core's reserved codes
    #[error("extension '{name}' starts at code {base}, below the extension area")]
    BelowExtensionBase { name: String, base: u16 },

    /// Configuration could not be loaded or is inconsistent
    #[error("configuration error: {0}")]
    Config(String),

    /// Trace file could not be read or written
    #[error("trace I/O failed: {0}")]
    TraceIo(#[from] std::io::Error),

    /// Trace document could not be (de)serialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// zstd compression or decompression failed
    #[error("compression error: {0}")]
    Compression(String),

    /// Logging or metrics setup failed
    #[error("observability setup failed: {0}")]
    Observability(String),
}

impl From<config::ConfigError> for ExtensionError {
    fn from(err: config::ConfigError) -> Self {
        ExtensionError::Config(err.to_string())
    }
}
