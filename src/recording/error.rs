//! Recording error types.

use thiserror::Error;

/// Errors that can occur while saving or loading a recording
#[derive(Debug, Error)]
pub enum RecordingError {
    /// Reading or writing the file failed
    #[error("Recording I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding to JSON or binary failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Decoding from JSON or binary failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Recording version is not supported by this build
    #[error("Unsupported recording version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}
