//! Saved landmark streams.
//!
//! A recording is the detector output of a capture session: the capture
//! resolution plus every frame's hands and key press. Recordings replay
//! through the same session as a live stream and make runs reproducible
//! when paired with a seeded environment.

use crate::core::{Frame, Resolution};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

pub mod error;

pub use error::RecordingError;

/// Version identifier for the recording format
pub const RECORDING_VERSION: u32 = 1;

/// On-disk encoding of a recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Binary,
}

impl Encoding {
    /// `.json` files are JSON, everything else is binary.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Binary,
        }
    }
}

/// A captured stream of frames.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Recording format version
    pub version: u32,

    /// Unique recording identifier
    pub id: Uuid,

    /// When the recording was made
    pub created_at: DateTime<Utc>,

    /// Resolution the landmarks were captured at
    pub capture: Resolution,

    /// Frames in capture order
    pub frames: Vec<Frame>,
}

impl Recording {
    pub fn new(capture: Resolution, frames: Vec<Frame>) -> Self {
        Self {
            version: RECORDING_VERSION,
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            capture,
            frames,
        }
    }

    pub fn to_json(&self) -> Result<String, RecordingError> {
        serde_json::to_string(self).map_err(|e| RecordingError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, RecordingError> {
        let recording: Self = serde_json::from_str(text)
            .map_err(|e| RecordingError::DeserializationFailed(e.to_string()))?;
        recording.check_version()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordingError> {
        bincode::serialize(self).map_err(|e| RecordingError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordingError> {
        let recording: Self = bincode::deserialize(bytes)
            .map_err(|e| RecordingError::DeserializationFailed(e.to_string()))?;
        recording.check_version()
    }

    /// Write the recording, choosing the encoding from the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RecordingError> {
        let path = path.as_ref();
        let bytes = match Encoding::for_path(path) {
            Encoding::Json => self.to_json()?.into_bytes(),
            Encoding::Binary => self.to_bytes()?,
        };
        std::fs::write(path, bytes)?;
        debug!(path = %path.display(), frames = self.frames.len(), "saved recording");
        Ok(())
    }

    /// Read a recording, choosing the encoding from the extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecordingError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let recording = match Encoding::for_path(path) {
            Encoding::Json => {
                let text = String::from_utf8(bytes)
                    .map_err(|e| RecordingError::DeserializationFailed(e.to_string()))?;
                Self::from_json(&text)?
            }
            Encoding::Binary => Self::from_bytes(&bytes)?,
        };
        debug!(
            path = %path.display(),
            id = %recording.id,
            frames = recording.frames.len(),
            "loaded recording"
        );
        Ok(recording)
    }

    fn check_version(self) -> Result<Self, RecordingError> {
        if self.version == RECORDING_VERSION {
            Ok(self)
        } else {
            Err(RecordingError::UnsupportedVersion {
                found: self.version,
                supported: RECORDING_VERSION,
            })
        }
    }
}
