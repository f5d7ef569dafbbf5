//! Configuration.
//!
//! Every field has a default matching the classic webcam setup (device 0,
//! 640x480, two hands, ten confirmation frames), so a config file only
//! needs the values it changes.
//!
//! ```rust
//! use fumble::config::Config;
//!
//! let config = Config::from_json(r#"{ "confirmation": { "required_frames": 5 } }"#).unwrap();
//! assert_eq!(config.confirmation.required_frames, 5);
//! assert_eq!(config.capture.width, 640);
//! ```

pub mod error;
pub mod validation;

pub use error::ConfigError;
pub use validation::ConfigViolation;

use crate::confirm::{DEFAULT_HISTORY_LIMIT, DEFAULT_REQUIRED_FRAMES};
use crate::core::Resolution;
use crate::gags::GagConfig;
use crate::shell::assets::AssetConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use stillwater::validation::Validation;
use tracing::debug;

/// Camera settings. Only the resolution is used by this crate; the device
/// index is passed through to whatever bridge feeds the frames.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub device: u32,
    pub width: u32,
    pub height: u32,
}

impl CaptureConfig {
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device: 0,
            width: 640,
            height: 480,
        }
    }
}

/// Landmark detector settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub max_hands: usize,
    pub min_detection_confidence: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_hands: 2,
            min_detection_confidence: 0.3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    pub required_frames: u32,
    pub history_limit: usize,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            required_frames: DEFAULT_REQUIRED_FRAMES,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub capture: CaptureConfig,
    pub detector: DetectorConfig,
    pub confirmation: ConfirmationConfig,
    pub gags: GagConfig,
    pub assets: AssetConfig,
}

impl Config {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");
        config.validated()
    }

    /// Parse a JSON config without validating it.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Every violation in this config.
    pub fn validate(&self) -> Validation<(), stillwater::NonEmptyVec<ConfigViolation>> {
        validation::validate(self)
    }

    /// `self` if valid, otherwise all violations.
    pub fn validated(self) -> Result<Self, ConfigError> {
        match self.validate() {
            Validation::Success(_) => Ok(self),
            Validation::Failure(errors) => {
                Err(ConfigError::Invalid(errors.iter().cloned().collect()))
            }
        }
    }
}
