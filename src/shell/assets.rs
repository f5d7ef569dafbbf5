//! Optional gag assets.
//!
//! Both files are optional. A missing file logs a warning once at startup
//! and the feature that needs it stays off.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Where to look for the assets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub dir: PathBuf,
    pub animation: String,
    pub audio: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            animation: "rickroll.gif".to_string(),
            audio: "rickroll.mp3".to_string(),
        }
    }
}

/// Assets that were found on disk.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Assets {
    pub animation: Option<PathBuf>,
    pub audio: Option<PathBuf>,
}

impl Assets {
    /// No assets at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Look for the configured files.
    pub fn discover(config: &AssetConfig) -> Self {
        let animation = probe(&config.dir.join(&config.animation), "animation");
        let audio = probe(&config.dir.join(&config.audio), "audio");
        Self { animation, audio }
    }

    /// The rick-roll needs its animation; audio is a bonus.
    pub fn animation_ready(&self) -> bool {
        self.animation.is_some()
    }
}

fn probe(path: &Path, what: &str) -> Option<PathBuf> {
    if path.is_file() {
        info!(path = %path.display(), "loaded {what} asset");
        Some(path.to_path_buf())
    } else {
        warn!(path = %path.display(), "{what} asset not found, feature disabled");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("fumble-assets-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_assets_disable_feature() {
        let config = AssetConfig {
            dir: scratch_dir(),
            ..AssetConfig::default()
        };
        let assets = Assets::discover(&config);

        assert_eq!(assets, Assets::none());
        assert!(!assets.animation_ready());
    }

    #[test]
    fn present_animation_enables_feature() {
        let dir = scratch_dir();
        std::fs::write(dir.join("rickroll.gif"), b"GIF89a").unwrap();
        let config = AssetConfig {
            dir: dir.clone(),
            ..AssetConfig::default()
        };

        let assets = Assets::discover(&config);
        assert!(assets.animation_ready());
        assert_eq!(assets.animation, Some(dir.join("rickroll.gif")));
        assert_eq!(assets.audio, None);

        std::fs::remove_dir_all(dir).unwrap();
    }
}
