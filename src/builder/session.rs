//! Builder for counting sessions.

use crate::builder::error::BuildError;
use crate::config::Config;
use crate::confirm::{ConfirmationMachine, DEFAULT_HISTORY_LIMIT, DEFAULT_REQUIRED_FRAMES};
use crate::core::Resolution;
use crate::effects::Session;
use crate::gags::{ForgetTimer, GagConfig, GagKind, GagRule, GagTable};

/// Fluent builder for [`Session`].
#[derive(Clone, Debug)]
pub struct SessionBuilder {
    capture: Option<Resolution>,
    required_frames: u32,
    history_limit: usize,
    max_hands: usize,
    gags: GagConfig,
    rules: Vec<GagRule>,
}

impl SessionBuilder {
    /// Create a builder with default confirmation and gag settings.
    pub fn new() -> Self {
        Self {
            capture: None,
            required_frames: DEFAULT_REQUIRED_FRAMES,
            history_limit: DEFAULT_HISTORY_LIMIT,
            max_hands: 2,
            gags: GagConfig::default(),
            rules: Vec::new(),
        }
    }

    /// Seed every setting from a loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .capture(config.capture.resolution())
            .required_frames(config.confirmation.required_frames)
            .history_limit(config.confirmation.history_limit)
            .max_hands(config.detector.max_hands)
            .gags(config.gags.clone())
    }

    /// Set the capture resolution (required).
    pub fn capture(mut self, resolution: Resolution) -> Self {
        self.capture = Some(resolution);
        self
    }

    /// Consecutive matching frames per accepted unit.
    pub fn required_frames(mut self, frames: u32) -> Self {
        self.required_frames = frames;
        self
    }

    /// Phase transitions kept in the history.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Hands accepted per frame.
    pub fn max_hands(mut self, hands: usize) -> Self {
        self.max_hands = hands;
        self
    }

    /// Replace the gag settings.
    pub fn gags(mut self, gags: GagConfig) -> Self {
        self.gags = gags;
        self
    }

    /// Add a custom per-frame gag rule after the standard ones.
    pub fn rule(mut self, rule: GagRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Build the session, failing on the first invalid setting.
    pub fn build(self) -> Result<Session, BuildError> {
        let capture = self.capture.ok_or(BuildError::MissingCapture)?;
        if capture.width == 0 || capture.height == 0 {
            return Err(BuildError::EmptyCapture {
                width: capture.width,
                height: capture.height,
            });
        }
        if self.required_frames == 0 {
            return Err(BuildError::ZeroConfirmationFrames);
        }
        if self.max_hands == 0 {
            return Err(BuildError::ZeroMaxHands);
        }

        let kinds = [
            GagKind::Forget,
            GagKind::Thinking,
            GagKind::Confusion,
            GagKind::Gibberish,
            GagKind::RickRoll,
        ];
        let configured = kinds.iter().map(|&k| (k, self.gags.probability(k)));
        let custom = self.rules.iter().map(|r| (r.kind, r.probability));
        if let Some((kind, value)) = configured
            .chain(custom)
            .find(|(_, p)| !(0.0..=1.0).contains(p))
        {
            return Err(BuildError::InvalidProbability { kind, value });
        }

        let machine = ConfirmationMachine::new(self.required_frames, self.history_limit);
        let forget = ForgetTimer::from_config(&self.gags);
        let table = self
            .rules
            .into_iter()
            .fold(GagTable::from_config(&self.gags), GagTable::with_rule);

        Ok(Session::from_parts(
            capture,
            self.max_hands,
            machine,
            forget,
            table,
        ))
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
