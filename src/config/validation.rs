//! Configuration checks that report every problem at once.

use super::Config;
use crate::gags::GagKind;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// One problem found in a configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("capture resolution {width}x{height} has a zero dimension")]
    ZeroDimension { width: u32, height: u32 },

    #[error("detector.max_hands must be at least 1")]
    NoHands,

    #[error("detector.min_detection_confidence {value} is outside [0, 1]")]
    ConfidenceOutOfRange { value: f32 },

    #[error("confirmation.required_frames must be at least 1")]
    ZeroConfirmationFrames,

    #[error("{kind:?} probability {value} is outside [0, 1]")]
    ProbabilityOutOfRange { kind: GagKind, value: f64 },

    #[error("thinking range {min}..{max} ms is inverted")]
    InvertedThinkingRange { min: u64, max: u64 },

    #[error("gags.confusion_max_guess must be at least 1")]
    ZeroConfusionGuess,

    #[error("gibberish is enabled but no messages are configured")]
    NoGibberish,

    #[error("assets.{field} must not be empty")]
    EmptyAssetName { field: &'static str },
}

type Check = Validation<(), NonEmptyVec<ConfigViolation>>;

fn ensure(ok: bool, violation: impl FnOnce() -> ConfigViolation) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

/// Run every check, accumulating all violations.
pub fn validate(config: &Config) -> Check {
    let capture = &config.capture;
    let gags = &config.gags;

    let mut checks = vec![
        ensure(capture.width > 0 && capture.height > 0, || {
            ConfigViolation::ZeroDimension {
                width: capture.width,
                height: capture.height,
            }
        }),
        ensure(config.detector.max_hands >= 1, || ConfigViolation::NoHands),
        ensure(
            (0.0..=1.0).contains(&config.detector.min_detection_confidence),
            || ConfigViolation::ConfidenceOutOfRange {
                value: config.detector.min_detection_confidence,
            },
        ),
        ensure(config.confirmation.required_frames >= 1, || {
            ConfigViolation::ZeroConfirmationFrames
        }),
        ensure(gags.thinking_min_ms <= gags.thinking_max_ms, || {
            ConfigViolation::InvertedThinkingRange {
                min: gags.thinking_min_ms,
                max: gags.thinking_max_ms,
            }
        }),
        ensure(gags.confusion_max_guess >= 1, || {
            ConfigViolation::ZeroConfusionGuess
        }),
        ensure(
            !gags.enabled || gags.gibberish_probability == 0.0 || !gags.gibberish.is_empty(),
            || ConfigViolation::NoGibberish,
        ),
        ensure(!config.assets.animation.is_empty(), || {
            ConfigViolation::EmptyAssetName { field: "animation" }
        }),
        ensure(!config.assets.audio.is_empty(), || {
            ConfigViolation::EmptyAssetName { field: "audio" }
        }),
    ];

    for kind in [
        GagKind::Forget,
        GagKind::Thinking,
        GagKind::Confusion,
        GagKind::Gibberish,
        GagKind::RickRoll,
    ] {
        let value = gags.probability(kind);
        checks.push(ensure((0.0..=1.0).contains(&value), || {
            ConfigViolation::ProbabilityOutOfRange { kind, value }
        }));
    }

    Validation::all_vec(checks).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violations(config: &Config) -> Vec<ConfigViolation> {
        match validate(config) {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(errors) => errors.iter().cloned().collect(),
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&Config::default()).is_success());
    }

    #[test]
    fn all_violations_are_collected() {
        let mut config = Config::default();
        config.capture.width = 0;
        config.detector.max_hands = 0;
        config.confirmation.required_frames = 0;
        config.gags.forget_probability = 2.0;
        config.gags.thinking_min_ms = 3000;

        let found = violations(&config);
        assert_eq!(found.len(), 5);
        assert!(found.contains(&ConfigViolation::NoHands));
        assert!(found.contains(&ConfigViolation::ZeroConfirmationFrames));
        assert!(found.contains(&ConfigViolation::ProbabilityOutOfRange {
            kind: GagKind::Forget,
            value: 2.0
        }));
        assert!(found.contains(&ConfigViolation::InvertedThinkingRange {
            min: 3000,
            max: 2000
        }));
        assert!(found
            .iter()
            .any(|v| matches!(v, ConfigViolation::ZeroDimension { width: 0, .. })));
    }

    #[test]
    fn empty_gibberish_only_matters_when_it_can_fire() {
        let mut config = Config::default();
        config.gags.gibberish.clear();
        assert_eq!(violations(&config), vec![ConfigViolation::NoGibberish]);

        config.gags.gibberish_probability = 0.0;
        assert!(violations(&config).is_empty());

        config.gags.gibberish_probability = 0.3;
        config.gags.enabled = false;
        assert!(violations(&config).is_empty());
    }

    #[test]
    fn confidence_and_assets_are_checked() {
        let mut config = Config::default();
        config.detector.min_detection_confidence = 1.2;
        config.assets.audio.clear();

        let found = violations(&config);
        assert_eq!(found.len(), 2);
        assert!(found.contains(&ConfigViolation::EmptyAssetName { field: "audio" }));
    }
}
