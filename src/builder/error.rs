//! Build errors for sessions.

use crate::gags::GagKind;
use thiserror::Error;

/// Errors that can occur when building a session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("Capture resolution not specified. Call .capture(resolution) before .build()")]
    MissingCapture,

    #[error("Capture resolution {width}x{height} has a zero dimension")]
    EmptyCapture { width: u32, height: u32 },

    #[error("Confirmation needs at least one frame per unit")]
    ZeroConfirmationFrames,

    #[error("At least one hand must be tracked")]
    ZeroMaxHands,

    #[error("Probability {value} for {kind:?} gag is outside [0, 1]")]
    InvalidProbability { kind: GagKind, value: f64 },
}
