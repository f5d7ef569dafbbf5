//! Frame-by-frame confirmation of a finger count.

use crate::core::{PixelPoint, State, StateHistory, StateTransition};
use crate::state_enum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Consecutive matching frames needed to accept one unit.
pub const DEFAULT_REQUIRED_FRAMES: u32 = 10;

/// Transitions kept by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

state_enum! {
    #[derive(Copy, Eq, Hash)]
    pub enum Phase {
        /// No target yet.
        Idle,
        /// Observed count equals the target.
        Matching,
        /// Last frame disagreed with the target; target kept.
        Resetting,
        /// Every unit of the target has been accepted.
        Complete,
    }
    final: [Complete]
}

/// Why the machine was wiped back to `Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetReason {
    HandLost,
    Forgot,
}

/// Mutable progress of the current counting attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureState {
    pub current_count: u8,
    pub target_count: Option<u8>,
    pub frames_matching: u32,
    pub confirmed_positions: Vec<PixelPoint>,
}

impl GestureState {
    pub fn is_complete(&self) -> bool {
        self.target_count == Some(self.current_count)
    }
}

/// What one observed frame did to the machine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Progress {
    /// Count matched; still short of the required streak.
    Holding { frames_matching: u32, required: u32 },
    /// A unit was accepted but the target is not yet reached.
    Accepted {
        unit: u8,
        position: Option<PixelPoint>,
    },
    /// The target was reached on this frame.
    Completed {
        total: u8,
        position: Option<PixelPoint>,
    },
    /// Count disagreed with the target; the streak was dropped.
    Mismatch { observed: u8, target: u8 },
    /// Already complete; the frame changed nothing. `observed` is the
    /// count seen on this frame.
    Done { total: u8, observed: u8 },
}

impl Progress {
    /// Whether the observed count agreed with the target on this frame.
    pub fn matched(&self) -> bool {
        match self {
            Self::Mismatch { .. } => false,
            Self::Done { total, observed } => total == observed,
            _ => true,
        }
    }

    /// Whether a unit was accepted on this frame.
    pub fn accepted_unit(&self) -> bool {
        matches!(self, Self::Accepted { .. } | Self::Completed { .. })
    }
}

/// Confirmation state machine.
///
/// The machine is a plain value: the session clones it, feeds it a frame
/// and keeps the result.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfirmationMachine {
    required_frames: u32,
    phase: Phase,
    state: GestureState,
    history: StateHistory<Phase>,
}

impl ConfirmationMachine {
    /// Create an idle machine. `required_frames` of zero is treated as one.
    pub fn new(required_frames: u32, history_limit: usize) -> Self {
        Self {
            required_frames: required_frames.max(1),
            phase: Phase::Idle,
            state: GestureState::default(),
            history: StateHistory::bounded(history_limit),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn history(&self) -> &StateHistory<Phase> {
        &self.history
    }

    pub fn required_frames(&self) -> u32 {
        self.required_frames
    }

    pub fn is_complete(&self) -> bool {
        self.phase.is_final()
    }

    /// Idle with nothing counted: a reset would change nothing.
    pub fn is_pristine(&self) -> bool {
        self.phase == Phase::Idle && self.state == GestureState::default()
    }

    /// Feed one frame with hands present.
    ///
    /// `count` is the summed finger count, `fingertips` the frame's tip
    /// positions in detection order.
    pub fn observe(
        &mut self,
        count: u8,
        fingertips: &[PixelPoint],
        frame: u64,
        at: DateTime<Utc>,
    ) -> Progress {
        if self.phase == Phase::Complete {
            return Progress::Done {
                total: self.state.current_count,
                observed: count,
            };
        }

        let target = match self.state.target_count {
            Some(target) => target,
            None => {
                info!(goal = count, "trying to count to {count}");
                self.state.target_count = Some(count);
                if count == 0 {
                    self.enter(Phase::Complete, frame, at);
                    return Progress::Completed {
                        total: 0,
                        position: None,
                    };
                }
                self.enter(Phase::Matching, frame, at);
                count
            }
        };

        if count != target {
            self.state.frames_matching = 0;
            self.enter(Phase::Resetting, frame, at);
            return Progress::Mismatch {
                observed: count,
                target,
            };
        }

        self.enter(Phase::Matching, frame, at);
        self.state.frames_matching += 1;
        if self.state.frames_matching < self.required_frames {
            return Progress::Holding {
                frames_matching: self.state.frames_matching,
                required: self.required_frames,
            };
        }

        let position = fingertips.get(self.state.current_count as usize).copied();
        if let Some(p) = position {
            self.state.confirmed_positions.push(p);
        }
        self.state.current_count += 1;
        self.state.frames_matching = 0;
        let unit = self.state.current_count;
        debug!(unit, goal = target, "counted finger #{unit}");

        if unit >= target {
            self.enter(Phase::Complete, frame, at);
            info!(total = unit, "finally counted all {unit} fingers");
            Progress::Completed {
                total: unit,
                position,
            }
        } else {
            Progress::Accepted { unit, position }
        }
    }

    /// Wipe all progress and the target.
    pub fn reset(&mut self, reason: ResetReason, frame: u64, at: DateTime<Utc>) {
        if !self.is_pristine() {
            debug!(?reason, from = %self.phase, "confirmation reset");
        }
        self.state = GestureState::default();
        self.enter(Phase::Idle, frame, at);
    }

    fn enter(&mut self, next: Phase, frame: u64, at: DateTime<Utc>) {
        if self.phase == next {
            return;
        }
        self.history = self.history.record(StateTransition {
            from: self.phase,
            to: next,
            timestamp: at,
            frame,
        });
        self.phase = next;
    }
}

impl Default for ConfirmationMachine {
    fn default() -> Self {
        Self::new(DEFAULT_REQUIRED_FRAMES, DEFAULT_HISTORY_LIMIT)
    }
}
