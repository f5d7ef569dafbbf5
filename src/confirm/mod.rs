//! Gesture confirmation.
//!
//! A count is only believed after it has been seen on a run of consecutive
//! frames. Each completed run accepts one "unit" and remembers where the
//! corresponding fingertip was; the attempt finishes once the number of
//! accepted units reaches the count seen on the first frame.
//!
//! There is no error path. Anything unexpected is a reset: losing the hand,
//! or the forget gag, sends the machine back to `Idle`.

mod machine;

pub use machine::{
    ConfirmationMachine, GestureState, Phase, Progress, ResetReason, DEFAULT_HISTORY_LIMIT,
    DEFAULT_REQUIRED_FRAMES,
};
