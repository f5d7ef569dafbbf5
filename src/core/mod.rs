//! Pure core: landmarks, finger counting, phases, guards and history.
//!
//! Nothing in this module performs I/O, reads a clock or draws random
//! numbers. Time and frame indices are passed in by the caller.

pub mod count;
mod guard;
mod history;
pub mod landmark;
mod state;
pub mod synth;

pub use count::{count_hand, count_hands, frame_fingertips};
pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use landmark::{Frame, HandLandmarkSet, Landmark, PixelPoint, Resolution};
pub use state::State;
