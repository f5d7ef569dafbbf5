//! Effectful shell around the pure confirmation core.
//!
//! A frame step is a Stillwater effect: it reads the clock, rolls the gag
//! dice and may block in a thinking pause, all through an [`Environment`].
//!
//! # Key Concepts
//!
//! - **Session**: owns the confirmation machine, the forget timer and the
//!   gag table
//! - **Step / apply**: `step` returns a `BoxedEffect` evaluated against a
//!   copy of the session; `apply_result` commits it
//! - **Environment**: `LiveEnv` for the CLI, seedable and with an optional
//!   stepped clock for deterministic replays

mod env;
mod session;

pub use env::{Environment, LiveEnv};
pub use session::{analyze, FrameReport, Session, SessionError, Snapshot, StepOutput};
