//! Fumble: a deliberately unreliable finger counter
//!
//! Fumble reads hand landmarks one frame at a time, counts the raised
//! fingers and then tries to confirm them one unit at a time by asking the
//! user to hold the gesture still. A layer of random gags gets in the way:
//! it forgets, stalls, guesses wrong numbers and prints nonsense.
//!
//! The crate follows a "pure core, imperative shell" layout:
//!
//! - **core**: landmark types, finger counting, guards and transition history
//! - **confirm**: the confirmation state machine, a plain value
//! - **gags**: per-frame random triggers behind a [`Dice`](gags::Dice) seam
//! - **effects**: a [`Session`](effects::Session) whose frame step is a
//!   stillwater effect over an [`Environment`](effects::Environment)
//! - **shell**: frame sources, overlay rendering and the run loop
//!
//! # Example
//!
//! ```rust
//! use fumble::core::{count_hands, synth};
//!
//! let hands = synth::hands_showing(7);
//! assert_eq!(hands.len(), 2);
//! assert_eq!(count_hands(&hands), 7);
//! ```
//!
//! Driving a session:
//!
//! ```rust
//! use fumble::builder::SessionBuilder;
//! use fumble::core::{synth, Frame, Resolution};
//! use fumble::effects::LiveEnv;
//! use fumble::gags::GagConfig;
//! use stillwater::effect::Effect;
//!
//! # tokio_test_block(async {
//! let mut session = SessionBuilder::new()
//!     .capture(Resolution::new(640, 480))
//!     .required_frames(3)
//!     .gags(GagConfig::disabled())
//!     .build()
//!     .unwrap();
//! let env = LiveEnv::seeded(7).without_stalls();
//!
//! let frame = Frame::new(synth::hands_showing(1));
//! let mut last = None;
//! for _ in 0..3 {
//!     let output = session.step(frame.clone()).run(&env).await.unwrap();
//!     last = Some(session.apply_result(output));
//! }
//! assert!(last.unwrap().state.is_complete());
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod confirm;
pub mod core;
pub mod effects;
pub mod gags;
pub mod recording;
pub mod shell;

// Re-export commonly used types
pub use builder::{BuildError, SessionBuilder};
pub use config::Config;
pub use confirm::{ConfirmationMachine, GestureState, Phase, Progress};
pub use core::{Frame, Guard, HandLandmarkSet, State, StateHistory, StateTransition};
pub use effects::{Environment, FrameReport, LiveEnv, Session};
pub use recording::Recording;
