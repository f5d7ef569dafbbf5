//! Imperative shell: where frames come from, where overlays go, and the
//! loop that connects them to a [`Session`](crate::effects::Session).

pub mod assets;
pub mod render;
pub mod runner;
pub mod source;

pub use assets::{AssetConfig, Assets};
pub use render::{compose, compose_snapshot, ConsoleRenderer, Overlay, RecordingRenderer, Renderer};
pub use runner::{ExitReason, Mode, RunError, RunSummary, Runner};
pub use source::{FrameSource, JsonLinesSource, ReplaySource, SourceError};
