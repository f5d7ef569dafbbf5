//! Frame sources.
//!
//! A source yields detector output one frame at a time. `Ok(None)` is the
//! end of the stream.

use crate::core::Frame;
use crate::recording::Recording;
use std::collections::VecDeque;
use std::io::BufRead;
use std::path::PathBuf;
use thiserror::Error;
use tracing::trace;

/// Errors from a frame source
#[derive(Debug, Error)]
pub enum SourceError {
    /// The stream could not be opened at all
    #[error("Failed to open frame source {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the next frame failed
    #[error("Failed to read frame: {0}")]
    Read(#[from] std::io::Error),

    /// A line did not decode as a frame
    #[error("Malformed frame on line {line}: {message}")]
    Decode { line: usize, message: String },
}

/// Produces frames for the run loop.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError>;
}

impl<F: FrameSource + ?Sized> FrameSource for Box<F> {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        (**self).next_frame()
    }
}

/// Replays the frames of a recording.
#[derive(Clone, Debug)]
pub struct ReplaySource {
    frames: VecDeque<Frame>,
}

impl ReplaySource {
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl From<Recording> for ReplaySource {
    fn from(recording: Recording) -> Self {
        Self::new(recording.frames)
    }
}

impl FrameSource for ReplaySource {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        Ok(self.frames.pop_front())
    }
}

/// Reads one JSON frame per line, as written by a landmark bridge.
/// Blank lines are skipped.
pub struct JsonLinesSource<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }

    /// Lines consumed so far.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> FrameSource for JsonLinesSource<R> {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }

            let frame: Frame = serde_json::from_str(text).map_err(|e| SourceError::Decode {
                line: self.line,
                message: e.to_string(),
            })?;
            trace!(line = self.line, hands = frame.hands.len(), "read frame");
            return Ok(Some(frame));
        }
    }
}

/// Drain a source into memory, stopping at the first error.
pub fn collect_frames(source: &mut impl FrameSource) -> Result<Vec<Frame>, SourceError> {
    let mut frames = Vec::new();
    while let Some(frame) = source.next_frame()? {
        frames.push(frame);
    }
    Ok(frames)
}
