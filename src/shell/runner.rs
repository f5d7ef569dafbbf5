//! The polling loop.

use crate::confirm::{GestureState, Phase, Progress, ResetReason};
use crate::effects::{analyze, Environment, FrameReport, Session};
use crate::gags::GagKind;
use crate::shell::render::{compose, compose_snapshot, Renderer};
use crate::shell::source::FrameSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use stillwater::effect::Effect;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Key that ends the loop.
pub const QUIT_KEY: char = 'q';

/// Key that triggers a single-shot count.
pub const CAPTURE_KEY: char = 'c';

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Confirmation plus gags on every frame.
    #[default]
    Counter,
    /// Count only when the capture key is pressed.
    Snapshot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    Quit,
    EndOfStream,
    ReadFailure,
}

/// Errors that stop the loop
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to render frame: {0}")]
    Render(#[from] std::io::Error),
}

/// What a run did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub mode: Mode,
    pub frames: u64,
    /// Frames the session refused to step.
    pub skipped: u64,
    pub units_confirmed: u64,
    pub completions: u64,
    pub hand_lost_resets: u64,
    pub forgot_resets: u64,
    pub gags: BTreeMap<GagKind, u64>,
    pub snapshots: u64,
    pub exit: ExitReason,
    pub phase: Phase,
    pub state: GestureState,
}

impl RunSummary {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            frames: 0,
            skipped: 0,
            units_confirmed: 0,
            completions: 0,
            hand_lost_resets: 0,
            forgot_resets: 0,
            gags: BTreeMap::new(),
            snapshots: 0,
            exit: ExitReason::EndOfStream,
            phase: Phase::Idle,
            state: GestureState::default(),
        }
    }

    fn record(&mut self, report: &FrameReport) {
        match &report.progress {
            Some(Progress::Accepted { .. }) => self.units_confirmed += 1,
            Some(Progress::Completed { .. }) => {
                self.units_confirmed += 1;
                self.completions += 1;
            }
            _ => {}
        }
        match report.reset {
            Some(ResetReason::HandLost) => self.hand_lost_resets += 1,
            Some(ResetReason::Forgot) => self.forgot_resets += 1,
            None => {}
        }
        for gag in &report.gags {
            *self.gags.entry(gag.kind()).or_insert(0) += 1;
        }
    }

    pub fn gag_count(&self, kind: GagKind) -> u64 {
        self.gags.get(&kind).copied().unwrap_or(0)
    }
}

/// Drives a session from a frame source to a renderer.
pub struct Runner<S, R, E> {
    source: S,
    renderer: R,
    env: E,
    session: Session,
    mode: Mode,
}

impl<S, R, E> Runner<S, R, E>
where
    S: FrameSource,
    R: Renderer,
    E: Environment,
{
    pub fn new(source: S, renderer: R, env: E, session: Session) -> Self {
        Self {
            source,
            renderer,
            env,
            session,
            mode: Mode::Counter,
        }
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Poll frames until quit, end of stream or a read failure.
    pub async fn run(&mut self) -> Result<RunSummary, RunError> {
        let mut summary = RunSummary::new(self.mode);
        info!(mode = ?self.mode, "starting run, press '{QUIT_KEY}' to quit");

        summary.exit = loop {
            let frame = match self.source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break ExitReason::EndOfStream,
                Err(e) => {
                    warn!(error = %e, "frame source failed, stopping");
                    break ExitReason::ReadFailure;
                }
            };
            let key = frame.key;
            summary.frames += 1;

            match self.mode {
                Mode::Counter => match self.session.step(frame).run(&self.env).await {
                    Ok(output) => {
                        let report = self.session.apply_result(output);
                        summary.record(&report);
                        self.renderer.render(&compose(&report))?;
                    }
                    Err(e) => {
                        warn!(error = %e, "skipping frame");
                        self.session.skip_frame();
                        summary.skipped += 1;
                    }
                },
                Mode::Snapshot => {
                    if key == Some(CAPTURE_KEY) {
                        if let Err(e) = self.session.admit(&frame) {
                            warn!(error = %e, "skipping snapshot");
                            summary.skipped += 1;
                            continue;
                        }
                        let snapshot = analyze(&frame);
                        debug!(hands = snapshot.hands, fingers = ?snapshot.fingers, "snapshot");
                        self.renderer.render(&compose_snapshot(&snapshot))?;
                        self.renderer.announce(&snapshot.caption())?;
                        summary.snapshots += 1;
                    }
                }
            }

            if key == Some(QUIT_KEY) {
                break ExitReason::Quit;
            }
        };

        let machine = self.session.machine();
        summary.phase = machine.phase();
        summary.state = machine.state().clone();
        info!(
            frames = summary.frames,
            units = summary.units_confirmed,
            exit = ?summary.exit,
            "run finished"
        );
        Ok(summary)
    }
}
