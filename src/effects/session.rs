//! Counting session: the confirmation machine plus its gags.

use crate::confirm::{ConfirmationMachine, GestureState, Phase, Progress, ResetReason};
use crate::core::{count_hands, frame_fingertips, Frame, Resolution};
use crate::effects::env::Environment;
use crate::gags::{ForgetTimer, Gag, GagContext, GagTable};
use serde::{Deserialize, Serialize};
use stillwater::effect::BoxedEffect;
use stillwater::prelude::*;
use tracing::{debug, info};

/// Errors from a session step
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("Frame reports {detected} hands, at most {max} are tracked")]
    TooManyHands { detected: usize, max: usize },
}

/// Everything that happened on one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub index: u64,
    pub hands: usize,
    /// Summed finger count, `None` without hands.
    pub count: Option<u8>,
    /// Confirmation outcome, `None` without hands.
    pub progress: Option<Progress>,
    pub gags: Vec<Gag>,
    /// Set when this frame wiped real progress.
    pub reset: Option<ResetReason>,
    pub phase: Phase,
    pub state: GestureState,
    pub required_frames: u32,
}

impl FrameReport {
    /// Progress toward the next unit, in percent.
    pub fn progress_percent(&self) -> Option<u32> {
        match self.progress.as_ref()? {
            Progress::Holding {
                frames_matching,
                required,
            } => Some(frames_matching * 100 / (*required).max(1)),
            Progress::Accepted { .. } | Progress::Completed { .. } => Some(100),
            Progress::Mismatch { .. } | Progress::Done { .. } => None,
        }
    }

    pub fn fired(&self, gag: &Gag) -> bool {
        self.gags.contains(gag)
    }
}

/// Output of [`Session::step`], committed with [`Session::apply_result`].
#[derive(Clone, Debug)]
pub struct StepOutput {
    machine: ConfirmationMachine,
    forget: ForgetTimer,
    report: FrameReport,
}

impl StepOutput {
    pub fn report(&self) -> &FrameReport {
        &self.report
    }
}

/// A counting session.
///
/// `step` evaluates a frame against a copy of the session inside an
/// effect; nothing changes until the output is passed to `apply_result`.
#[derive(Clone, Debug)]
pub struct Session {
    capture: Resolution,
    max_hands: usize,
    machine: ConfirmationMachine,
    forget: ForgetTimer,
    gags: GagTable,
    frames_seen: u64,
}

impl Session {
    pub(crate) fn from_parts(
        capture: Resolution,
        max_hands: usize,
        machine: ConfirmationMachine,
        forget: ForgetTimer,
        gags: GagTable,
    ) -> Self {
        Self {
            capture,
            max_hands,
            machine,
            forget,
            gags,
            frames_seen: 0,
        }
    }

    pub fn machine(&self) -> &ConfirmationMachine {
        &self.machine
    }

    pub fn capture(&self) -> Resolution {
        self.capture
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    pub fn gags(&self) -> &GagTable {
        &self.gags
    }

    /// Evaluate one frame. The returned effect rolls the gag dice, reads
    /// the clock and may block in a thinking pause.
    pub fn step<E: Environment>(&self, frame: Frame) -> BoxedEffect<StepOutput, SessionError, E> {
        if let Err(e) = self.admit(&frame) {
            return fail(e).boxed();
        }

        let snapshot = self.clone();
        from_fn(move |env: &E| Ok(snapshot.evaluate(&frame, env))).boxed()
    }

    /// Commit a step and hand back its report.
    pub fn apply_result(&mut self, output: StepOutput) -> FrameReport {
        self.machine = output.machine;
        self.forget = output.forget;
        self.frames_seen += 1;
        output.report
    }

    /// Reject frames with more hands than the session tracks.
    pub fn admit(&self, frame: &Frame) -> Result<(), SessionError> {
        if frame.hands.len() > self.max_hands {
            return Err(SessionError::TooManyHands {
                detected: frame.hands.len(),
                max: self.max_hands,
            });
        }
        Ok(())
    }

    /// Skip a frame that failed to step without touching the machine.
    pub fn skip_frame(&mut self) {
        self.frames_seen += 1;
    }

    fn evaluate<E: Environment>(&self, frame: &Frame, env: &E) -> StepOutput {
        let index = self.frames_seen;
        let now = env.now();
        let mut machine = self.machine.clone();
        let mut forget = self.forget.clone();
        let mut gags = Vec::new();
        forget.arm(now);

        if !frame.has_hands() {
            let reset = (!machine.is_pristine()).then_some(ResetReason::HandLost);
            machine.reset(ResetReason::HandLost, index, now);
            let report = self.report(index, 0, None, None, gags, reset, &machine);
            return StepOutput {
                machine,
                forget,
                report,
            };
        }

        let hands = frame.hands.len();
        let count = count_hands(&frame.hands);
        let fingertips = frame_fingertips(&frame.hands, self.capture);

        let mut reset = None;
        if forget.poll(now, env) {
            info!("oops, forgot what I was counting, starting over");
            machine.reset(ResetReason::Forgot, index, now);
            gags.push(Gag::Forgot);
            reset = Some(ResetReason::Forgot);
        }

        let progress = machine.observe(count, &fingertips, index, now);

        let context = GagContext {
            hands,
            matched: progress.matched(),
            accepted: progress.accepted_unit(),
            complete: machine.is_complete(),
            animation_ready: env.animation_ready(),
        };
        for gag in self.gags.roll(&context, env) {
            if let Some(pause) = gag.pause() {
                debug!(pause_ms = pause.as_millis() as u64, "thinking");
                env.pause(pause);
            }
            if let Gag::Confused { guess } = gag {
                info!("wait... is that {guess}? I'm confused!");
            }
            gags.push(gag);
        }

        let report = self.report(
            index,
            hands,
            Some(count),
            Some(progress),
            gags,
            reset,
            &machine,
        );
        StepOutput {
            machine,
            forget,
            report,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn report(
        &self,
        index: u64,
        hands: usize,
        count: Option<u8>,
        progress: Option<Progress>,
        gags: Vec<Gag>,
        reset: Option<ResetReason>,
        machine: &ConfirmationMachine,
    ) -> FrameReport {
        FrameReport {
            index,
            hands,
            count,
            progress,
            gags,
            reset,
            phase: machine.phase(),
            state: machine.state().clone(),
            required_frames: machine.required_frames(),
        }
    }
}

/// Result of single-shot analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub hands: usize,
    /// `None` when no hand was detected.
    pub fingers: Option<u8>,
}

impl Snapshot {
    pub fn caption(&self) -> String {
        match self.fingers {
            Some(n) => format!("Fingers: {n}"),
            None => "No hands detected.".to_string(),
        }
    }
}

/// Count the fingers on one frame with no confirmation and no gags.
pub fn analyze(frame: &Frame) -> Snapshot {
    Snapshot {
        hands: frame.hands.len(),
        fingers: frame.has_hands().then(|| count_hands(&frame.hands)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SessionBuilder;
    use crate::core::synth;
    use crate::effects::LiveEnv;
    use crate::gags::GagConfig;
    use chrono::Utc;
    use std::time::Duration;
    use stillwater::effect::Effect;

    fn quiet_session(required: u32) -> Session {
        SessionBuilder::new()
            .capture(Resolution::new(640, 480))
            .required_frames(required)
            .gags(GagConfig::disabled())
            .build()
            .unwrap()
    }

    fn env() -> LiveEnv {
        LiveEnv::seeded(11)
            .with_stepped_clock(Utc::now(), Duration::from_millis(33))
            .without_stalls()
    }

    async fn run(session: &mut Session, env: &LiveEnv, frame: Frame) -> FrameReport {
        let output = session.step(frame).run(env).await.unwrap();
        session.apply_result(output)
    }

    #[tokio::test]
    async fn ten_frames_of_three_accept_one_unit() {
        let mut session = quiet_session(10);
        let env = env();
        let frame = Frame::new(synth::hands_showing(3));

        let mut last = None;
        for _ in 0..10 {
            last = Some(run(&mut session, &env, frame.clone()).await);
        }
        let report = last.unwrap();

        assert_eq!(report.state.current_count, 1);
        assert_eq!(report.state.confirmed_positions.len(), 1);
        assert_eq!(report.progress_percent(), Some(100));

        let report = run(&mut session, &env, Frame::new(synth::hands_showing(2))).await;
        assert_eq!(report.state.frames_matching, 0);
        assert_eq!(report.state.current_count, 1);
        assert_eq!(report.state.target_count, Some(3));
        assert_eq!(report.phase, Phase::Resetting);
    }

    #[tokio::test]
    async fn step_does_not_mutate_until_applied() {
        let session = quiet_session(1);
        let env = env();

        let output = session
            .step(Frame::new(synth::hands_showing(2)))
            .run(&env)
            .await
            .unwrap();

        assert_eq!(output.report().state.current_count, 1);
        assert_eq!(session.machine().state().current_count, 0);
        assert_eq!(session.frames_seen(), 0);
    }

    #[tokio::test]
    async fn losing_hand_resets_and_reports_once() {
        let mut session = quiet_session(2);
        let env = env();
        for _ in 0..3 {
            run(&mut session, &env, Frame::new(synth::hands_showing(4))).await;
        }

        let first = run(&mut session, &env, Frame::empty()).await;
        let second = run(&mut session, &env, Frame::empty()).await;

        assert_eq!(first.reset, Some(ResetReason::HandLost));
        assert_eq!(first.state, GestureState::default());
        assert_eq!(first.count, None);
        assert_eq!(second.reset, None);
        assert_eq!(second.index, 4);
    }

    #[tokio::test]
    async fn too_many_hands_is_rejected() {
        let session = quiet_session(1);
        let env = env();
        let mut hands = synth::hands_showing(10);
        hands.push(synth::hand_showing(1, 0.9));

        let result = session.step(Frame::new(hands)).run(&env).await;
        assert!(matches!(
            result,
            Err(SessionError::TooManyHands {
                detected: 3,
                max: 2
            })
        ));
    }

    #[tokio::test]
    async fn certain_forget_wipes_progress_after_interval() {
        let gags = GagConfig {
            enabled: true,
            forget_probability: 1.0,
            forget_interval_ms: 100,
            thinking_probability: 0.0,
            confusion_probability: 0.0,
            gibberish_probability: 0.0,
            rickroll_probability: 0.0,
            ..GagConfig::default()
        };
        let mut session = SessionBuilder::new()
            .capture(Resolution::default())
            .required_frames(2)
            .gags(gags)
            .build()
            .unwrap();
        let env = env();
        let frame = Frame::new(synth::hands_showing(3));

        // Frames at 0, 33, 66, 99 ms stay inside the interval.
        for _ in 0..4 {
            let report = run(&mut session, &env, frame.clone()).await;
            assert!(report.gags.is_empty());
        }
        assert_eq!(session.machine().state().current_count, 2);

        // 132 ms: the forget fires before the frame is counted.
        let report = run(&mut session, &env, frame.clone()).await;
        assert!(report.fired(&Gag::Forgot));
        assert_eq!(report.reset, Some(ResetReason::Forgot));
        assert_eq!(report.state.current_count, 0);
        assert_eq!(report.state.target_count, Some(3));
        assert_eq!(report.state.frames_matching, 1);
    }

    #[tokio::test]
    async fn thinking_gag_fires_on_matching_frames() {
        let gags = GagConfig {
            enabled: true,
            forget_probability: 0.0,
            thinking_probability: 1.0,
            thinking_min_ms: 0,
            thinking_max_ms: 0,
            confusion_probability: 0.0,
            gibberish_probability: 0.0,
            rickroll_probability: 0.0,
            ..GagConfig::default()
        };
        let mut session = SessionBuilder::new()
            .capture(Resolution::default())
            .gags(gags)
            .build()
            .unwrap();
        let env = env();

        let matching = run(&mut session, &env, Frame::new(synth::hands_showing(2))).await;
        assert!(matching.fired(&Gag::Thinking { pause_ms: 0 }));

        let mismatch = run(&mut session, &env, Frame::new(synth::hands_showing(1))).await;
        assert!(mismatch.gags.is_empty());
    }

    #[tokio::test]
    async fn changed_count_after_completion_does_not_think() {
        let gags = GagConfig {
            enabled: true,
            forget_probability: 0.0,
            thinking_probability: 1.0,
            thinking_min_ms: 0,
            thinking_max_ms: 0,
            confusion_probability: 0.0,
            gibberish_probability: 0.0,
            rickroll_probability: 0.0,
            ..GagConfig::default()
        };
        let mut session = SessionBuilder::new()
            .capture(Resolution::default())
            .required_frames(1)
            .gags(gags)
            .build()
            .unwrap();
        let env = env();

        let done = run(&mut session, &env, Frame::new(synth::hands_showing(1))).await;
        assert_eq!(done.phase, Phase::Complete);

        let changed = run(&mut session, &env, Frame::new(synth::hands_showing(4))).await;
        assert_eq!(
            changed.progress,
            Some(Progress::Done {
                total: 1,
                observed: 4
            })
        );
        assert!(changed.gags.is_empty());

        let held = run(&mut session, &env, Frame::new(synth::hands_showing(1))).await;
        assert!(held.fired(&Gag::Thinking { pause_ms: 0 }));
    }

    #[tokio::test]
    async fn forget_clock_runs_from_first_frame() {
        let gags = GagConfig {
            enabled: true,
            forget_probability: 1.0,
            forget_interval_ms: 100,
            thinking_probability: 0.0,
            confusion_probability: 0.0,
            gibberish_probability: 0.0,
            rickroll_probability: 0.0,
            ..GagConfig::default()
        };
        let mut session = SessionBuilder::new()
            .capture(Resolution::default())
            .gags(gags)
            .build()
            .unwrap();
        let env = env();

        // Empty frames at 0, 33, 66 and 99 ms start the clock.
        for _ in 0..4 {
            let report = run(&mut session, &env, Frame::empty()).await;
            assert!(report.gags.is_empty());
        }

        // The first hand arrives at 132 ms, already past the interval.
        let report = run(&mut session, &env, Frame::new(synth::hands_showing(2))).await;
        assert!(report.fired(&Gag::Forgot));
    }

    #[test]
    fn admit_checks_hand_limit() {
        let session = quiet_session(1);
        assert!(session.admit(&Frame::new(synth::hands_showing(7))).is_ok());

        let crowded = Frame::new(vec![synth::hand_showing(5, 0.2); 60]);
        assert_eq!(
            session.admit(&crowded),
            Err(SessionError::TooManyHands {
                detected: 60,
                max: 2
            })
        );
    }

    #[test]
    fn snapshot_counts_or_reports_no_hands() {
        let snap = analyze(&Frame::new(synth::hands_showing(7)));
        assert_eq!(snap.fingers, Some(7));
        assert_eq!(snap.caption(), "Fingers: 7");

        let none = analyze(&Frame::empty());
        assert_eq!(none.fingers, None);
        assert_eq!(none.caption(), "No hands detected.");
    }
}
