//! Overlay composition and renderers.
//!
//! [`compose`] turns a frame report into a list of draw commands laid out
//! like the classic counter window. A [`Renderer`] decides what to do with
//! them; the console renderer prints the captions.

use crate::confirm::Progress;
use crate::core::PixelPoint;
use crate::effects::{FrameReport, Snapshot};
use crate::gags::Gag;
use serde::Serialize;
use std::io::Write;

/// Title of the counter window.
pub const WINDOW_TITLE: &str = "Stupid Finger Counter";

/// Title of the single-shot window.
pub const SNAPSHOT_TITLE: &str = "Finger Counter";

/// Radius of the ring drawn around a confirmed fingertip.
pub const CIRCLE_RADIUS: i32 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const AZURE: Color = Color::rgb(0, 165, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "draw", rename_all = "snake_case")]
pub enum DrawCommand {
    Text {
        text: String,
        pos: PixelPoint,
        scale: f32,
        color: Color,
    },
    Circle {
        center: PixelPoint,
        radius: i32,
        color: Color,
        label: String,
    },
}

impl DrawCommand {
    fn text(text: impl Into<String>, x: i32, y: i32, scale: f32, color: Color) -> Self {
        Self::Text {
            text: text.into(),
            pos: PixelPoint { x, y },
            scale,
            color,
        }
    }

    /// Caption text, if this is a text command.
    pub fn caption(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            Self::Circle { .. } => None,
        }
    }
}

/// Everything drawn on one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Overlay {
    pub title: &'static str,
    pub commands: Vec<DrawCommand>,
}

impl Overlay {
    pub fn captions(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(DrawCommand::caption)
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }
}

/// Lay out the counter overlay for one frame.
pub fn compose(report: &FrameReport) -> Overlay {
    let mut commands = Vec::new();

    if report.gags.contains(&Gag::Forgot) {
        commands.push(DrawCommand::text(Gag::Forgot.caption(), 50, 150, 1.0, Color::RED));
    }

    let state = &report.state;
    let target = state
        .target_count
        .map_or_else(|| "?".to_string(), |t| t.to_string());

    match &report.progress {
        None => {
            commands.push(DrawCommand::text("No hands detected!", 50, 100, 1.0, Color::RED));
        }
        Some(progress) if !progress.matched() => {
            commands.push(DrawCommand::text("Hold still!", 50, 200, 1.0, Color::RED));
        }
        Some(progress) => {
            commands.push(DrawCommand::text(
                format!("Counting: {}/{}", state.current_count, target),
                50,
                100,
                1.5,
                Color::GREEN,
            ));
            if let Some(percent) = report.progress_percent() {
                commands.push(DrawCommand::text(
                    format!("Progress: {percent}%"),
                    50,
                    150,
                    1.0,
                    Color::CYAN,
                ));
            }
            if matches!(progress, Progress::Completed { .. } | Progress::Done { .. }) {
                commands.push(DrawCommand::text(
                    format!("DONE! Total: {}", state.current_count),
                    50,
                    250,
                    1.5,
                    Color::YELLOW,
                ));
                commands.push(DrawCommand::text(
                    "Keep holding... or restart!",
                    50,
                    300,
                    0.7,
                    Color::WHITE,
                ));
            }
        }
    }

    for gag in &report.gags {
        let (y, scale, color) = match gag {
            Gag::Forgot => continue,
            Gag::Thinking { .. } => (200, 0.8, Color::AZURE),
            Gag::Confused { .. } => (350, 0.8, Color::YELLOW),
            Gag::Gibberish { .. } => (400, 0.8, Color::MAGENTA),
            Gag::RickRoll => (450, 1.0, Color::WHITE),
        };
        commands.push(DrawCommand::text(gag.caption(), 50, y, scale, color));
    }

    for (idx, center) in state.confirmed_positions.iter().enumerate() {
        commands.push(DrawCommand::Circle {
            center: *center,
            radius: CIRCLE_RADIUS,
            color: Color::GREEN,
            label: (idx + 1).to_string(),
        });
    }

    Overlay {
        title: WINDOW_TITLE,
        commands,
    }
}

/// Lay out the single-shot overlay.
pub fn compose_snapshot(snapshot: &Snapshot) -> Overlay {
    let commands = match snapshot.fingers {
        Some(n) => vec![DrawCommand::text(
            format!("Fingers: {n}"),
            50,
            100,
            2.0,
            Color::GREEN,
        )],
        None => Vec::new(),
    };
    Overlay {
        title: SNAPSHOT_TITLE,
        commands,
    }
}

/// Presents overlays.
pub trait Renderer {
    fn render(&mut self, overlay: &Overlay) -> std::io::Result<()>;

    /// A one-off line outside the overlay, such as a snapshot result.
    fn announce(&mut self, message: &str) -> std::io::Result<()>;
}

/// Prints overlay captions, one line per changed overlay.
pub struct ConsoleRenderer<W> {
    out: W,
    last: Option<Overlay>,
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl ConsoleRenderer<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn render(&mut self, overlay: &Overlay) -> std::io::Result<()> {
        if self.last.as_ref() == Some(overlay) {
            return Ok(());
        }

        let captions: Vec<&str> = overlay.captions().collect();
        let circled = overlay.circles().count();
        if circled > 0 {
            writeln!(
                self.out,
                "[{}] {} (circled: {circled})",
                overlay.title,
                captions.join(" | ")
            )?;
        } else {
            writeln!(self.out, "[{}] {}", overlay.title, captions.join(" | "))?;
        }
        self.out.flush()?;
        self.last = Some(overlay.clone());
        Ok(())
    }

    fn announce(&mut self, message: &str) -> std::io::Result<()> {
        writeln!(self.out, "{message}")?;
        self.out.flush()
    }
}

/// Keeps every overlay and announcement in memory.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub overlays: Vec<Overlay>,
    pub announcements: Vec<String>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, overlay: &Overlay) -> std::io::Result<()> {
        self.overlays.push(overlay.clone());
        Ok(())
    }

    fn announce(&mut self, message: &str) -> std::io::Result<()> {
        self.announcements.push(message.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::{GestureState, Phase};

    fn report(progress: Option<Progress>, state: GestureState, gags: Vec<Gag>) -> FrameReport {
        let phase = match &progress {
            None => Phase::Idle,
            Some(Progress::Mismatch { .. }) => Phase::Resetting,
            Some(Progress::Completed { .. } | Progress::Done { .. }) => Phase::Complete,
            Some(_) => Phase::Matching,
        };
        FrameReport {
            index: 0,
            hands: usize::from(progress.is_some()),
            count: None,
            progress,
            gags,
            reset: None,
            phase,
            state,
            required_frames: 10,
        }
    }

    fn captions(overlay: &Overlay) -> Vec<String> {
        overlay.captions().map(str::to_string).collect()
    }

    #[test]
    fn no_hands_caption() {
        let overlay = compose(&report(None, GestureState::default(), vec![]));
        assert_eq!(overlay.title, WINDOW_TITLE);
        assert_eq!(captions(&overlay), vec!["No hands detected!"]);
    }

    #[test]
    fn holding_shows_count_and_progress() {
        let state = GestureState {
            current_count: 1,
            target_count: Some(3),
            frames_matching: 4,
            confirmed_positions: vec![PixelPoint { x: 100, y: 200 }],
        };
        let progress = Progress::Holding {
            frames_matching: 4,
            required: 10,
        };
        let overlay = compose(&report(Some(progress), state, vec![]));

        assert_eq!(captions(&overlay), vec!["Counting: 1/3", "Progress: 40%"]);
        let circles: Vec<_> = overlay.circles().collect();
        assert_eq!(
            circles,
            vec![&DrawCommand::Circle {
                center: PixelPoint { x: 100, y: 200 },
                radius: CIRCLE_RADIUS,
                color: Color::GREEN,
                label: "1".to_string(),
            }]
        );
    }

    #[test]
    fn mismatch_says_hold_still() {
        let state = GestureState {
            target_count: Some(2),
            ..GestureState::default()
        };
        let progress = Progress::Mismatch {
            observed: 4,
            target: 2,
        };
        let overlay = compose(&report(Some(progress), state, vec![]));
        assert_eq!(captions(&overlay), vec!["Hold still!"]);
    }

    #[test]
    fn completion_and_gags() {
        let state = GestureState {
            current_count: 2,
            target_count: Some(2),
            frames_matching: 0,
            confirmed_positions: vec![PixelPoint { x: 1, y: 1 }, PixelPoint { x: 2, y: 2 }],
        };
        let gags = vec![
            Gag::Forgot,
            Gag::Gibberish {
                message: "Potato detected!".to_string(),
            },
        ];
        let done = Progress::Done {
            total: 2,
            observed: 2,
        };
        let overlay = compose(&report(Some(done), state, gags));

        assert_eq!(
            captions(&overlay),
            vec![
                "FORGOT! Restarting...",
                "Counting: 2/2",
                "DONE! Total: 2",
                "Keep holding... or restart!",
                "Potato detected!",
            ]
        );
        assert_eq!(overlay.circles().count(), 2);
    }

    #[test]
    fn changed_count_after_completion_says_hold_still() {
        let state = GestureState {
            current_count: 1,
            target_count: Some(1),
            frames_matching: 0,
            confirmed_positions: vec![PixelPoint { x: 5, y: 5 }],
        };
        let done = Progress::Done {
            total: 1,
            observed: 4,
        };
        let overlay = compose(&report(Some(done), state, vec![]));

        assert_eq!(captions(&overlay), vec!["Hold still!"]);
        assert_eq!(overlay.circles().count(), 1);
    }

    #[test]
    fn snapshot_overlay() {
        let some = compose_snapshot(&Snapshot {
            hands: 1,
            fingers: Some(4),
        });
        assert_eq!(captions(&some), vec!["Fingers: 4"]);

        let none = compose_snapshot(&Snapshot {
            hands: 0,
            fingers: None,
        });
        assert!(none.commands.is_empty());
    }

    #[test]
    fn console_prints_only_changes() {
        let mut renderer = ConsoleRenderer::new(Vec::new());
        let idle = compose(&report(None, GestureState::default(), vec![]));

        renderer.render(&idle).unwrap();
        renderer.render(&idle).unwrap();
        renderer.announce("Fingers: 3").unwrap();

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(
            out,
            "[Stupid Finger Counter] No hands detected!\nFingers: 3\n"
        );
    }
}
