//! Environment for effectful frame steps.

use crate::gags::{Dice, SeededDice};
use crate::shell::assets::Assets;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Everything a frame step may touch outside the session: dice, a clock,
/// the blocking pause and the discovered assets.
pub trait Environment: Dice + Clone + Send + Sync + 'static {
    /// Current time. Called once per frame.
    fn now(&self) -> DateTime<Utc>;

    /// Block the calling thread. Used by the thinking gag.
    fn pause(&self, duration: Duration);

    /// Whether the rick-roll animation is available.
    fn animation_ready(&self) -> bool;
}

/// Time source for [`LiveEnv`].
#[derive(Clone, Debug)]
enum Clock {
    System,
    /// Starts at `start` and advances by `step_ms` on every reading.
    Stepped {
        start: DateTime<Utc>,
        step_ms: u64,
        ticks: Arc<AtomicU64>,
    },
}

/// Environment used by the CLI.
#[derive(Clone, Debug)]
pub struct LiveEnv {
    dice: Arc<SeededDice>,
    clock: Clock,
    stalls: bool,
    assets: Arc<Assets>,
}

impl LiveEnv {
    /// Entropy-seeded dice, system clock, real stalls, no assets.
    pub fn new() -> Self {
        Self::with_dice(SeededDice::from_entropy())
    }

    /// Reproducible dice.
    pub fn seeded(seed: u64) -> Self {
        Self::with_dice(SeededDice::from_seed(seed))
    }

    fn with_dice(dice: SeededDice) -> Self {
        Self {
            dice: Arc::new(dice),
            clock: Clock::System,
            stalls: true,
            assets: Arc::new(Assets::none()),
        }
    }

    /// Replace the system clock with one that advances a fixed step per
    /// frame, for replaying recordings at a simulated frame rate.
    pub fn with_stepped_clock(mut self, start: DateTime<Utc>, step: Duration) -> Self {
        self.clock = Clock::Stepped {
            start,
            step_ms: step.as_millis() as u64,
            ticks: Arc::new(AtomicU64::new(0)),
        };
        self
    }

    /// Skip the blocking pauses.
    pub fn without_stalls(mut self) -> Self {
        self.stalls = false;
        self
    }

    pub fn with_assets(mut self, assets: Assets) -> Self {
        self.assets = Arc::new(assets);
        self
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }
}

impl Default for LiveEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Dice for LiveEnv {
    fn chance(&self, probability: f64) -> bool {
        self.dice.chance(probability)
    }

    fn pick(&self, len: usize) -> usize {
        self.dice.pick(len)
    }

    fn between(&self, low: u64, high: u64) -> u64 {
        self.dice.between(low, high)
    }
}

impl Environment for LiveEnv {
    fn now(&self) -> DateTime<Utc> {
        match &self.clock {
            Clock::System => Utc::now(),
            Clock::Stepped {
                start,
                step_ms,
                ticks,
            } => {
                let tick = ticks.fetch_add(1, Ordering::Relaxed);
                *start + chrono::Duration::milliseconds((tick * step_ms) as i64)
            }
        }
    }

    fn pause(&self, duration: Duration) {
        if self.stalls && !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }

    fn animation_ready(&self) -> bool {
        self.assets.animation_ready()
    }
}
