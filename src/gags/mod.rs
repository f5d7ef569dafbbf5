//! Randomized disruption layer.
//!
//! Independent triggers rolled once per frame on top of the confirmation
//! machine. They carry no invariants of their own; each one is gated by a
//! [`Guard`] over a [`GagContext`] and then fires with a fixed probability.
//!
//! The forget gag is time-based rather than per-frame and lives in
//! [`ForgetTimer`].

mod dice;

pub use dice::{Dice, SeededDice};

use crate::core::Guard;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default messages for the gibberish gag.
pub const DEFAULT_GIBBERISH: [&str; 5] = [
    "Is that a hand?",
    "Potato detected!",
    "Error: Too many fingers",
    "Counting backwards now!",
    "Wait, what was I doing?",
];

/// Kinds of gag, used for rules and summaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GagKind {
    Forget,
    Thinking,
    Confusion,
    Gibberish,
    RickRoll,
}

/// A gag that fired on a frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "gag", rename_all = "snake_case")]
pub enum Gag {
    /// Progress was thrown away.
    Forgot,
    /// The loop was stalled for `pause_ms`.
    Thinking { pause_ms: u64 },
    /// A made-up number was announced.
    Confused { guess: u32 },
    /// A nonsense caption.
    Gibberish { message: String },
    /// The payload.
    RickRoll,
}

impl Gag {
    pub fn kind(&self) -> GagKind {
        match self {
            Self::Forgot => GagKind::Forget,
            Self::Thinking { .. } => GagKind::Thinking,
            Self::Confused { .. } => GagKind::Confusion,
            Self::Gibberish { .. } => GagKind::Gibberish,
            Self::RickRoll => GagKind::RickRoll,
        }
    }

    /// Caption drawn on the frame.
    pub fn caption(&self) -> String {
        match self {
            Self::Forgot => "FORGOT! Restarting...".to_string(),
            Self::Thinking { .. } => "Wait... thinking...".to_string(),
            Self::Confused { guess } => format!("Wait... is that {guess}? I'm confused!"),
            Self::Gibberish { message } => message.clone(),
            Self::RickRoll => "Never gonna give you up".to_string(),
        }
    }

    /// Blocking pause requested by the gag, if any.
    pub fn pause(&self) -> Option<Duration> {
        match self {
            Self::Thinking { pause_ms } => Some(Duration::from_millis(*pause_ms)),
            _ => None,
        }
    }
}

/// Probabilities and ranges for every gag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GagConfig {
    pub enabled: bool,
    pub forget_probability: f64,
    pub forget_interval_ms: u64,
    pub thinking_probability: f64,
    pub thinking_min_ms: u64,
    pub thinking_max_ms: u64,
    pub confusion_probability: f64,
    pub confusion_max_guess: u32,
    pub gibberish_probability: f64,
    pub gibberish: Vec<String>,
    pub rickroll_probability: f64,
}

impl Default for GagConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            forget_probability: 0.5,
            forget_interval_ms: 1000,
            thinking_probability: 0.05,
            thinking_min_ms: 500,
            thinking_max_ms: 2000,
            confusion_probability: 0.2,
            confusion_max_guess: 20,
            gibberish_probability: 0.05,
            gibberish: DEFAULT_GIBBERISH.iter().map(|s| s.to_string()).collect(),
            rickroll_probability: 0.02,
        }
    }
}

impl GagConfig {
    /// Every gag switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Configured probability for a kind.
    pub fn probability(&self, kind: GagKind) -> f64 {
        match kind {
            GagKind::Forget => self.forget_probability,
            GagKind::Thinking => self.thinking_probability,
            GagKind::Confusion => self.confusion_probability,
            GagKind::Gibberish => self.gibberish_probability,
            GagKind::RickRoll => self.rickroll_probability,
        }
    }
}

/// What the gag guards get to look at after the confirmation step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GagContext {
    pub hands: usize,
    /// Observed count agreed with the target.
    pub matched: bool,
    /// A unit was accepted on this frame.
    pub accepted: bool,
    pub complete: bool,
    /// The rick-roll animation asset exists.
    pub animation_ready: bool,
}

/// One per-frame trigger.
#[derive(Clone, Debug)]
pub struct GagRule {
    pub kind: GagKind,
    pub probability: f64,
    pub guard: Guard<GagContext>,
}

impl GagRule {
    pub fn new(kind: GagKind, probability: f64, guard: Guard<GagContext>) -> Self {
        Self {
            kind,
            probability,
            guard,
        }
    }
}

/// Ordered set of per-frame rules.
#[derive(Clone, Debug)]
pub struct GagTable {
    config: GagConfig,
    rules: Vec<GagRule>,
}

impl GagTable {
    /// The standard rules for `config`: thinking, confusion, gibberish and
    /// rick-roll, in that order. A disabled config yields no rules.
    pub fn from_config(config: &GagConfig) -> Self {
        let mut table = Self {
            config: config.clone(),
            rules: Vec::new(),
        };
        if !config.enabled {
            return table;
        }
        table.rules = vec![
            GagRule::new(
                GagKind::Thinking,
                config.thinking_probability,
                Guard::new(|c: &GagContext| c.matched),
            ),
            GagRule::new(
                GagKind::Confusion,
                config.confusion_probability,
                Guard::new(|c: &GagContext| c.accepted),
            ),
            GagRule::new(
                GagKind::Gibberish,
                config.gibberish_probability,
                Guard::new(|c: &GagContext| c.hands > 0),
            ),
            GagRule::new(
                GagKind::RickRoll,
                config.rickroll_probability,
                Guard::new(|c: &GagContext| c.complete && c.animation_ready),
            ),
        ];
        table
    }

    /// An empty table.
    pub fn silent() -> Self {
        Self::from_config(&GagConfig::disabled())
    }

    /// Append a custom rule. Forget rules are ignored here; forgetting is
    /// driven by [`ForgetTimer`].
    pub fn with_rule(mut self, rule: GagRule) -> Self {
        if rule.kind != GagKind::Forget {
            self.rules.push(rule);
        }
        self
    }

    pub fn rules(&self) -> &[GagRule] {
        &self.rules
    }

    pub fn config(&self) -> &GagConfig {
        &self.config
    }

    /// Roll every eligible rule once.
    pub fn roll(&self, context: &GagContext, dice: &impl Dice) -> Vec<Gag> {
        self.rules
            .iter()
            .filter(|rule| rule.guard.check(context))
            .filter(|rule| dice.chance(rule.probability))
            .filter_map(|rule| self.materialize(rule.kind, dice))
            .collect()
    }

    fn materialize(&self, kind: GagKind, dice: &impl Dice) -> Option<Gag> {
        let gag = match kind {
            GagKind::Forget => return None,
            GagKind::Thinking => Gag::Thinking {
                pause_ms: dice.between(self.config.thinking_min_ms, self.config.thinking_max_ms),
            },
            GagKind::Confusion => Gag::Confused {
                guess: dice.between(1, u64::from(self.config.confusion_max_guess.max(1))) as u32,
            },
            GagKind::Gibberish => {
                if self.config.gibberish.is_empty() {
                    return None;
                }
                let i = dice.pick(self.config.gibberish.len());
                Gag::Gibberish {
                    message: self.config.gibberish[i].clone(),
                }
            }
            GagKind::RickRoll => Gag::RickRoll,
        };
        Some(gag)
    }
}

/// Periodic coin flip that throws progress away.
///
/// Polled only on frames with hands. At most one flip per interval; the
/// first poll just starts the clock.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForgetTimer {
    probability: f64,
    interval_ms: u64,
    last_check: Option<DateTime<Utc>>,
}

impl ForgetTimer {
    pub fn new(probability: f64, interval: Duration) -> Self {
        Self {
            probability,
            interval_ms: interval.as_millis() as u64,
            last_check: None,
        }
    }

    pub fn from_config(config: &GagConfig) -> Self {
        let probability = if config.enabled {
            config.forget_probability
        } else {
            0.0
        };
        Self::new(probability, Duration::from_millis(config.forget_interval_ms))
    }

    /// Start the clock unless it is already running.
    pub fn arm(&mut self, now: DateTime<Utc>) {
        self.last_check.get_or_insert(now);
    }

    /// Whether to forget on this frame.
    pub fn poll(&mut self, now: DateTime<Utc>, dice: &impl Dice) -> bool {
        let Some(last) = self.last_check else {
            self.last_check = Some(now);
            return false;
        };
        let elapsed = now.signed_duration_since(last).num_milliseconds();
        if elapsed <= self.interval_ms as i64 {
            return false;
        }
        self.last_check = Some(now);
        dice.chance(self.probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Dice that always says yes and returns the low end of ranges.
    struct Yes;

    impl Dice for Yes {
        fn chance(&self, probability: f64) -> bool {
            probability > 0.0
        }
        fn pick(&self, _len: usize) -> usize {
            0
        }
        fn between(&self, low: u64, _high: u64) -> u64 {
            low
        }
    }

    /// Dice that counts how often it was asked.
    struct Counting(Cell<u32>);

    impl Dice for Counting {
        fn chance(&self, _probability: f64) -> bool {
            self.0.set(self.0.get() + 1);
            false
        }
        fn pick(&self, _len: usize) -> usize {
            0
        }
        fn between(&self, low: u64, _high: u64) -> u64 {
            low
        }
    }

    fn ctx() -> GagContext {
        GagContext {
            hands: 1,
            ..GagContext::default()
        }
    }

    #[test]
    fn only_eligible_rules_fire() {
        let table = GagTable::from_config(&GagConfig::default());

        let gags = table.roll(&ctx(), &Yes);
        assert_eq!(
            gags,
            vec![Gag::Gibberish {
                message: "Is that a hand?".to_string()
            }]
        );
    }

    #[test]
    fn matched_accepted_complete_frame_fires_everything() {
        let table = GagTable::from_config(&GagConfig::default());
        let context = GagContext {
            hands: 2,
            matched: true,
            accepted: true,
            complete: true,
            animation_ready: true,
        };

        let kinds: Vec<GagKind> = table.roll(&context, &Yes).iter().map(Gag::kind).collect();
        assert_eq!(
            kinds,
            vec![
                GagKind::Thinking,
                GagKind::Confusion,
                GagKind::Gibberish,
                GagKind::RickRoll
            ]
        );
    }

    #[test]
    fn rickroll_needs_animation() {
        let table = GagTable::from_config(&GagConfig::default());
        let context = GagContext {
            hands: 1,
            complete: true,
            ..GagContext::default()
        };

        let gags = table.roll(&context, &Yes);
        assert!(gags.iter().all(|g| g.kind() != GagKind::RickRoll));
    }

    #[test]
    fn guards_are_checked_before_dice() {
        let table = GagTable::from_config(&GagConfig::default());
        let dice = Counting(Cell::new(0));

        table.roll(&GagContext::default(), &dice);
        assert_eq!(dice.0.get(), 0);

        table.roll(&ctx(), &dice);
        assert_eq!(dice.0.get(), 1);
    }

    #[test]
    fn disabled_config_has_no_rules() {
        let table = GagTable::from_config(&GagConfig::disabled());
        assert!(table.rules().is_empty());
        assert!(GagTable::silent().roll(&ctx(), &Yes).is_empty());
    }

    #[test]
    fn custom_rule_is_appended() {
        let table = GagTable::silent().with_rule(GagRule::new(
            GagKind::Confusion,
            1.0,
            Guard::always(),
        ));
        assert_eq!(
            table.roll(&GagContext::default(), &Yes),
            vec![Gag::Confused { guess: 1 }]
        );

        let ignored = GagTable::silent().with_rule(GagRule::new(
            GagKind::Forget,
            1.0,
            Guard::always(),
        ));
        assert!(ignored.rules().is_empty());
    }

    #[test]
    fn empty_gibberish_list_never_fires() {
        let config = GagConfig {
            gibberish: Vec::new(),
            ..GagConfig::default()
        };
        let table = GagTable::from_config(&config);
        assert!(table.roll(&ctx(), &Yes).is_empty());
    }

    #[test]
    fn gag_captions_and_pause() {
        assert_eq!(Gag::Forgot.caption(), "FORGOT! Restarting...");
        assert_eq!(
            Gag::Confused { guess: 7 }.caption(),
            "Wait... is that 7? I'm confused!"
        );
        assert_eq!(
            Gag::Thinking { pause_ms: 750 }.pause(),
            Some(Duration::from_millis(750))
        );
        assert_eq!(Gag::RickRoll.pause(), None);
    }

    #[test]
    fn forget_timer_waits_for_interval() {
        let mut timer = ForgetTimer::new(1.0, Duration::from_secs(1));
        let t0 = Utc::now();

        assert!(!timer.poll(t0, &Yes));
        assert!(!timer.poll(t0 + chrono::Duration::milliseconds(500), &Yes));
        assert!(!timer.poll(t0 + chrono::Duration::milliseconds(1000), &Yes));
        assert!(timer.poll(t0 + chrono::Duration::milliseconds(1001), &Yes));
        assert!(!timer.poll(t0 + chrono::Duration::milliseconds(1500), &Yes));
    }

    #[test]
    fn forget_timer_restarts_clock_on_losing_flip() {
        let mut timer = ForgetTimer::new(0.0, Duration::from_secs(1));
        let t0 = Utc::now();
        timer.poll(t0, &Yes);

        assert!(!timer.poll(t0 + chrono::Duration::seconds(2), &Yes));
        assert_eq!(timer.last_check, Some(t0 + chrono::Duration::seconds(2)));
    }

    #[test]
    fn armed_timer_counts_from_arming() {
        let mut timer = ForgetTimer::new(1.0, Duration::from_secs(1));
        let t0 = Utc::now();
        timer.arm(t0);
        timer.arm(t0 + chrono::Duration::milliseconds(800));

        assert_eq!(timer.last_check, Some(t0));
        assert!(timer.poll(t0 + chrono::Duration::milliseconds(1100), &Yes));
    }

    #[test]
    fn disabled_config_never_forgets() {
        let mut timer = ForgetTimer::from_config(&GagConfig::disabled());
        let t0 = Utc::now();
        timer.poll(t0, &Yes);
        assert!(!timer.poll(t0 + chrono::Duration::seconds(5), &Yes));
    }
}
