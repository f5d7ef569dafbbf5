//! Phase transition history.
//!
//! Every phase change of the confirmation machine is kept as an immutable
//! record. Webcam sessions run indefinitely, so a history may be bounded;
//! the oldest record is dropped once the limit is reached.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single phase change.
///
/// # Example
///
/// ```rust
/// use fumble::core::{State, StateTransition};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Door { Shut, Open }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Shut => "Shut",
///             Self::Open => "Open",
///         }
///     }
/// }
///
/// let transition = StateTransition {
///     from: Door::Shut,
///     to: Door::Open,
///     timestamp: Utc::now(),
///     frame: 12,
/// };
/// assert_eq!(transition.to.name(), "Open");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// Phase before the frame
    pub from: S,
    /// Phase after the frame
    pub to: S,
    /// When the frame was processed
    pub timestamp: DateTime<Utc>,
    /// Index of the frame that caused the change
    pub frame: u64,
}

/// Ordered, optionally bounded history of phase changes.
///
/// `record` returns a new history and leaves the original untouched.
///
/// # Example
///
/// ```rust
/// use fumble::core::{State, StateHistory, StateTransition};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Step { A, B, C }
///
/// impl State for Step {
///     fn name(&self) -> &str {
///         match self {
///             Self::A => "A",
///             Self::B => "B",
///             Self::C => "C",
///         }
///     }
/// }
///
/// let history = StateHistory::bounded(1);
/// let history = history.record(StateTransition {
///     from: Step::A, to: Step::B, timestamp: Utc::now(), frame: 0,
/// });
/// let history = history.record(StateTransition {
///     from: Step::B, to: Step::C, timestamp: Utc::now(), frame: 1,
/// });
///
/// assert_eq!(history.transitions().len(), 1);
/// assert_eq!(history.get_path(), vec![&Step::B, &Step::C]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
    limit: Option<usize>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create an empty, unbounded history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
            limit: None,
        }
    }

    /// Create an empty history that keeps at most `limit` records.
    /// A limit of zero is treated as one.
    pub fn bounded(limit: usize) -> Self {
        Self {
            transitions: Vec::new(),
            limit: Some(limit.max(1)),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        if let Some(limit) = self.limit {
            if transitions.len() >= limit {
                let excess = transitions.len() + 1 - limit;
                transitions.drain(..excess);
            }
        }
        transitions.push(transition);
        Self {
            transitions,
            limit: self.limit,
        }
    }

    /// Phases traversed: the first retained `from`, then every `to`.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Time between the first and last retained transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Retained transitions, oldest first.
    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    /// Most recent transition, if any.
    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.last()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}
