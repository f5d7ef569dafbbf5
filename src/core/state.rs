//! State trait shared by the phase enums of the crate.
//!
//! Phases are plain values; everything here is a pure inspection method so
//! the same value can be logged, recorded in history and serialized.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine phases.
///
/// Implementors are cheap value types. They must be serializable so that
/// transition histories can be written next to recordings and summaries.
///
/// # Example
///
/// ```rust
/// use fumble::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Lamp {
///     Off,
///     On,
///     Burnt,
/// }
///
/// impl State for Lamp {
///     fn name(&self) -> &str {
///         match self {
///             Self::Off => "Off",
///             Self::On => "On",
///             Self::Burnt => "Burnt",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Burnt)
///     }
/// }
///
/// assert!(Lamp::Burnt.is_final());
/// assert!(!Lamp::On.is_error());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Name used in logs and overlays.
    fn name(&self) -> &str;

    /// Terminal phase: nothing moves the machine on except an external reset.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Error phase. Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}
