//! Builder API for sessions, and the `state_enum!` macro.
//!
//! The builder fails fast on the first bad setting. Use
//! [`Config::validate`](crate::config::Config::validate) to get every
//! problem with a configuration file at once.

pub mod error;
pub mod macros;
pub mod session;

pub use error::BuildError;
pub use session::SessionBuilder;

use crate::core::Resolution;
use crate::effects::Session;
use crate::gags::GagConfig;

/// A session with default confirmation settings and every gag switched off.
///
/// # Example
///
/// ```
/// use fumble::builder::sober_session;
/// use fumble::core::Resolution;
///
/// let session = sober_session(Resolution::new(640, 480)).unwrap();
/// assert!(session.gags().rules().is_empty());
/// ```
pub fn sober_session(capture: Resolution) -> Result<Session, BuildError> {
    SessionBuilder::new()
        .capture(capture)
        .gags(GagConfig::disabled())
        .build()
}
