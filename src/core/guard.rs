//! Guard predicates.
//!
//! A guard is a pure boolean function over some context value. The gag
//! layer uses guards to decide whether a trigger is even eligible on a
//! given frame before it rolls any dice.

use std::fmt;
use std::sync::Arc;

/// Pure, thread-safe predicate over a context `C`.
///
/// Guards are cheap to clone; clones share the same predicate.
///
/// # Example
///
/// ```rust
/// use fumble::core::Guard;
///
/// let even = Guard::new(|n: &u8| n % 2 == 0);
///
/// assert!(even.check(&4));
/// assert!(!even.check(&3));
/// ```
pub struct Guard<C> {
    predicate: Arc<dyn Fn(&C) -> bool + Send + Sync>,
}

impl<C> Guard<C> {
    /// Create a guard from a pure predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// A guard that always passes.
    pub fn always() -> Self
    where
        C: 'static,
    {
        Self::new(|_| true)
    }

    /// Evaluate the predicate.
    pub fn check(&self, context: &C) -> bool {
        (self.predicate)(context)
    }

    /// A guard passing only when both `self` and `other` pass.
    pub fn and(self, other: Guard<C>) -> Self
    where
        C: 'static,
    {
        Self::new(move |ctx| self.check(ctx) && other.check(ctx))
    }
}

impl<C> Clone for Guard<C> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<C> fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Ctx {
        hands: usize,
        complete: bool,
    }

    #[test]
    fn guard_checks_context() {
        let guard = Guard::new(|c: &Ctx| c.hands > 0);

        assert!(guard.check(&Ctx {
            hands: 1,
            complete: false
        }));
        assert!(!guard.check(&Ctx {
            hands: 0,
            complete: false
        }));
    }

    #[test]
    fn always_passes() {
        let guard: Guard<Ctx> = Guard::always();
        assert!(guard.check(&Ctx {
            hands: 0,
            complete: false
        }));
    }

    #[test]
    fn and_requires_both() {
        let guard = Guard::new(|c: &Ctx| c.hands > 0).and(Guard::new(|c: &Ctx| c.complete));

        assert!(guard.check(&Ctx {
            hands: 2,
            complete: true
        }));
        assert!(!guard.check(&Ctx {
            hands: 2,
            complete: false
        }));
        assert!(!guard.check(&Ctx {
            hands: 0,
            complete: true
        }));
    }

    #[test]
    fn clones_share_predicate() {
        let guard = Guard::new(|n: &u8| *n > 3);
        let cloned = guard.clone();

        assert_eq!(guard.check(&5), cloned.check(&5));
        assert_eq!(guard.check(&1), cloned.check(&1));
    }
}
