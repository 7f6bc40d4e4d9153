//! Request generations for stale-response suppression.
//!
//! Every request issued by a fetch or action slot is tagged with the slot's
//! next [`Generation`]. When the result comes back it is committed only if its
//! tag still equals the slot's current generation; anything older was
//! superseded while in flight and is dropped.

use std::fmt;

/// Monotonically increasing request counter, scoped to one slot.
///
/// # Examples
///
/// ```
/// use loadable_core::Generation;
///
/// let first = Generation::INITIAL.next();
/// let second = first.next();
/// assert!(!first.is_initial());
/// assert!(second > first);
/// assert_eq!(second.to_string(), "gen-2");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// The generation of a slot that has never issued a request.
    pub const INITIAL: Self = Self(0);

    /// Create a `Generation` with the given value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw counter value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Get the next generation (current + 1).
    ///
    /// Uses wrapping arithmetic; a single slot issuing `u64::MAX` requests is
    /// not a realistic concern.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Check if this slot has never issued a request.
    #[must_use]
    pub const fn is_initial(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}
