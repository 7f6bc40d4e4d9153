//! Page-level error aggregation.
//!
//! A page owns several independent fetch and action slots but shows at most
//! one error at a time. The displayed error is the first non-`None` slot
//! error in a fixed priority order chosen by the page. Slots are never merged;
//! aggregation only reads them.

use crate::error::AsyncError;

/// Select the first error among `slots`, in iteration order.
///
/// # Examples
///
/// ```
/// use loadable_core::aggregate::first_error;
/// use loadable_core::{AsyncError, Failure};
///
/// let attendees = AsyncError::fetch(Failure::new("network down"));
/// let delete = AsyncError::action("Failed to delete event", Failure::new("denied"));
///
/// let shown = first_error([None, Some(&attendees), None, Some(&delete)]);
/// assert_eq!(shown.map(ToString::to_string).as_deref(), Some("network down"));
///
/// assert!(first_error([None, None]).is_none());
/// ```
pub fn first_error<'a, I>(slots: I) -> Option<&'a AsyncError>
where
    I: IntoIterator<Item = Option<&'a AsyncError>>,
{
    slots.into_iter().flatten().next()
}
