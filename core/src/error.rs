//! Error types surfaced by fetch and action slots.
//!
//! Exactly two kinds of failure reach page state:
//!
//! - **Fetch failure**: a read producer failed. Displayed verbatim.
//! - **Action failure**: a write operation failed. Displayed as
//!   `"<label>: <cause>"`, where the label is fixed by the page
//!   (e.g. `"Failed to remove attendee"`).
//!
//! Neither kind distinguishes network, authorization, or validation problems;
//! that detail stays inside the underlying error, which is kept as-is.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Boxed error returned by producers and operations.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// The underlying cause of a failed request, shared so page state stays `Clone`.
///
/// # Examples
///
/// ```
/// use loadable_core::Failure;
///
/// let failure = Failure::new("network down");
/// assert_eq!(failure.to_string(), "network down");
/// ```
#[derive(Clone)]
pub struct Failure(Arc<dyn StdError + Send + Sync + 'static>);

impl Failure {
    /// Wrap any error (or a plain message) as a failure.
    pub fn new(error: impl Into<BoxError>) -> Self {
        Self(Arc::from(error.into()))
    }

    /// Attempt to view the original error as a concrete type.
    #[must_use]
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Failure").field(&self.0.to_string()).finish()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl StdError for Failure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<BoxError> for Failure {
    fn from(error: BoxError) -> Self {
        Self(Arc::from(error))
    }
}

/// Error held in a fetch or action slot.
#[derive(Error, Debug, Clone)]
pub enum AsyncError {
    /// A read producer failed
    #[error("{0}")]
    Fetch(Failure),

    /// A write operation failed, annotated with the page's label
    #[error("{label}: {cause}")]
    Action {
        /// Fixed human-readable label, e.g. "Failed to delete event"
        label: Arc<str>,
        /// The underlying failure
        cause: Failure,
    },
}

impl AsyncError {
    /// Build a fetch failure.
    pub fn fetch(cause: impl Into<Failure>) -> Self {
        Self::Fetch(cause.into())
    }

    /// Build a labelled action failure.
    pub fn action(label: impl Into<Arc<str>>, cause: impl Into<Failure>) -> Self {
        Self::Action {
            label: label.into(),
            cause: cause.into(),
        }
    }

    /// The underlying failure, for either kind.
    #[must_use]
    pub const fn cause(&self) -> &Failure {
        match self {
            Self::Fetch(cause) | Self::Action { cause, .. } => cause,
        }
    }

    /// The label of an action failure.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Fetch(_) => None,
            Self::Action { label, .. } => Some(&**label),
        }
    }

    /// Whether this came from a read producer.
    #[must_use]
    pub const fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}
