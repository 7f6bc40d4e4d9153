//! The remote events API, as seen by the pages.
//!
//! Transport is not modelled here: pages only depend on the [`EventsApi`]
//! trait. [`InMemoryApi`] implements it for tests and the demo binary.

use crate::types::{Attendance, EventData, EventDraft, EventId, User, UserId};
use std::fmt;
use std::future::Future;
use thiserror::Error;

pub mod memory;

pub use memory::{InMemoryApi, Seed, SeedError};

/// Result type alias for API calls.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by the events API.
///
/// Pages never branch on the variant; the message is what ends up on screen.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The requested record does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The caller may not perform this operation.
    #[error("permission denied")]
    PermissionDenied,

    /// The API could not be reached or failed internally.
    #[error("{0}")]
    Unavailable(String),

    /// The request was rejected as malformed.
    #[error("invalid request: {0}")]
    Invalid(String),
}

/// One API operation, used to count calls and inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `fetch_events`
    Events,
    /// `fetch_event`
    Event,
    /// `fetch_attendees`
    Attendees,
    /// `fetch_users`
    Users,
    /// `fetch_user_events`
    UserEvents,
    /// `create_event`
    CreateEvent,
    /// `update_event`
    UpdateEvent,
    /// `delete_event`
    DeleteEvent,
    /// `add_attendee`
    AddAttendee,
    /// `remove_attendee`
    RemoveAttendee,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Events => "fetch_events",
            Self::Event => "fetch_event",
            Self::Attendees => "fetch_attendees",
            Self::Users => "fetch_users",
            Self::UserEvents => "fetch_user_events",
            Self::CreateEvent => "create_event",
            Self::UpdateEvent => "update_event",
            Self::DeleteEvent => "delete_event",
            Self::AddAttendee => "add_attendee",
            Self::RemoveAttendee => "remove_attendee",
        };
        f.write_str(name)
    }
}

/// Events API.
///
/// Every call is a single attempt; retries are not the API's concern.
pub trait EventsApi: Send + Sync {
    /// List all events.
    ///
    /// # Errors
    ///
    /// Returns error if the API is unavailable.
    fn fetch_events(&self) -> impl Future<Output = Result<Vec<EventData>>> + Send;

    /// Get one event.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the event does not exist.
    fn fetch_event(&self, id: EventId) -> impl Future<Output = Result<EventData>> + Send;

    /// List the users attending an event.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the event does not exist.
    fn fetch_attendees(&self, id: EventId) -> impl Future<Output = Result<Vec<User>>> + Send;

    /// List every user (the directory shown when adding attendees).
    ///
    /// # Errors
    ///
    /// Returns error if the API is unavailable.
    fn fetch_users(&self) -> impl Future<Output = Result<Vec<User>>> + Send;

    /// List the events a user attends.
    ///
    /// # Errors
    ///
    /// Returns error if the API is unavailable.
    fn fetch_user_events(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<EventData>>> + Send;

    /// Create an event owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Invalid`] if the draft has no name.
    fn create_event(
        &self,
        owner_id: UserId,
        draft: EventDraft,
    ) -> impl Future<Output = Result<EventData>> + Send;

    /// Replace the editable fields of an event.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the event does not exist.
    fn update_event(
        &self,
        id: EventId,
        draft: EventDraft,
    ) -> impl Future<Output = Result<EventData>> + Send;

    /// Delete an event and its attendance records.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the event does not exist.
    fn delete_event(&self, id: EventId) -> impl Future<Output = Result<()>> + Send;

    /// Add a user to an event.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the event or user does not exist.
    fn add_attendee(&self, attendance: Attendance) -> impl Future<Output = Result<()>> + Send;

    /// Remove a user from an event.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the user does not attend the event.
    fn remove_attendee(&self, attendance: Attendance)
    -> impl Future<Output = Result<()>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(ApiError::PermissionDenied.to_string(), "permission denied");
        assert_eq!(ApiError::Unavailable("network down".into()).to_string(), "network down");
        assert_eq!(ApiError::NotFound("event 9".into()).to_string(), "event 9 not found");
    }

    #[test]
    fn endpoint_names_match_methods() {
        assert_eq!(Endpoint::RemoveAttendee.to_string(), "remove_attendee");
    }
}
