//! Navigation targets.
//!
//! Pages do not navigate themselves; they record the route they want to go
//! to and the (external) router picks it up.

use crate::types::EventId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A screen of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    /// All events
    Events,
    /// One event with its attendees
    EventDetails(EventId),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Events => f.write_str("/events"),
            Self::EventDetails(id) => write!(f, "/events/{id}"),
        }
    }
}
