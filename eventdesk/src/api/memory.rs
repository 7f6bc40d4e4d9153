//! In-memory [`EventsApi`] for tests and the demo binary.
//!
//! Besides storing data it records how often each endpoint was called and
//! lets tests queue failures and latency per endpoint.

use super::{ApiError, Endpoint, EventsApi, Result};
use crate::types::{Attendance, EventData, EventDraft, EventId, User, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;

/// Initial contents of an [`InMemoryApi`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    /// Users in the directory
    #[serde(default)]
    pub users: Vec<User>,
    /// Events
    #[serde(default)]
    pub events: Vec<EventData>,
    /// Who attends what
    #[serde(default)]
    pub attendance: Vec<Attendance>,
}

/// Errors loading a [`Seed`].
#[derive(Debug, Error)]
pub enum SeedError {
    /// The seed file could not be read.
    #[error("failed to read seed file {path}: {source}")]
    Io {
        /// Path that was read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The seed is not valid JSON for a [`Seed`].
    #[error("invalid seed: {0}")]
    Json(#[from] serde_json::Error),
}

impl Seed {
    /// Parse a seed from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Json`] if the document does not describe a seed.
    pub fn from_json(json: &str) -> std::result::Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a seed from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Io`] if the file cannot be read, or
    /// [`SeedError::Json`] if it is malformed.
    pub fn load(path: impl AsRef<Path>) -> std::result::Result<Self, SeedError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The bundled demo data set.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Json`] if the bundled file is malformed.
    pub fn demo() -> std::result::Result<Self, SeedError> {
        Self::from_json(include_str!("../../data/seed.json"))
    }
}

#[derive(Debug, Default)]
struct Db {
    users: BTreeMap<UserId, User>,
    events: BTreeMap<EventId, EventData>,
    attendance: BTreeSet<(EventId, UserId)>,
    next_event_id: u64,
}

impl Db {
    fn event(&self, id: EventId) -> Result<&EventData> {
        self.events
            .get(&id)
            .ok_or_else(|| ApiError::NotFound(format!("event {id}")))
    }
}

#[derive(Debug, Default)]
struct Inner {
    db: Db,
    calls: HashMap<Endpoint, usize>,
    failures: HashMap<Endpoint, VecDeque<ApiError>>,
    latency: HashMap<Endpoint, Duration>,
}

/// In-memory events API.
///
/// Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryApi {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryApi {
    /// An empty API.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An API pre-filled from `seed`.
    #[must_use]
    pub fn from_seed(seed: Seed) -> Self {
        let mut db = Db::default();
        for user in seed.users {
            db.users.insert(user.id, user);
        }
        for event in seed.events {
            db.next_event_id = db.next_event_id.max(event.id.value());
            db.events.insert(event.id, event);
        }
        for Attendance { event_id, user_id } in seed.attendance {
            db.attendance.insert((event_id, user_id));
        }

        Self {
            inner: Arc::new(Mutex::new(Inner {
                db,
                ..Inner::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock(&self.inner)
    }

    /// How many times `endpoint` has been called.
    #[must_use]
    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.lock().calls.get(&endpoint).copied().unwrap_or(0)
    }

    /// Make the next call to `endpoint` fail with `error`.
    ///
    /// Failures queue up: calling this twice fails the next two calls.
    pub fn fail_next(&self, endpoint: Endpoint, error: ApiError) {
        self.lock()
            .failures
            .entry(endpoint)
            .or_default()
            .push_back(error);
    }

    /// Delay every call to `endpoint` by `latency`.
    pub fn set_latency(&self, endpoint: Endpoint, latency: Duration) {
        self.lock().latency.insert(endpoint, latency);
    }

    fn call<T, F>(&self, endpoint: Endpoint, op: F) -> impl Future<Output = Result<T>> + Send + use<T, F>
    where
        T: Send,
        F: FnOnce(&mut Db) -> Result<T> + Send,
    {
        let inner = Arc::clone(&self.inner);
        async move {
            let (failure, latency) = {
                let mut guard = lock(&inner);
                *guard.calls.entry(endpoint).or_default() += 1;
                let failure = guard
                    .failures
                    .get_mut(&endpoint)
                    .and_then(VecDeque::pop_front);
                (failure, guard.latency.get(&endpoint).copied())
            };
            tracing::trace!(%endpoint, "API call");

            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            if let Some(error) = failure {
                tracing::debug!(%endpoint, %error, "Injected failure");
                return Err(error);
            }

            let mut guard = lock(&inner);
            op(&mut guard.db)
        }
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl EventsApi for InMemoryApi {
    fn fetch_events(&self) -> impl Future<Output = Result<Vec<EventData>>> + Send {
        self.call(Endpoint::Events, |db| Ok(db.events.values().cloned().collect::<Vec<_>>()))
    }

    fn fetch_event(&self, id: EventId) -> impl Future<Output = Result<EventData>> + Send {
        self.call(Endpoint::Event, move |db| db.event(id).cloned())
    }

    fn fetch_attendees(&self, id: EventId) -> impl Future<Output = Result<Vec<User>>> + Send {
        self.call(Endpoint::Attendees, move |db| {
            db.event(id)?;
            Ok(db
                .attendance
                .range((id, UserId::new(0))..=(id, UserId::new(u64::MAX)))
                .filter_map(|(_, user_id)| db.users.get(user_id).cloned())
                .collect::<Vec<_>>())
        })
    }

    fn fetch_users(&self) -> impl Future<Output = Result<Vec<User>>> + Send {
        self.call(Endpoint::Users, |db| Ok(db.users.values().cloned().collect::<Vec<_>>()))
    }

    fn fetch_user_events(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<EventData>>> + Send {
        self.call(Endpoint::UserEvents, move |db| {
            Ok(db
                .attendance
                .iter()
                .filter(|(_, attendee)| *attendee == user_id)
                .filter_map(|(event_id, _)| db.events.get(event_id).cloned())
                .collect::<Vec<_>>())
        })
    }

    fn create_event(
        &self,
        owner_id: UserId,
        draft: EventDraft,
    ) -> impl Future<Output = Result<EventData>> + Send {
        self.call(Endpoint::CreateEvent, move |db| {
            validate(&draft)?;
            db.next_event_id += 1;
            let event = EventData {
                id: EventId::new(db.next_event_id),
                name: draft.name,
                description: draft.description,
                date: draft.date,
                location: draft.location,
                owner_id,
            };
            db.events.insert(event.id, event.clone());
            Ok(event)
        })
    }

    fn update_event(
        &self,
        id: EventId,
        draft: EventDraft,
    ) -> impl Future<Output = Result<EventData>> + Send {
        self.call(Endpoint::UpdateEvent, move |db| {
            validate(&draft)?;
            let event = db
                .events
                .get_mut(&id)
                .ok_or_else(|| ApiError::NotFound(format!("event {id}")))?;
            event.name = draft.name;
            event.description = draft.description;
            event.date = draft.date;
            event.location = draft.location;
            Ok(event.clone())
        })
    }

    fn delete_event(&self, id: EventId) -> impl Future<Output = Result<()>> + Send {
        self.call(Endpoint::DeleteEvent, move |db| {
            db.events
                .remove(&id)
                .ok_or_else(|| ApiError::NotFound(format!("event {id}")))?;
            db.attendance.retain(|(event_id, _)| *event_id != id);
            Ok(())
        })
    }

    fn add_attendee(&self, attendance: Attendance) -> impl Future<Output = Result<()>> + Send {
        self.call(Endpoint::AddAttendee, move |db| {
            let Attendance { event_id, user_id } = attendance;
            db.event(event_id)?;
            if !db.users.contains_key(&user_id) {
                return Err(ApiError::NotFound(format!("user {user_id}")));
            }
            if !db.attendance.insert((event_id, user_id)) {
                return Err(ApiError::Invalid(format!(
                    "user {user_id} already attends event {event_id}"
                )));
            }
            Ok(())
        })
    }

    fn remove_attendee(
        &self,
        attendance: Attendance,
    ) -> impl Future<Output = Result<()>> + Send {
        self.call(Endpoint::RemoveAttendee, move |db| {
            let Attendance { event_id, user_id } = attendance;
            if db.attendance.remove(&(event_id, user_id)) {
                Ok(())
            } else {
                Err(ApiError::NotFound(format!(
                    "user {user_id} attending event {event_id}"
                )))
            }
        })
    }
}

fn validate(draft: &EventDraft) -> Result<()> {
    if draft.name.trim().is_empty() {
        return Err(ApiError::Invalid("event name is required".into()));
    }
    Ok(())
}
