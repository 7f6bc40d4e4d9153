//! Events list page: every event, plus a form to create one.

use super::call_api;
use crate::api::EventsApi;
use crate::types::{AuthSession, EventData, EventDraft, UserId};
use loadable_core::action::{ActionEnvironment, ActionReducer, ActionState, RunAction};
use loadable_core::aggregate::first_error;
use loadable_core::composition::scope;
use loadable_core::effect::Effect;
use loadable_core::fetch::{FetchAction, FetchEnvironment, FetchReducer, FetchState};
use loadable_core::reducer::Reducer;
use loadable_core::{AsyncError, SmallVec};
use serde::Serialize;
use std::sync::Arc;

/// Label of a failed create.
pub const CREATE_EVENT_FAILED: &str = "Failed to create event";

/// State of the events list page.
#[derive(Debug, Clone, Default)]
pub struct EventsState {
    /// All events; the list has no dependency so its key is `()`
    pub events: FetchState<(), Vec<EventData>>,
    /// Create an event
    pub create_event: ActionState,
    /// Who is signed in
    pub auth: Option<AuthSession>,
    /// Add-event form is shown
    pub add_event_open: bool,
}

impl EventsState {
    /// A page that has not been mounted yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The single error to display.
    #[must_use]
    pub fn error(&self) -> Option<&AsyncError> {
        first_error([self.events.error(), self.create_event.error()])
    }

    /// Snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> EventsView {
        EventsView {
            loading: self.events.loading(),
            events: self.events.data().cloned().unwrap_or_default(),
            can_create: self.auth.is_some(),
            add_event_open: self.add_event_open,
            creating: self.create_event.running(),
            error: self.error().map(ToString::to_string),
        }
    }
}

/// What a renderer needs to draw the events list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsView {
    /// The list is (re)loading
    pub loading: bool,
    /// Events, empty until loaded
    pub events: Vec<EventData>,
    /// Show the "add event" button
    pub can_create: bool,
    /// Add-event form is shown
    pub add_event_open: bool,
    /// A create is in flight
    pub creating: bool,
    /// Aggregated error message
    pub error: Option<String>,
}

/// Actions of the events list page.
#[derive(Debug, Clone)]
pub enum EventsAction {
    /// The page was shown
    Mount {
        /// Who is signed in
        auth: Option<AuthSession>,
    },
    /// The user signed in or out
    AuthChanged(Option<AuthSession>),
    /// Events slot
    Events(FetchAction<(), Vec<EventData>>),
    /// Create slot
    Create(RunAction<(UserId, EventDraft)>),
    /// Show the add-event form
    OpenAddEvent,
    /// Hide the add-event form
    CloseAddEvent,
    /// Create an event from the form
    SubmitEvent(EventDraft),
    /// Reload the list
    Refresh,
}

/// Dependencies of the events list page.
#[derive(Debug, Clone)]
pub struct EventsEnvironment {
    /// Loads the list
    pub events: FetchEnvironment<(), Vec<EventData>>,
    /// Creates an event owned by the given user
    pub create_event: ActionEnvironment<(UserId, EventDraft)>,
}

impl EventsEnvironment {
    /// Environment backed by `api`.
    pub fn live<A>(api: &Arc<A>) -> Self
    where
        A: EventsApi + 'static,
    {
        let events = {
            let api = Arc::clone(api);
            FetchEnvironment::new(move |_: &()| {
                call_api(&api, |api| async move { api.fetch_events().await })
            })
        };
        let create_event = {
            let api = Arc::clone(api);
            ActionEnvironment::new(
                move |(owner, draft): (UserId, EventDraft)| {
                    call_api(&api, move |api| async move {
                        api.create_event(owner, draft).await
                    })
                },
                CREATE_EVENT_FAILED,
            )
        };
        Self {
            events,
            create_event,
        }
    }
}

/// Reducer of the events list page.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventsReducer;

impl Reducer for EventsReducer {
    type State = EventsState;
    type Action = EventsAction;
    type Environment = EventsEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            EventsAction::Mount { auth } => {
                state.auth = auth;
                scope(
                    &FetchReducer::new(),
                    &mut state.events,
                    FetchAction::Load(()),
                    &env.events,
                    EventsAction::Events,
                )
            },
            EventsAction::AuthChanged(auth) => {
                state.auth = auth;
                if auth.is_none() {
                    state.add_event_open = false;
                }
                SmallVec::new()
            },
            EventsAction::Events(action) => scope(
                &FetchReducer::new(),
                &mut state.events,
                action,
                &env.events,
                EventsAction::Events,
            ),
            EventsAction::Create(action) => {
                let succeeded = action.succeeded();
                let mut effects = scope(
                    &ActionReducer::new(),
                    &mut state.create_event,
                    action,
                    &env.create_event,
                    EventsAction::Create,
                );
                if succeeded {
                    state.add_event_open = false;
                    effects.push(Effect::send(EventsAction::Events(FetchAction::Refetch)));
                }
                effects
            },
            EventsAction::OpenAddEvent => {
                state.add_event_open = state.auth.is_some();
                SmallVec::new()
            },
            EventsAction::CloseAddEvent => {
                state.add_event_open = false;
                SmallVec::new()
            },
            EventsAction::SubmitEvent(draft) => {
                let Some(auth) = state.auth else {
                    tracing::debug!("Create requested while signed out, ignored");
                    return SmallVec::new();
                };
                scope(
                    &ActionReducer::new(),
                    &mut state.create_event,
                    RunAction::Run((auth.user_id, draft)),
                    &env.create_event,
                    EventsAction::Create,
                )
            },
            EventsAction::Refresh => scope(
                &FetchReducer::new(),
                &mut state.events,
                FetchAction::Refetch,
                &env.events,
                EventsAction::Events,
            ),
        }
    }
}
