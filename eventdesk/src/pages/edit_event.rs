//! Edit form for an existing event.
//!
//! The form is pre-filled from the loaded event. Saving goes back to the
//! event's details page; a failed save keeps the form so the user can retry.

use super::call_api;
use crate::api::EventsApi;
use crate::route::Route;
use crate::types::{AuthSession, EventData, EventDraft, EventId};
use loadable_core::action::{ActionEnvironment, ActionReducer, ActionState, RunAction};
use loadable_core::aggregate::first_error;
use loadable_core::composition::scope;
use loadable_core::effect::Effect;
use loadable_core::fetch::{FetchAction, FetchEnvironment, FetchReducer, FetchState};
use loadable_core::reducer::Reducer;
use loadable_core::{AsyncError, SmallVec, smallvec};
use serde::Serialize;
use std::sync::Arc;

/// Label of a failed save.
pub const UPDATE_EVENT_FAILED: &str = "Failed to update event";

/// State of the edit page.
#[derive(Debug, Clone, Default)]
pub struct EditEventState {
    /// The event being edited
    pub event: FetchState<EventId, EventData>,
    /// Save the edited fields
    pub update_event: ActionState,
    /// Event the latest save was submitted for
    pub submitted: Option<EventId>,
    /// Who is signed in
    pub auth: Option<AuthSession>,
    /// Where the page asked to go, for the router
    pub navigation: Option<Route>,
}

impl EditEventState {
    /// A page that has not been mounted yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the owner may edit, and only once the event is loaded.
    #[must_use]
    pub fn can_edit(&self) -> bool {
        match (self.auth, self.event.data()) {
            (Some(auth), Some(event)) => auth.user_id == event.owner_id,
            _ => false,
        }
    }

    /// The single error to display.
    #[must_use]
    pub fn error(&self) -> Option<&AsyncError> {
        first_error([self.event.error(), self.update_event.error()])
    }

    /// Snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> EditEventView {
        EditEventView {
            loading: self.event.loading(),
            draft: self.event.data().map(EventDraft::from),
            can_edit: self.can_edit(),
            saving: self.update_event.running(),
            error: self.error().map(ToString::to_string),
        }
    }
}

/// What a renderer needs to draw the edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditEventView {
    /// The event is loading
    pub loading: bool,
    /// Initial form values
    pub draft: Option<EventDraft>,
    /// Enable the save button
    pub can_edit: bool,
    /// A save is in flight
    pub saving: bool,
    /// Aggregated error message
    pub error: Option<String>,
}

/// Actions of the edit page.
#[derive(Debug, Clone)]
pub enum EditEventAction {
    /// The page was shown, or its event id changed
    Mount {
        /// Event to edit
        event_id: EventId,
        /// Who is signed in
        auth: Option<AuthSession>,
    },
    /// Event slot
    Event(FetchAction<EventId, EventData>),
    /// Save slot
    Update(RunAction<(EventId, EventDraft)>),
    /// Save the form
    Submit(EventDraft),
    /// Leave without saving
    Cancel,
    /// Go somewhere else
    Navigate(Route),
}

/// Dependencies of the edit page.
#[derive(Debug, Clone)]
pub struct EditEventEnvironment {
    /// Loads the event
    pub event: FetchEnvironment<EventId, EventData>,
    /// Saves the edited fields
    pub update_event: ActionEnvironment<(EventId, EventDraft)>,
}

impl EditEventEnvironment {
    /// Environment backed by `api`.
    pub fn live<A>(api: &Arc<A>) -> Self
    where
        A: EventsApi + 'static,
    {
        let event = {
            let api = Arc::clone(api);
            FetchEnvironment::new(move |id: &EventId| {
                let id = *id;
                call_api(&api, move |api| async move { api.fetch_event(id).await })
            })
        };
        let update_event = {
            let api = Arc::clone(api);
            ActionEnvironment::new(
                move |(id, draft): (EventId, EventDraft)| {
                    call_api(&api, move |api| async move { api.update_event(id, draft).await })
                },
                UPDATE_EVENT_FAILED,
            )
        };
        Self {
            event,
            update_event,
        }
    }
}

/// Reducer of the edit page.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditEventReducer;

impl Reducer for EditEventReducer {
    type State = EditEventState;
    type Action = EditEventAction;
    type Environment = EditEventEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            EditEventAction::Mount { event_id, auth } => {
                state.auth = auth;
                scope(
                    &FetchReducer::new(),
                    &mut state.event,
                    FetchAction::Load(event_id),
                    &env.event,
                    EditEventAction::Event,
                )
            },
            EditEventAction::Event(action) => scope(
                &FetchReducer::new(),
                &mut state.event,
                action,
                &env.event,
                EditEventAction::Event,
            ),
            EditEventAction::Update(action) => {
                // The slot may have moved to another event while saving
                let saved = if action.succeeded() {
                    state.submitted
                } else {
                    None
                };
                let mut effects = scope(
                    &ActionReducer::new(),
                    &mut state.update_event,
                    action,
                    &env.update_event,
                    EditEventAction::Update,
                );
                if let Some(id) = saved {
                    effects.push(Effect::send(EditEventAction::Navigate(Route::EventDetails(id))));
                }
                effects
            },
            EditEventAction::Submit(draft) => {
                if !state.can_edit() {
                    tracing::debug!("Save requested without edit rights, ignored");
                    return SmallVec::new();
                }
                let Some(id) = state.event.key().copied() else {
                    return SmallVec::new();
                };
                state.submitted = Some(id);
                scope(
                    &ActionReducer::new(),
                    &mut state.update_event,
                    RunAction::Run((id, draft)),
                    &env.update_event,
                    EditEventAction::Update,
                )
            },
            EditEventAction::Cancel => match state.event.key().copied() {
                Some(id) => smallvec![Effect::send(EditEventAction::Navigate(Route::EventDetails(id)))],
                None => SmallVec::new(),
            },
            EditEventAction::Navigate(route) => {
                tracing::info!(%route, "Navigating");
                state.navigation = Some(route);
                SmallVec::new()
            },
        }
    }
}
