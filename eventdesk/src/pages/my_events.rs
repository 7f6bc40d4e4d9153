//! Events the signed-in user attends.
//!
//! The list is keyed on the session: signing in or out re-runs it, and a
//! signed-out visitor gets an empty list without a request.

use super::call_api;
use crate::api::EventsApi;
use crate::types::{AuthSession, EventData, UserId, identity};
use loadable_core::composition::scope;
use loadable_core::effect::Effect;
use loadable_core::fetch::{FetchAction, FetchEnvironment, FetchReducer, FetchState, WhenSome};
use loadable_core::reducer::Reducer;
use loadable_core::SmallVec;
use serde::Serialize;
use std::sync::Arc;

/// State of the my-events page.
#[derive(Debug, Clone, Default)]
pub struct MyEventsState {
    /// Events attended by the signed-in user
    pub events: FetchState<Option<UserId>, Vec<EventData>>,
    /// Who is signed in
    pub auth: Option<AuthSession>,
}

impl MyEventsState {
    /// A page that has not been mounted yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> MyEventsView {
        MyEventsView {
            loading: self.events.loading(),
            signed_in: self.auth.is_some(),
            events: self.events.data().cloned().unwrap_or_default(),
            error: self.events.error().map(ToString::to_string),
        }
    }
}

/// What a renderer needs to draw the my-events page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyEventsView {
    /// The list is loading
    pub loading: bool,
    /// Someone is signed in
    pub signed_in: bool,
    /// Attended events
    pub events: Vec<EventData>,
    /// Error message
    pub error: Option<String>,
}

/// Actions of the my-events page.
#[derive(Debug, Clone)]
pub enum MyEventsAction {
    /// The page was shown
    Mount {
        /// Who is signed in
        auth: Option<AuthSession>,
    },
    /// The user signed in or out
    AuthChanged(Option<AuthSession>),
    /// Events slot
    Events(FetchAction<Option<UserId>, Vec<EventData>>),
    /// Reload the list
    Refresh,
}

/// Dependencies of the my-events page.
#[derive(Debug, Clone)]
pub struct MyEventsEnvironment {
    /// Loads the attended events
    pub events: FetchEnvironment<Option<UserId>, Vec<EventData>>,
}

impl MyEventsEnvironment {
    /// Environment backed by `api`.
    pub fn live<A>(api: &Arc<A>) -> Self
    where
        A: EventsApi + 'static,
    {
        let api = Arc::clone(api);
        let events = FetchEnvironment::new(WhenSome::new(move |user: &UserId| {
            let user = *user;
            call_api(&api, move |api| async move { api.fetch_user_events(user).await })
        }));
        Self { events }
    }
}

/// Reducer of the my-events page.
#[derive(Debug, Clone, Copy, Default)]
pub struct MyEventsReducer;

impl Reducer for MyEventsReducer {
    type State = MyEventsState;
    type Action = MyEventsAction;
    type Environment = MyEventsEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let action = match action {
            MyEventsAction::Mount { auth } | MyEventsAction::AuthChanged(auth) => {
                state.auth = auth;
                FetchAction::Load(identity(auth.as_ref()))
            },
            MyEventsAction::Events(action) => action,
            MyEventsAction::Refresh => FetchAction::Refetch,
        };
        scope(
            &FetchReducer::new(),
            &mut state.events,
            action,
            &env.events,
            MyEventsAction::Events,
        )
    }
}
