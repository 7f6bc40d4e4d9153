//! Event details page.
//!
//! Shows one event with its attendees and lets the owner add or remove
//! attendees and delete the event.
//!
//! Slots:
//!
//! | slot              | kind   | key / label                     |
//! |-------------------|--------|---------------------------------|
//! | `event`           | fetch  | event id                        |
//! | `attendees`       | fetch  | event id                        |
//! | `users`           | fetch  | signed-in user (gated)          |
//! | `delete_event`    | action | "Failed to delete event"        |
//! | `remove_attendee` | action | "Failed to remove attendee"     |
//! | `add_attendee`    | action | "Failed to add attendee"        |
//!
//! Adding or removing an attendee refetches the attendee list on success.
//! Deleting the event navigates back to the event list on success.

use super::call_api;
use crate::api::EventsApi;
use crate::route::Route;
use crate::types::{Attendance, AuthSession, EventData, EventId, User, UserId, identity};
use loadable_core::action::{ActionEnvironment, ActionReducer, ActionState, RunAction};
use loadable_core::aggregate::first_error;
use loadable_core::composition::scope;
use loadable_core::effect::Effect;
use loadable_core::fetch::{FetchAction, FetchEnvironment, FetchReducer, FetchState, Gated};
use loadable_core::reducer::Reducer;
use loadable_core::{AsyncError, SmallVec};
use serde::Serialize;
use std::sync::Arc;

/// Label of a failed delete.
pub const DELETE_EVENT_FAILED: &str = "Failed to delete event";
/// Label of a failed attendee removal.
pub const REMOVE_ATTENDEE_FAILED: &str = "Failed to remove attendee";
/// Label of a failed attendee addition.
pub const ADD_ATTENDEE_FAILED: &str = "Failed to add attendee";

/// State of the event details page.
#[derive(Debug, Clone, Default)]
pub struct EventDetailsState {
    /// The event itself
    pub event: FetchState<EventId, EventData>,
    /// Users attending the event
    pub attendees: FetchState<EventId, Vec<User>>,
    /// User directory for the add-attendee dialog
    pub users: FetchState<Option<UserId>, Vec<User>>,
    /// Delete the event
    pub delete_event: ActionState,
    /// Remove one attendee
    pub remove_attendee: ActionState,
    /// Add one attendee
    pub add_attendee: ActionState,
    /// Who is signed in
    pub auth: Option<AuthSession>,
    /// Add-attendee dialog is shown
    pub add_attendee_open: bool,
    /// Delete confirmation is shown
    pub confirm_delete_open: bool,
    /// Where the page asked to go, for the router
    pub navigation: Option<Route>,
}

impl EventDetailsState {
    /// A page that has not been mounted yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The event this page shows, once mounted.
    #[must_use]
    pub fn event_id(&self) -> Option<EventId> {
        self.event.key().copied()
    }

    /// The single error to display, in slot priority order.
    #[must_use]
    pub fn error(&self) -> Option<&AsyncError> {
        first_error([
            self.event.error(),
            self.attendees.error(),
            self.users.error(),
            self.remove_attendee.error(),
            self.add_attendee.error(),
            self.delete_event.error(),
        ])
    }

    /// Whether the signed-in user owns the event.
    ///
    /// False until both the session and the event are known.
    #[must_use]
    pub fn is_owner(&self) -> bool {
        match (self.auth, self.event.data()) {
            (Some(auth), Some(event)) => auth.user_id == event.owner_id,
            _ => false,
        }
    }

    /// Users who could still be added as attendees.
    #[must_use]
    pub fn addable_users(&self) -> Vec<User> {
        let attending = self.attendees.data().map_or(&[][..], Vec::as_slice);
        self.users
            .data()
            .into_iter()
            .flatten()
            .filter(|user| !attending.iter().any(|a| a.id == user.id))
            .cloned()
            .collect()
    }

    /// Snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> EventDetailsView {
        EventDetailsView {
            loading: self.event.loading(),
            event: self.event.data().cloned(),
            attendees: self.attendees.data().cloned().unwrap_or_default(),
            addable_users: self.addable_users(),
            users_loading: self.users.loading(),
            is_owner: self.is_owner(),
            error: self.error().map(ToString::to_string),
            add_attendee_open: self.add_attendee_open,
            confirm_delete_open: self.confirm_delete_open,
            deleting: self.delete_event.running(),
        }
    }
}

/// What a renderer needs to draw the event details page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetailsView {
    /// The event has not landed yet
    pub loading: bool,
    /// The event, once loaded
    pub event: Option<EventData>,
    /// Attendees; empty while loading or after a failure
    pub attendees: Vec<User>,
    /// Candidates for the add-attendee dialog
    pub addable_users: Vec<User>,
    /// The user directory is still loading
    pub users_loading: bool,
    /// Show owner-only controls
    pub is_owner: bool,
    /// Aggregated error message
    pub error: Option<String>,
    /// Add-attendee dialog is shown
    pub add_attendee_open: bool,
    /// Delete confirmation is shown
    pub confirm_delete_open: bool,
    /// A delete is in flight
    pub deleting: bool,
}

/// Actions of the event details page.
#[derive(Debug, Clone)]
pub enum EventDetailsAction {
    /// The page was shown, or its event id changed
    Mount {
        /// Event to show
        event_id: EventId,
        /// Who is signed in
        auth: Option<AuthSession>,
    },
    /// The user signed in or out
    AuthChanged(Option<AuthSession>),
    /// Event slot
    Event(FetchAction<EventId, EventData>),
    /// Attendees slot
    Attendees(FetchAction<EventId, Vec<User>>),
    /// User directory slot
    Users(FetchAction<Option<UserId>, Vec<User>>),
    /// Delete slot
    Delete(RunAction<EventId>),
    /// Remove-attendee slot
    Remove(RunAction<Attendance>),
    /// Add-attendee slot
    Add(RunAction<Attendance>),
    /// Show the add-attendee dialog
    OpenAddAttendee,
    /// Hide the add-attendee dialog
    CloseAddAttendee,
    /// Add a user to this event
    AddAttendee(UserId),
    /// Remove a user from this event
    RemoveAttendee(UserId),
    /// Ask for delete confirmation
    RequestDelete,
    /// Dismiss the delete confirmation
    CancelDelete,
    /// Delete this event
    ConfirmDelete,
    /// Go somewhere else
    Navigate(Route),
}

/// Dependencies of the event details page.
#[derive(Debug, Clone)]
pub struct EventDetailsEnvironment {
    /// Loads the event
    pub event: FetchEnvironment<EventId, EventData>,
    /// Loads the attendees
    pub attendees: FetchEnvironment<EventId, Vec<User>>,
    /// Loads the user directory
    pub users: FetchEnvironment<Option<UserId>, Vec<User>>,
    /// Deletes the event
    pub delete_event: ActionEnvironment<EventId>,
    /// Removes an attendee
    pub remove_attendee: ActionEnvironment<Attendance>,
    /// Adds an attendee
    pub add_attendee: ActionEnvironment<Attendance>,
}

impl EventDetailsEnvironment {
    /// Environment backed by `api`.
    ///
    /// The user directory is only requested for signed-in users; everyone
    /// else gets an empty list without a call.
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
        let attendees = {
            let api = Arc::clone(api);
            FetchEnvironment::new(move |id: &EventId| {
                let id = *id;
                call_api(&api, move |api| async move { api.fetch_attendees(id).await })
            })
        };
        let users = {
            let api = Arc::clone(api);
            FetchEnvironment::new(Gated::new(
                move |_: &Option<UserId>| {
                    call_api(&api, |api| async move { api.fetch_users().await })
                },
                Option::<UserId>::is_some,
            ))
        };
        let delete_event = {
            let api = Arc::clone(api);
            ActionEnvironment::new(
                move |id: EventId| {
                    call_api(&api, move |api| async move { api.delete_event(id).await })
                },
                DELETE_EVENT_FAILED,
            )
        };
        let remove_attendee = {
            let api = Arc::clone(api);
            ActionEnvironment::new(
                move |attendance: Attendance| {
                    call_api(&api, move |api| async move {
                        api.remove_attendee(attendance).await
                    })
                },
                REMOVE_ATTENDEE_FAILED,
            )
        };
        let add_attendee = {
            let api = Arc::clone(api);
            ActionEnvironment::new(
                move |attendance: Attendance| {
                    call_api(&api, move |api| async move { api.add_attendee(attendance).await })
                },
                ADD_ATTENDEE_FAILED,
            )
        };

        Self {
            event,
            attendees,
            users,
            delete_event,
            remove_attendee,
            add_attendee,
        }
    }
}

/// Reducer of the event details page.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventDetailsReducer;

type Effects = SmallVec<[Effect<EventDetailsAction>; 4]>;

impl EventDetailsReducer {
    fn load_users(state: &mut EventDetailsState, env: &EventDetailsEnvironment) -> Effects {
        scope(
            &FetchReducer::new(),
            &mut state.users,
            FetchAction::Load(identity(state.auth.as_ref())),
            &env.users,
            EventDetailsAction::Users,
        )
    }

    fn change_attendance(
        state: &mut EventDetailsState,
        env: &EventDetailsEnvironment,
        user_id: UserId,
        add: bool,
    ) -> Effects {
        let Some(event_id) = state.event_id() else {
            tracing::debug!(%user_id, "Attendance change before mount ignored");
            return SmallVec::new();
        };
        if !state.is_owner() {
            tracing::debug!(%event_id, %user_id, "Attendance change by non-owner ignored");
            return SmallVec::new();
        }
        let attendance = Attendance { event_id, user_id };

        if add {
            state.add_attendee_open = false;
            scope(
                &ActionReducer::new(),
                &mut state.add_attendee,
                RunAction::Run(attendance),
                &env.add_attendee,
                EventDetailsAction::Add,
            )
        } else {
            scope(
                &ActionReducer::new(),
                &mut state.remove_attendee,
                RunAction::Run(attendance),
                &env.remove_attendee,
                EventDetailsAction::Remove,
            )
        }
    }
}

/// Follow-up dispatched after a successful attendee change.
fn refetch_attendees() -> Effect<EventDetailsAction> {
    Effect::send(EventDetailsAction::Attendees(FetchAction::Refetch))
}

impl Reducer for EventDetailsReducer {
    type State = EventDetailsState;
    type Action = EventDetailsAction;
    type Environment = EventDetailsEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects {
        match action {
            EventDetailsAction::Mount { event_id, auth } => {
                tracing::debug!(%event_id, signed_in = auth.is_some(), "Mounting event details");
                state.auth = auth;

                let mut effects = scope(
                    &FetchReducer::new(),
                    &mut state.event,
                    FetchAction::Load(event_id),
                    &env.event,
                    EventDetailsAction::Event,
                );
                effects.extend(scope(
                    &FetchReducer::new(),
                    &mut state.attendees,
                    FetchAction::Load(event_id),
                    &env.attendees,
                    EventDetailsAction::Attendees,
                ));
                effects.extend(Self::load_users(state, env));
                effects
            },
            EventDetailsAction::AuthChanged(auth) => {
                state.auth = auth;
                if auth.is_none() {
                    state.add_attendee_open = false;
                    state.confirm_delete_open = false;
                }
                Self::load_users(state, env)
            },
            EventDetailsAction::Event(action) => scope(
                &FetchReducer::new(),
                &mut state.event,
                action,
                &env.event,
                EventDetailsAction::Event,
            ),
            EventDetailsAction::Attendees(action) => scope(
                &FetchReducer::new(),
                &mut state.attendees,
                action,
                &env.attendees,
                EventDetailsAction::Attendees,
            ),
            EventDetailsAction::Users(action) => scope(
                &FetchReducer::new(),
                &mut state.users,
                action,
                &env.users,
                EventDetailsAction::Users,
            ),
            EventDetailsAction::Delete(action) => {
                let succeeded = action.succeeded();
                let mut effects = scope(
                    &ActionReducer::new(),
                    &mut state.delete_event,
                    action,
                    &env.delete_event,
                    EventDetailsAction::Delete,
                );
                if succeeded {
                    effects.push(Effect::send(EventDetailsAction::Navigate(Route::Events)));
                }
                effects
            },
            EventDetailsAction::Remove(action) => {
                let succeeded = action.succeeded();
                let mut effects = scope(
                    &ActionReducer::new(),
                    &mut state.remove_attendee,
                    action,
                    &env.remove_attendee,
                    EventDetailsAction::Remove,
                );
                if succeeded {
                    effects.push(refetch_attendees());
                }
                effects
            },
            EventDetailsAction::Add(action) => {
                let succeeded = action.succeeded();
                let mut effects = scope(
                    &ActionReducer::new(),
                    &mut state.add_attendee,
                    action,
                    &env.add_attendee,
                    EventDetailsAction::Add,
                );
                if succeeded {
                    effects.push(refetch_attendees());
                }
                effects
            },
            EventDetailsAction::OpenAddAttendee => {
                state.add_attendee_open = state.is_owner();
                SmallVec::new()
            },
            EventDetailsAction::CloseAddAttendee => {
                state.add_attendee_open = false;
                SmallVec::new()
            },
            EventDetailsAction::AddAttendee(user_id) => {
                Self::change_attendance(state, env, user_id, true)
            },
            EventDetailsAction::RemoveAttendee(user_id) => {
                Self::change_attendance(state, env, user_id, false)
            },
            EventDetailsAction::RequestDelete => {
                state.confirm_delete_open = state.is_owner();
                SmallVec::new()
            },
            EventDetailsAction::CancelDelete => {
                state.confirm_delete_open = false;
                SmallVec::new()
            },
            EventDetailsAction::ConfirmDelete => {
                state.confirm_delete_open = false;
                let Some(event_id) = state.event_id() else {
                    return SmallVec::new();
                };
                if !state.is_owner() {
                    tracing::debug!(%event_id, "Delete by non-owner ignored");
                    return SmallVec::new();
                }
                scope(
                    &ActionReducer::new(),
                    &mut state.delete_event,
                    RunAction::Run(event_id),
                    &env.delete_event,
                    EventDetailsAction::Delete,
                )
            },
            EventDetailsAction::Navigate(route) => {
                tracing::info!(%route, "Navigating");
                state.navigation = Some(route);
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use loadable_core::Failure;
    use loadable_testing::{Deferred, ReducerTest, assertions, helpers, test_time};

    struct Mocks {
        event: Deferred<EventId, EventData>,
        attendees: Deferred<EventId, Vec<User>>,
        users: Deferred<Option<UserId>, Vec<User>>,
        delete: Deferred<EventId, ()>,
        remove: Deferred<Attendance, ()>,
        add: Deferred<Attendance, ()>,
    }

    fn deferred_env() -> (EventDetailsEnvironment, Mocks) {
        let mocks = Mocks {
            event: Deferred::new(),
            attendees: Deferred::new(),
            users: Deferred::new(),
            delete: Deferred::new(),
            remove: Deferred::new(),
            add: Deferred::new(),
        };
        let env = EventDetailsEnvironment {
            event: FetchEnvironment::new(mocks.event.clone()),
            attendees: FetchEnvironment::new(mocks.attendees.clone()),
            users: FetchEnvironment::new(Gated::new(
                mocks.users.clone(),
                Option::<UserId>::is_some,
            )),
            delete_event: ActionEnvironment::new(mocks.delete.clone(), DELETE_EVENT_FAILED),
            remove_attendee: ActionEnvironment::new(mocks.remove.clone(), REMOVE_ATTENDEE_FAILED),
            add_attendee: ActionEnvironment::new(mocks.add.clone(), ADD_ATTENDEE_FAILED),
        };
        (env, mocks)
    }

    fn event(owner: u64) -> EventData {
        EventData {
            id: EventId::new(5),
            name: "Launch".into(),
            description: "Release party".into(),
            date: test_time(),
            location: "Rooftop".into(),
            owner_id: UserId::new(owner),
        }
    }

    fn user(id: u64) -> User {
        User {
            id: UserId::new(id),
            name: format!("user {id}"),
            email: format!("user{id}@example.com"),
        }
    }

    fn mount(auth: Option<AuthSession>) -> EventDetailsAction {
        EventDetailsAction::Mount {
            event_id: EventId::new(5),
            auth,
        }
    }

    /// Reduce `action`, then keep feeding back whatever its effects produce.
    async fn drive(
        state: &mut EventDetailsState,
        env: &EventDetailsEnvironment,
        action: EventDetailsAction,
    ) {
        let mut queue = vec![action];
        while let Some(action) = queue.pop() {
            let effects = EventDetailsReducer.reduce(state, action, env);
            queue.extend(helpers::collect_actions(effects).await);
        }
    }

    /// Mount signed in as `viewer` with event 5 (owned by user 1) loaded.
    async fn mounted_as(
        viewer: u64,
        env: &EventDetailsEnvironment,
        mocks: &Mocks,
    ) -> EventDetailsState {
        let mut state = EventDetailsState::new();
        let effects = EventDetailsReducer.reduce(
            &mut state,
            mount(Some(AuthSession::new(UserId::new(viewer)))),
            env,
        );
        mocks.event.succeed(0, event(1));
        mocks.attendees.succeed(0, vec![user(2), user(3)]);
        mocks.users.succeed(0, vec![user(1), user(2), user(3), user(4)]);
        for action in helpers::collect_actions(effects).await {
            drive(&mut state, env, action).await;
        }
        state
    }

    #[tokio::test]
    async fn mount_issues_one_request_per_slot() {
        let (env, mocks) = deferred_env();
        let mut state = EventDetailsState::new();

        let effects = EventDetailsReducer.reduce(&mut state, mount(None), &env);
        assert_eq!(effects.len(), 3);
        assert_eq!(mocks.event.keys(), vec![EventId::new(5)]);
        assert_eq!(mocks.attendees.keys(), vec![EventId::new(5)]);
        // Signed out: the directory resolves without a request
        assert_eq!(mocks.users.calls(), 0);

        mocks.event.succeed(0, event(1));
        mocks.attendees.succeed(0, vec![user(3)]);
        for action in helpers::collect_actions(effects).await {
            drive(&mut state, &env, action).await;
        }

        let view = state.view();
        assert!(!view.loading);
        assert_eq!(view.event, Some(event(1)));
        assert_eq!(view.attendees, vec![user(3)]);
        assert!(!view.users_loading);
        assert!(view.addable_users.is_empty());
        assert!(view.error.is_none());
        assert!(!view.is_owner);
    }

    #[tokio::test]
    async fn remounting_same_event_does_not_refetch() {
        let (env, mocks) = deferred_env();
        let mut state = EventDetailsState::new();

        let _ = EventDetailsReducer.reduce(&mut state, mount(None), &env);
        let effects = EventDetailsReducer.reduce(&mut state, mount(None), &env);

        assertions::assert_no_effects(&effects);
        assert_eq!(mocks.event.calls(), 1);
        assert_eq!(mocks.attendees.calls(), 1);
    }

    #[tokio::test]
    async fn signing_in_loads_directory() {
        let (env, mocks) = deferred_env();
        let mut state = EventDetailsState::new();
        let _ = EventDetailsReducer.reduce(&mut state, mount(None), &env);

        let session = AuthSession::new(UserId::new(1));
        let effects =
            EventDetailsReducer.reduce(&mut state, EventDetailsAction::AuthChanged(Some(session)), &env);
        assert_eq!(mocks.users.keys(), vec![Some(UserId::new(1))]);

        mocks.users.succeed(0, vec![user(1), user(3)]);
        for action in helpers::collect_actions(effects).await {
            drive(&mut state, &env, action).await;
        }
        assert_eq!(state.users.data().map(Vec::len), Some(2));
    }

    #[test]
    fn error_follows_slot_priority() {
        let mut state = EventDetailsState::new();

        let (_, generation) = state.users.issue(None).unwrap();
        let _ = state.users.commit(generation, Err(Failure::new("directory down")));

        let generation = state.add_attendee.begin();
        let _ = state.add_attendee.commit(
            generation,
            Err(AsyncError::action(ADD_ATTENDEE_FAILED, Failure::new("conflict"))),
        );
        assert_eq!(
            state.error().map(ToString::to_string).as_deref(),
            Some("directory down")
        );

        let generation = state.users.reissue().map(|(_, g)| g).unwrap();
        let _ = state.users.commit(generation, Ok(Vec::new()));
        assert_eq!(
            state.error().map(ToString::to_string).as_deref(),
            Some("Failed to add attendee: conflict")
        );
    }

    #[test]
    fn owner_requires_session_and_event() {
        let mut state = EventDetailsState::new();
        assert!(!state.is_owner());

        state.auth = Some(AuthSession::new(UserId::new(1)));
        let (_, generation) = state.event.issue(EventId::new(5)).unwrap();
        // Event still loading
        assert!(!state.is_owner());

        let _ = state.event.commit(generation, Ok(event(1)));
        assert!(state.is_owner());

        state.auth = Some(AuthSession::new(UserId::new(2)));
        assert!(!state.is_owner());

        state.auth = None;
        assert!(!state.is_owner());
    }

    #[test]
    fn delete_confirmation_is_owner_only() {
        let (env, _mocks) = deferred_env();

        ReducerTest::new(EventDetailsReducer)
            .with_env(env)
            .given_state(EventDetailsState::new())
            .when_action(EventDetailsAction::RequestDelete)
            .then_state(|state| assert!(!state.confirm_delete_open))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[tokio::test]
    async fn non_owner_cannot_delete_or_change_attendance() {
        let (env, mocks) = deferred_env();
        let mut state = mounted_as(3, &env, &mocks).await;
        assert!(!state.is_owner());

        for action in [
            EventDetailsAction::ConfirmDelete,
            EventDetailsAction::RemoveAttendee(UserId::new(2)),
            EventDetailsAction::AddAttendee(UserId::new(4)),
        ] {
            let effects = EventDetailsReducer.reduce(&mut state, action, &env);
            assertions::assert_no_effects(&effects);
        }

        assert!(!state.delete_event.running());
        assert!(!state.remove_attendee.running());
        assert!(!state.add_attendee.running());
        assert_eq!(mocks.delete.calls(), 0);
        assert_eq!(mocks.remove.calls(), 0);
        assert_eq!(mocks.add.calls(), 0);
    }

    #[tokio::test]
    async fn successful_removal_refetches_attendees() {
        let (env, mocks) = deferred_env();
        let mut state = mounted_as(1, &env, &mocks).await;

        let effects =
            EventDetailsReducer.reduce(&mut state, EventDetailsAction::RemoveAttendee(UserId::new(3)), &env);
        assert!(state.remove_attendee.running());
        assert_eq!(
            mocks.remove.keys(),
            vec![Attendance {
                event_id: EventId::new(5),
                user_id: UserId::new(3)
            }]
        );

        mocks.remove.succeed(0, ());
        let completed = helpers::collect_actions(effects).await;
        let follow_up = EventDetailsReducer.reduce(&mut state, completed[0].clone(), &env);

        // The slot settles before the refetch it triggers runs
        assert!(!state.remove_attendee.running());
        assert!(state.remove_attendee.error().is_none());
        assert_eq!(mocks.attendees.calls(), 1);

        let follow_up = helpers::collect_actions(follow_up).await;
        assert!(matches!(
            follow_up.as_slice(),
            [EventDetailsAction::Attendees(FetchAction::Refetch)]
        ));
    }

    #[tokio::test]
    async fn failed_delete_stays_on_page() {
        let (env, mocks) = deferred_env();
        let mut state = mounted_as(1, &env, &mocks).await;

        let effects = EventDetailsReducer.reduce(&mut state, EventDetailsAction::ConfirmDelete, &env);
        assert!(state.view().deleting);

        mocks.delete.fail(0, "permission denied");
        for action in helpers::collect_actions(effects).await {
            drive(&mut state, &env, action).await;
        }

        assert!(!state.delete_event.running());
        assert_eq!(
            state.delete_event.error().map(ToString::to_string).as_deref(),
            Some("Failed to delete event: permission denied")
        );
        assert!(state.navigation.is_none());
    }

    #[tokio::test]
    async fn successful_delete_navigates_to_events() {
        let (env, mocks) = deferred_env();
        let mut state = mounted_as(1, &env, &mocks).await;

        let effects = EventDetailsReducer.reduce(&mut state, EventDetailsAction::ConfirmDelete, &env);
        mocks.delete.succeed(0, ());
        for action in helpers::collect_actions(effects).await {
            drive(&mut state, &env, action).await;
        }

        assert_eq!(state.navigation, Some(Route::Events));
    }
}
