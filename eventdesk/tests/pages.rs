//! Pages running in a store against the in-memory API.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use eventdesk::api::{ApiError, Endpoint, EventsApi, InMemoryApi, Seed};
use eventdesk::pages::{
    self, EditEventAction, EditEventEnvironment, EditEventReducer, EditEventState,
    EventDetailsAction, EventDetailsEnvironment, EventDetailsReducer, EventDetailsState,
    EventsAction, EventsEnvironment, EventsReducer, EventsState, MyEventsAction,
    MyEventsEnvironment, MyEventsReducer, MyEventsState, PageStore,
};
use eventdesk::route::Route;
use eventdesk::types::{AuthSession, EventDraft, EventId, UserId};
use loadable_runtime::StoreConfig;
use loadable_testing::{helpers, test_time};
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(2);
const COMPILER_NIGHT: EventId = EventId::new(5);
const ADA: UserId = UserId::new(1);
const GRACE: UserId = UserId::new(3);

fn api() -> Arc<InMemoryApi> {
    helpers::init_tracing();
    Arc::new(InMemoryApi::from_seed(Seed::demo().unwrap()))
}

async fn details(
    api: &Arc<InMemoryApi>,
    event_id: EventId,
    auth: Option<AuthSession>,
) -> PageStore<EventDetailsReducer> {
    pages::mount(
        EventDetailsReducer,
        EventDetailsState::new(),
        EventDetailsEnvironment::live(api),
        StoreConfig::default(),
        EventDetailsAction::Mount { event_id, auth },
    )
    .await
    .unwrap()
}

fn settled(page: &EventDetailsState) -> bool {
    !page.event.loading() && !page.attendees.loading() && !page.users.loading()
}

#[tokio::test]
async fn failed_attendees_still_show_event() {
    let api = api();
    api.fail_next(Endpoint::Attendees, ApiError::Unavailable("network down".into()));

    let store = details(&api, COMPILER_NIGHT, None).await;
    store.wait_until(settled, TIMEOUT).await.unwrap();

    let view = store.state(EventDetailsState::view).await;
    assert_eq!(view.event.map(|e| e.name).as_deref(), Some("Compiler Night"));
    assert!(view.attendees.is_empty());
    assert_eq!(view.error.as_deref(), Some("network down"));
}

#[tokio::test]
async fn anonymous_visitor_gets_empty_directory_without_call() {
    let api = api();

    let store = details(&api, COMPILER_NIGHT, None).await;
    store.wait_until(settled, TIMEOUT).await.unwrap();

    let users = store.state(|page| page.users.data().cloned()).await;
    assert_eq!(users, Some(Vec::new()));
    assert_eq!(api.calls(Endpoint::Users), 0);
    assert!(!store.state(EventDetailsState::is_owner).await);

    store
        .send(EventDetailsAction::AuthChanged(Some(AuthSession::new(ADA))))
        .await
        .unwrap();
    store.wait_until(settled, TIMEOUT).await.unwrap();

    assert_eq!(api.calls(Endpoint::Users), 1);
    let view = store.state(EventDetailsState::view).await;
    assert!(view.is_owner);
    let addable: Vec<UserId> = view.addable_users.iter().map(|u| u.id).collect();
    assert_eq!(addable, vec![ADA, UserId::new(4)]);
}

#[tokio::test]
async fn removing_attendee_refreshes_list() {
    let api = api();
    let store = details(&api, COMPILER_NIGHT, Some(AuthSession::new(ADA))).await;
    store.wait_until(settled, TIMEOUT).await.unwrap();
    assert_eq!(api.calls(Endpoint::Attendees), 1);

    store
        .send(EventDetailsAction::RemoveAttendee(GRACE))
        .await
        .unwrap();
    store
        .wait_until(
            |page| {
                !page.remove_attendee.running()
                    && !page.attendees.loading()
                    && page
                        .attendees
                        .data()
                        .is_some_and(|users| users.iter().all(|u| u.id != GRACE))
            },
            TIMEOUT,
        )
        .await
        .unwrap();

    assert_eq!(api.calls(Endpoint::Attendees), 2);
    let view = store.state(EventDetailsState::view).await;
    assert_eq!(view.attendees.len(), 1);
    assert!(view.error.is_none());
}

#[tokio::test]
async fn adding_attendee_refreshes_list_and_closes_dialog() {
    let api = api();
    let store = details(&api, COMPILER_NIGHT, Some(AuthSession::new(ADA))).await;
    store.wait_until(settled, TIMEOUT).await.unwrap();

    store.send(EventDetailsAction::OpenAddAttendee).await.unwrap();
    assert!(store.state(|page| page.add_attendee_open).await);

    store
        .send(EventDetailsAction::AddAttendee(UserId::new(4)))
        .await
        .unwrap();
    store
        .wait_until(
            |page| page.attendees.data().is_some_and(|users| users.len() == 3),
            TIMEOUT,
        )
        .await
        .unwrap();

    let view = store.state(EventDetailsState::view).await;
    assert!(!view.add_attendee_open);
    assert_eq!(view.addable_users.len(), 1);
}

#[tokio::test]
async fn failed_delete_reports_label_and_stays() {
    let api = api();
    api.fail_next(Endpoint::DeleteEvent, ApiError::PermissionDenied);
    let store = details(&api, COMPILER_NIGHT, Some(AuthSession::new(ADA))).await;
    store.wait_until(settled, TIMEOUT).await.unwrap();

    store.send(EventDetailsAction::RequestDelete).await.unwrap();
    assert!(store.state(|page| page.confirm_delete_open).await);
    store.send(EventDetailsAction::ConfirmDelete).await.unwrap();
    store
        .wait_until(|page| page.delete_event.error().is_some(), TIMEOUT)
        .await
        .unwrap();

    let view = store.state(EventDetailsState::view).await;
    assert!(!view.deleting);
    assert_eq!(
        view.error.as_deref(),
        Some("Failed to delete event: permission denied")
    );
    assert!(store.state(|page| page.navigation.is_none()).await);
    assert!(api.fetch_event(COMPILER_NIGHT).await.is_ok());
}

#[tokio::test]
async fn successful_delete_navigates_to_list() {
    let api = api();
    let store = details(&api, COMPILER_NIGHT, Some(AuthSession::new(ADA))).await;
    store.wait_until(settled, TIMEOUT).await.unwrap();

    store.send(EventDetailsAction::ConfirmDelete).await.unwrap();
    store
        .wait_until(|page| page.navigation == Some(Route::Events), TIMEOUT)
        .await
        .unwrap();

    assert!(matches!(
        api.fetch_event(COMPILER_NIGHT).await,
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn non_owner_commands_never_reach_the_api() {
    let api = api();
    let store = details(&api, COMPILER_NIGHT, Some(AuthSession::new(GRACE))).await;
    store.wait_until(settled, TIMEOUT).await.unwrap();
    assert!(!store.state(EventDetailsState::is_owner).await);

    store.send(EventDetailsAction::ConfirmDelete).await.unwrap();
    store
        .send(EventDetailsAction::RemoveAttendee(UserId::new(2)))
        .await
        .unwrap();
    store
        .send(EventDetailsAction::AddAttendee(UserId::new(4)))
        .await
        .unwrap();

    assert_eq!(api.calls(Endpoint::DeleteEvent), 0);
    assert_eq!(api.calls(Endpoint::RemoveAttendee), 0);
    assert_eq!(api.calls(Endpoint::AddAttendee), 0);
    assert!(api.fetch_event(COMPILER_NIGHT).await.is_ok());
    assert_eq!(api.calls(Endpoint::Attendees), 1);
}

#[tokio::test]
async fn switching_event_shows_only_the_latest() {
    let api = api();
    api.set_latency(Endpoint::Event, Duration::from_millis(30));

    let store = details(&api, COMPILER_NIGHT, None).await;
    store
        .send(EventDetailsAction::Mount {
            event_id: EventId::new(6),
            auth: None,
        })
        .await
        .unwrap();

    store.wait_until(settled, TIMEOUT).await.unwrap();
    // Let the superseded request land too
    tokio::time::sleep(Duration::from_millis(60)).await;

    let view = store.state(EventDetailsState::view).await;
    assert_eq!(view.event.map(|e| e.id), Some(EventId::new(6)));
    let attendees: Vec<UserId> = view.attendees.iter().map(|u| u.id).collect();
    assert_eq!(attendees, vec![ADA]);
    assert_eq!(api.calls(Endpoint::Event), 2);
}

#[tokio::test]
async fn unmounted_page_ignores_late_results() {
    let api = api();
    api.set_latency(Endpoint::Event, Duration::from_millis(30));

    let store = details(&api, COMPILER_NIGHT, None).await;
    store.unmount();
    tokio::time::sleep(Duration::from_millis(60)).await;

    assert!(store.state(|page| page.event.loading()).await);
    assert!(store.send(EventDetailsAction::CloseAddAttendee).await.is_err());
}

#[tokio::test]
async fn creating_event_refreshes_list() {
    let api = api();
    let store = pages::mount(
        EventsReducer,
        EventsState::new(),
        EventsEnvironment::live(&api),
        StoreConfig::default(),
        EventsAction::Mount {
            auth: Some(AuthSession::new(GRACE)),
        },
    )
    .await
    .unwrap();
    store
        .wait_until(|page| !page.events.loading(), TIMEOUT)
        .await
        .unwrap();
    assert_eq!(store.state(|page| page.view().events.len()).await, 2);

    store.send(EventsAction::OpenAddEvent).await.unwrap();
    store
        .send(EventsAction::SubmitEvent(EventDraft {
            name: "Debugging Clinic".into(),
            description: "Bring your bugs.".into(),
            date: test_time(),
            location: "Lab 3".into(),
        }))
        .await
        .unwrap();
    store
        .wait_until(
            |page| !page.events.loading() && page.view().events.len() == 3,
            TIMEOUT,
        )
        .await
        .unwrap();

    let view = store.state(EventsState::view).await;
    assert!(!view.add_event_open);
    assert!(view.error.is_none());
    let created = view.events.iter().find(|e| e.name == "Debugging Clinic");
    assert_eq!(created.map(|e| e.owner_id), Some(GRACE));
    assert_eq!(api.calls(Endpoint::Events), 2);
}

#[tokio::test]
async fn my_events_follow_the_session() {
    let api = api();
    let store = pages::mount(
        MyEventsReducer,
        MyEventsState::new(),
        MyEventsEnvironment::live(&api),
        StoreConfig::default(),
        MyEventsAction::Mount {
            auth: Some(AuthSession::new(GRACE)),
        },
    )
    .await
    .unwrap();
    store
        .wait_until(|page| !page.events.loading(), TIMEOUT)
        .await
        .unwrap();
    let ids: Vec<EventId> = store
        .state(|page| page.view().events.iter().map(|e| e.id).collect())
        .await;
    assert_eq!(ids, vec![COMPILER_NIGHT]);

    store.send(MyEventsAction::AuthChanged(None)).await.unwrap();
    store
        .wait_until(|page| !page.events.loading(), TIMEOUT)
        .await
        .unwrap();
    assert!(store.state(|page| page.view().events.is_empty()).await);
    assert_eq!(api.calls(Endpoint::UserEvents), 1);
}

#[tokio::test]
async fn saving_edit_returns_to_details() {
    let api = api();
    let store = pages::mount(
        EditEventReducer,
        EditEventState::new(),
        EditEventEnvironment::live(&api),
        StoreConfig::default(),
        EditEventAction::Mount {
            event_id: COMPILER_NIGHT,
            auth: Some(AuthSession::new(ADA)),
        },
    )
    .await
    .unwrap();
    store
        .wait_until(|page| !page.event.loading(), TIMEOUT)
        .await
        .unwrap();

    let mut draft = store.state(|page| page.view().draft).await.unwrap();
    draft.location = "Auditorium".into();
    store.send(EditEventAction::Submit(draft)).await.unwrap();
    store
        .wait_until(
            |page| page.navigation == Some(Route::EventDetails(COMPILER_NIGHT)),
            TIMEOUT,
        )
        .await
        .unwrap();

    let saved = api.fetch_event(COMPILER_NIGHT).await.unwrap();
    assert_eq!(saved.location, "Auditorium");
}
