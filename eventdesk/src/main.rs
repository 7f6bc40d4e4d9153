//! Eventdesk demo.
//!
//! Mounts each page against the in-memory API, prints the rendered views as
//! JSON and walks through a few mutations.
//!
//! ```bash
//! EVENTDESK_LOG=eventdesk=info cargo run -p eventdesk
//! ```

use anyhow::Context;
use eventdesk::api::{InMemoryApi, Seed};
use eventdesk::config::Config;
use eventdesk::pages::{
    self, EditEventAction, EditEventEnvironment, EditEventReducer, EditEventState,
    EventDetailsAction, EventDetailsEnvironment, EventDetailsReducer, EventDetailsState,
    EventsAction, EventsEnvironment, EventsReducer, EventsState, MyEventsAction,
    MyEventsEnvironment, MyEventsReducer, MyEventsState,
};
use eventdesk::route::Route;
use eventdesk::types::{AuthSession, EventDraft, EventId, UserId};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SETTLE_TIMEOUT: Duration = Duration::from_secs(2);

fn print_view<V: Serialize>(title: &str, view: &V) -> anyhow::Result<()> {
    println!("── {title}");
    println!("{}", serde_json::to_string_pretty(view)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let seed = match &config.seed {
        Some(path) => Seed::load(path)?,
        None => Seed::demo()?,
    };
    let api = Arc::new(InMemoryApi::from_seed(seed));
    let ada = AuthSession::new(UserId::new(1));
    let compiler_night = EventId::new(5);

    tracing::info!("Starting eventdesk demo");

    // Events list
    let events = pages::mount(
        EventsReducer,
        EventsState::new(),
        EventsEnvironment::live(&api),
        config.store.clone(),
        EventsAction::Mount { auth: Some(ada) },
    )
    .await?;
    events
        .wait_until(|page| !page.events.loading(), SETTLE_TIMEOUT)
        .await
        .context("events list did not load")?;
    print_view("Events", &events.state(EventsState::view).await)?;

    // Event details, then remove an attendee
    let details = pages::mount(
        EventDetailsReducer,
        EventDetailsState::new(),
        EventDetailsEnvironment::live(&api),
        config.store.clone(),
        EventDetailsAction::Mount {
            event_id: compiler_night,
            auth: Some(ada),
        },
    )
    .await?;
    details
        .wait_until(
            |page| !page.event.loading() && !page.attendees.loading() && !page.users.loading(),
            SETTLE_TIMEOUT,
        )
        .await
        .context("event details did not load")?;
    print_view("Event details", &details.state(EventDetailsState::view).await)?;

    details
        .send(EventDetailsAction::RemoveAttendee(UserId::new(2)))
        .await?;
    details
        .wait_until(
            |page| {
                !page.remove_attendee.running()
                    && !page.attendees.loading()
                    && page.attendees.data().is_some_and(|a| a.len() == 1)
            },
            SETTLE_TIMEOUT,
        )
        .await
        .context("attendee list was not refreshed")?;
    print_view(
        "Event details after removing Alan Turing",
        &details.state(EventDetailsState::view).await,
    )?;

    // My events, as someone else
    let my_events = pages::mount(
        MyEventsReducer,
        MyEventsState::new(),
        MyEventsEnvironment::live(&api),
        config.store.clone(),
        MyEventsAction::Mount {
            auth: Some(AuthSession::new(UserId::new(3))),
        },
    )
    .await?;
    my_events
        .wait_until(|page| !page.events.loading(), SETTLE_TIMEOUT)
        .await
        .context("my events did not load")?;
    print_view("My events (Grace Hopper)", &my_events.state(MyEventsState::view).await)?;

    // Edit form
    let edit = pages::mount(
        EditEventReducer,
        EditEventState::new(),
        EditEventEnvironment::live(&api),
        config.store.clone(),
        EditEventAction::Mount {
            event_id: compiler_night,
            auth: Some(ada),
        },
    )
    .await?;
    edit.wait_until(|page| !page.event.loading(), SETTLE_TIMEOUT)
        .await
        .context("edit form did not load")?;
    let mut draft: EventDraft = edit
        .state(|page| page.view().draft)
        .await
        .context("event to edit is missing")?;
    draft.location = "Auditorium".to_string();
    edit.send(EditEventAction::Submit(draft)).await?;
    edit.wait_until(
        |page| page.navigation == Some(Route::EventDetails(compiler_night)),
        SETTLE_TIMEOUT,
    )
    .await
    .context("save did not navigate")?;
    tracing::info!(route = %Route::EventDetails(compiler_night), "Saved, back to details");

    for (name, result) in [
        ("events", events.shutdown_with_default_timeout().await),
        ("event details", details.shutdown_with_default_timeout().await),
        ("my events", my_events.shutdown_with_default_timeout().await),
        ("edit event", edit.shutdown_with_default_timeout().await),
    ] {
        if let Err(error) = result {
            tracing::warn!(page = name, %error, "Page did not shut down cleanly");
        }
    }

    tracing::info!("Demo complete");
    Ok(())
}
