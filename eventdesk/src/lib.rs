//! # Eventdesk
//!
//! Pages of a small event and attendee manager, built on loadable fetch and
//! action slots.
//!
//! Every page is a reducer whose state is a handful of independent slots:
//! fetch slots for the data it shows and action slots for the mutations it
//! offers. Pages run inside a [`loadable_runtime::Store`], which executes the
//! requests and feeds results back.
//!
//! - [`api`]: the remote events API trait and an in-memory implementation
//! - [`pages`]: event details, events list, my events, edit event
//! - [`route`]: navigation targets pages can ask for
//! - [`types`]: domain records
//! - [`config`]: environment configuration for the demo binary
//!
//! ## Example
//!
//! ```
//! use eventdesk::api::{InMemoryApi, Seed};
//! use eventdesk::pages::{self, EventDetailsAction, EventDetailsEnvironment, EventDetailsReducer, EventDetailsState};
//! use eventdesk::types::EventId;
//! use loadable_runtime::StoreConfig;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let api = Arc::new(InMemoryApi::from_seed(Seed::demo()?));
//! let store = pages::mount(
//!     EventDetailsReducer,
//!     EventDetailsState::new(),
//!     EventDetailsEnvironment::live(&api),
//!     StoreConfig::default(),
//!     EventDetailsAction::Mount { event_id: EventId::new(5), auth: None },
//! )
//! .await?;
//!
//! store
//!     .wait_until(|page| !page.event.loading() && !page.attendees.loading(), Duration::from_secs(1))
//!     .await?;
//! let view = store.state(EventDetailsState::view).await;
//! assert_eq!(view.event.map(|event| event.name).as_deref(), Some("Compiler Night"));
//! store.unmount();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # }).unwrap();
//! ```

pub mod api;
pub mod config;
pub mod pages;
pub mod route;
pub mod types;
