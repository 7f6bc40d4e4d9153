//! Pages of the event manager.
//!
//! Each page is a reducer over a state made of independent fetch and action
//! slots. The page reducer routes slot actions to the slot reducers with
//! [`scope`](loadable_core::composition::scope), reacts to successful
//! mutations by dispatching follow-up actions, and derives a single
//! displayable error from its slots.
//!
//! A page runs inside its own [`Store`]. [`mount`] creates the store and
//! sends the page's mount action; dropping the page means calling
//! [`Store::unmount`] so late results are discarded.

use crate::api::EventsApi;
use futures::future::BoxFuture;
use loadable_core::BoxError;
use loadable_core::reducer::Reducer;
use loadable_runtime::{Store, StoreConfig, StoreError};
use std::future::Future;
use std::sync::Arc;

pub mod edit_event;
pub mod event_details;
pub mod events;
pub mod my_events;

pub use edit_event::{EditEventAction, EditEventEnvironment, EditEventReducer, EditEventState};
pub use event_details::{
    EventDetailsAction, EventDetailsEnvironment, EventDetailsReducer, EventDetailsState,
};
pub use events::{EventsAction, EventsEnvironment, EventsReducer, EventsState};
pub use my_events::{MyEventsAction, MyEventsEnvironment, MyEventsReducer, MyEventsState};

/// The store type that runs page reducer `R`.
pub type PageStore<R> =
    Store<<R as Reducer>::State, <R as Reducer>::Action, <R as Reducer>::Environment, R>;

/// Create a store for a page and send its mount action.
///
/// # Errors
///
/// Returns [`StoreError::ShutdownInProgress`] only if the store was unmounted
/// concurrently, which cannot happen for a store nobody else holds yet.
pub async fn mount<R>(
    reducer: R,
    state: R::State,
    environment: R::Environment,
    config: StoreConfig,
    action: R::Action,
) -> Result<PageStore<R>, StoreError>
where
    R: Reducer + Clone + Send + Sync + 'static,
    R::State: Send + Sync + 'static,
    R::Action: Clone + Send + 'static,
    R::Environment: Clone + Send + Sync + 'static,
{
    let store = Store::with_config(state, reducer, environment, config);
    store.send(action).await?;
    Ok(store)
}

/// Adapt an API call into a producer or operation future.
///
/// The API handle is cloned into the future so it owns everything it needs.
pub(crate) fn call_api<A, T, F, Fut>(api: &Arc<A>, call: F) -> BoxFuture<'static, Result<T, BoxError>>
where
    A: EventsApi + 'static,
    F: FnOnce(Arc<A>) -> Fut,
    Fut: Future<Output = crate::api::Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let fut = call(Arc::clone(api));
    Box::pin(async move { fut.await.map_err(BoxError::from) })
}
