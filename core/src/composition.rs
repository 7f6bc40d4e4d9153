//! Reducer composition utilities
//!
//! A page owns several slots (fetches and actions), each driven by its own
//! child reducer. [`scope`] runs a child reducer against the slot's part of
//! the page state and environment, then lifts the effects it returns into the
//! page's action type so their feedback is routed back to the same slot.
//!
//! # Examples
//!
//! ```
//! use loadable_core::composition::scope;
//! use loadable_core::fetch::{FetchAction, FetchEnvironment, FetchReducer, FetchState};
//!
//! struct Page {
//!     event: FetchState<u32, String>,
//! }
//!
//! enum PageAction {
//!     Event(FetchAction<u32, String>),
//! }
//!
//! let env = FetchEnvironment::new(|id: &u32| {
//!     let id = *id;
//!     async move { Ok::<_, loadable_core::BoxError>(format!("event {id}")) }
//! });
//! let mut page = Page { event: FetchState::new() };
//!
//! let effects = scope(
//!     &FetchReducer::new(),
//!     &mut page.event,
//!     FetchAction::Load(7),
//!     &env,
//!     PageAction::Event,
//! );
//! assert_eq!(effects.len(), 1);
//! assert_eq!(page.event.key(), Some(&7));
//! ```

use crate::SmallVec;
use crate::effect::Effect;
use crate::reducer::Reducer;

/// Run `reducer` on a child slot and lift its effects with `embed`.
///
/// No-op effects are dropped.
pub fn scope<R, A>(
    reducer: &R,
    state: &mut R::State,
    action: R::Action,
    env: &R::Environment,
    embed: fn(R::Action) -> A,
) -> SmallVec<[Effect<A>; 4]>
where
    R: Reducer,
    R::Action: Send + 'static,
    A: Send + 'static,
{
    lift(reducer.reduce(state, action, env), embed)
}

/// Lift a batch of child effects into the parent action type.
pub fn lift<C, A>(effects: SmallVec<[Effect<C>; 4]>, embed: fn(C) -> A) -> SmallVec<[Effect<A>; 4]>
where
    C: Send + 'static,
    A: Send + 'static,
{
    effects
        .into_iter()
        .filter(|effect| !effect.is_none())
        .map(|effect| effect.map(embed))
        .collect()
}
