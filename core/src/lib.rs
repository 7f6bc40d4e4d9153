//! # Loadable Core
//!
//! Core traits and types for the loadable architecture.
//!
//! This crate provides the abstractions that every page of a client
//! application uses to load remote data and run remote mutations:
//!
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **`FetchState`**: Tri-state result of a keyed, re-runnable producer
//! - **`ActionState`**: In-flight / error tracking for a mutating operation
//! - **Aggregation**: First-non-null selection across several error slots
//!
//! ## Lifecycle
//!
//! A page mounts and sends `FetchAction::Load(key)` for each slot. The fetch
//! reducer tags the request with a fresh [`Generation`] and returns an effect
//! that runs the producer. The runtime feeds the result back as
//! `FetchAction::Resolved`; results whose generation is no longer current are
//! dropped, so a later-issued request always wins over an earlier one.
//!
//! ## Example
//!
//! ```
//! use loadable_core::fetch::{FetchAction, FetchEnvironment, FetchReducer, FetchState};
//! use loadable_core::reducer::Reducer;
//!
//! let env = FetchEnvironment::new(|id: &u32| {
//!     let id = *id;
//!     async move { Ok::<_, loadable_core::BoxError>(format!("event {id}")) }
//! });
//! let reducer = FetchReducer::<u32, String>::new();
//! let mut state = FetchState::new();
//!
//! let effects = reducer.reduce(&mut state, FetchAction::Load(5), &env);
//! assert!(state.loading());
//! assert_eq!(effects.len(), 1);
//! ```

pub use smallvec::{SmallVec, smallvec};

pub mod action;
pub mod aggregate;
pub mod composition;
pub mod error;
pub mod fetch;
pub mod generation;

pub use error::{AsyncError, BoxError, Failure};
pub use generation::Generation;

/// Reducer module - The core trait for page logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They never perform I/O themselves; every remote call is described as an
/// [`Effect`](super::effect::Effect) and executed by the runtime.
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for EventsPageReducer {
    ///     type State = EventsPageState;
    ///     type Action = EventsPageAction;
    ///     type Environment = PageEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut EventsPageState,
    ///         action: EventsPageAction,
    ///         env: &PageEnvironment,
    ///     ) -> SmallVec<[Effect<EventsPageAction>; 4]> {
    ///         match action {
    ///             EventsPageAction::Mount => { /* issue the list fetch */ }
    ///             _ => {}
    ///         }
    ///         SmallVec::new()
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Updates state in place
        /// 2. Returns effect descriptions to be executed
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects are values returned from reducers. The runtime executes them and
/// feeds any resulting action back into the reducer.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Wrap an async computation whose output is fed back into the store
        pub fn future<F>(future: F) -> Effect<Action>
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(future))
        }

        /// Dispatch `action` back into the store as a one-way message
        ///
        /// The reducer that returns this effect does not wait for the action
        /// to be processed.
        pub fn send(action: Action) -> Effect<Action>
        where
            Action: Send + 'static,
        {
            Effect::future(async move { Some(action) })
        }

        /// Returns `true` for `Effect::None` and for parallel groups with nothing to run
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) => effects.iter().all(Effect::is_none),
                Effect::Future(_) => false,
            }
        }

        /// Lift the effect into a parent action type
        ///
        /// Used when a child reducer (a fetch slot, an action slot) is embedded
        /// in a page reducer: every action the child produces is wrapped by
        /// `embed` before reaching the store.
        pub fn map<Parent>(self, embed: fn(Action) -> Parent) -> Effect<Parent>
        where
            Action: Send + 'static,
            Parent: Send + 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Parallel(effects) => Effect::Parallel(
                    effects.into_iter().map(|effect| effect.map(embed)).collect(),
                ),
                Effect::Future(fut) => Effect::future(async move { fut.await.map(embed) }),
            }
        }
    }
}
