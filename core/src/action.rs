//! Running mutating operations.
//!
//! An action slot wraps an [`Operation`] together with a fixed,
//! human-readable label. Running it marks the slot as in flight and clears
//! any previous error; completion either clears `running` or records the
//! failure as `"<label>: <cause>"`.
//!
//! Actions carry no data. Success is observed indirectly: the page that owns
//! the slot reacts to a successful [`RunAction::Completed`] by dispatching a
//! follow-up action (typically a refetch of the list that just changed). That
//! follow-up is a one-way message; the action slot has already settled by the
//! time it is processed.
//!
//! # Overlapping runs
//!
//! Calling `Run` while a previous run is still in flight is allowed; nothing is
//! queued or de-duplicated. The slot tags every run with a [`Generation`] and
//! only the most recently issued run updates `running` and `error`, matching
//! the fetch slot's suppression rule.

use crate::effect::Effect;
use crate::error::{AsyncError, BoxError, Failure};
use crate::fetch::Commit;
use crate::generation::Generation;
use crate::reducer::Reducer;
use crate::{SmallVec, smallvec};
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// A parameterized, side-effecting remote call.
///
/// Implemented for any `Fn(Args) -> impl Future<Output = Result<R, BoxError>>`.
/// The operation's successful value is discarded.
pub trait Operation<Args>: Send + Sync {
    /// Start one invocation.
    fn call(&self, args: Args) -> BoxFuture<'static, Result<(), BoxError>>;
}

impl<Args, R, F, Fut> Operation<Args> for F
where
    F: Fn(Args) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, BoxError>> + Send + 'static,
    R: Send + 'static,
{
    fn call(&self, args: Args) -> BoxFuture<'static, Result<(), BoxError>> {
        self(args).map(|result| result.map(|_| ())).boxed()
    }
}

/// State of one action slot.
#[derive(Debug, Clone, Default)]
pub struct ActionState {
    running: bool,
    error: Option<AsyncError>,
    generation: Generation,
}

impl ActionState {
    /// An idle slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            running: false,
            error: None,
            generation: Generation::INITIAL,
        }
    }

    /// `true` while the most recently issued run has not completed.
    #[must_use]
    pub const fn running(&self) -> bool {
        self.running
    }

    /// The labelled failure of the last completed run, if it failed.
    #[must_use]
    pub const fn error(&self) -> Option<&AsyncError> {
        self.error.as_ref()
    }

    /// Generation of the most recently issued run.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Start a run: in flight, error cleared.
    pub fn begin(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.running = true;
        self.error = None;
        self.generation
    }

    /// Record the completion of the run tagged `generation`.
    pub fn commit(&mut self, generation: Generation, result: Result<(), AsyncError>) -> Commit {
        if generation != self.generation || generation.is_initial() {
            return Commit::Stale;
        }
        self.running = false;
        self.error = result.err();
        Commit::Applied
    }
}

/// Inputs to an action slot.
#[derive(Debug, Clone)]
pub enum RunAction<Args> {
    /// Invoke the operation
    Run(Args),
    /// An invocation finished
    Completed {
        /// Generation the run was issued under
        generation: Generation,
        /// What the operation returned
        result: Result<(), Failure>,
    },
}

impl<Args> RunAction<Args> {
    /// Whether this is the successful completion of some run.
    ///
    /// True for every successful completion, including superseded ones: the
    /// mutation reached the server either way, so success callbacks fire.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self, Self::Completed { result: Ok(()), .. })
    }
}

/// Dependencies of an action slot: the operation and its failure label.
pub struct ActionEnvironment<Args> {
    operation: Arc<dyn Operation<Args>>,
    label: Arc<str>,
}

impl<Args> ActionEnvironment<Args> {
    /// Environment running `operation`, labelling failures with `label`.
    pub fn new<O>(operation: O, label: impl Into<Arc<str>>) -> Self
    where
        O: Operation<Args> + 'static,
    {
        Self {
            operation: Arc::new(operation),
            label: label.into(),
        }
    }

    /// The failure label, e.g. "Failed to remove attendee".
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<Args> Clone for ActionEnvironment<Args> {
    fn clone(&self) -> Self {
        Self {
            operation: Arc::clone(&self.operation),
            label: Arc::clone(&self.label),
        }
    }
}

impl<Args> fmt::Debug for ActionEnvironment<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionEnvironment")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Reducer for a single action slot.
pub struct ActionReducer<Args> {
    _phantom: PhantomData<fn(Args)>,
}

impl<Args> ActionReducer<Args> {
    /// Create a new action reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<Args> Default for ActionReducer<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> Clone for ActionReducer<Args> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Args> Copy for ActionReducer<Args> {}

impl<Args> fmt::Debug for ActionReducer<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActionReducer")
    }
}

impl<Args> Reducer for ActionReducer<Args>
where
    Args: Send + 'static,
{
    type State = ActionState;
    type Action = RunAction<Args>;
    type Environment = ActionEnvironment<Args>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            RunAction::Run(args) => {
                let generation = state.begin();
                tracing::debug!(label = %env.label, %generation, "Running action");
                metrics::counter!("action.run").increment(1);

                let call = env.operation.call(args);
                smallvec![Effect::future(async move {
                    let result = call.await.map_err(Failure::from);
                    Some(RunAction::Completed { generation, result })
                })]
            },
            RunAction::Completed { generation, result } => {
                let outcome = if result.is_ok() { "success" } else { "failure" };
                let result =
                    result.map_err(|cause| AsyncError::action(Arc::clone(&env.label), cause));

                match state.commit(generation, result) {
                    Commit::Applied => {
                        if let Some(error) = state.error() {
                            tracing::warn!(%generation, %error, "Action failed");
                        } else {
                            tracing::debug!(label = %env.label, %generation, "Action succeeded");
                        }
                    },
                    Commit::Stale => {
                        tracing::debug!(
                            label = %env.label,
                            %generation,
                            current = %state.generation(),
                            "Superseded action completed"
                        );
                    },
                }
                metrics::counter!("action.completed", "outcome" => outcome).increment(1);
                SmallVec::new()
            },
        }
    }
}
