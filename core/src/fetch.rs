//! Keyed, re-runnable loading of remote data.
//!
//! A fetch slot wraps a [`Producer`] and a dependency key. Whenever the key
//! changes (including the first load on mount) the slot discards its previous
//! identity, re-runs the producer exactly once and tracks the tri-state
//! result: loading, success with data, or error.
//!
//! # Stale-response suppression
//!
//! Producers are never cancelled. Instead each invocation is tagged with the
//! slot's next [`Generation`] and its result is committed only if that tag is
//! still current when it lands. Commit order therefore follows *issuance*
//! order, not resolution order:
//!
//! ```text
//! Load(1) ──► gen-1 ─────────────────────────► resolves last: dropped
//! Load(2) ──────► gen-2 ──► resolves: committed
//! ```
//!
//! # Example
//!
//! ```
//! use loadable_core::fetch::{Commit, FetchState};
//! use loadable_core::Failure;
//!
//! let mut slot: FetchState<u32, &str> = FetchState::new();
//! let (_, first) = slot.issue(1).unwrap_or_default();
//! let (_, second) = slot.issue(2).unwrap_or_default();
//!
//! assert_eq!(slot.commit(second, Ok("event 2")), Commit::Applied);
//! assert_eq!(slot.commit(first, Err(Failure::new("late"))), Commit::Stale);
//! assert_eq!(slot.data(), Some(&"event 2"));
//! assert!(slot.error().is_none());
//! ```

use crate::effect::Effect;
use crate::error::{AsyncError, BoxError, Failure};
use crate::generation::Generation;
use crate::reducer::Reducer;
use crate::{SmallVec, smallvec};
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Asynchronous source of data for a fetch slot.
///
/// The slot binds the producer to its current key, so from the page's point of
/// view a producer is a zero-argument request. Implemented for any
/// `Fn(&K) -> impl Future<Output = Result<T, BoxError>>`.
///
/// The returned future must own everything it needs (`'static`): it runs on
/// the runtime after the reducer has returned.
pub trait Producer<K, T>: Send + Sync {
    /// Start one request for `key`.
    fn produce(&self, key: &K) -> BoxFuture<'static, Result<T, BoxError>>;
}

impl<K, T, F, Fut> Producer<K, T> for F
where
    F: Fn(&K) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, BoxError>> + Send + 'static,
{
    fn produce(&self, key: &K) -> BoxFuture<'static, Result<T, BoxError>> {
        self(key).boxed()
    }
}

/// A producer that only runs when its key passes a gate.
///
/// When the gate is closed the request resolves immediately to
/// `T::default()` and the inner producer is never called. Pages use this
/// for data that requires an authenticated user: the slot keeps the same
/// lifecycle whether or not a request actually goes out.
///
/// # Example
///
/// ```
/// use loadable_core::fetch::{Gated, Producer};
///
/// let users = Gated::new(
///     |_: &Option<u32>| async { Ok::<_, loadable_core::BoxError>(vec!["ada"]) },
///     Option::<u32>::is_some,
/// );
///
/// # tokio_test::block_on(async {
/// assert!(users.produce(&None).await.unwrap_or_default().is_empty());
/// assert_eq!(users.produce(&Some(1)).await.unwrap_or_default(), vec!["ada"]);
/// # });
/// ```
pub struct Gated<P, K> {
    inner: P,
    open: fn(&K) -> bool,
}

impl<P, K> Gated<P, K> {
    /// Wrap `inner`, running it only for keys where `open` returns `true`.
    pub const fn new(inner: P, open: fn(&K) -> bool) -> Self {
        Self { inner, open }
    }
}

impl<P, K, T> Producer<K, T> for Gated<P, K>
where
    P: Producer<K, T>,
    T: Default + Send + 'static,
{
    fn produce(&self, key: &K) -> BoxFuture<'static, Result<T, BoxError>> {
        if (self.open)(key) {
            self.inner.produce(key)
        } else {
            tracing::trace!("Gate closed, resolving with default value");
            futures::future::ready(Ok(T::default())).boxed()
        }
    }
}

/// A producer for optional keys.
///
/// `Some(key)` runs the inner producer for `key`; `None` resolves to
/// `T::default()` without a request. Use it when the inner producer needs the
/// unwrapped key, e.g. the signed-in user's id.
pub struct WhenSome<P>(P);

impl<P> WhenSome<P> {
    /// Wrap `inner`, which is only called with present keys.
    pub const fn new(inner: P) -> Self {
        Self(inner)
    }
}

impl<P, K, T> Producer<Option<K>, T> for WhenSome<P>
where
    P: Producer<K, T>,
    T: Default + Send + 'static,
{
    fn produce(&self, key: &Option<K>) -> BoxFuture<'static, Result<T, BoxError>> {
        match key {
            Some(key) => self.0.produce(key),
            None => {
                tracing::trace!("No key, resolving with default value");
                futures::future::ready(Ok(T::default())).boxed()
            },
        }
    }
}

/// Outcome of committing a result to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Commit {
    /// The result belonged to the current request and is now the slot's state
    Applied,
    /// A newer request was issued before this result landed; it was dropped
    Stale,
}

impl Commit {
    /// Whether the result changed the slot.
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// State of one fetch slot.
///
/// Created loading, with no data and no error. See the module docs for the
/// transitions.
#[derive(Debug, Clone)]
pub struct FetchState<K, T> {
    /// Last-seen dependency key
    key: Option<K>,
    /// Committed data together with the key it was loaded for
    data: Option<(K, T)>,
    loading: bool,
    error: Option<AsyncError>,
    generation: Generation,
}

impl<K, T> FetchState<K, T> {
    /// A freshly mounted slot: loading, no data, no error.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            key: None,
            data: None,
            loading: true,
            error: None,
            generation: Generation::INITIAL,
        }
    }

    /// The committed data, if the last successful load is still valid for the current key.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref().map(|(_, data)| data)
    }

    /// `true` while no result for the current request has landed.
    #[must_use]
    pub const fn loading(&self) -> bool {
        self.loading
    }

    /// The failure of the last committed request, if it failed.
    #[must_use]
    pub const fn error(&self) -> Option<&AsyncError> {
        self.error.as_ref()
    }

    /// The last-seen dependency key.
    #[must_use]
    pub const fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Generation of the most recently issued request.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Begin a new request for the current key.
    ///
    /// Keeps the committed data so the view does not flash empty while the
    /// request is in flight. Returns `None` if no key has been seen yet.
    pub fn reissue(&mut self) -> Option<(K, Generation)>
    where
        K: Clone,
    {
        let key = self.key.clone()?;
        Some((key, self.begin()))
    }

    /// Commit the result of the request tagged `generation`.
    ///
    /// Success replaces the data and clears the error. Failure replaces the
    /// error and leaves the data untouched. Results from superseded requests
    /// are dropped without touching the slot.
    pub fn commit(&mut self, generation: Generation, result: Result<T, Failure>) -> Commit
    where
        K: Clone,
    {
        if generation != self.generation || generation.is_initial() {
            return Commit::Stale;
        }

        self.loading = false;
        match result {
            Ok(data) => {
                self.error = None;
                if let Some(key) = self.key.clone() {
                    self.data = Some((key, data));
                }
            },
            Err(cause) => {
                self.error = Some(AsyncError::fetch(cause));
            },
        }
        Commit::Applied
    }

    fn begin(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.loading = true;
        self.error = None;
        self.generation
    }
}

impl<K: PartialEq, T> FetchState<K, T> {
    /// Record `key` as the slot's identity and begin a request for it.
    ///
    /// Returns `None` when `key` equals the last-seen key: the producer must
    /// not run again for an unchanged identity. Otherwise any in-flight
    /// request becomes stale, and data loaded for a different key is cleared
    /// so the view never shows one entity's data under another's identity.
    pub fn issue(&mut self, key: K) -> Option<(K, Generation)>
    where
        K: Clone,
    {
        if self.key.as_ref() == Some(&key) {
            return None;
        }

        if self
            .data
            .as_ref()
            .is_some_and(|(loaded_for, _)| *loaded_for != key)
        {
            self.data = None;
        }
        self.key = Some(key.clone());
        Some((key, self.begin()))
    }
}

impl<K, T> Default for FetchState<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Inputs to a fetch slot.
#[derive(Debug, Clone)]
pub enum FetchAction<K, T> {
    /// Mount, or the dependency key changed
    Load(K),
    /// Re-run the producer for the current key
    Refetch,
    /// A producer invocation finished
    Resolved {
        /// Generation the request was issued under
        generation: Generation,
        /// What the producer returned
        result: Result<T, Failure>,
    },
}

/// Dependencies of a fetch slot.
pub struct FetchEnvironment<K, T> {
    producer: Arc<dyn Producer<K, T>>,
}

impl<K, T> FetchEnvironment<K, T> {
    /// Environment backed by `producer`.
    pub fn new<P>(producer: P) -> Self
    where
        P: Producer<K, T> + 'static,
    {
        Self {
            producer: Arc::new(producer),
        }
    }
}

impl<K, T> Clone for FetchEnvironment<K, T> {
    fn clone(&self) -> Self {
        Self {
            producer: Arc::clone(&self.producer),
        }
    }
}

impl<K, T> fmt::Debug for FetchEnvironment<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for a single fetch slot.
///
/// Embed it in a page reducer with [`scope`](crate::composition::scope).
pub struct FetchReducer<K, T> {
    _phantom: PhantomData<fn() -> (K, T)>,
}

impl<K, T> FetchReducer<K, T> {
    /// Create a new fetch reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<K, T> Default for FetchReducer<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T> Clone for FetchReducer<K, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, T> Copy for FetchReducer<K, T> {}

impl<K, T> fmt::Debug for FetchReducer<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FetchReducer")
    }
}

impl<K, T> FetchReducer<K, T>
where
    K: Send + 'static,
    T: Send + 'static,
{
    fn request(
        env: &FetchEnvironment<K, T>,
        key: &K,
        generation: Generation,
    ) -> Effect<FetchAction<K, T>> {
        metrics::counter!("fetch.issued").increment(1);
        let request = env.producer.produce(key);

        Effect::future(async move {
            let result = request.await.map_err(Failure::from);
            Some(FetchAction::Resolved { generation, result })
        })
    }
}

impl<K, T> Reducer for FetchReducer<K, T>
where
    K: Clone + PartialEq + fmt::Debug + Send + 'static,
    T: Send + 'static,
{
    type State = FetchState<K, T>;
    type Action = FetchAction<K, T>;
    type Environment = FetchEnvironment<K, T>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            FetchAction::Load(key) => {
                let Some((key, generation)) = state.issue(key) else {
                    tracing::trace!("Dependency key unchanged, producer not re-run");
                    return SmallVec::new();
                };
                tracing::debug!(?key, %generation, "Loading");
                smallvec![Self::request(env, &key, generation)]
            },
            FetchAction::Refetch => {
                let Some((key, generation)) = state.reissue() else {
                    tracing::debug!("Refetch before first load ignored");
                    return SmallVec::new();
                };
                tracing::debug!(?key, %generation, "Refetching");
                smallvec![Self::request(env, &key, generation)]
            },
            FetchAction::Resolved { generation, result } => {
                let failed = result.as_ref().err().map(ToString::to_string);
                match state.commit(generation, result) {
                    Commit::Applied => {
                        let outcome = if let Some(error) = failed {
                            tracing::warn!(%generation, %error, "Fetch failed");
                            "failure"
                        } else {
                            tracing::debug!(%generation, "Fetch committed");
                            "success"
                        };
                        metrics::counter!("fetch.committed", "outcome" => outcome).increment(1);
                    },
                    Commit::Stale => {
                        tracing::debug!(
                            %generation,
                            current = %state.generation(),
                            "Dropping stale fetch result"
                        );
                        metrics::counter!("fetch.stale_dropped").increment(1);
                    },
                }
                SmallVec::new()
            },
        }
    }
}
