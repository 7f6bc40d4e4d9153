//! # Loadable Testing
//!
//! Testing utilities and helpers for the loadable architecture.
//!
//! This crate provides:
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - [`Deferred`], a producer and operation whose requests stay pending until
//!   the test resolves them, in any order
//! - Helpers to drive effects by hand and to install test logging
//!
//! ## Example
//!
//! ```
//! use loadable_core::fetch::{FetchAction, FetchEnvironment, FetchReducer, FetchState};
//! use loadable_core::reducer::Reducer;
//! use loadable_testing::{Deferred, helpers};
//!
//! # tokio_test::block_on(async {
//! let producer: Deferred<u32, String> = Deferred::new();
//! let env = FetchEnvironment::new(producer.clone());
//! let reducer = FetchReducer::new();
//! let mut state = FetchState::new();
//!
//! let effects = reducer.reduce(&mut state, FetchAction::Load(5), &env);
//! assert_eq!(producer.keys(), vec![5]);
//!
//! producer.succeed(0, "event 5".to_string());
//! for action in helpers::collect_actions(effects).await {
//!     let _ = reducer.reduce(&mut state, action, &env);
//! }
//! assert_eq!(state.data().map(String::as_str), Some("event 5"));
//! # });
//! ```

use chrono::{DateTime, Utc};

pub mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};

/// Controllable collaborators
pub mod mocks {
    use futures::future::{BoxFuture, FutureExt};
    use loadable_core::BoxError;
    use loadable_core::action::Operation;
    use loadable_core::fetch::Producer;
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
    use tokio::sync::oneshot;

    type Reply<T> = oneshot::Sender<Result<T, BoxError>>;

    struct Request<K, T> {
        key: K,
        reply: Option<Reply<T>>,
    }

    /// Producer (and operation) whose requests wait for the test.
    ///
    /// Every call is recorded in issue order. Nothing resolves until the test
    /// calls [`succeed`](Self::succeed) or [`fail`](Self::fail) with the
    /// request's index, so tests choose the resolution order freely.
    /// Dropping a `Deferred` with requests still pending resolves them with an
    /// error.
    pub struct Deferred<K, T> {
        requests: Arc<Mutex<Vec<Request<K, T>>>>,
    }

    impl<K, T> Deferred<K, T> {
        /// A producer with no recorded requests
        #[must_use]
        pub fn new() -> Self {
            Self {
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn requests(&self) -> MutexGuard<'_, Vec<Request<K, T>>> {
            self.requests.lock().unwrap_or_else(PoisonError::into_inner)
        }

        /// Number of requests issued so far
        #[must_use]
        pub fn calls(&self) -> usize {
            self.requests().len()
        }

        /// Number of issued requests not yet resolved
        #[must_use]
        pub fn pending(&self) -> usize {
            self.requests()
                .iter()
                .filter(|request| request.reply.is_some())
                .count()
        }

        /// Keys of all requests, in issue order
        #[must_use]
        pub fn keys(&self) -> Vec<K>
        where
            K: Clone,
        {
            self.requests()
                .iter()
                .map(|request| request.key.clone())
                .collect()
        }

        /// Resolve the `index`-th issued request with `result`
        ///
        /// Returns `false` if there is no such request or it was already
        /// resolved.
        pub fn resolve(&self, index: usize, result: Result<T, BoxError>) -> bool {
            let reply = self
                .requests()
                .get_mut(index)
                .and_then(|request| request.reply.take());
            reply.is_some_and(|reply| reply.send(result).is_ok())
        }

        /// Resolve the `index`-th issued request successfully
        pub fn succeed(&self, index: usize, value: T) -> bool {
            self.resolve(index, Ok(value))
        }

        /// Fail the `index`-th issued request with `message`
        pub fn fail(&self, index: usize, message: &str) -> bool {
            self.resolve(index, Err(message.into()))
        }

        fn enqueue(&self, key: K) -> BoxFuture<'static, Result<T, BoxError>>
        where
            T: Send + 'static,
        {
            let (reply, response) = oneshot::channel();
            self.requests().push(Request {
                key,
                reply: Some(reply),
            });
            response
                .map(|received| received.unwrap_or_else(|_| Err("request abandoned".into())))
                .boxed()
        }
    }

    impl<K, T> Default for Deferred<K, T> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<K, T> Clone for Deferred<K, T> {
        fn clone(&self) -> Self {
            Self {
                requests: Arc::clone(&self.requests),
            }
        }
    }

    impl<K, T> Producer<K, T> for Deferred<K, T>
    where
        K: Clone + Send,
        T: Send + 'static,
    {
        fn produce(&self, key: &K) -> BoxFuture<'static, Result<T, BoxError>> {
            self.enqueue(key.clone())
        }
    }

    impl<Args, T> Operation<Args> for Deferred<Args, T>
    where
        Args: Send,
        T: Send + 'static,
    {
        fn call(&self, args: Args) -> BoxFuture<'static, Result<(), BoxError>> {
            self.enqueue(args).map(|result| result.map(|_| ())).boxed()
        }
    }
}

/// Helpers for driving reducers without a store
pub mod helpers {
    use futures::future::{BoxFuture, FutureExt};
    use loadable_core::effect::Effect;

    /// Run every effect to completion and collect the actions they produce
    ///
    /// Parallel groups are flattened; the order of the returned actions
    /// follows the order of the effects, not completion time.
    pub async fn collect_actions<A, I>(effects: I) -> Vec<A>
    where
        I: IntoIterator<Item = Effect<A>>,
        A: Send + 'static,
    {
        let mut actions = Vec::new();
        for effect in effects {
            actions.extend(run(effect).await);
        }
        actions
    }

    fn run<A: Send + 'static>(effect: Effect<A>) -> BoxFuture<'static, Vec<A>> {
        async move {
            match effect {
                Effect::None => Vec::new(),
                Effect::Future(fut) => fut.await.into_iter().collect(),
                Effect::Parallel(effects) => {
                    let mut actions = Vec::new();
                    for effect in effects {
                        actions.extend(run(effect).await);
                    }
                    actions
                },
            }
        }
        .boxed()
    }

    /// Install a `tracing` subscriber that writes through the test harness
    ///
    /// Safe to call from every test; only the first call installs.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }
}

/// Fixed values for deterministic tests
pub mod fixtures {
    use super::{DateTime, Utc};

    /// A fixed point in time for event dates
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-01T18:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc)
    }
}

// Re-export commonly used items
pub use fixtures::test_time;
pub use mocks::Deferred;
