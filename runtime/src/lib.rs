//! # B2B State Runtime
//!
//! The [`Store`] is the single serializing dispatch point the reducers
//! assume: actions are applied one at a time under a write lock, readers
//! get cheap `Arc` snapshots, and observers can follow every dispatched
//! action through a broadcast channel.
//!
//! ## Example
//!
//! ```ignore
//! use b2b_state::{B2BEnvironment, RootReducer, RootState};
//! use b2b_state_runtime::Store;
//!
//! let store = Store::new(RootState::default(), RootReducer::default(), B2BEnvironment::default());
//!
//! // Send an action
//! store.send(CartAction::Clear.into()).await?;
//!
//! // Read state
//! let item_count = store.state(|s| s.cart.item_count).await;
//! ```

use b2b_state_core::{action::Action, reducer::Reducer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// Returned when `send()` is called after `shutdown()`.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Timeout waiting for a matching action
        ///
        /// Returned by `wait_for` when the timeout expires before a
        /// matching action is dispatched.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Default number of actions buffered for each observer
pub const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use b2b_state_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_broadcast_capacity(256);
/// assert_eq!(config.broadcast_capacity, 256);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Actions buffered per observer before the slowest one starts lagging
    pub broadcast_capacity: usize,
}

impl StoreConfig {
    /// Create a configuration with a custom broadcast capacity (at least 1)
    #[must_use]
    pub const fn new(broadcast_capacity: usize) -> Self {
        Self {
            broadcast_capacity: at_least_one(broadcast_capacity),
        }
    }

    /// Set the broadcast capacity (at least 1)
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = at_least_one(capacity);
        self
    }
}

const fn at_least_one(capacity: usize) -> usize {
    if capacity == 0 { 1 } else { capacity }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BROADCAST_CAPACITY)
    }
}

/// Store module - the runtime coordinator
pub mod store {
    use super::{
        broadcast, Action, Arc, AtomicBool, Duration, Ordering, Reducer, RwLock, StoreConfig,
        StoreError,
    };

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (an `Arc` snapshot behind a `RwLock`)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Action broadcast (observers)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: RwLock<Arc<S>>,
        reducer: R,
        environment: E,
        shutdown: AtomicBool,
        /// Every successfully dispatched action, in dispatch order.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        S: Clone,
        A: Action + Clone,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        ///
        /// # Example
        ///
        /// ```ignore
        /// let config = StoreConfig::default().with_broadcast_capacity(256);
        /// let store = Store::with_config(RootState::default(), RootReducer::default(), env, config);
        /// ```
        #[must_use]
        pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));

            Self {
                state: RwLock::new(Arc::new(initial_state)),
                reducer,
                environment,
                shutdown: AtomicBool::new(false),
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires the write lock on state
        /// 2. Calls the reducer with (state, action, environment)
        /// 3. Publishes the new snapshot
        /// 4. Broadcasts the action to observers, still under the lock
        ///
        /// Concurrent `send()` calls serialize at the write lock, so
        /// actions are applied one at a time in lock acquisition order and
        /// observers receive them in that same order.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip_all, name = "store_send", fields(action = action.action_type()))]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            let action_type = action.action_type();
            tracing::debug!("Processing action");
            metrics::counter!("store.actions.total", "action" => action_type).increment(1);

            let changed = {
                let mut state = self.state.write().await;
                let before = Arc::clone(&*state);

                let start = std::time::Instant::now();
                self.reducer
                    .reduce(&mut state, action.clone(), &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                // Broadcast under the write lock so observers see apply order.
                // No receivers is not an error: observers are optional.
                if self.action_broadcast.send(action).is_err() {
                    tracing::trace!("No action observers");
                }

                !Arc::ptr_eq(&before, &state)
            };

            if !changed {
                tracing::trace!("Reducer left state unchanged");
                metrics::counter!("store.actions.unchanged").increment(1);
            }

            Ok(())
        }

        /// Wait until an action matching `predicate` is dispatched
        ///
        /// Subscribe happens before waiting, so only actions sent after this
        /// call are considered. Lagged observers keep waiting; the timeout
        /// bounds the wait.
        ///
        /// # Errors
        ///
        /// - [`StoreError::ShutdownInProgress`]: Store is shutting down
        /// - [`StoreError::Timeout`]: Timeout expired before a match
        /// - [`StoreError::ChannelClosed`]: Action broadcast channel closed
        pub async fn wait_for<F>(&self, predicate: F, timeout: Duration) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool,
        {
            if self.is_shutting_down() {
                return Err(StoreError::ShutdownInProgress);
            }

            let mut rx = self.action_broadcast.subscribe();
            let wait = async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged");
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            };

            tokio::time::timeout(timeout, wait)
                .await
                .unwrap_or(Err(StoreError::Timeout))
        }

        /// Subscribe to every action dispatched from now on
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let pending = store.state(|s| s.approvals.pending_count).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// The current snapshot
        ///
        /// Cheap: clones the `Arc`. The snapshot never changes after it is
        /// returned, so it can be handed to selectors without holding a lock.
        pub async fn snapshot(&self) -> Arc<S> {
            Arc::clone(&*self.state.read().await)
        }

        /// Stop accepting actions
        ///
        /// Dispatch is synchronous, so there is nothing in flight to drain
        /// once the flag is set.
        pub fn shutdown(&self) {
            tracing::info!("Store shutting down");
            metrics::counter!("store.shutdown.initiated").increment(1);
            self.shutdown.store(true, Ordering::Release);
        }

        /// Whether [`Store::shutdown`] has been called
        #[must_use]
        pub fn is_shutting_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }
    }
}

pub use store::Store;
