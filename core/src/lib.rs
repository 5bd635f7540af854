//! # B2B State Core
//!
//! Core traits and primitives for the B2B state container.
//!
//! This crate provides the fundamental abstractions the domain crate is built
//! on: pure reducers over copy-on-write state, reducer composition, an
//! injectable clock, and the memoization primitives selectors use to keep
//! derived values identity-stable.
//!
//! ## Core Concepts
//!
//! - **State**: An immutable snapshot held behind [`std::sync::Arc`]
//! - **Action**: A tagged record describing a requested transition
//! - **Reducer**: Pure function `(State, Action, Environment) → State`
//! - **Selector**: Pure derivation `State → Value`, optionally memoized
//! - **Environment**: Injected dependencies (the clock)
//!
//! ## Identity
//!
//! Reducers mutate exclusively through [`std::sync::Arc::make_mut`]. A
//! transition that changes nothing never touches the `Arc`, so callers can
//! detect "nothing changed" with [`std::sync::Arc::ptr_eq`], and memoized
//! selectors short-circuit on the same check.
//!
//! ## Example
//!
//! ```
//! use b2b_state_core::reducer::Reducer;
//! use std::sync::Arc;
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! enum CounterAction {
//!     Increment,
//!     Noop,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut Arc<CounterState>, action: CounterAction, _env: &()) {
//!         match action {
//!             CounterAction::Increment => Arc::make_mut(state).count += 1,
//!             CounterAction::Noop => {},
//!         }
//!     }
//! }
//!
//! let before = Arc::new(CounterState::default());
//! let mut after = Arc::clone(&before);
//! CounterReducer.reduce(&mut after, CounterAction::Noop, &());
//! assert!(Arc::ptr_eq(&before, &after));
//!
//! CounterReducer.reduce(&mut after, CounterAction::Increment, &());
//! assert_eq!(after.count, 1);
//! assert_eq!(before.count, 0);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

/// Reducer composition utilities
pub mod composition;

/// Identity and shallow equality
pub mod identity;

/// Memoization primitives for selectors
pub mod memo;

/// Action module - the tagged input vocabulary of reducers
///
/// Every action enum exposes a stable string tag so that hosts can log,
/// route and persist actions without matching on the Rust type.
pub mod action {
    /// A tagged state-transition request.
    ///
    /// Usually derived with `#[derive(Action)]` from `b2b-state-macros`.
    pub trait Action {
        /// The discriminating tag of this action, e.g. `CART_ADD_ITEM`.
        fn action_type(&self) -> &'static str;
    }
}

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → State`.
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use std::sync::Arc;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Copy-on-write contract
    ///
    /// Implementations must only write through [`Arc::make_mut`], and only
    /// when the action actually changes something. Leaving the `Arc`
    /// untouched is how a reducer reports a no-op.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State: Clone;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into the next state
        ///
        /// # Arguments
        ///
        /// - `state`: Shared handle to the current state, replaced on change
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        fn reduce(
            &self,
            state: &mut Arc<Self::State>,
            action: Self::Action,
            env: &Self::Environment,
        );
    }
}

/// Environment module - Dependency injection traits
///
/// All sources of non-determinism are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use b2b_state_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let earlier = clock.now();
    /// assert!(clock.now() >= earlier);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

pub use action::Action;
pub use identity::{Identical, ShallowEq};
pub use reducer::Reducer;
