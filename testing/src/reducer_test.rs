//! Ergonomic testing utilities for reducers
//!
//! This module provides a fluent API for testing reducers with readable
//! Given-When-Then syntax, plus assertions about copy-on-write identity.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use b2b_state_core::reducer::Reducer;
use std::sync::Arc;

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for before/after assertion functions
type TransitionAssertion<S> = Box<dyn FnOnce(&Arc<S>, &Arc<S>)>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// # Example
///
/// ```ignore
/// use b2b_state_testing::ReducerTest;
///
/// ReducerTest::new(CartReducer::new())
///     .with_env(test_environment())
///     .given_state(CartState::default())
///     .when_action(CartAction::AddItem { item })
///     .then_state(|state| {
///         assert_eq!(state.item_count, 3);
///     })
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<Arc<S>>,
    actions: Vec<A>,
    state_assertions: Vec<StateAssertion<S>>,
    transition_assertions: Vec<TransitionAssertion<S>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
    S: Clone,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
            transition_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(Arc::new(state));
        self
    }

    /// Set the initial state from an existing shared handle (Given)
    ///
    /// Use this when the test needs to compare identities afterwards.
    #[must_use]
    pub fn given_shared_state(mut self, state: Arc<S>) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Add an action to dispatch (When); actions run in the order added
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Add several actions to dispatch (When)
    #[must_use]
    pub fn when_actions(mut self, actions: impl IntoIterator<Item = A>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion comparing the state before and after (Then)
    #[must_use]
    pub fn then_transition<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&Arc<S>, &Arc<S>) + 'static,
    {
        self.transition_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if initial state, action, or environment is not set,
    /// or if any assertions fail.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let before = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        assert!(
            !self.actions.is_empty(),
            "At least one action must be set with when_action()"
        );

        let env = self
            .environment
            .expect("Environment must be set with with_env()");

        let mut after = Arc::clone(&before);
        for action in self.actions {
            self.reducer.reduce(&mut after, action, &env);
        }

        for assertion in self.state_assertions {
            assertion(&after);
        }

        for assertion in self.transition_assertions {
            assertion(&before, &after);
        }
    }
}

/// Helper assertions for transitions
pub mod assertions {
    use std::sync::Arc;

    /// Assert that the transition was a no-op (same `Arc`)
    ///
    /// # Panics
    ///
    /// Panics if the reducer replaced the state.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_unchanged<S>(before: &Arc<S>, after: &Arc<S>) {
        assert!(
            Arc::ptr_eq(before, after),
            "Expected the state to be returned unchanged, but it was replaced"
        );
    }

    /// Assert that the transition produced a new state
    ///
    /// # Panics
    ///
    /// Panics if the reducer left the state untouched.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_changed<S>(before: &Arc<S>, after: &Arc<S>) {
        assert!(
            !Arc::ptr_eq(before, after),
            "Expected a new state, but the reducer returned the input unchanged"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct TestState {
        count: i32,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        Decrement,
        Noop,
    }

    struct TestReducer;

    struct TestEnv;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(&self, state: &mut Arc<Self::State>, action: Self::Action, _env: &TestEnv) {
            match action {
                TestAction::Increment => Arc::make_mut(state).count += 1,
                TestAction::Decrement => Arc::make_mut(state).count -= 1,
                TestAction::Noop => {},
            }
        }
    }

    #[test]
    fn test_reducer_test_increment() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Increment)
            .then_state(|state| {
                assert_eq!(state.count, 1);
            })
            .then_transition(assertions::assert_changed)
            .run();
    }

    #[test]
    fn test_reducer_test_sequence() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 5 })
            .when_actions([TestAction::Decrement, TestAction::Decrement])
            .then_state(|state| {
                assert_eq!(state.count, 3);
            })
            .run();
    }

    #[test]
    fn test_assertions_unchanged() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 5 })
            .when_action(TestAction::Noop)
            .then_transition(assertions::assert_unchanged)
            .run();
    }
}
