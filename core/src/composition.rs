//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers in various ways:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Focus a reducer on one field of a larger state and
//!   one family of a larger action enum
//!
//! Composition preserves identity: a parent state is only copied when at
//! least one child actually replaced its slice.
//!
//! # Examples
//!
//! ```
//! use b2b_state_core::Reducer;
//! use b2b_state_core::composition::{combine_reducers, scope_reducer};
//! use std::sync::Arc;
//!
//! #[derive(Clone, Default)]
//! struct CounterState {
//!     count: i32,
//! }
//!
//! #[derive(Clone, Default)]
//! struct AppState {
//!     counter: Arc<CounterState>,
//!     other: Arc<String>,
//! }
//!
//! #[derive(Clone)]
//! enum AppAction {
//!     Counter(i32),
//!     Other(String),
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = i32;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut Arc<CounterState>, delta: i32, _env: &()) {
//!         if delta != 0 {
//!             Arc::make_mut(state).count += delta;
//!         }
//!     }
//! }
//!
//! let scoped = scope_reducer(
//!     CounterReducer,
//!     |app: &AppState| &app.counter,
//!     |app: &mut AppState, counter| app.counter = counter,
//!     |action: AppAction| match action {
//!         AppAction::Counter(delta) => Some(delta),
//!         AppAction::Other(_) => None,
//!     },
//! );
//! let root = combine_reducers(vec![Box::new(scoped)]);
//!
//! let mut state = Arc::new(AppState::default());
//! root.reduce(&mut state, AppAction::Counter(3), &());
//! assert_eq!(state.counter.count, 3);
//!
//! let before = Arc::clone(&state);
//! root.reduce(&mut state, AppAction::Other("ignored".into()), &());
//! assert!(Arc::ptr_eq(&before, &state));
//! ```

use crate::reducer::Reducer;
use std::sync::Arc;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence against the state produced by the
/// previous one. The action is cloned for every reducer.
///
/// # Type Parameters
///
/// - `S`: The state type
/// - `A`: The action type
/// - `E`: The environment type
#[must_use]
pub fn combine_reducers<S, A, E>(
    reducers: Vec<Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>>,
) -> CombinedReducer<S, A, E>
where
    S: Clone + 'static,
    A: Clone + 'static,
    E: 'static,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E>
where
    S: Clone + 'static,
    A: Clone + 'static,
    E: 'static,
{
    reducers: Vec<Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>>,
}

impl<S, A, E> CombinedReducer<S, A, E>
where
    S: Clone + 'static,
    A: Clone + 'static,
    E: 'static,
{
    /// Number of child reducers
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Whether no child reducers were combined
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: Clone + 'static,
    A: Clone + 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(&self, state: &mut Arc<Self::State>, action: Self::Action, env: &Self::Environment) {
        for reducer in &self.reducers {
            reducer.reduce(state, action.clone(), env);
        }
    }
}

/// Scopes a reducer to operate on a subset of a larger state.
///
/// - `get_state` borrows the child slice out of the parent.
/// - `set_state` writes a replaced child slice back into the parent.
/// - `extract_action` maps a parent action to the child's action family,
///   returning `None` for actions the child does not handle.
///
/// The parent is copied (via [`Arc::make_mut`]) only when the child
/// reducer replaced its slice.
pub fn scope_reducer<S, SubS, A, SubA, E, R>(
    reducer: R,
    get_state: fn(&S) -> &Arc<SubS>,
    set_state: fn(&mut S, Arc<SubS>),
    extract_action: fn(A) -> Option<SubA>,
) -> ScopedReducer<S, SubS, A, SubA, E, R>
where
    S: Clone + 'static,
    SubS: Clone + 'static,
    A: 'static,
    SubA: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    ScopedReducer {
        reducer,
        get_state,
        set_state,
        extract_action,
        _phantom: std::marker::PhantomData,
    }
}

/// A scoped reducer that operates on a subset of state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, SubA, E, R>
where
    S: Clone + 'static,
    SubS: Clone + 'static,
    A: 'static,
    SubA: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    reducer: R,
    get_state: fn(&S) -> &Arc<SubS>,
    set_state: fn(&mut S, Arc<SubS>),
    extract_action: fn(A) -> Option<SubA>,
    _phantom: std::marker::PhantomData<fn() -> E>,
}

impl<S, SubS, A, SubA, E, R> Reducer for ScopedReducer<S, SubS, A, SubA, E, R>
where
    S: Clone + 'static,
    SubS: Clone + 'static,
    A: 'static,
    SubA: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(&self, state: &mut Arc<Self::State>, action: Self::Action, env: &Self::Environment) {
        let Some(child_action) = (self.extract_action)(action) else {
            return;
        };

        let mut child = Arc::clone((self.get_state)(state));
        self.reducer.reduce(&mut child, child_action, env);

        if !Arc::ptr_eq(&child, (self.get_state)(state)) {
            (self.set_state)(Arc::make_mut(state), child);
        }
    }
}
