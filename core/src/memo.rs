//! Memoization primitives for selectors.
//!
//! Five wrappers around pure functions, each holding its own cache:
//!
//! | Constructor                   | Cache key                          | Result stabilization |
//! |-------------------------------|------------------------------------|----------------------|
//! | [`memoize`]                   | identity of the single input       | none                 |
//! | [`create_selector`]           | identity of every input selection  | none                 |
//! | [`memoize_shallow`]           | identity of the single input       | [`ShallowEq`]        |
//! | [`memoize_with_param`]        | parameter, then input identity     | none                 |
//! | [`create_shallow_selector`]   | identity of every input selection  | [`ShallowEq`]        |
//!
//! Caches live in `RefCell`s: they are meant for a single-threaded render
//! loop and are neither `Sync` nor safe for concurrent writers. None of the
//! primitives can fail; the worst case is a cache miss and a recomputation.
//!
//! # Example
//!
//! ```
//! use b2b_state_core::memo::{create_selector, DerivedSelector};
//! use std::sync::Arc;
//!
//! struct State {
//!     prices: Arc<Vec<f64>>,
//!     tax_rate: f64,
//! }
//!
//! fn prices(state: &State) -> Arc<Vec<f64>> {
//!     Arc::clone(&state.prices)
//! }
//!
//! fn tax_rate(state: &State) -> f64 {
//!     state.tax_rate
//! }
//!
//! fn gross((prices, rate): &(Arc<Vec<f64>>, f64)) -> f64 {
//!     prices.iter().sum::<f64>() * (1.0 + rate)
//! }
//!
//! let total: DerivedSelector<State, _, f64> = create_selector((prices, tax_rate), gross);
//! let state = State { prices: Arc::new(vec![10.0, 20.0]), tax_rate: 0.5 };
//!
//! assert!((total.call(&state) - 45.0).abs() < f64::EPSILON);
//! assert!((total.call(&state) - 45.0).abs() < f64::EPSILON);
//! assert_eq!(total.recomputations(), 1);
//! ```

use crate::identity::{Identical, ShallowEq};
use std::borrow::Borrow;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;

/// Default number of entries kept by [`memoize_with_param`].
pub const DEFAULT_CACHE_SIZE: usize = 10;

type UnaryFn<I, O> = Box<dyn Fn(&I) -> O>;
type InputFn<S, D> = Box<dyn Fn(&S) -> D>;
type CombinerFn<D, O> = Box<dyn Fn(&D) -> O>;
type ParamFn<I, P, O> = Box<dyn Fn(&I, &P) -> O>;

fn bump(counter: &Cell<usize>) {
    counter.set(counter.get().saturating_add(1));
}

// ---------------------------------------------------------------------------
// Single-input cache
// ---------------------------------------------------------------------------

/// Single-input cache keyed by input identity.
///
/// Created by [`memoize`].
pub struct Memoized<I, O> {
    func: UnaryFn<I, O>,
    cache: RefCell<Option<(I, O)>>,
    recomputations: Cell<usize>,
}

/// Wraps `func` in a single-entry cache keyed by [`Identical`] input.
///
/// The cached output is returned as long as the input is identical to the
/// one seen on the previous call; otherwise the function runs and both
/// cached input and output are replaced.
pub fn memoize<I, O, F>(func: F) -> Memoized<I, O>
where
    I: Identical + Clone,
    O: Clone,
    F: Fn(&I) -> O + 'static,
{
    Memoized {
        func: Box::new(func),
        cache: RefCell::new(None),
        recomputations: Cell::new(0),
    }
}

impl<I, O> Memoized<I, O>
where
    I: Identical + Clone,
    O: Clone,
{
    /// Returns the cached output for an identical input, recomputing otherwise.
    pub fn call(&self, input: &I) -> O {
        {
            let cache = self.cache.borrow();
            if let Some((cached_input, cached_output)) = cache.as_ref() {
                if cached_input.identical(input) {
                    return cached_output.clone();
                }
            }
        }

        let output = (self.func)(input);
        bump(&self.recomputations);
        *self.cache.borrow_mut() = Some((input.clone(), output.clone()));
        output
    }

    /// How many times the wrapped function actually ran.
    #[must_use]
    pub fn recomputations(&self) -> usize {
        self.recomputations.get()
    }

    /// Drops the cached entry.
    pub fn clear(&self) {
        self.cache.borrow_mut().take();
    }
}

impl<I, O> fmt::Debug for Memoized<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("cached", &self.cache.borrow().is_some())
            .field("recomputations", &self.recomputations.get())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Shallow-equality result cache
// ---------------------------------------------------------------------------

/// Single-input cache that also stabilizes its result by [`ShallowEq`].
///
/// Created by [`memoize_shallow`].
pub struct ShallowMemoized<I, O> {
    func: UnaryFn<I, O>,
    cache: RefCell<Option<(I, O)>>,
    recomputations: Cell<usize>,
}

/// Like [`memoize`], but when a recomputation produces a result that is
/// shallowly equal to the previous one, the previous result is kept and
/// returned instead, so consumers comparing by identity see no change.
pub fn memoize_shallow<I, O, F>(func: F) -> ShallowMemoized<I, O>
where
    I: Identical + Clone,
    O: ShallowEq + Clone,
    F: Fn(&I) -> O + 'static,
{
    ShallowMemoized {
        func: Box::new(func),
        cache: RefCell::new(None),
        recomputations: Cell::new(0),
    }
}

impl<I, O> ShallowMemoized<I, O>
where
    I: Identical + Clone,
    O: ShallowEq + Clone,
{
    /// Returns a result that is identity-stable across shallowly equal recomputations.
    pub fn call(&self, input: &I) -> O {
        {
            let cache = self.cache.borrow();
            if let Some((cached_input, cached_output)) = cache.as_ref() {
                if cached_input.identical(input) {
                    return cached_output.clone();
                }
            }
        }

        let computed = (self.func)(input);
        bump(&self.recomputations);

        let mut cache = self.cache.borrow_mut();
        let output = match cache.as_ref() {
            Some((_, previous)) if previous.shallow_eq(&computed) => previous.clone(),
            _ => computed,
        };
        *cache = Some((input.clone(), output.clone()));
        output
    }

    /// How many times the wrapped function actually ran.
    #[must_use]
    pub fn recomputations(&self) -> usize {
        self.recomputations.get()
    }

    /// Drops the cached entry.
    pub fn clear(&self) {
        self.cache.borrow_mut().take();
    }
}

impl<I, O> fmt::Debug for ShallowMemoized<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShallowMemoized")
            .field("cached", &self.cache.borrow().is_some())
            .field("recomputations", &self.recomputations.get())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// N-ary derived cache
// ---------------------------------------------------------------------------

/// An ordered list of input selectors, expressed as a tuple of functions.
///
/// Implemented for tuples of 1 to 8 functions `Fn(&S) -> T`, where every
/// `T` is [`Identical`]. The combined output is the tuple of selections.
pub trait InputSelectors<S: ?Sized> {
    /// The tuple of selected values.
    type Output: Identical + Clone;

    /// Runs every input selector against `state`, in order.
    fn select(&self, state: &S) -> Self::Output;
}

macro_rules! impl_input_selectors {
    ($($func:ident $out:ident $idx:tt),+) => {
        impl<S: ?Sized, $($func, $out),+> InputSelectors<S> for ($($func,)+)
        where
            $(
                $func: Fn(&S) -> $out,
                $out: Identical + Clone,
            )+
        {
            type Output = ($($out,)+);

            fn select(&self, state: &S) -> Self::Output {
                ($((self.$idx)(state),)+)
            }
        }
    };
}

impl_input_selectors!(F0 T0 0);
impl_input_selectors!(F0 T0 0, F1 T1 1);
impl_input_selectors!(F0 T0 0, F1 T1 1, F2 T2 2);
impl_input_selectors!(F0 T0 0, F1 T1 1, F2 T2 2, F3 T3 3);
impl_input_selectors!(F0 T0 0, F1 T1 1, F2 T2 2, F3 T3 3, F4 T4 4);
impl_input_selectors!(F0 T0 0, F1 T1 1, F2 T2 2, F3 T3 3, F4 T4 4, F5 T5 5);
impl_input_selectors!(F0 T0 0, F1 T1 1, F2 T2 2, F3 T3 3, F4 T4 4, F5 T5 5, F6 T6 6);
impl_input_selectors!(F0 T0 0, F1 T1 1, F2 T2 2, F3 T3 3, F4 T4 4, F5 T5 5, F6 T6 6, F7 T7 7);

/// Dependency-tracked derived cache.
///
/// Created by [`create_selector`] (no stabilization) or
/// [`create_shallow_selector`] (result stabilized by [`ShallowEq`]).
pub struct DerivedSelector<S: ?Sized, D, O> {
    inputs: InputFn<S, D>,
    combiner: CombinerFn<D, O>,
    stabilize: Option<fn(&O, &O) -> bool>,
    cache: RefCell<Option<(D, O)>>,
    recomputations: Cell<usize>,
}

/// Builds a derived selector from an ordered tuple of input selectors and a
/// combiner over their results.
///
/// On every call all input selectors run; when every result is identical
/// to the previous call's, the previous combined result is returned without
/// invoking the combiner.
pub fn create_selector<S, I, O, C>(inputs: I, combiner: C) -> DerivedSelector<S, I::Output, O>
where
    S: ?Sized + 'static,
    I: InputSelectors<S> + 'static,
    O: Clone,
    C: Fn(&I::Output) -> O + 'static,
{
    DerivedSelector {
        inputs: Box::new(move |state: &S| inputs.select(state)),
        combiner: Box::new(combiner),
        stabilize: None,
        cache: RefCell::new(None),
        recomputations: Cell::new(0),
    }
}

/// [`create_selector`] combined with [`ShallowEq`] result stabilization.
pub fn create_shallow_selector<S, I, O, C>(inputs: I, combiner: C) -> DerivedSelector<S, I::Output, O>
where
    S: ?Sized + 'static,
    I: InputSelectors<S> + 'static,
    O: ShallowEq + Clone,
    C: Fn(&I::Output) -> O + 'static,
{
    DerivedSelector {
        inputs: Box::new(move |state: &S| inputs.select(state)),
        combiner: Box::new(combiner),
        stabilize: Some(O::shallow_eq),
        cache: RefCell::new(None),
        recomputations: Cell::new(0),
    }
}

impl<S: ?Sized, D, O> DerivedSelector<S, D, O>
where
    D: Identical + Clone,
    O: Clone,
{
    /// Derives the value for `state`, reusing the previous result when no
    /// input selection changed.
    pub fn call(&self, state: &S) -> O {
        let dependencies = (self.inputs)(state);
        {
            let cache = self.cache.borrow();
            if let Some((cached_dependencies, cached_output)) = cache.as_ref() {
                if cached_dependencies.identical(&dependencies) {
                    return cached_output.clone();
                }
            }
        }

        let computed = (self.combiner)(&dependencies);
        bump(&self.recomputations);

        let mut cache = self.cache.borrow_mut();
        let output = match (cache.as_ref(), self.stabilize) {
            (Some((_, previous)), Some(same)) if same(previous, &computed) => previous.clone(),
            _ => computed,
        };
        *cache = Some((dependencies, output.clone()));
        output
    }

    /// How many times the combiner actually ran.
    #[must_use]
    pub fn recomputations(&self) -> usize {
        self.recomputations.get()
    }

    /// Drops the cached entry.
    pub fn clear(&self) {
        self.cache.borrow_mut().take();
    }
}

impl<S: ?Sized, D, O> fmt::Debug for DerivedSelector<S, D, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedSelector")
            .field("shallow", &self.stabilize.is_some())
            .field("cached", &self.cache.borrow().is_some())
            .field("recomputations", &self.recomputations.get())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Parameterized cache
// ---------------------------------------------------------------------------

/// Bounded cache keyed by an extra parameter.
///
/// Created by [`memoize_with_param`].
pub struct ParamMemoized<I, P, O> {
    func: ParamFn<I, P, O>,
    capacity: usize,
    entries: RefCell<HashMap<P, (I, O)>>,
    insertion_order: RefCell<VecDeque<P>>,
    recomputations: Cell<usize>,
}

/// Wraps `func(input, param)` in a cache holding at most `capacity`
/// parameters (at least one).
///
/// A hit requires the same parameter *and* an input identical to the one
/// last seen for that parameter. When full, the least recently inserted
/// parameter is evicted; recomputing an existing parameter keeps its
/// original insertion position.
pub fn memoize_with_param<I, P, O, F>(func: F, capacity: usize) -> ParamMemoized<I, P, O>
where
    I: Identical + Clone,
    P: Hash + Eq + Clone,
    O: Clone,
    F: Fn(&I, &P) -> O + 'static,
{
    ParamMemoized {
        func: Box::new(func),
        capacity: capacity.max(1),
        entries: RefCell::new(HashMap::new()),
        insertion_order: RefCell::new(VecDeque::new()),
        recomputations: Cell::new(0),
    }
}

impl<I, P, O> ParamMemoized<I, P, O>
where
    I: Identical + Clone,
    P: Hash + Eq + Clone,
    O: Clone,
{
    /// Returns the cached output for `(input, param)`, recomputing otherwise.
    pub fn call<Q>(&self, input: &I, param: &Q) -> O
    where
        P: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = P> + ?Sized,
    {
        {
            let entries = self.entries.borrow();
            if let Some((cached_input, cached_output)) = entries.get(param) {
                if cached_input.identical(input) {
                    return cached_output.clone();
                }
            }
        }

        let key = param.to_owned();
        let output = (self.func)(input, &key);
        bump(&self.recomputations);

        let mut entries = self.entries.borrow_mut();
        let mut order = self.insertion_order.borrow_mut();
        if entries
            .insert(key.clone(), (input.clone(), output.clone()))
            .is_none()
        {
            order.push_back(key);
            while order.len() > self.capacity {
                if let Some(oldest) = order.pop_front() {
                    entries.remove::<P>(&oldest);
                }
            }
        }
        output
    }

    /// Number of cached parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Maximum number of cached parameters.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether `param` currently has a cache entry.
    pub fn contains<Q>(&self, param: &Q) -> bool
    where
        P: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.borrow().contains_key(param)
    }

    /// How many times the wrapped function actually ran.
    #[must_use]
    pub fn recomputations(&self) -> usize {
        self.recomputations.get()
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
        self.insertion_order.borrow_mut().clear();
    }
}

impl<I, P, O> fmt::Debug for ParamMemoized<I, P, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamMemoized")
            .field("capacity", &self.capacity)
            .field("cached", &self.entries.borrow().len())
            .field("recomputations", &self.recomputations.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone)]
    struct State {
        items: Arc<Vec<u32>>,
        label: Arc<String>,
        flag: bool,
    }

    fn state() -> State {
        State {
            items: Arc::new(vec![1, 2, 3]),
            label: Arc::new("cart".to_string()),
            flag: false,
        }
    }

    fn items(state: &State) -> Arc<Vec<u32>> {
        Arc::clone(&state.items)
    }

    fn flag(state: &State) -> bool {
        state.flag
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Pair {
        items: Arc<Vec<u32>>,
        count: usize,
    }

    impl ShallowEq for Pair {
        fn shallow_eq(&self, other: &Self) -> bool {
            self.items.identical(&other.items) && self.count.identical(&other.count)
        }
    }

    #[test]
    fn memoize_reuses_output_for_identical_input() {
        let sum = memoize(|items: &Arc<Vec<u32>>| items.iter().sum::<u32>());
        let s = state();

        assert_eq!(sum.call(&s.items), 6);
        assert_eq!(sum.call(&s.items), 6);
        assert_eq!(sum.recomputations(), 1);

        let replaced = Arc::new(vec![1, 2, 3]);
        assert_eq!(sum.call(&replaced), 6);
        assert_eq!(sum.recomputations(), 2);

        sum.clear();
        assert_eq!(sum.call(&replaced), 6);
        assert_eq!(sum.recomputations(), 3);
    }

    #[test]
    fn memoize_shallow_keeps_previous_reference() {
        let s = state();
        let pair = memoize_shallow(|state: &Arc<State>| {
            Arc::new(Pair {
                items: Arc::clone(&state.items),
                count: state.items.len(),
            })
        });

        let first_state = Arc::new(s.clone());
        let first = pair.call(&first_state);

        // A new root sharing the same items: recomputed, but shallowly equal.
        let second_state = Arc::new(State { flag: true, ..s });
        let second = pair.call(&second_state);

        assert_eq!(pair.recomputations(), 2);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn derived_selector_skips_combiner_when_inputs_unchanged() {
        let selector: DerivedSelector<State, _, usize> =
            create_selector((items, flag), |(items, flag): &(Arc<Vec<u32>>, bool)| {
            if *flag { 0 } else { items.len() }
        });
        let s = state();

        assert_eq!(selector.call(&s), 3);
        assert_eq!(selector.call(&s.clone()), 3);
        assert_eq!(selector.recomputations(), 1);

        let flipped = State { flag: true, ..s };
        assert_eq!(selector.call(&flipped), 0);
        assert_eq!(selector.recomputations(), 2);
    }

    #[test]
    fn shallow_selector_stabilizes_identity() {
        let selector: DerivedSelector<State, _, Arc<Pair>> =
            create_shallow_selector((items, flag), |(items, _): &(Arc<Vec<u32>>, bool)| {
            Arc::new(Pair {
                items: Arc::clone(items),
                count: items.len(),
            })
        });
        let s = state();
        let first = selector.call(&s);

        let flipped = State { flag: true, ..s.clone() };
        let second = selector.call(&flipped);
        assert_eq!(selector.recomputations(), 2);
        assert!(Arc::ptr_eq(&first, &second));

        let grown = State { items: Arc::new(vec![1]), ..s };
        let third = selector.call(&grown);
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.count, 1);
    }

    #[test]
    fn param_cache_hits_on_same_param_and_input() {
        let find = memoize_with_param(
            |items: &Arc<Vec<u32>>, wanted: &u32| items.iter().position(|i| i == wanted),
            DEFAULT_CACHE_SIZE,
        );
        let s = state();

        assert_eq!(find.call(&s.items, &2), Some(1));
        assert_eq!(find.call(&s.items, &2), Some(1));
        assert_eq!(find.recomputations(), 1);

        assert_eq!(find.call(&s.items, &9), None);
        assert_eq!(find.recomputations(), 2);

        let replaced = Arc::new(vec![2]);
        assert_eq!(find.call(&replaced, &2), Some(0));
        assert_eq!(find.recomputations(), 3);
        assert_eq!(find.len(), 2);
    }

    #[test]
    fn param_cache_evicts_oldest_insertion() {
        let label_len = memoize_with_param(
            |label: &Arc<String>, suffix: &String| label.len() + suffix.len(),
            2,
        );
        let s = state();

        label_len.call(&s.label, "a");
        label_len.call(&s.label, "bb");
        // Refreshing "a" with a new input keeps its original position.
        let other = Arc::new("other".to_string());
        label_len.call(&other, "a");
        label_len.call(&s.label, "ccc");

        assert_eq!(label_len.len(), 2);
        assert!(!label_len.contains("a"));
        assert!(label_len.contains("bb"));
        assert!(label_len.contains("ccc"));
        assert_eq!(label_len.capacity(), 2);
    }

    #[test]
    fn param_cache_capacity_is_at_least_one() {
        let cache = memoize_with_param(|v: &u32, p: &u32| v + p, 0);
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.call(&1, &1), 2);
        assert_eq!(cache.call(&1, &2), 3);
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn param_cache_is_bounded_and_evicts_in_insertion_order(
                capacity in 1_usize..6,
                params in prop::collection::vec(0_u8..12, 1..40),
            ) {
                let cache = memoize_with_param(|v: &u32, p: &u8| v + u32::from(*p), capacity);
                let mut expected: Vec<u8> = Vec::new();

                for param in &params {
                    cache.call(&1, param);
                    if !expected.contains(param) {
                        expected.push(*param);
                        if expected.len() > capacity {
                            expected.remove(0);
                        }
                    }
                    prop_assert!(cache.len() <= capacity);
                }

                prop_assert_eq!(cache.len(), expected.len());
                for param in &expected {
                    prop_assert!(cache.contains(param));
                }
            }

            #[test]
            fn derived_selector_reuses_result_for_identical_inputs(
                values in prop::collection::vec(any::<u32>(), 0..20),
                flags in prop::collection::vec(any::<bool>(), 1..10),
            ) {
                let selector: DerivedSelector<State, _, Arc<Vec<u32>>> = create_selector(
                    (items, flag),
                    |(items, _): &(Arc<Vec<u32>>, bool)| Arc::new(items.iter().rev().copied().collect()),
                );
                let base = State {
                    items: Arc::new(values),
                    ..state()
                };

                let mut previous: Option<(bool, Arc<Vec<u32>>)> = None;
                for flag in flags {
                    let current = State { flag, ..base.clone() };
                    let output = selector.call(&current);
                    if let Some((last_flag, last_output)) = &previous {
                        prop_assert_eq!(Arc::ptr_eq(last_output, &output), *last_flag == flag);
                    }
                    previous = Some((flag, output));
                }
            }
        }
    }
}
