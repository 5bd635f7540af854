//! Slice reducers and the root reducer composed from them.

pub mod approvals;
pub mod cart;
pub mod company;
pub mod quotes;

pub use approvals::ApprovalsReducer;
pub use cart::CartReducer;
pub use company::CompanyReducer;
pub use quotes::QuotesReducer;

use crate::actions::RootAction;
use crate::config::B2BConfig;
use crate::environment::B2BEnvironment;
use crate::types::{ApprovalsState, CartState, CompanyState, QuotesState, RootState};
use b2b_state_core::composition::{combine_reducers, scope_reducer, CombinedReducer};
use b2b_state_core::reducer::Reducer;
use std::sync::Arc;

fn company_slice(state: &RootState) -> &Arc<CompanyState> {
    &state.company
}

fn set_company_slice(state: &mut RootState, slice: Arc<CompanyState>) {
    state.company = slice;
}

fn quotes_slice(state: &RootState) -> &Arc<QuotesState> {
    &state.quotes
}

fn set_quotes_slice(state: &mut RootState, slice: Arc<QuotesState>) {
    state.quotes = slice;
}

fn approvals_slice(state: &RootState) -> &Arc<ApprovalsState> {
    &state.approvals
}

fn set_approvals_slice(state: &mut RootState, slice: Arc<ApprovalsState>) {
    state.approvals = slice;
}

fn cart_slice(state: &RootState) -> &Arc<CartState> {
    &state.cart
}

fn set_cart_slice(state: &mut RootState, slice: Arc<CartState>) {
    state.cart = slice;
}

/// The four slice reducers scoped onto [`RootState`]
///
/// Every action reaches exactly one slice reducer. Slices that are not
/// addressed keep their `Arc`, and the root is only copied when the
/// addressed slice actually changed.
pub struct RootReducer {
    combined: CombinedReducer<RootState, RootAction, B2BEnvironment>,
}

impl RootReducer {
    /// Root reducer whose slice initial states follow `config`
    #[must_use]
    pub fn new(config: &B2BConfig) -> Self {
        let combined: CombinedReducer<RootState, RootAction, B2BEnvironment> = combine_reducers(vec![
            Box::new(scope_reducer(
                CompanyReducer::new(),
                company_slice,
                set_company_slice,
                RootAction::into_company,
            )),
            Box::new(scope_reducer(
                QuotesReducer::new(config),
                quotes_slice,
                set_quotes_slice,
                RootAction::into_quotes,
            )),
            Box::new(scope_reducer(
                ApprovalsReducer::new(config),
                approvals_slice,
                set_approvals_slice,
                RootAction::into_approvals,
            )),
            Box::new(scope_reducer(
                CartReducer::new(config),
                cart_slice,
                set_cart_slice,
                RootAction::into_cart,
            )),
        ]);
        Self { combined }
    }
}

impl Default for RootReducer {
    fn default() -> Self {
        Self::new(&B2BConfig::default())
    }
}

impl std::fmt::Debug for RootReducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootReducer")
            .field("slices", &self.combined.len())
            .finish()
    }
}

impl Reducer for RootReducer {
    type State = RootState;
    type Action = RootAction;
    type Environment = B2BEnvironment;

    fn reduce(&self, state: &mut Arc<RootState>, action: RootAction, env: &B2BEnvironment) {
        self.combined.reduce(state, action, env);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{CartAction, QuoteAction};
    use crate::fixtures;
    use b2b_state_testing::{assertions, test_clock, ReducerTest};

    fn env() -> B2BEnvironment {
        B2BEnvironment::new(Arc::new(test_clock()))
    }

    #[test]
    fn routes_to_addressed_slice_only() {
        let root = Arc::new(RootState::default());
        let before = Arc::clone(&root);

        ReducerTest::new(RootReducer::default())
            .with_env(env())
            .given_shared_state(root)
            .when_action(RootAction::from(CartAction::AddItem {
                item: fixtures::cart_item("p1", 1.0, 1),
            }))
            .then_transition(assertions::assert_changed)
            .then_state(move |after| {
                assert!(Arc::ptr_eq(&before.company, &after.company));
                assert!(Arc::ptr_eq(&before.quotes, &after.quotes));
                assert!(Arc::ptr_eq(&before.approvals, &after.approvals));
                assert!(!Arc::ptr_eq(&before.cart, &after.cart));
            })
            .run();
    }

    #[test]
    fn slice_no_op_keeps_root_identity() {
        ReducerTest::new(RootReducer::default())
            .with_env(env())
            .given_state(RootState::default())
            .when_action(RootAction::from(CartAction::remove_item("ghost")))
            .then_transition(assertions::assert_unchanged)
            .run();
    }

    #[test]
    fn config_drives_initial_slices() {
        let config = B2BConfig::default()
            .with_default_page_size(5)
            .with_default_currency("EUR");
        let state = RootState::with_config(&config);
        assert_eq!(state.quotes.pagination.page_size, 5);
        assert_eq!(state.cart.totals.currency, "EUR");

        ReducerTest::new(RootReducer::new(&config))
            .with_env(env())
            .given_state(state)
            .when_actions([
                RootAction::from(QuoteAction::SetPageSize { page_size: 50 }),
                RootAction::from(QuoteAction::Reset),
            ])
            .then_state(|root| assert_eq!(root.quotes.pagination.page_size, 5))
            .run();
    }
}
