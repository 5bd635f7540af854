//! Cart selectors.

use crate::config::B2BConfig;
use crate::persistence::CartSnapshot;
use crate::types::{
    B2BCartItem, B2BCartTotals, CartState, CheckoutBlock, LoadingStatus, RootState,
    SpendingValidation,
};
use b2b_state_core::memo::{
    create_shallow_selector, memoize, memoize_with_param, DerivedSelector, Memoized,
    ParamMemoized,
};
use b2b_state_macros::ShallowEq;
use chrono::{DateTime, Utc};
use std::sync::Arc;

// ========== Raw accessors ==========

/// The cart slice
#[must_use]
pub fn select_cart_state(state: &RootState) -> Arc<CartState> {
    Arc::clone(&state.cart)
}

/// Cart lines
#[must_use]
pub fn select_cart_items(state: &RootState) -> Arc<Vec<B2BCartItem>> {
    Arc::clone(&state.cart.items)
}

/// Sum of quantities
#[must_use]
pub fn select_cart_item_count(state: &RootState) -> u32 {
    state.cart.item_count
}

/// Cost breakdown
#[must_use]
pub fn select_cart_totals(state: &RootState) -> Arc<B2BCartTotals> {
    Arc::clone(&state.cart.totals)
}

/// Spending limit compliance
#[must_use]
pub fn select_spending_validation(state: &RootState) -> Arc<SpendingValidation> {
    Arc::clone(&state.cart.spending_validation)
}

/// Whether the order may be submitted
#[must_use]
pub fn select_can_checkout(state: &RootState) -> bool {
    state.cart.can_checkout
}

/// Why checkout is blocked
#[must_use]
pub fn select_checkout_blocked_reason(state: &RootState) -> Option<CheckoutBlock> {
    state.cart.checkout_blocked_reason
}

/// Selected delivery address
#[must_use]
pub fn select_shipping_address_id(state: &RootState) -> Option<String> {
    state.cart.shipping_address_id.clone()
}

/// Buyer's purchase order number
#[must_use]
pub fn select_purchase_order_number(state: &RootState) -> Option<String> {
    state.cart.purchase_order_number.clone()
}

/// Order notes
#[must_use]
pub fn select_cart_notes(state: &RootState) -> Option<String> {
    state.cart.notes.clone()
}

/// Server sync lifecycle
#[must_use]
pub fn select_cart_status(state: &RootState) -> LoadingStatus {
    state.cart.status
}

/// Last sync error
#[must_use]
pub fn select_cart_error(state: &RootState) -> Option<String> {
    state.cart.error.clone()
}

/// Last structural change
#[must_use]
pub fn select_cart_last_updated_at(state: &RootState) -> Option<DateTime<Utc>> {
    state.cart.last_updated_at
}

// ========== Simple derivations ==========

/// Number of distinct products
#[must_use]
pub fn select_unique_item_count(state: &RootState) -> usize {
    state.cart.items.len()
}

/// Whether the cart has no lines
#[must_use]
pub fn select_is_cart_empty(state: &RootState) -> bool {
    state.cart.items.is_empty()
}

/// Locally computed subtotal
#[must_use]
pub fn select_cart_subtotal(state: &RootState) -> f64 {
    state.cart.totals.subtotal
}

/// Whether any discount applies
#[must_use]
pub fn select_has_discounts(state: &RootState) -> bool {
    state.cart.totals.total_discount > 0.0
}

/// Whether the order needs an approver
#[must_use]
pub fn select_requires_approval(state: &RootState) -> bool {
    state.cart.spending_validation.requires_approval
}

/// Whether a server sync is in flight
#[must_use]
pub fn select_is_cart_loading(state: &RootState) -> bool {
    state.cart.status.is_loading()
}

// ========== Read models ==========

/// Everything a checkout view needs, in one identity-stable value
#[derive(Clone, Debug, PartialEq, ShallowEq)]
pub struct CheckoutSummary {
    /// Sum of quantities
    pub item_count: u32,
    /// Cart lines
    pub items: Arc<Vec<B2BCartItem>>,
    /// Cost breakdown
    pub totals: Arc<B2BCartTotals>,
    /// Spending limit compliance
    pub spending_validation: Arc<SpendingValidation>,
    /// Whether the order may be submitted
    pub can_checkout: bool,
    /// Why checkout is blocked
    pub checkout_blocked_reason: Option<CheckoutBlock>,
}

type CheckoutInputs = (
    u32,
    Arc<Vec<B2BCartItem>>,
    Arc<B2BCartTotals>,
    Arc<SpendingValidation>,
    bool,
    Option<CheckoutBlock>,
);

fn checkout_summary(
    (item_count, items, totals, spending_validation, can_checkout, reason): &CheckoutInputs,
) -> Arc<CheckoutSummary> {
    Arc::new(CheckoutSummary {
        item_count: *item_count,
        items: Arc::clone(items),
        totals: Arc::clone(totals),
        spending_validation: Arc::clone(spending_validation),
        can_checkout: *can_checkout,
        checkout_blocked_reason: *reason,
    })
}

type PersistenceInputs = (
    Arc<Vec<B2BCartItem>>,
    Option<String>,
    Option<String>,
    Option<String>,
);

fn cart_snapshot((items, shipping, po_number, notes): &PersistenceInputs) -> Arc<CartSnapshot> {
    Arc::new(CartSnapshot {
        items: Arc::clone(items),
        shipping_address_id: shipping.clone(),
        purchase_order_number: po_number.clone(),
        notes: notes.clone(),
    })
}

/// Memoized cart selectors
///
/// Owns its caches; not `Sync`. Build one per render loop.
pub struct CartSelectors {
    item: ParamMemoized<Arc<Vec<B2BCartItem>>, String, Option<B2BCartItem>>,
    spending_warnings: Memoized<Arc<SpendingValidation>, Arc<Vec<String>>>,
    invalid_items: Memoized<Arc<Vec<B2BCartItem>>, Arc<Vec<B2BCartItem>>>,
    checkout_summary: DerivedSelector<RootState, CheckoutInputs, Arc<CheckoutSummary>>,
    cart_for_persistence: DerivedSelector<RootState, PersistenceInputs, Arc<CartSnapshot>>,
}

impl CartSelectors {
    /// Selectors whose parameterized caches hold `config.selector_cache_size` entries
    #[must_use]
    pub fn new(config: &B2BConfig) -> Self {
        Self {
            item: memoize_with_param(
                |items: &Arc<Vec<B2BCartItem>>, product_id: &String| {
                    items.iter().find(|item| &item.product_id == product_id).cloned()
                },
                config.selector_cache_size,
            ),
            spending_warnings: memoize(|validation: &Arc<SpendingValidation>| {
                Arc::new(validation.warnings.clone())
            }),
            invalid_items: memoize(|items: &Arc<Vec<B2BCartItem>>| {
                Arc::new(
                    items
                        .iter()
                        .filter(|item| !item.has_valid_quantity())
                        .cloned()
                        .collect(),
                )
            }),
            checkout_summary: create_shallow_selector(
                (
                    select_cart_item_count,
                    select_cart_items,
                    select_cart_totals,
                    select_spending_validation,
                    select_can_checkout,
                    select_checkout_blocked_reason,
                ),
                checkout_summary,
            ),
            cart_for_persistence: create_shallow_selector(
                (
                    select_cart_items,
                    select_shipping_address_id,
                    select_purchase_order_number,
                    select_cart_notes,
                ),
                cart_snapshot,
            ),
        }
    }

    /// Line for `product_id`
    #[must_use]
    pub fn cart_item(&self, state: &RootState, product_id: &str) -> Option<B2BCartItem> {
        self.item.call(&state.cart.items, product_id)
    }

    /// Whether `product_id` is in the cart
    #[must_use]
    pub fn is_in_cart(&self, state: &RootState, product_id: &str) -> bool {
        self.cart_item(state, product_id).is_some()
    }

    /// Quantity of `product_id`, 0 when absent
    #[must_use]
    pub fn item_quantity(&self, state: &RootState, product_id: &str) -> u32 {
        self.cart_item(state, product_id)
            .map_or(0, |item| item.quantity)
    }

    /// Spending warnings
    #[must_use]
    pub fn spending_warnings(&self, state: &RootState) -> Arc<Vec<String>> {
        self.spending_warnings.call(&state.cart.spending_validation)
    }

    /// Lines whose quantity is outside their bounds
    #[must_use]
    pub fn invalid_items(&self, state: &RootState) -> Arc<Vec<B2BCartItem>> {
        self.invalid_items.call(&state.cart.items)
    }

    /// Checkout read model
    #[must_use]
    pub fn checkout_summary(&self, state: &RootState) -> Arc<CheckoutSummary> {
        self.checkout_summary.call(state)
    }

    /// Persistable subset of the cart
    #[must_use]
    pub fn cart_for_persistence(&self, state: &RootState) -> Arc<CartSnapshot> {
        self.cart_for_persistence.call(state)
    }

    /// Drops every cached value
    pub fn clear(&self) {
        self.item.clear();
        self.spending_warnings.clear();
        self.invalid_items.clear();
        self.checkout_summary.clear();
        self.cart_for_persistence.clear();
    }

    /// Combiner runs of the checkout summary
    #[must_use]
    pub fn checkout_summary_recomputations(&self) -> usize {
        self.checkout_summary.recomputations()
    }
}

impl Default for CartSelectors {
    fn default() -> Self {
        Self::new(&B2BConfig::default())
    }
}

impl std::fmt::Debug for CartSelectors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartSelectors")
            .field("item", &self.item)
            .field("checkout_summary", &self.checkout_summary)
            .finish_non_exhaustive()
    }
}
