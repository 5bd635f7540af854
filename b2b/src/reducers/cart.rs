//! Cart reducer.
//!
//! After every structural change the reducer recomputes `item_count`, the
//! local totals and checkout eligibility, and stamps `last_updated_at`.
//! Actions that reference a product missing from the cart leave the state
//! untouched.

use crate::actions::CartAction;
use crate::config::B2BConfig;
use crate::environment::B2BEnvironment;
use crate::persistence::CartSnapshot;
use crate::types::{B2BCartItem, CartState, LoadingStatus};
use b2b_state_core::reducer::Reducer;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Reducer for the cart slice
#[derive(Debug, Clone)]
pub struct CartReducer {
    initial: Arc<CartState>,
}

impl CartReducer {
    /// Reducer whose initial cart uses `config`'s currency
    #[must_use]
    pub fn new(config: &B2BConfig) -> Self {
        Self {
            initial: Arc::new(CartState::new(config.default_currency.clone())),
        }
    }

    /// The state `Reset` restores
    #[must_use]
    pub fn initial_state(&self) -> Arc<CartState> {
        Arc::clone(&self.initial)
    }

    fn hydrated(&self, snapshot: CartSnapshot, now: DateTime<Utc>) -> CartState {
        let mut items: Vec<B2BCartItem> = Vec::with_capacity(snapshot.items.len());
        for item in snapshot.items.iter().cloned() {
            merge_item(&mut items, item);
        }

        let mut cart = CartState {
            items: Arc::new(items),
            shipping_address_id: snapshot.shipping_address_id,
            purchase_order_number: snapshot.purchase_order_number,
            notes: snapshot.notes,
            ..(*self.initial).clone()
        };
        refresh(&mut cart, now);
        cart
    }
}

impl Default for CartReducer {
    fn default() -> Self {
        Self::new(&B2BConfig::default())
    }
}

/// Merges `incoming` into `items` by product id.
///
/// A collision sums the quantities, clamped to the existing line's max;
/// otherwise the line is appended as requested.
fn merge_item(items: &mut Vec<B2BCartItem>, incoming: B2BCartItem) {
    if let Some(existing) = items
        .iter_mut()
        .find(|item| item.product_id == incoming.product_id)
    {
        let requested = existing.quantity.saturating_add(incoming.quantity);
        let quantity = requested.min(existing.max_order_quantity);
        if quantity < requested {
            tracing::debug!(
                product_id = %existing.product_id,
                requested,
                max = existing.max_order_quantity,
                "Clamped merged quantity to max order quantity"
            );
        }
        existing.set_quantity(quantity);
    } else {
        items.push(incoming.normalized());
    }
}

/// Recomputes every derived cart field.
fn refresh(cart: &mut CartState, now: DateTime<Utc>) {
    cart.item_count = cart
        .items
        .iter()
        .fold(0_u32, |count, item| count.saturating_add(item.quantity));
    let subtotal = cart.items.iter().map(|item| item.line_total).sum();
    cart.totals = Arc::new(cart.totals.recalculated(subtotal));
    sync_checkout(cart);
    cart.last_updated_at = Some(now);
}

/// Re-evaluates checkout eligibility.
fn sync_checkout(cart: &mut CartState) {
    let block = cart.checkout_block();
    cart.can_checkout = block.is_none();
    cart.checkout_blocked_reason = block;
}

impl Reducer for CartReducer {
    type State = CartState;
    type Action = CartAction;
    type Environment = B2BEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(&self, state: &mut Arc<CartState>, action: CartAction, env: &B2BEnvironment) {
        match action {
            // ========== Line items ==========
            CartAction::AddItem { item } => {
                let cart = Arc::make_mut(state);
                merge_item(Arc::make_mut(&mut cart.items), item);
                refresh(cart, env.clock.now());
            },

            CartAction::UpdateItemQuantity {
                product_id,
                quantity,
            } => {
                let Some(index) = state
                    .items
                    .iter()
                    .position(|item| item.product_id == product_id)
                else {
                    tracing::trace!(%product_id, "Quantity update for missing product ignored");
                    return;
                };

                let cart = Arc::make_mut(state);
                if let Some(item) = Arc::make_mut(&mut cart.items).get_mut(index) {
                    let clamped = item.clamp_quantity(quantity);
                    if clamped != quantity {
                        tracing::debug!(
                            %product_id,
                            requested = quantity,
                            clamped,
                            "Clamped quantity to order bounds"
                        );
                    }
                    item.set_quantity(clamped);
                }
                refresh(cart, env.clock.now());
            },

            CartAction::RemoveItem { product_id } => {
                if state.item(&product_id).is_none() {
                    tracing::trace!(%product_id, "Removal of missing product ignored");
                    return;
                }

                let cart = Arc::make_mut(state);
                Arc::make_mut(&mut cart.items).retain(|item| item.product_id != product_id);
                refresh(cart, env.clock.now());
            },

            CartAction::UpdateItemNotes { product_id, notes } => {
                let Some(index) = state
                    .items
                    .iter()
                    .position(|item| item.product_id == product_id)
                else {
                    tracing::trace!(%product_id, "Notes update for missing product ignored");
                    return;
                };

                let cart = Arc::make_mut(state);
                if let Some(item) = Arc::make_mut(&mut cart.items).get_mut(index) {
                    item.notes = notes;
                }
            },

            CartAction::BulkAdd { items } => {
                if items.is_empty() {
                    return;
                }

                let cart = Arc::make_mut(state);
                let lines = Arc::make_mut(&mut cart.items);
                for item in items {
                    merge_item(lines, item);
                }
                refresh(cart, env.clock.now());
            },

            CartAction::Clear => {
                let shipping_address_id = state.shipping_address_id.clone();
                let mut cleared = (*self.initial).clone();
                cleared.shipping_address_id = shipping_address_id;
                *state = Arc::new(cleared);
            },

            // ========== Checkout metadata ==========
            CartAction::SetShippingAddress { address_id } => {
                let cart = Arc::make_mut(state);
                cart.shipping_address_id = address_id;
                sync_checkout(cart);
            },

            CartAction::SetPurchaseOrderNumber {
                purchase_order_number,
            } => {
                Arc::make_mut(state).purchase_order_number = purchase_order_number;
            },

            CartAction::SetNotes { notes } => {
                Arc::make_mut(state).notes = notes;
            },

            // ========== Server-computed values ==========
            CartAction::UpdateTotals { totals } => {
                Arc::make_mut(state).totals = Arc::new(totals);
            },

            CartAction::UpdateSpendingValidation { validation } => {
                let cart = Arc::make_mut(state);
                cart.spending_validation = Arc::new(validation);
                sync_checkout(cart);
            },

            // ========== Sync lifecycle ==========
            CartAction::LoadingStart => {
                let cart = Arc::make_mut(state);
                cart.status = LoadingStatus::Loading;
                cart.error = None;
            },

            CartAction::LoadingSuccess => {
                let cart = Arc::make_mut(state);
                cart.status = LoadingStatus::Succeeded;
                cart.error = None;
            },

            CartAction::LoadingFailure { error } => {
                tracing::debug!(%error, "Cart sync failed");
                let cart = Arc::make_mut(state);
                cart.status = LoadingStatus::Failed;
                cart.error = Some(error);
            },

            // ========== Whole-cart replacement ==========
            CartAction::Hydrate { snapshot } => {
                *state = Arc::new(self.hydrated(snapshot, env.clock.now()));
            },

            CartAction::Reset => {
                *state = Arc::clone(&self.initial);
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::types::{CheckoutBlock, SpendingValidation};
    use b2b_state_testing::{assertions, test_clock, test_epoch, ReducerTest};

    fn env() -> B2BEnvironment {
        B2BEnvironment::new(Arc::new(test_clock()))
    }

    fn cart_with(items: Vec<B2BCartItem>) -> CartState {
        let mut cart = CartState::default();
        cart.items = Arc::new(items);
        refresh(&mut cart, test_epoch());
        cart
    }

    #[test]
    fn add_item_appends_and_recomputes() {
        ReducerTest::new(CartReducer::default())
            .with_env(env())
            .given_state(CartState::default())
            .when_action(CartAction::AddItem {
                item: fixtures::cart_item("p1", 10.0, 3),
            })
            .then_state(|cart| {
                assert_eq!(cart.items.len(), 1);
                assert_eq!(cart.item_count, 3);
                assert!((cart.totals.subtotal - 30.0).abs() < f64::EPSILON);
                assert_eq!(cart.last_updated_at, Some(test_epoch()));
                assert_eq!(
                    cart.checkout_blocked_reason,
                    Some(CheckoutBlock::MissingShippingAddress)
                );
            })
            .run();
    }

    #[test]
    fn add_existing_item_clamps_to_max() {
        let item = fixtures::cart_item("p1", 2.0, 3).with_order_bounds(1, 5);
        ReducerTest::new(CartReducer::default())
            .with_env(env())
            .given_state(CartState::default())
            .when_actions([
                CartAction::AddItem { item: item.clone() },
                CartAction::AddItem {
                    item: item.with_quantity(4),
                },
            ])
            .then_state(|cart| {
                assert_eq!(cart.items.len(), 1);
                assert_eq!(cart.item_count, 5);
                assert!((cart.totals.subtotal - 10.0).abs() < f64::EPSILON);
            })
            .run();
    }

    #[test]
    fn update_quantity_clamps_to_bounds() {
        let item = fixtures::cart_item("p1", 1.0, 10).with_order_bounds(5, 20);
        ReducerTest::new(CartReducer::default())
            .with_env(env())
            .given_state(cart_with(vec![item]))
            .when_action(CartAction::update_item_quantity("p1", 2))
            .then_state(|cart| {
                assert_eq!(cart.item("p1").map(|i| i.quantity), Some(5));
                assert_eq!(cart.item_count, 5);
            })
            .run();
    }

    #[test]
    fn missing_product_is_a_no_op() {
        let cart = Arc::new(cart_with(vec![fixtures::cart_item("p1", 1.0, 1)]));
        for action in [
            CartAction::update_item_quantity("ghost", 3),
            CartAction::remove_item("ghost"),
            CartAction::update_item_notes("ghost", Some("hi".into())),
            CartAction::BulkAdd { items: Vec::new() },
        ] {
            ReducerTest::new(CartReducer::default())
                .with_env(env())
                .given_shared_state(Arc::clone(&cart))
                .when_action(action)
                .then_transition(assertions::assert_unchanged)
                .run();
        }
    }

    #[test]
    fn remove_item_recomputes_eligibility() {
        ReducerTest::new(CartReducer::default())
            .with_env(env())
            .given_state(cart_with(vec![fixtures::cart_item("p1", 1.0, 1)]))
            .when_action(CartAction::remove_item("p1"))
            .then_state(|cart| {
                assert!(cart.items.is_empty());
                assert_eq!(cart.item_count, 0);
                assert!(!cart.can_checkout);
                assert_eq!(cart.checkout_blocked_reason, Some(CheckoutBlock::EmptyCart));
            })
            .run();
    }

    #[test]
    fn notes_update_touches_only_notes() {
        ReducerTest::new(CartReducer::default())
            .with_env(env())
            .given_state(cart_with(vec![fixtures::cart_item("p1", 4.0, 2)]))
            .when_action(CartAction::update_item_notes("p1", Some("gift wrap".into())))
            .then_state(|cart| {
                let item = cart.item("p1");
                assert_eq!(item.and_then(|i| i.notes.as_deref()), Some("gift wrap"));
                assert_eq!(item.map(|i| i.quantity), Some(2));
            })
            .run();
    }

    #[test]
    fn clear_keeps_shipping_address() {
        let mut cart = cart_with(vec![
            fixtures::cart_item("p1", 1.0, 1),
            fixtures::cart_item("p2", 2.0, 2),
        ]);
        cart.shipping_address_id = Some("addr-1".into());
        cart.purchase_order_number = Some("PO-1".into());

        ReducerTest::new(CartReducer::default())
            .with_env(env())
            .given_state(cart)
            .when_action(CartAction::Clear)
            .then_state(|cart| {
                assert!(cart.items.is_empty());
                assert_eq!(cart.shipping_address_id.as_deref(), Some("addr-1"));
                assert_eq!(cart.purchase_order_number, None);
                assert_eq!(cart.checkout_blocked_reason, Some(CheckoutBlock::EmptyCart));
            })
            .run();
    }

    #[test]
    fn bulk_add_merges_and_appends() {
        let existing = fixtures::cart_item("p1", 1.0, 2).with_order_bounds(1, 3);
        ReducerTest::new(CartReducer::default())
            .with_env(env())
            .given_state(cart_with(vec![existing]))
            .when_action(CartAction::BulkAdd {
                items: vec![
                    fixtures::cart_item("p1", 1.0, 5),
                    fixtures::cart_item("p2", 3.0, 2),
                ],
            })
            .then_state(|cart| {
                assert_eq!(cart.items.len(), 2);
                assert_eq!(cart.item("p1").map(|i| i.quantity), Some(3));
                assert_eq!(cart.item("p2").map(|i| i.quantity), Some(2));
                assert_eq!(cart.item_count, 5);
            })
            .run();
    }

    #[test]
    fn shipping_address_unblocks_checkout() {
        ReducerTest::new(CartReducer::default())
            .with_env(env())
            .given_state(cart_with(vec![fixtures::cart_item("p1", 1.0, 1)]))
            .when_action(CartAction::set_shipping_address(Some("addr-1".into())))
            .then_state(|cart| {
                assert!(cart.can_checkout);
                assert_eq!(cart.checkout_blocked_reason, None);
            })
            .run();
    }

    #[test]
    fn spending_validation_blocks_before_shipping() {
        ReducerTest::new(CartReducer::default())
            .with_env(env())
            .given_state(cart_with(vec![fixtures::cart_item("p1", 1.0, 1)]))
            .when_action(CartAction::UpdateSpendingValidation {
                validation: SpendingValidation {
                    is_within_limits: false,
                    ..SpendingValidation::default()
                },
            })
            .then_state(|cart| {
                assert_eq!(
                    cart.checkout_blocked_reason,
                    Some(CheckoutBlock::ExceedsSpendingLimits)
                );
            })
            .run();
    }

    #[test]
    fn invalid_quantities_block_last() {
        let low = fixtures::cart_item("p1", 1.0, 1).with_order_bounds(10, 100);
        let mut cart = cart_with(Vec::new());
        cart.shipping_address_id = Some("addr-1".into());

        ReducerTest::new(CartReducer::default())
            .with_env(env())
            .given_state(cart)
            .when_action(CartAction::AddItem { item: low })
            .then_state(|cart| {
                assert_eq!(cart.item("p1").map(|i| i.quantity), Some(1));
                assert_eq!(
                    cart.checkout_blocked_reason,
                    Some(CheckoutBlock::InvalidQuantities)
                );
            })
            .run();
    }

    #[test]
    fn update_totals_is_verbatim_and_reused_by_later_changes() {
        let mut totals = crate::types::B2BCartTotals::empty("USD");
        totals.subtotal = 10.0;
        totals.tier_discount = 3.0;
        totals.volume_discount = 1.0;
        totals.total_discount = 4.0;
        totals.tax = 0.5;
        totals.total = 6.5;

        ReducerTest::new(CartReducer::default())
            .with_env(env())
            .given_state(cart_with(vec![fixtures::cart_item("p1", 10.0, 1)]))
            .when_actions([
                CartAction::UpdateTotals { totals },
                CartAction::update_item_quantity("p1", 2),
            ])
            .then_state(|cart| {
                assert!((cart.totals.subtotal - 20.0).abs() < f64::EPSILON);
                assert!((cart.totals.total_discount - 4.0).abs() < f64::EPSILON);
                assert!((cart.totals.total - 16.5).abs() < f64::EPSILON);
            })
            .run();
    }

    #[test]
    fn loading_lifecycle_keeps_items() {
        ReducerTest::new(CartReducer::default())
            .with_env(env())
            .given_state(cart_with(vec![fixtures::cart_item("p1", 1.0, 1)]))
            .when_actions([
                CartAction::LoadingStart,
                CartAction::loading_failure("timeout"),
            ])
            .then_state(|cart| {
                assert_eq!(cart.status, LoadingStatus::Failed);
                assert_eq!(cart.error.as_deref(), Some("timeout"));
                assert_eq!(cart.items.len(), 1);
            })
            .run();
    }

    #[test]
    fn hydrate_recomputes_from_initial() {
        let snapshot = CartSnapshot {
            items: Arc::new(vec![
                fixtures::cart_item("p1", 2.0, 2),
                fixtures::cart_item("p2", 5.0, 1),
            ]),
            shipping_address_id: Some("addr-9".into()),
            purchase_order_number: Some("PO-9".into()),
            notes: None,
        };

        ReducerTest::new(CartReducer::default())
            .with_env(env())
            .given_state(cart_with(vec![fixtures::cart_item("old", 99.0, 1)]))
            .when_action(CartAction::Hydrate { snapshot })
            .then_state(|cart| {
                assert!(cart.item("old").is_none());
                assert_eq!(cart.item_count, 3);
                assert!((cart.totals.total - 9.0).abs() < f64::EPSILON);
                assert!(cart.can_checkout);
                assert_eq!(cart.purchase_order_number.as_deref(), Some("PO-9"));
            })
            .run();
    }

    #[test]
    fn reset_restores_initial_handle() {
        let reducer = CartReducer::default();
        let initial = reducer.initial_state();
        ReducerTest::new(reducer)
            .with_env(env())
            .given_state(cart_with(vec![fixtures::cart_item("p1", 1.0, 1)]))
            .when_action(CartAction::Reset)
            .then_transition(move |_, after| assert!(Arc::ptr_eq(after, &initial)))
            .run();
    }
}
