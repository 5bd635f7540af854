//! Cart actions and their creators.

use crate::error::ActionError;
use crate::persistence::CartSnapshot;
use crate::types::{B2BCartItem, B2BCartTotals, SpendingValidation};
use b2b_state_macros::Action;
use serde::{Deserialize, Serialize};

/// Actions handled by the cart reducer
#[derive(Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(prefix = "CART")]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum CartAction {
    /// Add a line, merging into an existing line for the same product
    AddItem {
        /// Line to add
        item: B2BCartItem,
    },

    /// Set a line's quantity, clamped to its bounds
    UpdateItemQuantity {
        /// Product to update
        product_id: String,
        /// Requested quantity
        quantity: u32,
    },

    /// Remove a line
    RemoveItem {
        /// Product to remove
        product_id: String,
    },

    /// Replace a line's notes
    UpdateItemNotes {
        /// Product to annotate
        product_id: String,
        /// New notes
        notes: Option<String>,
    },

    /// Empty the cart, keeping the shipping address
    Clear,

    /// Add several lines at once
    BulkAdd {
        /// Lines to merge in
        items: Vec<B2BCartItem>,
    },

    /// Select a delivery address
    SetShippingAddress {
        /// Address id
        address_id: Option<String>,
    },

    /// Set the buyer's purchase order number
    SetPurchaseOrderNumber {
        /// PO number
        purchase_order_number: Option<String>,
    },

    /// Set the order notes
    SetNotes {
        /// Notes
        notes: Option<String>,
    },

    /// Store server-computed totals verbatim
    UpdateTotals {
        /// Authoritative totals
        totals: B2BCartTotals,
    },

    /// Store a server-computed spending check
    UpdateSpendingValidation {
        /// Compliance result
        validation: SpendingValidation,
    },

    /// Server sync started
    LoadingStart,

    /// Server sync finished
    LoadingSuccess,

    /// Server sync failed
    LoadingFailure {
        /// Error message
        error: String,
    },

    /// Restore a persisted snapshot
    Hydrate {
        /// Snapshot to restore
        snapshot: CartSnapshot,
    },

    /// Restore the initial cart
    Reset,
}

/// Rejects lines the reducer must never store
pub(crate) fn validate_item(item: &B2BCartItem) -> Result<(), ActionError> {
    if item.product_id.trim().is_empty() {
        return Err(ActionError::EmptyProductId);
    }
    if item.quantity == 0 {
        return Err(ActionError::ZeroQuantity {
            product_id: item.product_id.clone(),
        });
    }
    if !item.unit_price.is_finite() || item.unit_price < 0.0 {
        return Err(ActionError::InvalidPrice {
            product_id: item.product_id.clone(),
            unit_price: item.unit_price,
        });
    }
    if item.min_order_quantity > item.max_order_quantity {
        return Err(ActionError::InvertedBounds {
            product_id: item.product_id.clone(),
            min: item.min_order_quantity,
            max: item.max_order_quantity,
        });
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CartAction {
    /// Validated [`CartAction::AddItem`]; the line total is recomputed
    ///
    /// # Errors
    ///
    /// Returns an [`ActionError`] for a blank product id, zero quantity,
    /// a negative or non-finite price, or inverted order bounds.
    pub fn add_item(item: B2BCartItem) -> Result<Self, ActionError> {
        validate_item(&item)?;
        Ok(Self::AddItem {
            item: item.normalized(),
        })
    }

    /// Validated [`CartAction::BulkAdd`]
    ///
    /// # Errors
    ///
    /// Returns the first [`ActionError`] among the lines.
    pub fn bulk_add(items: impl IntoIterator<Item = B2BCartItem>) -> Result<Self, ActionError> {
        let items = items
            .into_iter()
            .map(|item| validate_item(&item).map(|()| item.normalized()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::BulkAdd { items })
    }

    /// [`CartAction::UpdateItemQuantity`]; the reducer clamps the quantity
    pub fn update_item_quantity(product_id: impl Into<String>, quantity: u32) -> Self {
        Self::UpdateItemQuantity {
            product_id: product_id.into(),
            quantity,
        }
    }

    /// [`CartAction::RemoveItem`]
    pub fn remove_item(product_id: impl Into<String>) -> Self {
        Self::RemoveItem {
            product_id: product_id.into(),
        }
    }

    /// [`CartAction::UpdateItemNotes`]; blank notes clear the field
    pub fn update_item_notes(product_id: impl Into<String>, notes: Option<String>) -> Self {
        Self::UpdateItemNotes {
            product_id: product_id.into(),
            notes: non_blank(notes),
        }
    }

    /// [`CartAction::SetShippingAddress`]; a blank id clears the selection
    pub fn set_shipping_address(address_id: Option<String>) -> Self {
        Self::SetShippingAddress {
            address_id: non_blank(address_id),
        }
    }

    /// [`CartAction::SetPurchaseOrderNumber`]; trimmed, blank clears it
    pub fn set_purchase_order_number(purchase_order_number: Option<String>) -> Self {
        Self::SetPurchaseOrderNumber {
            purchase_order_number: non_blank(purchase_order_number),
        }
    }

    /// [`CartAction::SetNotes`]; blank notes clear the field
    pub fn set_notes(notes: Option<String>) -> Self {
        Self::SetNotes {
            notes: non_blank(notes),
        }
    }

    /// [`CartAction::LoadingFailure`]
    pub fn loading_failure(error: impl Into<String>) -> Self {
        Self::LoadingFailure {
            error: error.into(),
        }
    }

    /// [`CartAction::Hydrate`]
    ///
    /// # Errors
    ///
    /// Returns the first [`ActionError`] among the snapshot's lines.
    pub fn hydrate(snapshot: CartSnapshot) -> Result<Self, ActionError> {
        for item in snapshot.items.iter() {
            validate_item(item)?;
        }
        Ok(Self::Hydrate { snapshot })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use b2b_state_core::Action as _;

    #[test]
    fn tags_are_prefixed() {
        assert_eq!(CartAction::Clear.action_type(), "CART_CLEAR");
        assert_eq!(
            CartAction::update_item_quantity("p1", 2).action_type(),
            "CART_UPDATE_ITEM_QUANTITY"
        );
        assert!(CartAction::ACTION_TYPES.contains(&"CART_UPDATE_SPENDING_VALIDATION"));
    }

    #[test]
    fn add_item_rejects_bad_payloads() {
        let zero = fixtures::cart_item("p1", 5.0, 1).with_quantity(0);
        assert_eq!(
            CartAction::add_item(zero),
            Err(ActionError::ZeroQuantity {
                product_id: "p1".into()
            })
        );

        let mut negative = fixtures::cart_item("p1", 5.0, 1);
        negative.unit_price = -1.0;
        assert!(matches!(
            CartAction::add_item(negative),
            Err(ActionError::InvalidPrice { .. })
        ));

        let inverted = fixtures::cart_item("p1", 5.0, 1).with_order_bounds(10, 2);
        assert!(matches!(
            CartAction::add_item(inverted),
            Err(ActionError::InvertedBounds { min: 10, max: 2, .. })
        ));

        let blank = fixtures::cart_item("  ", 5.0, 1);
        assert_eq!(CartAction::add_item(blank), Err(ActionError::EmptyProductId));
    }

    #[test]
    fn add_item_normalizes_line_total() {
        let mut item = fixtures::cart_item("p1", 5.0, 3);
        item.line_total = 999.0;
        let Ok(CartAction::AddItem { item }) = CartAction::add_item(item) else {
            panic!("expected a valid AddItem");
        };
        assert!((item.line_total - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn metadata_creators_trim_blank_values() {
        assert_eq!(
            CartAction::set_purchase_order_number(Some("  PO-1 ".into())),
            CartAction::SetPurchaseOrderNumber {
                purchase_order_number: Some("PO-1".into())
            }
        );
        assert_eq!(
            CartAction::set_shipping_address(Some("   ".into())),
            CartAction::SetShippingAddress { address_id: None }
        );
    }

    #[test]
    fn actions_serialize_with_type_tag() {
        let json = serde_json::to_value(CartAction::remove_item("p9")).unwrap_or_default();
        assert_eq!(
            json,
            serde_json::json!({ "type": "remove_item", "payload": { "product_id": "p9" } })
        );
    }
}
