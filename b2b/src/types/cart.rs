//! Cart line items, totals, spending validation and the cart slice.

use super::common::LoadingStatus;
use super::company::LimitPeriod;
use b2b_state_core::impl_identical_by_value;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A cart line
///
/// `line_total == quantity * unit_price` holds for every item the cart
/// reducer stores; use [`B2BCartItem::new`] and
/// [`B2BCartItem::with_quantity`] rather than assigning the fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct B2BCartItem {
    /// Product id, unique within a cart
    pub product_id: String,
    /// Stock keeping unit
    pub sku: String,
    /// Product name
    pub name: String,
    /// Image reference
    pub image_url: Option<String>,
    /// Price per unit
    pub unit_price: f64,
    /// Ordered quantity
    pub quantity: u32,
    /// Smallest orderable quantity
    pub min_order_quantity: u32,
    /// Largest orderable quantity
    pub max_order_quantity: u32,
    /// `quantity * unit_price`
    pub line_total: f64,
    /// Buyer notes for this line
    pub notes: Option<String>,
    /// Free-form product specifications
    pub specifications: Option<BTreeMap<String, String>>,
}

impl B2BCartItem {
    /// A line with bounds `[1, u32::MAX]` and no notes
    #[must_use]
    pub fn new(
        product_id: impl Into<String>,
        sku: impl Into<String>,
        name: impl Into<String>,
        unit_price: f64,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            sku: sku.into(),
            name: name.into(),
            image_url: None,
            unit_price,
            quantity,
            min_order_quantity: 1,
            max_order_quantity: u32::MAX,
            line_total: line_total(quantity, unit_price),
            notes: None,
            specifications: None,
        }
    }

    /// Sets the orderable range
    #[must_use]
    pub fn with_order_bounds(mut self, min: u32, max: u32) -> Self {
        self.min_order_quantity = min;
        self.max_order_quantity = max;
        self
    }

    /// Sets the image reference
    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Sets the line notes
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Same line with a new quantity and a recomputed line total
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.set_quantity(quantity);
        self
    }

    /// Updates the quantity and the line total together
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.line_total = line_total(quantity, self.unit_price);
    }

    /// Recomputes the line total from the current quantity
    #[must_use]
    pub fn normalized(self) -> Self {
        let quantity = self.quantity;
        self.with_quantity(quantity)
    }

    /// Nearest quantity inside `[min_order_quantity, max_order_quantity]`
    ///
    /// An inverted range clamps to the max.
    #[must_use]
    pub fn clamp_quantity(&self, quantity: u32) -> u32 {
        quantity
            .max(self.min_order_quantity)
            .min(self.max_order_quantity)
    }

    /// Whether the quantity is inside the item's own bounds
    #[must_use]
    pub fn has_valid_quantity(&self) -> bool {
        (self.min_order_quantity..=self.max_order_quantity).contains(&self.quantity)
    }
}

fn line_total(quantity: u32, unit_price: f64) -> f64 {
    f64::from(quantity) * unit_price
}

/// Cost breakdown of the cart
///
/// Discounts, shipping and tax are server-computed. The cart reducer only
/// recomputes the subtotal locally and carries the other figures over.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct B2BCartTotals {
    /// Sum of line totals
    pub subtotal: f64,
    /// Discount from the company tier
    pub tier_discount: f64,
    /// Discount from order volume
    pub volume_discount: f64,
    /// `tier_discount + volume_discount`
    pub total_discount: f64,
    /// Estimated shipping
    pub shipping_estimate: f64,
    /// Tax
    pub tax: f64,
    /// `max(0, subtotal - total_discount + shipping_estimate + tax)`
    pub total: f64,
    /// Currency
    pub currency: String,
}

impl B2BCartTotals {
    /// All-zero totals in `currency`
    #[must_use]
    pub fn empty(currency: impl Into<String>) -> Self {
        Self {
            subtotal: 0.0,
            tier_discount: 0.0,
            volume_discount: 0.0,
            total_discount: 0.0,
            shipping_estimate: 0.0,
            tax: 0.0,
            total: 0.0,
            currency: currency.into(),
        }
    }

    /// Totals for a new subtotal, reusing the stored discount, shipping
    /// and tax figures
    #[must_use]
    pub fn recalculated(&self, subtotal: f64) -> Self {
        let total_discount = self.tier_discount + self.volume_discount;
        Self {
            subtotal,
            total_discount,
            total: (subtotal - total_discount + self.shipping_estimate + self.tax).max(0.0),
            ..self.clone()
        }
    }
}

/// One spending limit the current order is measured against
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicableLimit {
    /// Limit period
    pub period: LimitPeriod,
    /// Limit amount
    pub limit: f64,
    /// Already spent in the period
    pub current_spend: f64,
    /// Left in the period
    pub remaining: f64,
}

/// Server-computed compliance of the cart with spending limits
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingValidation {
    /// No limit is exceeded
    pub is_within_limits: bool,
    /// The order needs an approver
    pub requires_approval: bool,
    /// Why approval is needed; present iff `requires_approval`
    pub approval_reason: Option<String>,
    /// Limits the order was checked against
    pub applicable_limits: Vec<ApplicableLimit>,
    /// Human-readable warnings
    pub warnings: Vec<String>,
}

impl Default for SpendingValidation {
    fn default() -> Self {
        Self {
            is_within_limits: true,
            requires_approval: false,
            approval_reason: None,
            applicable_limits: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Why checkout is currently blocked
///
/// Variants are declared in priority order: when several conditions hold,
/// the first one is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutBlock {
    /// No items
    EmptyCart,
    /// Spending validation failed
    ExceedsSpendingLimits,
    /// No shipping address selected
    MissingShippingAddress,
    /// Some item quantity is outside its bounds
    InvalidQuantities,
}

impl CheckoutBlock {
    /// Human-readable reason
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::EmptyCart => "Cart is empty",
            Self::ExceedsSpendingLimits => "Order exceeds spending limits",
            Self::MissingShippingAddress => "Shipping address required",
            Self::InvalidQuantities => "Some items have invalid quantities",
        }
    }
}

impl fmt::Display for CheckoutBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl_identical_by_value!(CheckoutBlock);

/// Cart slice of the root state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    /// Lines, unique by product id
    pub items: Arc<Vec<B2BCartItem>>,
    /// Sum of quantities
    pub item_count: u32,
    /// Cost breakdown
    pub totals: Arc<B2BCartTotals>,
    /// Spending limit compliance
    pub spending_validation: Arc<SpendingValidation>,
    /// Whether the order may be submitted
    pub can_checkout: bool,
    /// Present iff `can_checkout` is false
    pub checkout_blocked_reason: Option<CheckoutBlock>,
    /// Selected delivery address
    pub shipping_address_id: Option<String>,
    /// Buyer's purchase order number
    pub purchase_order_number: Option<String>,
    /// Order notes
    pub notes: Option<String>,
    /// Server sync lifecycle
    pub status: LoadingStatus,
    /// Last sync error
    pub error: Option<String>,
    /// Last structural change
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl CartState {
    /// Empty cart with zero totals in `currency`
    #[must_use]
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            items: Arc::default(),
            item_count: 0,
            totals: Arc::new(B2BCartTotals::empty(currency)),
            spending_validation: Arc::default(),
            can_checkout: false,
            checkout_blocked_reason: Some(CheckoutBlock::EmptyCart),
            shipping_address_id: None,
            purchase_order_number: None,
            notes: None,
            status: LoadingStatus::Idle,
            error: None,
            last_updated_at: None,
        }
    }

    /// Line for `product_id`
    #[must_use]
    pub fn item(&self, product_id: &str) -> Option<&B2BCartItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    /// First checkout blocker, in priority order
    #[must_use]
    pub fn checkout_block(&self) -> Option<CheckoutBlock> {
        if self.items.is_empty() {
            Some(CheckoutBlock::EmptyCart)
        } else if !self.spending_validation.is_within_limits {
            Some(CheckoutBlock::ExceedsSpendingLimits)
        } else if self.shipping_address_id.is_none() {
            Some(CheckoutBlock::MissingShippingAddress)
        } else if !self.items.iter().all(B2BCartItem::has_valid_quantity) {
            Some(CheckoutBlock::InvalidQuantities)
        } else {
            None
        }
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CURRENCY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_computes_line_total() {
        let item = B2BCartItem::new("p1", "SKU-1", "Widget", 2.5, 4);
        assert!((item.line_total - 10.0).abs() < f64::EPSILON);

        let item = item.with_quantity(6);
        assert!((item.line_total - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn clamp_respects_bounds() {
        let item = B2BCartItem::new("p1", "SKU-1", "Widget", 1.0, 1).with_order_bounds(5, 50);
        assert_eq!(item.clamp_quantity(0), 5);
        assert_eq!(item.clamp_quantity(20), 20);
        assert_eq!(item.clamp_quantity(99), 50);
        assert!(!item.has_valid_quantity());
    }

    #[test]
    fn totals_never_go_negative() {
        let stale = B2BCartTotals {
            tier_discount: 80.0,
            volume_discount: 40.0,
            ..B2BCartTotals::empty("USD")
        };
        let totals = stale.recalculated(100.0);
        assert!((totals.total_discount - 120.0).abs() < f64::EPSILON);
        assert!(totals.total.abs() < f64::EPSILON);
    }

    #[test]
    fn empty_cart_is_blocked() {
        let cart = CartState::default();
        assert!(!cart.can_checkout);
        assert_eq!(cart.checkout_block(), Some(CheckoutBlock::EmptyCart));
        assert_eq!(CheckoutBlock::EmptyCart.to_string(), "Cart is empty");
    }
}
