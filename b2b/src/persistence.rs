//! Serializable subset of the cart.
//!
//! [`CartSnapshot`] is what a host writes to session storage and feeds back
//! through [`crate::actions::CartAction::Hydrate`] on resume. Everything
//! else in the cart slice is either derived or server-owned.

use crate::error::PersistenceError;
use crate::types::B2BCartItem;
use b2b_state_macros::ShallowEq;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Persistable part of the cart
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ShallowEq)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    /// Lines
    pub items: Arc<Vec<B2BCartItem>>,
    /// Selected delivery address
    pub shipping_address_id: Option<String>,
    /// Buyer's purchase order number
    pub purchase_order_number: Option<String>,
    /// Order notes
    pub notes: Option<String>,
}

impl CartSnapshot {
    /// Encodes the snapshot as JSON
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a snapshot written by [`CartSnapshot::to_json`]
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Serialization`] for malformed JSON and
    /// [`PersistenceError::Invalid`] when an item breaks a cart invariant.
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        let snapshot: Self = serde_json::from_str(json)?;
        for item in snapshot.items.iter() {
            crate::actions::cart::validate_item(item)?;
        }
        Ok(snapshot)
    }

    /// Whether there is nothing worth persisting
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
            && self.shipping_address_id.is_none()
            && self.purchase_order_number.is_none()
            && self.notes.is_none()
    }
}
