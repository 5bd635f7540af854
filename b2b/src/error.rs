//! Error types for the B2B domain crate.
//!
//! Reducers and selectors never fail. Errors only arise at the edges:
//! validating payloads in action creators and (de)serializing snapshots.

use thiserror::Error;

/// A payload rejected by an action creator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    /// Product id was blank
    #[error("Product id must not be empty")]
    EmptyProductId,

    /// Quantity was zero
    #[error("Quantity for product {product_id} must be at least 1")]
    ZeroQuantity {
        /// Offending product
        product_id: String,
    },

    /// Unit price was negative or not a number
    #[error("Unit price for product {product_id} must be a non-negative number, got {unit_price}")]
    InvalidPrice {
        /// Offending product
        product_id: String,
        /// Rejected price
        unit_price: f64,
    },

    /// Min order quantity exceeded max
    #[error("Order bounds for product {product_id} are inverted: min {min} > max {max}")]
    InvertedBounds {
        /// Offending product
        product_id: String,
        /// Minimum
        min: u32,
        /// Maximum
        max: u32,
    },

    /// Employee does not belong to the company
    #[error("Employee {employee_id} does not belong to company {company_id}")]
    EmployeeCompanyMismatch {
        /// Employee id
        employee_id: String,
        /// Company id
        company_id: String,
    },

    /// Approval id does not match the record
    #[error("Approval id {expected} does not match record {actual}")]
    ApprovalIdMismatch {
        /// Id the decision was taken on
        expected: String,
        /// Id of the returned record
        actual: String,
    },

    /// Unknown status name
    #[error("Unknown status: {0}")]
    UnknownStatus(String),
}

/// A cart snapshot that could not be written or read
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// JSON encoding or decoding failed
    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The snapshot decoded but violates a cart invariant
    #[error("Invalid snapshot: {0}")]
    Invalid(#[from] ActionError),
}
