//! Domain types: entities, slice states and the root state tree.

pub mod approval;
pub mod cart;
pub mod common;
pub mod company;
pub mod quote;

pub use approval::{
    ApprovalDecision, ApprovalEntityType, ApprovalFilters, ApprovalHistoryEntry, ApprovalPriority,
    ApprovalRequest, ApprovalStatus, ApprovalSummary, ApprovalsState,
};
pub use cart::{
    ApplicableLimit, B2BCartItem, B2BCartTotals, CartState, CheckoutBlock, SpendingValidation,
};
pub use common::{LoadingStatus, PaginationState, StatusFilter};
pub use company::{
    Company, CompanyState, CompanyStatus, CompanyTier, Employee, EmployeeRole, EmployeeSummary,
    LimitPeriod, Permission, ShippingAddress, SpendingLimit,
};
pub use quote::{
    Quote, QuoteFilters, QuoteItem, QuoteMessage, QuoteStatus, QuoteSummary, QuotesState,
};

use crate::config::B2BConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The combined state tree
///
/// Each slice is owned by its slice reducer; the root reducer only swaps
/// slice handles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RootState {
    /// Company and employee context
    pub company: Arc<CompanyState>,
    /// Quote lifecycle
    pub quotes: Arc<QuotesState>,
    /// Approval workflow
    pub approvals: Arc<ApprovalsState>,
    /// Cart composition
    pub cart: Arc<CartState>,
}

impl RootState {
    /// Initial tree for `config`
    #[must_use]
    pub fn with_config(config: &B2BConfig) -> Self {
        Self {
            company: Arc::default(),
            quotes: Arc::new(QuotesState::new(config.default_page_size)),
            approvals: Arc::new(ApprovalsState::new(config.default_page_size)),
            cart: Arc::new(CartState::new(config.default_currency.clone())),
        }
    }
}

impl Default for RootState {
    fn default() -> Self {
        Self::with_config(&B2BConfig::default())
    }
}
