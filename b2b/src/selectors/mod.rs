//! Derived reads over [`RootState`](crate::types::RootState).
//!
//! Each family has plain `select_*` functions for field access and a
//! selector struct owning the memo caches for everything derived. Caches
//! are single-threaded; keep one [`Selectors`] per consumer.
//!
//! ```
//! use b2b_state::selectors::Selectors;
//! use b2b_state::types::RootState;
//! use std::sync::Arc;
//!
//! let selectors = Selectors::default();
//! let state = RootState::default();
//!
//! let summary = selectors.cart.checkout_summary(&state);
//! assert!(!summary.can_checkout);
//! assert!(Arc::ptr_eq(&summary, &selectors.cart.checkout_summary(&state)));
//! ```

pub mod approvals;
pub mod cart;
pub mod company;
pub mod quotes;

pub use approvals::{ApprovalSelectors, ApprovalsDashboard};
pub use cart::{CartSelectors, CheckoutSummary};
pub use company::{CompanyContext, CompanySelectors};
pub use quotes::{QuoteSelectors, QuotesView};

use crate::config::B2BConfig;

/// All four selector families
#[derive(Debug, Default)]
pub struct Selectors {
    /// Company and employee context
    pub company: CompanySelectors,
    /// Quote lifecycle
    pub quotes: QuoteSelectors,
    /// Approval workflow
    pub approvals: ApprovalSelectors,
    /// Cart composition
    pub cart: CartSelectors,
}

impl Selectors {
    /// Selector families sized from `config`
    #[must_use]
    pub fn new(config: &B2BConfig) -> Self {
        Self {
            company: CompanySelectors::new(config),
            quotes: QuoteSelectors::new(config),
            approvals: ApprovalSelectors::new(config),
            cart: CartSelectors::new(config),
        }
    }

    /// Drops every cached value, e.g. on sign-out
    pub fn clear(&self) {
        self.company.clear();
        self.quotes.clear();
        self.approvals.clear();
        self.cart.clear();
    }
}
