//! The action vocabulary.
//!
//! One enum per slice, each deriving [`b2b_state_core::Action`] so every
//! variant carries a stable `SLICE_VARIANT` tag. [`RootAction`] is what
//! the root reducer and the store accept.

pub mod approvals;
pub mod cart;
pub mod company;
pub mod quotes;

pub use approvals::ApprovalAction;
pub use cart::CartAction;
pub use company::CompanyAction;
pub use quotes::QuoteAction;

use b2b_state_core::Action;
use serde::{Deserialize, Serialize};

/// Any action the root reducer understands
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "slice", content = "action", rename_all = "snake_case")]
pub enum RootAction {
    /// Company context
    Company(CompanyAction),
    /// Quotes
    Quotes(QuoteAction),
    /// Approvals
    Approvals(ApprovalAction),
    /// Cart
    Cart(CartAction),
}

impl RootAction {
    /// Name of the slice this action targets
    #[must_use]
    pub const fn slice(&self) -> &'static str {
        match self {
            Self::Company(_) => "company",
            Self::Quotes(_) => "quotes",
            Self::Approvals(_) => "approvals",
            Self::Cart(_) => "cart",
        }
    }

    pub(crate) fn into_company(self) -> Option<CompanyAction> {
        match self {
            Self::Company(action) => Some(action),
            _ => None,
        }
    }

    pub(crate) fn into_quotes(self) -> Option<QuoteAction> {
        match self {
            Self::Quotes(action) => Some(action),
            _ => None,
        }
    }

    pub(crate) fn into_approvals(self) -> Option<ApprovalAction> {
        match self {
            Self::Approvals(action) => Some(action),
            _ => None,
        }
    }

    pub(crate) fn into_cart(self) -> Option<CartAction> {
        match self {
            Self::Cart(action) => Some(action),
            _ => None,
        }
    }
}

impl Action for RootAction {
    fn action_type(&self) -> &'static str {
        match self {
            Self::Company(action) => action.action_type(),
            Self::Quotes(action) => action.action_type(),
            Self::Approvals(action) => action.action_type(),
            Self::Cart(action) => action.action_type(),
        }
    }
}

impl From<CompanyAction> for RootAction {
    fn from(action: CompanyAction) -> Self {
        Self::Company(action)
    }
}

impl From<QuoteAction> for RootAction {
    fn from(action: QuoteAction) -> Self {
        Self::Quotes(action)
    }
}

impl From<ApprovalAction> for RootAction {
    fn from(action: ApprovalAction) -> Self {
        Self::Approvals(action)
    }
}

impl From<CartAction> for RootAction {
    fn from(action: CartAction) -> Self {
        Self::Cart(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_action_delegates_tag() {
        let action = RootAction::from(CartAction::Reset);
        assert_eq!(action.action_type(), "CART_RESET");
        assert_eq!(action.slice(), "cart");

        let action = RootAction::from(QuoteAction::ClearSelected);
        assert_eq!(action.action_type(), "QUOTES_CLEAR_SELECTED");
    }

    #[test]
    fn extractors_only_match_their_slice() {
        assert!(RootAction::from(CartAction::Clear).into_cart().is_some());
        assert!(RootAction::from(CartAction::Clear).into_quotes().is_none());
        assert!(RootAction::from(CompanyAction::Reset).into_company().is_some());
        assert!(RootAction::from(ApprovalAction::Reset).into_approvals().is_some());
    }
}
