//! # B2B State
//!
//! State container for a bulk-ordering B2B storefront: the company and
//! employee context, the quote lifecycle, the approval workflow and the
//! cart, each kept in its own slice of [`RootState`].
//!
//! ## Flow
//!
//! 1. An external event becomes a [`RootAction`], usually through one of the
//!    validating action creators in [`actions`].
//! 2. [`RootReducer`] routes it to the one slice reducer it addresses and
//!    produces the next state. Untouched slices keep their `Arc`.
//! 3. [`Selectors`] re-derive views. Derivations whose inputs kept their
//!    identity return the previously cached value.
//!
//! Reducers and selectors never fail. Async failures are stored as data:
//! a `Failed` [`LoadingStatus`](types::LoadingStatus) and an error string.
//!
//! ## Example
//!
//! ```
//! use b2b_state::actions::{CartAction, RootAction};
//! use b2b_state::environment::B2BEnvironment;
//! use b2b_state::reducers::RootReducer;
//! use b2b_state::selectors::Selectors;
//! use b2b_state::types::{B2BCartItem, CheckoutBlock, RootState};
//! use b2b_state_core::reducer::Reducer;
//! use std::sync::Arc;
//!
//! let reducer = RootReducer::default();
//! let env = B2BEnvironment::default();
//! let selectors = Selectors::default();
//! let mut state = Arc::new(RootState::default());
//!
//! let item = B2BCartItem::new("p1", "SKU-P1", "Hex bolts", 0.25, 400);
//! let action = CartAction::add_item(item).map(RootAction::from);
//! if let Ok(action) = action {
//!     reducer.reduce(&mut state, action, &env);
//! }
//!
//! let summary = selectors.cart.checkout_summary(&state);
//! assert_eq!(summary.item_count, 400);
//! assert_eq!(
//!     summary.checkout_blocked_reason,
//!     Some(CheckoutBlock::MissingShippingAddress)
//! );
//! ```

pub mod actions;
pub mod config;
pub mod environment;
pub mod error;
pub mod fixtures;
pub mod persistence;
pub mod reducers;
pub mod selectors;
pub mod types;

pub use actions::RootAction;
pub use config::B2BConfig;
pub use environment::B2BEnvironment;
pub use error::{ActionError, PersistenceError};
pub use persistence::CartSnapshot;
pub use reducers::RootReducer;
pub use selectors::Selectors;
pub use types::RootState;
