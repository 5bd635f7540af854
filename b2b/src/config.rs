//! Configuration for the B2B state container.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Entries kept per parameterized selector
pub const DEFAULT_SELECTOR_CACHE_SIZE: usize = b2b_state_core::memo::DEFAULT_CACHE_SIZE;

/// Initial page size of the quote and approval lists
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Currency of the initial cart totals
pub const DEFAULT_CURRENCY: &str = "USD";

/// Buffer of the store's action broadcast channel
pub const DEFAULT_ACTION_BROADCAST_CAPACITY: usize = 64;

/// Container configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct B2BConfig {
    /// Capacity of every parameterized selector cache
    pub selector_cache_size: usize,
    /// Initial page size of the quote and approval lists
    pub default_page_size: u32,
    /// Currency of the initial cart totals
    pub default_currency: String,
    /// Buffer of the store's action broadcast channel
    pub action_broadcast_capacity: usize,
}

impl Default for B2BConfig {
    fn default() -> Self {
        Self {
            selector_cache_size: DEFAULT_SELECTOR_CACHE_SIZE,
            default_page_size: DEFAULT_PAGE_SIZE,
            default_currency: DEFAULT_CURRENCY.to_string(),
            action_broadcast_capacity: DEFAULT_ACTION_BROADCAST_CAPACITY,
        }
    }
}

impl B2BConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables fall back to the defaults:
    ///
    /// - `B2B_SELECTOR_CACHE_SIZE` (10)
    /// - `B2B_DEFAULT_PAGE_SIZE` (20)
    /// - `B2B_DEFAULT_CURRENCY` (`USD`)
    /// - `B2B_ACTION_BROADCAST_CAPACITY` (64)
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            selector_cache_size: env::var("B2B_SELECTOR_CACHE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SELECTOR_CACHE_SIZE),
            default_page_size: env::var("B2B_DEFAULT_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PAGE_SIZE),
            default_currency: env::var("B2B_DEFAULT_CURRENCY")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            action_broadcast_capacity: env::var("B2B_ACTION_BROADCAST_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_ACTION_BROADCAST_CAPACITY),
        }
    }

    /// Override the selector cache size
    #[must_use]
    pub const fn with_selector_cache_size(mut self, size: usize) -> Self {
        self.selector_cache_size = size;
        self
    }

    /// Override the initial page size
    #[must_use]
    pub const fn with_default_page_size(mut self, page_size: u32) -> Self {
        self.default_page_size = page_size;
        self
    }

    /// Override the initial currency
    #[must_use]
    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = currency.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = B2BConfig::default();
        assert_eq!(config.selector_cache_size, 10);
        assert_eq!(config.default_page_size, 20);
        assert_eq!(config.default_currency, "USD");
        assert_eq!(config.action_broadcast_capacity, 64);
    }

    #[test]
    fn builders_override_fields() {
        let config = B2BConfig::default()
            .with_selector_cache_size(3)
            .with_default_page_size(50)
            .with_default_currency("EUR");
        assert_eq!(config.selector_cache_size, 3);
        assert_eq!(config.default_page_size, 50);
        assert_eq!(config.default_currency, "EUR");
    }
}
