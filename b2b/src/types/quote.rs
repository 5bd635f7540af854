//! Quote records, summaries and the quotes slice.

use super::common::{LoadingStatus, PaginationState, StatusFilter};
use b2b_state_core::impl_identical_by_value;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Lifecycle status of a quote
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    /// Being drafted by the buyer
    Draft,
    /// Sent to the seller
    Submitted,
    /// Seller is pricing it
    UnderReview,
    /// Priced and sent back to the buyer
    Sent,
    /// Buyer accepted the pricing
    Accepted,
    /// Buyer or seller rejected it
    Rejected,
    /// Validity window passed
    Expired,
    /// Turned into an order
    Converted,
}

impl QuoteStatus {
    /// Every status, in lifecycle order
    pub const ALL: [Self; 8] = [
        Self::Draft,
        Self::Submitted,
        Self::UnderReview,
        Self::Sent,
        Self::Accepted,
        Self::Rejected,
        Self::Expired,
        Self::Converted,
    ];

    /// Wire name, e.g. `"under_review"`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::Sent => "sent",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
            Self::Converted => "converted",
        }
    }

    /// No further transitions expected
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Accepted | Self::Rejected | Self::Expired | Self::Converted
        )
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteStatus {
    type Err = crate::error::ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| crate::error::ActionError::UnknownStatus(s.to_string()))
    }
}

impl_identical_by_value!(QuoteStatus);

/// A line of a quote
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItem {
    /// Product id
    pub product_id: String,
    /// Stock keeping unit
    pub sku: String,
    /// Product name
    pub name: String,
    /// Requested quantity
    pub quantity: u32,
    /// Price the buyer asked for
    pub requested_price: Option<f64>,
    /// Price the seller offered
    pub quoted_price: Option<f64>,
    /// Line total at the quoted price
    pub line_total: f64,
}

/// A message in a quote's negotiation thread
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteMessage {
    /// Message id
    pub id: String,
    /// Author id
    pub author_id: String,
    /// Author display name
    pub author_name: String,
    /// Body text
    pub body: String,
    /// Sent time
    pub created_at: DateTime<Utc>,
}

/// Full quote record, loaded on demand
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Quote id
    pub id: String,
    /// Human-facing number ("Q-2025-0042")
    pub quote_number: String,
    /// Short title
    pub title: String,
    /// Lifecycle status
    pub status: QuoteStatus,
    /// Requesting company
    pub company_id: String,
    /// Requesting employee
    pub requested_by: String,
    /// Lines
    pub items: Vec<QuoteItem>,
    /// Negotiation thread
    pub messages: Vec<QuoteMessage>,
    /// Messages the buyer has not read
    pub unread_message_count: u32,
    /// Sum of line totals
    pub subtotal: f64,
    /// Negotiated discount
    pub discount: f64,
    /// Amount due if accepted
    pub total: f64,
    /// Currency
    pub currency: String,
    /// End of the validity window
    pub valid_until: Option<DateTime<Utc>>,
    /// Buyer notes
    pub notes: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last change
    pub updated_at: DateTime<Utc>,
}

/// Denormalized list entry for a quote
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    /// Quote id
    pub id: String,
    /// Human-facing number
    pub quote_number: String,
    /// Short title
    pub title: String,
    /// Lifecycle status
    pub status: QuoteStatus,
    /// Number of lines
    pub item_count: usize,
    /// Amount due if accepted
    pub total: f64,
    /// Currency
    pub currency: String,
    /// End of the validity window
    pub valid_until: Option<DateTime<Utc>>,
    /// Any unread messages
    pub has_unread_messages: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last change
    pub updated_at: DateTime<Utc>,
}

impl QuoteSummary {
    /// Builds the list entry from the full record
    #[must_use]
    pub fn from_quote(quote: &Quote) -> Self {
        Self {
            id: quote.id.clone(),
            quote_number: quote.quote_number.clone(),
            title: quote.title.clone(),
            status: quote.status,
            item_count: quote.items.len(),
            total: quote.total,
            currency: quote.currency.clone(),
            valid_until: quote.valid_until,
            has_unread_messages: quote.unread_message_count > 0,
            created_at: quote.created_at,
            updated_at: quote.updated_at,
        }
    }

    /// Case-insensitive match of `query` against number and title
    #[must_use]
    pub fn matches_search(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty()
            || self.quote_number.to_lowercase().contains(&needle)
            || self.title.to_lowercase().contains(&needle)
    }
}

impl From<&Quote> for QuoteSummary {
    fn from(quote: &Quote) -> Self {
        Self::from_quote(quote)
    }
}

/// Server-side filter object for the quote list
///
/// A missing key means "no constraint".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteFilters {
    /// Only this status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<QuoteStatus>,
    /// Free-text search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Created on or after
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<DateTime<Utc>>,
    /// Created on or before
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<DateTime<Utc>>,
}

impl QuoteFilters {
    /// Whether `quote` passes every present constraint
    #[must_use]
    pub fn matches(&self, quote: &QuoteSummary) -> bool {
        self.status.is_none_or(|status| quote.status == status)
            && self
                .search
                .as_deref()
                .is_none_or(|query| quote.matches_search(query))
            && self.date_from.is_none_or(|from| quote.created_at >= from)
            && self.date_to.is_none_or(|to| quote.created_at <= to)
    }
}

/// Quotes slice of the root state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotesState {
    /// Current page of summaries
    pub quotes: Arc<Vec<QuoteSummary>>,
    /// Full record shown in the detail view
    pub selected_quote: Option<Arc<Quote>>,
    /// Server-side filter object
    pub filters: Arc<QuoteFilters>,
    /// Status tab selection
    pub active_status_filter: StatusFilter<QuoteStatus>,
    /// Raw search box contents
    pub search_query: String,
    /// List fetch lifecycle
    pub list_status: LoadingStatus,
    /// Detail fetch lifecycle
    pub detail_status: LoadingStatus,
    /// Last list error
    pub list_error: Option<String>,
    /// Last detail error
    pub detail_error: Option<String>,
    /// Paging of the list
    pub pagination: PaginationState,
}

impl QuotesState {
    /// Empty slice paging `page_size` quotes at a time
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            quotes: Arc::default(),
            selected_quote: None,
            filters: Arc::default(),
            active_status_filter: StatusFilter::All,
            search_query: String::new(),
            list_status: LoadingStatus::Idle,
            detail_status: LoadingStatus::Idle,
            list_error: None,
            detail_error: None,
            pagination: PaginationState::new(page_size),
        }
    }
}

impl Default for QuotesState {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn summary_is_derived_from_nested_fields() {
        let mut quote = fixtures::quote("q-1", QuoteStatus::Sent);
        quote.unread_message_count = 2;
        let summary = QuoteSummary::from_quote(&quote);

        assert_eq!(summary.item_count, quote.items.len());
        assert!(summary.has_unread_messages);
        assert_eq!(summary.status, QuoteStatus::Sent);
    }

    #[test]
    fn status_round_trips_through_wire_name() {
        for status in QuoteStatus::ALL {
            assert_eq!(status.as_str().parse::<QuoteStatus>().ok(), Some(status));
        }
        assert!("bogus".parse::<QuoteStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&QuoteStatus::UnderReview).ok().as_deref(),
            Some("\"under_review\"")
        );
    }

    #[test]
    fn filters_skip_missing_keys() {
        let filters = QuoteFilters {
            search: Some("ring".into()),
            ..QuoteFilters::default()
        };
        let json = serde_json::to_value(&filters).unwrap_or_default();
        assert_eq!(json, serde_json::json!({ "search": "ring" }));
    }

    #[test]
    fn search_is_case_insensitive() {
        let summary = QuoteSummary::from_quote(&fixtures::quote("q-7", QuoteStatus::Draft));
        assert!(summary.matches_search(&summary.title.to_uppercase()));
        assert!(summary.matches_search(""));
        assert!(!summary.matches_search("no such words"));
    }
}
