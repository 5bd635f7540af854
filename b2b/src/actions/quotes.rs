//! Quote actions and their creators.

use crate::error::ActionError;
use crate::types::{Quote, QuoteFilters, QuoteStatus, QuoteSummary, StatusFilter};
use b2b_state_macros::Action;
use serde::{Deserialize, Serialize};

/// Actions handled by the quotes reducer
#[derive(Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(prefix = "QUOTES")]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum QuoteAction {
    /// List fetch started
    FetchListStart,

    /// List fetch returned a page
    FetchListSuccess {
        /// Page of summaries
        quotes: Vec<QuoteSummary>,
        /// Server-side total across all pages
        total_items: u32,
    },

    /// List fetch failed
    FetchListFailure {
        /// Error message
        error: String,
    },

    /// Detail fetch started
    FetchDetailStart,

    /// Detail fetch returned the full record
    FetchDetailSuccess {
        /// Full record
        quote: Quote,
    },

    /// Detail fetch failed
    FetchDetailFailure {
        /// Error message
        error: String,
    },

    /// Replace the filter object
    SetFilters {
        /// New filters
        filters: QuoteFilters,
    },

    /// Select a status tab
    SetStatusFilter {
        /// `All` removes the status constraint
        filter: StatusFilter<QuoteStatus>,
    },

    /// Update the search box
    SetSearchQuery {
        /// Raw query, empty removes the search constraint
        query: String,
    },

    /// Drop every filter
    ClearFilters,

    /// Move to a page
    SetPage {
        /// 1-based page
        page: u32,
    },

    /// Change the page size
    SetPageSize {
        /// Items per page
        page_size: u32,
    },

    /// A quote was created
    CreateSuccess {
        /// Created record
        quote: Quote,
    },

    /// A quote was updated
    UpdateSuccess {
        /// Updated record
        quote: Quote,
    },

    /// Close the detail view
    ClearSelected,

    /// Restore the initial slice
    Reset,
}

impl QuoteAction {
    /// [`QuoteAction::FetchListSuccess`] built from full records
    #[must_use]
    pub fn fetch_list_success(quotes: &[Quote], total_items: u32) -> Self {
        Self::FetchListSuccess {
            quotes: quotes.iter().map(QuoteSummary::from_quote).collect(),
            total_items,
        }
    }

    /// [`QuoteAction::FetchListFailure`]
    pub fn fetch_list_failure(error: impl Into<String>) -> Self {
        Self::FetchListFailure {
            error: error.into(),
        }
    }

    /// [`QuoteAction::FetchDetailFailure`]
    pub fn fetch_detail_failure(error: impl Into<String>) -> Self {
        Self::FetchDetailFailure {
            error: error.into(),
        }
    }

    /// [`QuoteAction::SetStatusFilter`] from a wire name or `"all"`
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownStatus`] for an unrecognised name.
    pub fn set_status_filter(status: &str) -> Result<Self, ActionError> {
        Ok(Self::SetStatusFilter {
            filter: status.parse()?,
        })
    }

    /// [`QuoteAction::SetSearchQuery`]
    pub fn set_search_query(query: impl Into<String>) -> Self {
        Self::SetSearchQuery {
            query: query.into(),
        }
    }

    /// [`QuoteAction::SetPage`]
    #[must_use]
    pub const fn set_page(page: u32) -> Self {
        Self::SetPage { page }
    }
}
