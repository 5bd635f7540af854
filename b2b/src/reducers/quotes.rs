//! Quotes reducer.

use crate::actions::QuoteAction;
use crate::config::B2BConfig;
use crate::environment::B2BEnvironment;
use crate::types::{LoadingStatus, QuoteFilters, QuoteSummary, QuotesState, StatusFilter};
use b2b_state_core::reducer::Reducer;
use std::sync::Arc;

/// Reducer for the quotes slice
#[derive(Debug, Clone)]
pub struct QuotesReducer {
    initial: Arc<QuotesState>,
}

impl QuotesReducer {
    /// Reducer whose initial slice pages by `config.default_page_size`
    #[must_use]
    pub fn new(config: &B2BConfig) -> Self {
        Self {
            initial: Arc::new(QuotesState::new(config.default_page_size)),
        }
    }
}

impl Default for QuotesReducer {
    fn default() -> Self {
        Self::new(&B2BConfig::default())
    }
}

/// Filter changes always return to the first page.
fn first_page(quotes: &mut QuotesState) {
    quotes.pagination = quotes.pagination.with_page(1);
}

impl Reducer for QuotesReducer {
    type State = QuotesState;
    type Action = QuoteAction;
    type Environment = B2BEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(&self, state: &mut Arc<QuotesState>, action: QuoteAction, _env: &B2BEnvironment) {
        match action {
            // ========== List lifecycle ==========
            QuoteAction::FetchListStart => {
                let quotes = Arc::make_mut(state);
                quotes.list_status = LoadingStatus::Loading;
                quotes.list_error = None;
            },

            QuoteAction::FetchListSuccess {
                quotes: page,
                total_items,
            } => {
                let quotes = Arc::make_mut(state);
                quotes.quotes = Arc::new(page);
                quotes.pagination = quotes.pagination.with_total_items(total_items);
                quotes.list_status = LoadingStatus::Succeeded;
            },

            QuoteAction::FetchListFailure { error } => {
                tracing::debug!(%error, "Quote list fetch failed");
                let quotes = Arc::make_mut(state);
                quotes.list_status = LoadingStatus::Failed;
                quotes.list_error = Some(error);
            },

            // ========== Detail lifecycle ==========
            QuoteAction::FetchDetailStart => {
                let quotes = Arc::make_mut(state);
                quotes.detail_status = LoadingStatus::Loading;
                quotes.detail_error = None;
            },

            QuoteAction::FetchDetailSuccess { quote } => {
                let quotes = Arc::make_mut(state);
                quotes.selected_quote = Some(Arc::new(quote));
                quotes.detail_status = LoadingStatus::Succeeded;
            },

            QuoteAction::FetchDetailFailure { error } => {
                tracing::debug!(%error, "Quote detail fetch failed");
                let quotes = Arc::make_mut(state);
                quotes.detail_status = LoadingStatus::Failed;
                quotes.detail_error = Some(error);
            },

            // ========== Filters ==========
            QuoteAction::SetFilters { filters } => {
                let quotes = Arc::make_mut(state);
                quotes.active_status_filter = StatusFilter::from(filters.status);
                quotes.search_query = filters.search.clone().unwrap_or_default();
                quotes.filters = Arc::new(filters);
                first_page(quotes);
            },

            QuoteAction::SetStatusFilter { filter } => {
                let quotes = Arc::make_mut(state);
                quotes.active_status_filter = filter;
                Arc::make_mut(&mut quotes.filters).status = filter.status();
                first_page(quotes);
            },

            QuoteAction::SetSearchQuery { query } => {
                let quotes = Arc::make_mut(state);
                Arc::make_mut(&mut quotes.filters).search =
                    (!query.is_empty()).then(|| query.clone());
                quotes.search_query = query;
                first_page(quotes);
            },

            QuoteAction::ClearFilters => {
                let quotes = Arc::make_mut(state);
                quotes.filters = Arc::new(QuoteFilters::default());
                quotes.active_status_filter = StatusFilter::All;
                quotes.search_query.clear();
                first_page(quotes);
            },

            // ========== Pagination ==========
            QuoteAction::SetPage { page } => {
                let quotes = Arc::make_mut(state);
                quotes.pagination = quotes.pagination.with_page(page);
            },

            QuoteAction::SetPageSize { page_size } => {
                let quotes = Arc::make_mut(state);
                quotes.pagination = quotes.pagination.with_page_size(page_size);
            },

            // ========== Mutations ==========
            QuoteAction::CreateSuccess { quote } => {
                let quotes = Arc::make_mut(state);
                Arc::make_mut(&mut quotes.quotes).insert(0, QuoteSummary::from_quote(&quote));
                quotes.pagination = quotes
                    .pagination
                    .with_total_items(quotes.pagination.total_items.saturating_add(1));
            },

            QuoteAction::UpdateSuccess { quote } => {
                let listed = state.quotes.iter().position(|q| q.id == quote.id);
                let selected = state
                    .selected_quote
                    .as_ref()
                    .is_some_and(|selected| selected.id == quote.id);
                if listed.is_none() && !selected {
                    tracing::trace!(quote_id = %quote.id, "Update for unknown quote ignored");
                    return;
                }

                let quotes = Arc::make_mut(state);
                if let Some(index) = listed {
                    if let Some(entry) = Arc::make_mut(&mut quotes.quotes).get_mut(index) {
                        *entry = QuoteSummary::from_quote(&quote);
                    }
                }
                if selected {
                    quotes.selected_quote = Some(Arc::new(quote));
                }
            },

            QuoteAction::ClearSelected => {
                let quotes = Arc::make_mut(state);
                quotes.selected_quote = None;
                quotes.detail_status = LoadingStatus::Idle;
                quotes.detail_error = None;
            },

            QuoteAction::Reset => {
                *state = Arc::clone(&self.initial);
            },
        }
    }
}
