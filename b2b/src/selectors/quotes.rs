//! Quote selectors.

use crate::config::B2BConfig;
use crate::types::{
    LoadingStatus, PaginationState, Quote, QuoteFilters, QuoteStatus, QuoteSummary, QuotesState,
    RootState, StatusFilter,
};
use b2b_state_core::memo::{
    create_selector, create_shallow_selector, memoize, memoize_with_param, DerivedSelector,
    Memoized, ParamMemoized,
};
use b2b_state_macros::ShallowEq;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

// ========== Raw accessors ==========

/// The quotes slice
#[must_use]
pub fn select_quotes_state(state: &RootState) -> Arc<QuotesState> {
    Arc::clone(&state.quotes)
}

/// Current page of summaries
#[must_use]
pub fn select_quotes(state: &RootState) -> Arc<Vec<QuoteSummary>> {
    Arc::clone(&state.quotes.quotes)
}

/// Quote open in the detail view
#[must_use]
pub fn select_selected_quote(state: &RootState) -> Option<Arc<Quote>> {
    state.quotes.selected_quote.clone()
}

/// Server-side filter object
#[must_use]
pub fn select_quote_filters(state: &RootState) -> Arc<QuoteFilters> {
    Arc::clone(&state.quotes.filters)
}

/// Status tab selection
#[must_use]
pub fn select_quotes_status_filter(state: &RootState) -> StatusFilter<QuoteStatus> {
    state.quotes.active_status_filter
}

/// Search box contents
#[must_use]
pub fn select_quotes_search_query(state: &RootState) -> String {
    state.quotes.search_query.clone()
}

/// List fetch lifecycle
#[must_use]
pub fn select_quotes_list_status(state: &RootState) -> LoadingStatus {
    state.quotes.list_status
}

/// Detail fetch lifecycle
#[must_use]
pub fn select_quote_detail_status(state: &RootState) -> LoadingStatus {
    state.quotes.detail_status
}

/// Last list error
#[must_use]
pub fn select_quotes_list_error(state: &RootState) -> Option<String> {
    state.quotes.list_error.clone()
}

/// Last detail error
#[must_use]
pub fn select_quote_detail_error(state: &RootState) -> Option<String> {
    state.quotes.detail_error.clone()
}

/// Paging of the list
#[must_use]
pub fn select_quotes_pagination(state: &RootState) -> PaginationState {
    state.quotes.pagination
}

/// Whether either fetch is in flight
#[must_use]
pub fn select_is_quotes_loading(state: &RootState) -> bool {
    state.quotes.list_status.is_loading() || state.quotes.detail_status.is_loading()
}

// ========== Read models ==========

/// List page bundle for a quotes table
#[derive(Clone, Debug, PartialEq, ShallowEq)]
pub struct QuotesView {
    /// Filtered summaries
    pub quotes: Arc<Vec<QuoteSummary>>,
    /// Paging
    pub pagination: PaginationState,
    /// Status tab selection
    pub active_status_filter: StatusFilter<QuoteStatus>,
    /// List fetch lifecycle
    pub status: LoadingStatus,
    /// Last list error
    pub error: Option<String>,
}

type QuotesViewInputs = (
    Arc<Vec<QuoteSummary>>,
    PaginationState,
    StatusFilter<QuoteStatus>,
    LoadingStatus,
    Option<String>,
);

type FilteredQuotes =
    DerivedSelector<RootState, (Arc<Vec<QuoteSummary>>, Arc<QuoteFilters>), Arc<Vec<QuoteSummary>>>;

/// Memoized quote selectors
pub struct QuoteSelectors {
    by_id: ParamMemoized<Arc<Vec<QuoteSummary>>, String, Option<QuoteSummary>>,
    by_status: ParamMemoized<Arc<Vec<QuoteSummary>>, QuoteStatus, Arc<Vec<QuoteSummary>>>,
    status_counts: Memoized<Arc<Vec<QuoteSummary>>, Arc<BTreeMap<QuoteStatus, usize>>>,
    with_unread: Memoized<Arc<Vec<QuoteSummary>>, Arc<Vec<QuoteSummary>>>,
    open_value: Memoized<Arc<Vec<QuoteSummary>>, f64>,
    filtered: Rc<FilteredQuotes>,
    view: DerivedSelector<RootState, QuotesViewInputs, Arc<QuotesView>>,
}

impl QuoteSelectors {
    /// Selectors whose parameterized caches hold `config.selector_cache_size` entries
    #[must_use]
    pub fn new(config: &B2BConfig) -> Self {
        let filtered: Rc<FilteredQuotes> = Rc::new(create_selector(
            (select_quotes, select_quote_filters),
            |(quotes, filters): &(Arc<Vec<QuoteSummary>>, Arc<QuoteFilters>)| {
                Arc::new(
                    quotes
                        .iter()
                        .filter(|quote| filters.matches(quote))
                        .cloned()
                        .collect::<Vec<_>>(),
                )
            },
        ));

        let upstream = Rc::clone(&filtered);
        let view = create_shallow_selector(
            (
                move |state: &RootState| upstream.call(state),
                select_quotes_pagination,
                select_quotes_status_filter,
                select_quotes_list_status,
                select_quotes_list_error,
            ),
            |(quotes, pagination, filter, status, error): &QuotesViewInputs| {
                Arc::new(QuotesView {
                    quotes: Arc::clone(quotes),
                    pagination: *pagination,
                    active_status_filter: *filter,
                    status: *status,
                    error: error.clone(),
                })
            },
        );

        Self {
            by_id: memoize_with_param(
                |quotes: &Arc<Vec<QuoteSummary>>, id: &String| {
                    quotes.iter().find(|quote| &quote.id == id).cloned()
                },
                config.selector_cache_size,
            ),
            by_status: memoize_with_param(
                |quotes: &Arc<Vec<QuoteSummary>>, status: &QuoteStatus| {
                    Arc::new(
                        quotes
                            .iter()
                            .filter(|quote| quote.status == *status)
                            .cloned()
                            .collect(),
                    )
                },
                config.selector_cache_size,
            ),
            status_counts: memoize(|quotes: &Arc<Vec<QuoteSummary>>| {
                let mut counts: BTreeMap<QuoteStatus, usize> =
                    QuoteStatus::ALL.iter().map(|status| (*status, 0)).collect();
                for quote in quotes.iter() {
                    *counts.entry(quote.status).or_default() += 1;
                }
                Arc::new(counts)
            }),
            with_unread: memoize(|quotes: &Arc<Vec<QuoteSummary>>| {
                Arc::new(
                    quotes
                        .iter()
                        .filter(|quote| quote.has_unread_messages)
                        .cloned()
                        .collect(),
                )
            }),
            open_value: memoize(|quotes: &Arc<Vec<QuoteSummary>>| {
                quotes
                    .iter()
                    .filter(|quote| !quote.status.is_terminal())
                    .map(|quote| quote.total)
                    .sum()
            }),
            filtered,
            view,
        }
    }

    /// Summary with `id` on the current page
    #[must_use]
    pub fn quote_by_id(&self, state: &RootState, id: &str) -> Option<QuoteSummary> {
        self.by_id.call(&state.quotes.quotes, id)
    }

    /// Summaries in `status`
    #[must_use]
    pub fn quotes_by_status(&self, state: &RootState, status: QuoteStatus) -> Arc<Vec<QuoteSummary>> {
        self.by_status.call(&state.quotes.quotes, &status)
    }

    /// Count per status, every status present
    #[must_use]
    pub fn status_counts(&self, state: &RootState) -> Arc<BTreeMap<QuoteStatus, usize>> {
        self.status_counts.call(&state.quotes.quotes)
    }

    /// Summaries passing the filter object
    #[must_use]
    pub fn filtered_quotes(&self, state: &RootState) -> Arc<Vec<QuoteSummary>> {
        self.filtered.call(state)
    }

    /// Summaries with unread messages
    #[must_use]
    pub fn quotes_with_unread_messages(&self, state: &RootState) -> Arc<Vec<QuoteSummary>> {
        self.with_unread.call(&state.quotes.quotes)
    }

    /// Sum of totals over quotes still in negotiation
    #[must_use]
    pub fn open_quotes_value(&self, state: &RootState) -> f64 {
        self.open_value.call(&state.quotes.quotes)
    }

    /// Quotes table read model
    #[must_use]
    pub fn quotes_view(&self, state: &RootState) -> Arc<QuotesView> {
        self.view.call(state)
    }

    /// Drops every cached value
    pub fn clear(&self) {
        self.by_id.clear();
        self.by_status.clear();
        self.status_counts.clear();
        self.with_unread.clear();
        self.open_value.clear();
        self.filtered.clear();
        self.view.clear();
    }
}

impl Default for QuoteSelectors {
    fn default() -> Self {
        Self::new(&B2BConfig::default())
    }
}

impl std::fmt::Debug for QuoteSelectors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteSelectors")
            .field("by_id", &self.by_id)
            .field("by_status", &self.by_status)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}
