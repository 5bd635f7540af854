//! Types shared by every slice: async lifecycle, status filters, pagination.

use b2b_state_core::identity::Identical;
use b2b_state_core::impl_identical_by_value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Three-state async lifecycle of a fetch or mutation.
///
/// `Idle → Loading → Succeeded | Failed`. A failure keeps whatever data was
/// already loaded; only the status and the error message change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Request in flight
    Loading,
    /// Last request succeeded
    Succeeded,
    /// Last request failed
    Failed,
}

impl LoadingStatus {
    /// Whether a request is in flight
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }
}

impl_identical_by_value!(LoadingStatus);

/// A status filter that is either "all" or a single concrete status.
///
/// Selecting [`StatusFilter::All`] removes the status constraint from the
/// slice's filter object instead of storing a sentinel value in it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter<T> {
    /// No status constraint
    All,
    /// Only records with this status
    Only(T),
}

impl<T> Default for StatusFilter<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: Copy> StatusFilter<T> {
    /// The concrete status, or `None` for [`StatusFilter::All`]
    #[must_use]
    pub const fn status(&self) -> Option<T> {
        match self {
            Self::All => None,
            Self::Only(status) => Some(*status),
        }
    }
}

impl<T: PartialEq> StatusFilter<T> {
    /// Whether a record with `status` passes this filter
    pub fn matches(&self, status: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl<T> From<Option<T>> for StatusFilter<T> {
    fn from(status: Option<T>) -> Self {
        status.map_or(Self::All, Self::Only)
    }
}

impl<T: PartialEq> Identical for StatusFilter<T> {
    fn identical(&self, other: &Self) -> bool {
        self == other
    }
}

impl<T: fmt::Display> fmt::Display for StatusFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => status.fmt(f),
        }
    }
}

impl<T: FromStr> FromStr for StatusFilter<T> {
    type Err = T::Err;

    /// Parses `"all"` as [`StatusFilter::All`] and anything else as a status.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// Page-based pagination with derived page counts.
///
/// `total_pages`, `has_next_page` and `has_previous_page` are always
/// recomputed from the other three fields; build new values through the
/// `with_*` methods rather than assigning fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    /// 1-based current page
    pub current_page: u32,
    /// Items per page
    pub page_size: u32,
    /// Total items on the server
    pub total_items: u32,
    /// `ceil(total_items / page_size)`, 0 when `page_size` is 0
    pub total_pages: u32,
    /// `current_page < total_pages`
    pub has_next_page: bool,
    /// `current_page > 1`
    pub has_previous_page: bool,
}

impl PaginationState {
    /// First page of an empty result set
    #[must_use]
    pub const fn new(page_size: u32) -> Self {
        Self {
            current_page: 1,
            page_size,
            total_items: 0,
            total_pages: 0,
            has_next_page: false,
            has_previous_page: false,
        }
        .recomputed()
    }

    /// Same page, new server-side total
    #[must_use]
    pub const fn with_total_items(self, total_items: u32) -> Self {
        Self {
            total_items,
            ..self
        }
        .recomputed()
    }

    /// Moves to `page` (never below 1)
    #[must_use]
    pub const fn with_page(self, page: u32) -> Self {
        Self {
            current_page: if page == 0 { 1 } else { page },
            ..self
        }
        .recomputed()
    }

    /// Changes the page size and returns to the first page
    #[must_use]
    pub const fn with_page_size(self, page_size: u32) -> Self {
        Self {
            page_size,
            current_page: 1,
            ..self
        }
        .recomputed()
    }

    /// Offset of the first item on the current page
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.current_page.saturating_sub(1)) * u64::from(self.page_size)
    }

    const fn recomputed(self) -> Self {
        let total_pages = if self.page_size == 0 {
            0
        } else {
            self.total_items.div_ceil(self.page_size)
        };
        Self {
            total_pages,
            has_next_page: self.current_page < total_pages,
            has_previous_page: self.current_page > 1,
            ..self
        }
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PAGE_SIZE)
    }
}

impl_identical_by_value!(PaginationState);
