//! Approval actions and their creators.

use crate::error::ActionError;
use crate::types::{
    ApprovalDecision, ApprovalFilters, ApprovalRequest, ApprovalStatus, ApprovalSummary,
    StatusFilter,
};
use b2b_state_macros::Action;
use serde::{Deserialize, Serialize};

/// Actions handled by the approvals reducer
#[derive(Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(prefix = "APPROVAL")]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ApprovalAction {
    /// Pending list fetch started
    FetchPendingStart,

    /// Pending list fetch returned
    FetchPendingSuccess {
        /// Every request awaiting the current employee
        approvals: Vec<ApprovalSummary>,
    },

    /// Pending list fetch failed
    FetchPendingFailure {
        /// Error message
        error: String,
    },

    /// Full list fetch started
    FetchListStart,

    /// Full list fetch returned a page
    FetchListSuccess {
        /// Page of summaries
        approvals: Vec<ApprovalSummary>,
        /// Server-side total across all pages
        total_items: u32,
    },

    /// Full list fetch failed
    FetchListFailure {
        /// Error message
        error: String,
    },

    /// Detail fetch started
    FetchDetailStart,

    /// Detail fetch returned the full record
    FetchDetailSuccess {
        /// Full record
        approval: ApprovalRequest,
    },

    /// Detail fetch failed
    FetchDetailFailure {
        /// Error message
        error: String,
    },

    /// A decision is being submitted
    ActionStart {
        /// Request being decided
        approval_id: String,
    },

    /// A decision was recorded
    ActionSuccess {
        /// Request that was decided
        approval_id: String,
        /// Decision taken
        action: ApprovalDecision,
        /// Record as updated by the server
        approval: ApprovalRequest,
    },

    /// A decision was refused
    ActionFailure {
        /// Request that was being decided
        approval_id: String,
        /// Error message
        error: String,
    },

    /// Replace the filter object
    SetFilters {
        /// New filters
        filters: ApprovalFilters,
    },

    /// Select a status tab
    SetStatusFilter {
        /// `All` removes the status constraint
        filter: StatusFilter<ApprovalStatus>,
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

    /// Overwrite the pending badge counter
    UpdatePendingCount {
        /// Server-side pending count
        count: u32,
    },

    /// Close the detail view
    ClearSelected,

    /// Restore the initial slice
    Reset,
}

impl ApprovalAction {
    /// [`ApprovalAction::ActionStart`]
    pub fn action_start(approval_id: impl Into<String>) -> Self {
        Self::ActionStart {
            approval_id: approval_id.into(),
        }
    }

    /// [`ApprovalAction::ActionSuccess`] for a decision on `approval_id`
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::ApprovalIdMismatch`] when the server returned
    /// a different record than the one decided on.
    pub fn action_success(
        approval_id: impl Into<String>,
        action: ApprovalDecision,
        approval: ApprovalRequest,
    ) -> Result<Self, ActionError> {
        let approval_id = approval_id.into();
        if approval.id != approval_id {
            return Err(ActionError::ApprovalIdMismatch {
                expected: approval_id,
                actual: approval.id,
            });
        }
        Ok(Self::ActionSuccess {
            approval_id,
            action,
            approval,
        })
    }

    /// [`ApprovalAction::ActionFailure`]
    pub fn action_failure(approval_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self::ActionFailure {
            approval_id: approval_id.into(),
            error: error.into(),
        }
    }

    /// [`ApprovalAction::SetStatusFilter`] from a wire name or `"all"`
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownStatus`] for an unrecognised name.
    pub fn set_status_filter(status: &str) -> Result<Self, ActionError> {
        Ok(Self::SetStatusFilter {
            filter: status.parse()?,
        })
    }

    /// [`ApprovalAction::UpdatePendingCount`]
    #[must_use]
    pub const fn update_pending_count(count: u32) -> Self {
        Self::UpdatePendingCount { count }
    }
}
