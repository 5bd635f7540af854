//! Approval requests, summaries and the approvals slice.

use super::common::{LoadingStatus, PaginationState, StatusFilter};
use b2b_state_core::impl_identical_by_value;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Workflow status of an approval request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Waiting for a decision
    Pending,
    /// Approved
    Approved,
    /// Rejected
    Rejected,
    /// Handed to a higher approver
    Escalated,
    /// Withdrawn by the requester
    Cancelled,
}

impl ApprovalStatus {
    /// Every status, in workflow order
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Approved,
        Self::Rejected,
        Self::Escalated,
        Self::Cancelled,
    ];

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Escalated => "escalated",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalStatus {
    type Err = crate::error::ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| crate::error::ActionError::UnknownStatus(s.to_string()))
    }
}

/// What an approval request is about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalEntityType {
    /// A purchase order
    Order,
    /// A quote acceptance
    Quote,
    /// A spending limit change
    SpendingLimit,
}

/// Urgency of an approval request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalPriority {
    /// Low
    Low,
    /// Normal
    Normal,
    /// High
    High,
    /// Urgent
    Urgent,
}

impl ApprovalPriority {
    /// High or urgent
    #[must_use]
    pub const fn is_high(self) -> bool {
        matches!(self, Self::High | Self::Urgent)
    }
}

/// Decision an approver takes on a request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    /// Approve
    Approve,
    /// Reject
    Reject,
    /// Escalate to a higher approver
    Escalate,
    /// Cancel the request
    Cancel,
}

impl ApprovalDecision {
    /// Status a request normally lands in after this decision
    #[must_use]
    pub const fn expected_status(self) -> ApprovalStatus {
        match self {
            Self::Approve => ApprovalStatus::Approved,
            Self::Reject => ApprovalStatus::Rejected,
            Self::Escalate => ApprovalStatus::Escalated,
            Self::Cancel => ApprovalStatus::Cancelled,
        }
    }
}

impl_identical_by_value!(ApprovalStatus, ApprovalEntityType, ApprovalPriority, ApprovalDecision);

/// One decision in an approval's audit trail
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalHistoryEntry {
    /// Decision taken
    pub decision: ApprovalDecision,
    /// Approver id
    pub actor_id: String,
    /// Approver display name
    pub actor_name: String,
    /// Optional comment
    pub comment: Option<String>,
    /// Decision time
    pub at: DateTime<Utc>,
}

/// Full approval request record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    /// Request id
    pub id: String,
    /// Kind of entity awaiting approval
    pub entity_type: ApprovalEntityType,
    /// Id of that entity
    pub entity_id: String,
    /// Human-facing reference ("PO-1042")
    pub entity_reference: String,
    /// Workflow status
    pub status: ApprovalStatus,
    /// Urgency
    pub priority: ApprovalPriority,
    /// Requesting employee id
    pub requested_by_id: String,
    /// Requesting employee name
    pub requested_by_name: String,
    /// Amount at stake
    pub amount: f64,
    /// Currency
    pub currency: String,
    /// Why approval is needed
    pub reason: Option<String>,
    /// Decisions taken so far
    pub history: Vec<ApprovalHistoryEntry>,
    /// Decision deadline
    pub due_at: Option<DateTime<Utc>>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last change
    pub updated_at: DateTime<Utc>,
}

/// Denormalized list entry for an approval request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalSummary {
    /// Request id
    pub id: String,
    /// Kind of entity
    pub entity_type: ApprovalEntityType,
    /// Human-facing reference
    pub entity_reference: String,
    /// Workflow status
    pub status: ApprovalStatus,
    /// Urgency
    pub priority: ApprovalPriority,
    /// Requesting employee name
    pub requested_by_name: String,
    /// Amount at stake
    pub amount: f64,
    /// Currency
    pub currency: String,
    /// Decision deadline
    pub due_at: Option<DateTime<Utc>>,
    /// `due_at` is in the past as of the last rebuild
    pub is_overdue: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl ApprovalSummary {
    /// Builds the list entry, judging overdue-ness against `now`
    #[must_use]
    pub fn from_request(request: &ApprovalRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: request.id.clone(),
            entity_type: request.entity_type,
            entity_reference: request.entity_reference.clone(),
            status: request.status,
            priority: request.priority,
            requested_by_name: request.requested_by_name.clone(),
            amount: request.amount,
            currency: request.currency.clone(),
            due_at: request.due_at,
            is_overdue: request.due_at.is_some_and(|due| due < now),
            created_at: request.created_at,
        }
    }

    /// Case-insensitive match against reference and requester
    #[must_use]
    pub fn matches_search(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty()
            || self.entity_reference.to_lowercase().contains(&needle)
            || self.requested_by_name.to_lowercase().contains(&needle)
    }
}

/// Server-side filter object for the approval list
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalFilters {
    /// Only this status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApprovalStatus>,
    /// Only this entity type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<ApprovalEntityType>,
    /// Only this priority
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<ApprovalPriority>,
    /// Free-text search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ApprovalFilters {
    /// Whether `approval` passes every present constraint
    #[must_use]
    pub fn matches(&self, approval: &ApprovalSummary) -> bool {
        self.status.is_none_or(|status| approval.status == status)
            && self
                .entity_type
                .is_none_or(|entity_type| approval.entity_type == entity_type)
            && self.priority.is_none_or(|priority| approval.priority == priority)
            && self
                .search
                .as_deref()
                .is_none_or(|query| approval.matches_search(query))
    }
}

/// Approvals slice of the root state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalsState {
    /// Requests awaiting the current employee
    pub pending_approvals: Arc<Vec<ApprovalSummary>>,
    /// Current page of every request
    pub all_approvals: Arc<Vec<ApprovalSummary>>,
    /// Full record shown in the detail view
    pub selected_approval: Option<Arc<ApprovalRequest>>,
    /// Server-side filter object
    pub filters: Arc<ApprovalFilters>,
    /// Status tab selection
    pub active_status_filter: StatusFilter<ApprovalStatus>,
    /// Denormalized pending counter (badge)
    pub pending_count: u32,
    /// Paging of the full list
    pub pagination: PaginationState,
    /// Pending list fetch lifecycle
    pub pending_status: LoadingStatus,
    /// Full list fetch lifecycle
    pub list_status: LoadingStatus,
    /// Detail fetch lifecycle
    pub detail_status: LoadingStatus,
    /// Decision submission lifecycle
    pub action_status: LoadingStatus,
    /// Request a decision is being submitted for
    pub processing_id: Option<String>,
    /// Last pending list error
    pub pending_error: Option<String>,
    /// Last full list error
    pub list_error: Option<String>,
    /// Last detail error
    pub detail_error: Option<String>,
    /// Last decision error
    pub action_error: Option<String>,
}

impl ApprovalsState {
    /// Empty slice paging `page_size` requests at a time
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            pending_approvals: Arc::default(),
            all_approvals: Arc::default(),
            selected_approval: None,
            filters: Arc::default(),
            active_status_filter: StatusFilter::All,
            pending_count: 0,
            pagination: PaginationState::new(page_size),
            pending_status: LoadingStatus::Idle,
            list_status: LoadingStatus::Idle,
            detail_status: LoadingStatus::Idle,
            action_status: LoadingStatus::Idle,
            processing_id: None,
            pending_error: None,
            list_error: None,
            detail_error: None,
            action_error: None,
        }
    }
}

impl Default for ApprovalsState {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PAGE_SIZE)
    }
}
