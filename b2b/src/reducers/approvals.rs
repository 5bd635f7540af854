//! Approvals reducer.
//!
//! `ActionSuccess` keeps three views of a request consistent from one
//! server response: the selected full record, its entry in the full list,
//! and its entry (or absence) in the pending list with the pending badge.

use crate::actions::ApprovalAction;
use crate::config::B2BConfig;
use crate::environment::B2BEnvironment;
use crate::types::{
    ApprovalFilters, ApprovalStatus, ApprovalSummary, ApprovalsState, LoadingStatus, StatusFilter,
};
use b2b_state_core::reducer::Reducer;
use std::sync::Arc;

/// Reducer for the approvals slice
#[derive(Debug, Clone)]
pub struct ApprovalsReducer {
    initial: Arc<ApprovalsState>,
}

impl ApprovalsReducer {
    /// Reducer whose initial slice pages by `config.default_page_size`
    #[must_use]
    pub fn new(config: &B2BConfig) -> Self {
        Self {
            initial: Arc::new(ApprovalsState::new(config.default_page_size)),
        }
    }
}

impl Default for ApprovalsReducer {
    fn default() -> Self {
        Self::new(&B2BConfig::default())
    }
}

fn replace_entry(list: &mut Arc<Vec<ApprovalSummary>>, id: &str, summary: &ApprovalSummary) {
    if let Some(index) = list.iter().position(|entry| entry.id == id) {
        if let Some(entry) = Arc::make_mut(list).get_mut(index) {
            entry.clone_from(summary);
        }
    }
}

impl Reducer for ApprovalsReducer {
    type State = ApprovalsState;
    type Action = ApprovalAction;
    type Environment = B2BEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(&self, state: &mut Arc<ApprovalsState>, action: ApprovalAction, env: &B2BEnvironment) {
        match action {
            // ========== Pending list ==========
            ApprovalAction::FetchPendingStart => {
                let approvals = Arc::make_mut(state);
                approvals.pending_status = LoadingStatus::Loading;
                approvals.pending_error = None;
            },

            ApprovalAction::FetchPendingSuccess { approvals: pending } => {
                let approvals = Arc::make_mut(state);
                approvals.pending_count = u32::try_from(pending.len()).unwrap_or(u32::MAX);
                approvals.pending_approvals = Arc::new(pending);
                approvals.pending_status = LoadingStatus::Succeeded;
            },

            ApprovalAction::FetchPendingFailure { error } => {
                tracing::debug!(%error, "Pending approvals fetch failed");
                let approvals = Arc::make_mut(state);
                approvals.pending_status = LoadingStatus::Failed;
                approvals.pending_error = Some(error);
            },

            // ========== Full list ==========
            ApprovalAction::FetchListStart => {
                let approvals = Arc::make_mut(state);
                approvals.list_status = LoadingStatus::Loading;
                approvals.list_error = None;
            },

            ApprovalAction::FetchListSuccess {
                approvals: page,
                total_items,
            } => {
                let approvals = Arc::make_mut(state);
                approvals.all_approvals = Arc::new(page);
                approvals.pagination = approvals.pagination.with_total_items(total_items);
                approvals.list_status = LoadingStatus::Succeeded;
            },

            ApprovalAction::FetchListFailure { error } => {
                tracing::debug!(%error, "Approval list fetch failed");
                let approvals = Arc::make_mut(state);
                approvals.list_status = LoadingStatus::Failed;
                approvals.list_error = Some(error);
            },

            // ========== Detail ==========
            ApprovalAction::FetchDetailStart => {
                let approvals = Arc::make_mut(state);
                approvals.detail_status = LoadingStatus::Loading;
                approvals.detail_error = None;
            },

            ApprovalAction::FetchDetailSuccess { approval } => {
                let approvals = Arc::make_mut(state);
                approvals.selected_approval = Some(Arc::new(approval));
                approvals.detail_status = LoadingStatus::Succeeded;
            },

            ApprovalAction::FetchDetailFailure { error } => {
                tracing::debug!(%error, "Approval detail fetch failed");
                let approvals = Arc::make_mut(state);
                approvals.detail_status = LoadingStatus::Failed;
                approvals.detail_error = Some(error);
            },

            // ========== Decisions ==========
            ApprovalAction::ActionStart { approval_id } => {
                let approvals = Arc::make_mut(state);
                approvals.action_status = LoadingStatus::Loading;
                approvals.action_error = None;
                approvals.processing_id = Some(approval_id);
            },

            ApprovalAction::ActionSuccess {
                approval_id,
                action,
                approval,
            } => {
                // `approval_id` addresses every view, whatever id the record carries.
                let mut summary = ApprovalSummary::from_request(&approval, env.clock.now());
                summary.id.clone_from(&approval_id);
                let approvals = Arc::make_mut(state);

                replace_entry(&mut approvals.all_approvals, &approval_id, &summary);

                if summary.status == ApprovalStatus::Pending {
                    replace_entry(&mut approvals.pending_approvals, &approval_id, &summary);
                } else {
                    if approvals
                        .pending_approvals
                        .iter()
                        .any(|entry| entry.id == approval_id)
                    {
                        Arc::make_mut(&mut approvals.pending_approvals)
                            .retain(|entry| entry.id != approval_id);
                    }
                    approvals.pending_count = approvals.pending_count.saturating_sub(1);
                    tracing::debug!(
                        %approval_id,
                        decision = ?action,
                        status = %summary.status,
                        pending_count = approvals.pending_count,
                        "Approval left the pending queue"
                    );
                }

                if approvals
                    .selected_approval
                    .as_ref()
                    .is_some_and(|selected| selected.id == approval_id)
                {
                    approvals.selected_approval = Some(Arc::new(approval));
                }

                approvals.action_status = LoadingStatus::Succeeded;
                approvals.processing_id = None;
            },

            ApprovalAction::ActionFailure { approval_id, error } => {
                tracing::debug!(%approval_id, %error, "Approval decision failed");
                let approvals = Arc::make_mut(state);
                approvals.action_status = LoadingStatus::Failed;
                approvals.action_error = Some(error);
                approvals.processing_id = None;
            },

            // ========== Filters and paging ==========
            ApprovalAction::SetFilters { filters } => {
                let approvals = Arc::make_mut(state);
                approvals.active_status_filter = StatusFilter::from(filters.status);
                approvals.filters = Arc::new(filters);
                approvals.pagination = approvals.pagination.with_page(1);
            },

            ApprovalAction::SetStatusFilter { filter } => {
                let approvals = Arc::make_mut(state);
                approvals.active_status_filter = filter;
                Arc::make_mut(&mut approvals.filters).status = filter.status();
                approvals.pagination = approvals.pagination.with_page(1);
            },

            ApprovalAction::ClearFilters => {
                let approvals = Arc::make_mut(state);
                approvals.filters = Arc::new(ApprovalFilters::default());
                approvals.active_status_filter = StatusFilter::All;
                approvals.pagination = approvals.pagination.with_page(1);
            },

            ApprovalAction::SetPage { page } => {
                let approvals = Arc::make_mut(state);
                approvals.pagination = approvals.pagination.with_page(page);
            },

            ApprovalAction::SetPageSize { page_size } => {
                let approvals = Arc::make_mut(state);
                approvals.pagination = approvals.pagination.with_page_size(page_size);
            },

            ApprovalAction::UpdatePendingCount { count } => {
                Arc::make_mut(state).pending_count = count;
            },

            ApprovalAction::ClearSelected => {
                let approvals = Arc::make_mut(state);
                approvals.selected_approval = None;
                approvals.detail_status = LoadingStatus::Idle;
                approvals.detail_error = None;
            },

            ApprovalAction::Reset => {
                *state = Arc::clone(&self.initial);
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::types::{ApprovalDecision, ApprovalPriority};
    use b2b_state_testing::{test_clock, test_epoch, ReducerTest};
    use chrono::Duration;

    fn env() -> B2BEnvironment {
        B2BEnvironment::new(Arc::new(test_clock()))
    }

    fn summary(id: &str, status: ApprovalStatus) -> ApprovalSummary {
        ApprovalSummary::from_request(&fixtures::approval(id, status), test_epoch())
    }

    fn with_pending(ids: &[&str]) -> ApprovalsState {
        let entries: Vec<_> = ids
            .iter()
            .map(|id| summary(id, ApprovalStatus::Pending))
            .collect();
        let mut state = ApprovalsState::default();
        state.pending_count = u32::try_from(entries.len()).unwrap_or(0);
        state.all_approvals = Arc::new(entries.clone());
        state.pending_approvals = Arc::new(entries);
        state
    }

    #[test]
    fn fetch_pending_sets_count_from_length() {
        ReducerTest::new(ApprovalsReducer::default())
            .with_env(env())
            .given_state(ApprovalsState::default())
            .when_action(ApprovalAction::FetchPendingSuccess {
                approvals: vec![
                    summary("a-1", ApprovalStatus::Pending),
                    summary("a-2", ApprovalStatus::Pending),
                ],
            })
            .then_state(|approvals| {
                assert_eq!(approvals.pending_count, 2);
                assert_eq!(approvals.pending_status, LoadingStatus::Succeeded);
            })
            .run();
    }

    #[test]
    fn approving_removes_from_pending_and_decrements() {
        let mut state = with_pending(&["a-1", "a-2"]);
        state.selected_approval = Some(Arc::new(fixtures::approval("a-1", ApprovalStatus::Pending)));

        ReducerTest::new(ApprovalsReducer::default())
            .with_env(env())
            .given_state(state)
            .when_actions([
                ApprovalAction::action_start("a-1"),
                ApprovalAction::ActionSuccess {
                    approval_id: "a-1".into(),
                    action: ApprovalDecision::Approve,
                    approval: fixtures::approval("a-1", ApprovalStatus::Approved),
                },
            ])
            .then_state(|approvals| {
                assert_eq!(approvals.pending_count, 1);
                assert!(approvals.pending_approvals.iter().all(|a| a.id != "a-1"));
                let entry = approvals.all_approvals.iter().find(|a| a.id == "a-1");
                assert_eq!(entry.map(|a| a.status), Some(ApprovalStatus::Approved));
                assert_eq!(
                    approvals.selected_approval.as_ref().map(|a| a.status),
                    Some(ApprovalStatus::Approved)
                );
                assert_eq!(approvals.action_status, LoadingStatus::Succeeded);
                assert_eq!(approvals.processing_id, None);
            })
            .run();
    }

    #[test]
    fn still_pending_updates_in_place() {
        let mut updated = fixtures::approval("a-2", ApprovalStatus::Pending);
        updated.priority = ApprovalPriority::Urgent;

        ReducerTest::new(ApprovalsReducer::default())
            .with_env(env())
            .given_state(with_pending(&["a-1", "a-2"]))
            .when_action(ApprovalAction::ActionSuccess {
                approval_id: "a-2".into(),
                action: ApprovalDecision::Escalate,
                approval: updated,
            })
            .then_state(|approvals| {
                assert_eq!(approvals.pending_count, 2);
                let entry = approvals.pending_approvals.iter().find(|a| a.id == "a-2");
                assert_eq!(entry.map(|a| a.priority), Some(ApprovalPriority::Urgent));
            })
            .run();
    }

    #[test]
    fn decision_is_keyed_by_action_id() {
        let mut state = with_pending(&["a-1", "a-2"]);
        state.selected_approval = Some(Arc::new(fixtures::approval("a-1", ApprovalStatus::Pending)));

        ReducerTest::new(ApprovalsReducer::default())
            .with_env(env())
            .given_state(state)
            .when_action(ApprovalAction::ActionSuccess {
                approval_id: "a-1".into(),
                action: ApprovalDecision::Approve,
                approval: fixtures::approval("a-2", ApprovalStatus::Approved),
            })
            .then_state(|approvals| {
                let ids: Vec<_> = approvals.all_approvals.iter().map(|a| a.id.as_str()).collect();
                assert_eq!(ids, ["a-1", "a-2"]);
                let status_of = |id: &str| {
                    approvals
                        .all_approvals
                        .iter()
                        .find(|a| a.id == id)
                        .map(|a| a.status)
                };
                assert_eq!(status_of("a-1"), Some(ApprovalStatus::Approved));
                assert_eq!(status_of("a-2"), Some(ApprovalStatus::Pending));

                let pending: Vec<_> = approvals
                    .pending_approvals
                    .iter()
                    .map(|a| a.id.as_str())
                    .collect();
                assert_eq!(pending, ["a-2"]);
                assert_eq!(approvals.pending_count, 1);
                assert_eq!(
                    approvals.selected_approval.as_ref().map(|a| a.status),
                    Some(ApprovalStatus::Approved)
                );
            })
            .run();
    }

    #[test]
    fn pending_count_is_floored_at_zero() {
        ReducerTest::new(ApprovalsReducer::default())
            .with_env(env())
            .given_state(ApprovalsState::default())
            .when_action(ApprovalAction::ActionSuccess {
                approval_id: "a-9".into(),
                action: ApprovalDecision::Reject,
                approval: fixtures::approval("a-9", ApprovalStatus::Rejected),
            })
            .then_state(|approvals| assert_eq!(approvals.pending_count, 0))
            .run();
    }

    #[test]
    fn overdue_flag_uses_environment_clock() {
        let mut record = fixtures::approval("a-1", ApprovalStatus::Pending);
        record.due_at = Some(test_epoch() - Duration::minutes(5));

        ReducerTest::new(ApprovalsReducer::default())
            .with_env(env())
            .given_state(with_pending(&["a-1"]))
            .when_action(ApprovalAction::ActionSuccess {
                approval_id: "a-1".into(),
                action: ApprovalDecision::Escalate,
                approval: record,
            })
            .then_state(|approvals| {
                let entry = approvals.pending_approvals.first();
                assert_eq!(entry.map(|a| a.is_overdue), Some(true));
            })
            .run();
    }

    #[test]
    fn action_failure_records_error() {
        ReducerTest::new(ApprovalsReducer::default())
            .with_env(env())
            .given_state(with_pending(&["a-1"]))
            .when_actions([
                ApprovalAction::action_start("a-1"),
                ApprovalAction::action_failure("a-1", "forbidden"),
            ])
            .then_state(|approvals| {
                assert_eq!(approvals.action_status, LoadingStatus::Failed);
                assert_eq!(approvals.action_error.as_deref(), Some("forbidden"));
                assert_eq!(approvals.processing_id, None);
                assert_eq!(approvals.pending_count, 1);
            })
            .run();
    }

    #[test]
    fn status_filter_all_removes_status_key() {
        let mut state = ApprovalsState::default();
        state.filters = Arc::new(ApprovalFilters {
            status: Some(ApprovalStatus::Pending),
            search: Some("PO".into()),
            ..ApprovalFilters::default()
        });

        ReducerTest::new(ApprovalsReducer::default())
            .with_env(env())
            .given_state(state)
            .when_action(ApprovalAction::SetStatusFilter {
                filter: StatusFilter::All,
            })
            .then_state(|approvals| {
                assert_eq!(approvals.filters.status, None);
                assert_eq!(approvals.filters.search.as_deref(), Some("PO"));
            })
            .run();
    }

    #[test]
    fn update_pending_count_overwrites() {
        ReducerTest::new(ApprovalsReducer::default())
            .with_env(env())
            .given_state(with_pending(&["a-1"]))
            .when_action(ApprovalAction::update_pending_count(12))
            .then_state(|approvals| assert_eq!(approvals.pending_count, 12))
            .run();
    }
}
