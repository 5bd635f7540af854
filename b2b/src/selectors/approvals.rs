//! Approval selectors.
//!
//! Lookups by id search the full list first and fall back to the pending
//! list, which is loaded independently and may hold records the current
//! page does not.

use crate::config::B2BConfig;
use crate::types::{
    ApprovalEntityType, ApprovalFilters, ApprovalRequest, ApprovalStatus, ApprovalSummary,
    ApprovalsState, LoadingStatus, PaginationState, RootState, StatusFilter,
};
use b2b_state_core::memo::{
    create_selector, create_shallow_selector, memoize, memoize_with_param, DerivedSelector,
    Memoized, ParamMemoized,
};
use b2b_state_macros::ShallowEq;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

type Summaries = Arc<Vec<ApprovalSummary>>;

// ========== Raw accessors ==========

/// The approvals slice
#[must_use]
pub fn select_approvals_state(state: &RootState) -> Arc<ApprovalsState> {
    Arc::clone(&state.approvals)
}

/// Requests awaiting the signed-in employee
#[must_use]
pub fn select_pending_approvals(state: &RootState) -> Summaries {
    Arc::clone(&state.approvals.pending_approvals)
}

/// Current page of every request
#[must_use]
pub fn select_all_approvals(state: &RootState) -> Summaries {
    Arc::clone(&state.approvals.all_approvals)
}

/// Request open in the detail view
#[must_use]
pub fn select_selected_approval(state: &RootState) -> Option<Arc<ApprovalRequest>> {
    state.approvals.selected_approval.clone()
}

/// Server-side filter object
#[must_use]
pub fn select_approval_filters(state: &RootState) -> Arc<ApprovalFilters> {
    Arc::clone(&state.approvals.filters)
}

/// Status tab selection
#[must_use]
pub fn select_approvals_status_filter(state: &RootState) -> StatusFilter<ApprovalStatus> {
    state.approvals.active_status_filter
}

/// Badge counter
#[must_use]
pub fn select_pending_count(state: &RootState) -> u32 {
    state.approvals.pending_count
}

/// Paging of the full list
#[must_use]
pub fn select_approvals_pagination(state: &RootState) -> PaginationState {
    state.approvals.pagination
}

/// Pending list fetch lifecycle
#[must_use]
pub fn select_pending_approvals_status(state: &RootState) -> LoadingStatus {
    state.approvals.pending_status
}

/// Full list fetch lifecycle
#[must_use]
pub fn select_approvals_list_status(state: &RootState) -> LoadingStatus {
    state.approvals.list_status
}

/// Detail fetch lifecycle
#[must_use]
pub fn select_approval_detail_status(state: &RootState) -> LoadingStatus {
    state.approvals.detail_status
}

/// Decision submission lifecycle
#[must_use]
pub fn select_approval_action_status(state: &RootState) -> LoadingStatus {
    state.approvals.action_status
}

/// Request a decision is in flight for
#[must_use]
pub fn select_processing_id(state: &RootState) -> Option<String> {
    state.approvals.processing_id.clone()
}

/// Last pending list error
#[must_use]
pub fn select_pending_approvals_error(state: &RootState) -> Option<String> {
    state.approvals.pending_error.clone()
}

/// Last full list error
#[must_use]
pub fn select_approvals_list_error(state: &RootState) -> Option<String> {
    state.approvals.list_error.clone()
}

/// Last detail error
#[must_use]
pub fn select_approval_detail_error(state: &RootState) -> Option<String> {
    state.approvals.detail_error.clone()
}

/// Last decision submission error
#[must_use]
pub fn select_approval_action_error(state: &RootState) -> Option<String> {
    state.approvals.action_error.clone()
}

// ========== Simple derivations ==========

/// Whether the badge counter is non-zero
#[must_use]
pub fn select_has_pending_approvals(state: &RootState) -> bool {
    state.approvals.pending_count > 0
}

/// Whether a decision on `approval_id` is being submitted
#[must_use]
pub fn select_is_processing(state: &RootState, approval_id: &str) -> bool {
    state.approvals.processing_id.as_deref() == Some(approval_id)
}

/// Whether any approvals fetch is in flight
#[must_use]
pub fn select_is_approvals_loading(state: &RootState) -> bool {
    let approvals = &state.approvals;
    approvals.pending_status.is_loading()
        || approvals.list_status.is_loading()
        || approvals.detail_status.is_loading()
}

// ========== Read models ==========

/// Approver inbox read model
#[derive(Clone, Debug, PartialEq, ShallowEq)]
pub struct ApprovalsDashboard {
    /// Pending requests
    pub pending: Summaries,
    /// Pending requests past their deadline
    pub overdue: Summaries,
    /// Pending requests of high or urgent priority
    pub high_priority: Summaries,
    /// Badge counter
    pub pending_count: u32,
    /// Pending list fetch lifecycle
    pub pending_status: LoadingStatus,
    /// Decision submission lifecycle
    pub action_status: LoadingStatus,
    /// Request a decision is in flight for
    pub processing_id: Option<String>,
}

type DashboardInputs = (
    Summaries,
    Summaries,
    Summaries,
    u32,
    LoadingStatus,
    LoadingStatus,
    Option<String>,
);

type PendingSubset = DerivedSelector<RootState, (Summaries,), Summaries>;

fn pending_subset(keep: fn(&ApprovalSummary) -> bool) -> PendingSubset {
    create_selector((select_pending_approvals,), move |(pending,): &(Summaries,)| {
        Arc::new(pending.iter().filter(|approval| keep(approval)).cloned().collect())
    })
}

fn build_dashboard(
    (
        pending,
        overdue,
        high_priority,
        pending_count,
        pending_status,
        action_status,
        processing_id,
    ): &DashboardInputs,
) -> Arc<ApprovalsDashboard> {
    Arc::new(ApprovalsDashboard {
        pending: Arc::clone(pending),
        overdue: Arc::clone(overdue),
        high_priority: Arc::clone(high_priority),
        pending_count: *pending_count,
        pending_status: *pending_status,
        action_status: *action_status,
        processing_id: processing_id.clone(),
    })
}

/// Memoized approval selectors
pub struct ApprovalSelectors {
    by_id: ParamMemoized<(Summaries, Summaries), String, Option<ApprovalSummary>>,
    by_status: ParamMemoized<Summaries, ApprovalStatus, Summaries>,
    by_entity_type: ParamMemoized<Summaries, ApprovalEntityType, Summaries>,
    status_counts: Memoized<Summaries, Arc<BTreeMap<ApprovalStatus, usize>>>,
    overdue: Rc<PendingSubset>,
    high_priority: Rc<PendingSubset>,
    filtered: DerivedSelector<RootState, (Summaries, Arc<ApprovalFilters>), Summaries>,
    pending_total: Memoized<Summaries, f64>,
    dashboard: DerivedSelector<RootState, DashboardInputs, Arc<ApprovalsDashboard>>,
}

impl ApprovalSelectors {
    /// Selectors whose parameterized caches hold `config.selector_cache_size` entries
    #[must_use]
    pub fn new(config: &B2BConfig) -> Self {
        let capacity = config.selector_cache_size;
        let overdue = Rc::new(pending_subset(|approval| approval.is_overdue));
        let high_priority = Rc::new(pending_subset(|approval| approval.priority.is_high()));

        let overdue_input = Rc::clone(&overdue);
        let high_priority_input = Rc::clone(&high_priority);
        let dashboard = create_shallow_selector(
            (
                select_pending_approvals,
                move |state: &RootState| overdue_input.call(state),
                move |state: &RootState| high_priority_input.call(state),
                select_pending_count,
                select_pending_approvals_status,
                select_approval_action_status,
                select_processing_id,
            ),
            build_dashboard,
        );

        Self {
            by_id: memoize_with_param(
                |(all, pending): &(Summaries, Summaries), id: &String| {
                    all.iter()
                        .chain(pending.iter())
                        .find(|approval| &approval.id == id)
                        .cloned()
                },
                capacity,
            ),
            by_status: memoize_with_param(
                |all: &Summaries, status: &ApprovalStatus| {
                    Arc::new(
                        all.iter()
                            .filter(|approval| approval.status == *status)
                            .cloned()
                            .collect(),
                    )
                },
                capacity,
            ),
            by_entity_type: memoize_with_param(
                |all: &Summaries, entity_type: &ApprovalEntityType| {
                    Arc::new(
                        all.iter()
                            .filter(|approval| approval.entity_type == *entity_type)
                            .cloned()
                            .collect(),
                    )
                },
                capacity,
            ),
            status_counts: memoize(|all: &Summaries| {
                let mut counts: BTreeMap<ApprovalStatus, usize> =
                    ApprovalStatus::ALL.iter().map(|status| (*status, 0)).collect();
                for approval in all.iter() {
                    *counts.entry(approval.status).or_default() += 1;
                }
                Arc::new(counts)
            }),
            overdue,
            high_priority,
            filtered: create_selector(
                (select_all_approvals, select_approval_filters),
                |(all, filters): &(Summaries, Arc<ApprovalFilters>)| {
                    Arc::new(
                        all.iter()
                            .filter(|approval| filters.matches(approval))
                            .cloned()
                            .collect::<Vec<_>>(),
                    )
                },
            ),
            pending_total: memoize(|pending: &Summaries| {
                pending.iter().map(|approval| approval.amount).sum()
            }),
            dashboard,
        }
    }

    /// Summary with `id`, from either list
    #[must_use]
    pub fn approval_by_id(&self, state: &RootState, id: &str) -> Option<ApprovalSummary> {
        let lists = (
            Arc::clone(&state.approvals.all_approvals),
            Arc::clone(&state.approvals.pending_approvals),
        );
        self.by_id.call(&lists, id)
    }

    /// Loaded requests in `status`
    #[must_use]
    pub fn approvals_by_status(&self, state: &RootState, status: ApprovalStatus) -> Summaries {
        self.by_status.call(&state.approvals.all_approvals, &status)
    }

    /// Loaded requests about `entity_type`
    #[must_use]
    pub fn approvals_by_entity_type(
        &self,
        state: &RootState,
        entity_type: ApprovalEntityType,
    ) -> Summaries {
        self.by_entity_type
            .call(&state.approvals.all_approvals, &entity_type)
    }

    /// Count per status over the loaded list, every status present
    #[must_use]
    pub fn status_counts(&self, state: &RootState) -> Arc<BTreeMap<ApprovalStatus, usize>> {
        self.status_counts.call(&state.approvals.all_approvals)
    }

    /// Pending requests past their deadline
    #[must_use]
    pub fn overdue_approvals(&self, state: &RootState) -> Summaries {
        self.overdue.call(state)
    }

    /// Pending requests of high or urgent priority
    #[must_use]
    pub fn high_priority_pending(&self, state: &RootState) -> Summaries {
        self.high_priority.call(state)
    }

    /// Loaded requests passing the filter object
    #[must_use]
    pub fn filtered_approvals(&self, state: &RootState) -> Summaries {
        self.filtered.call(state)
    }

    /// Sum of amounts awaiting a decision
    #[must_use]
    pub fn pending_total_amount(&self, state: &RootState) -> f64 {
        self.pending_total.call(&state.approvals.pending_approvals)
    }

    /// Inbox read model
    #[must_use]
    pub fn approvals_dashboard(&self, state: &RootState) -> Arc<ApprovalsDashboard> {
        self.dashboard.call(state)
    }

    /// Drops every cached value
    pub fn clear(&self) {
        self.by_id.clear();
        self.by_status.clear();
        self.by_entity_type.clear();
        self.status_counts.clear();
        self.overdue.clear();
        self.high_priority.clear();
        self.filtered.clear();
        self.pending_total.clear();
        self.dashboard.clear();
    }
}

impl Default for ApprovalSelectors {
    fn default() -> Self {
        Self::new(&B2BConfig::default())
    }
}

impl std::fmt::Debug for ApprovalSelectors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApprovalSelectors")
            .field("by_id", &self.by_id)
            .field("dashboard", &self.dashboard)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::types::ApprovalPriority;
    use chrono::Duration;

    fn summary(id: &str, status: ApprovalStatus) -> ApprovalSummary {
        ApprovalSummary::from_request(&fixtures::approval(id, status), fixtures::epoch())
    }

    fn root(pending: Vec<ApprovalSummary>, all: Vec<ApprovalSummary>) -> RootState {
        let mut slice = ApprovalsState::default();
        slice.pending_count = u32::try_from(pending.len()).unwrap_or(u32::MAX);
        slice.pending_approvals = Arc::new(pending);
        slice.all_approvals = Arc::new(all);
        RootState {
            approvals: Arc::new(slice),
            ..RootState::default()
        }
    }

    fn sample() -> RootState {
        let overdue = ApprovalSummary::from_request(
            &fixtures::approval("a2", ApprovalStatus::Pending),
            fixtures::epoch() + Duration::days(2),
        );
        let mut urgent = summary("a3", ApprovalStatus::Pending);
        urgent.priority = ApprovalPriority::Urgent;
        root(
            vec![summary("a1", ApprovalStatus::Pending), overdue, urgent],
            vec![
                summary("a4", ApprovalStatus::Approved),
                summary("a5", ApprovalStatus::Rejected),
            ],
        )
    }

    #[test]
    fn lookup_falls_back_to_pending_list() {
        let selectors = ApprovalSelectors::default();
        let state = sample();

        assert_eq!(
            selectors.approval_by_id(&state, "a4").map(|a| a.status),
            Some(ApprovalStatus::Approved)
        );
        assert_eq!(
            selectors.approval_by_id(&state, "a1").map(|a| a.status),
            Some(ApprovalStatus::Pending)
        );
        assert!(selectors.approval_by_id(&state, "zz").is_none());
    }

    #[test]
    fn subsets_of_pending() {
        let selectors = ApprovalSelectors::default();
        let state = sample();

        let overdue = selectors.overdue_approvals(&state);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue.first().map(|a| a.id.as_str()), Some("a2"));

        let high = selectors.high_priority_pending(&state);
        assert_eq!(high.first().map(|a| a.id.as_str()), Some("a3"));

        assert!((selectors.pending_total_amount(&state) - 22_500.0).abs() < f64::EPSILON);
        assert!(select_has_pending_approvals(&state));
    }

    #[test]
    fn grouping_over_loaded_list() {
        let selectors = ApprovalSelectors::default();
        let state = sample();

        let counts = selectors.status_counts(&state);
        assert_eq!(counts.get(&ApprovalStatus::Approved), Some(&1));
        assert_eq!(counts.get(&ApprovalStatus::Pending), Some(&0));
        assert_eq!(
            selectors
                .approvals_by_entity_type(&state, ApprovalEntityType::Order)
                .len(),
            2
        );
        assert_eq!(
            selectors
                .approvals_by_status(&state, ApprovalStatus::Rejected)
                .len(),
            1
        );
    }

    #[test]
    fn filtered_uses_filter_object() {
        let selectors = ApprovalSelectors::default();
        let state = sample();
        let mut slice = (*state.approvals).clone();
        slice.filters = Arc::new(ApprovalFilters {
            search: Some("po-a5".into()),
            ..ApprovalFilters::default()
        });
        let filtered = RootState {
            approvals: Arc::new(slice),
            ..state
        };

        let found = selectors.filtered_approvals(&filtered);
        assert_eq!(found.len(), 1);
        assert_eq!(found.first().map(|a| a.id.as_str()), Some("a5"));
    }

    #[test]
    fn dashboard_tracks_processing() {
        let selectors = ApprovalSelectors::default();
        let state = sample();
        let idle = selectors.approvals_dashboard(&state);
        assert!(Arc::ptr_eq(&idle, &selectors.approvals_dashboard(&state)));
        assert_eq!(idle.pending_count, 3);

        let mut slice = (*state.approvals).clone();
        slice.processing_id = Some("a1".into());
        slice.action_status = LoadingStatus::Loading;
        let busy = RootState {
            approvals: Arc::new(slice),
            ..state.clone()
        };

        let dashboard = selectors.approvals_dashboard(&busy);
        assert!(!Arc::ptr_eq(&idle, &dashboard));
        assert!(Arc::ptr_eq(&idle.overdue, &dashboard.overdue));
        assert!(select_is_processing(&busy, "a1"));
        assert!(!select_is_processing(&busy, "a2"));
    }
}
