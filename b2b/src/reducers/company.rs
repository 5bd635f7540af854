//! Company context reducer.
//!
//! `is_b2b_active` is recomputed on every action that touches the
//! company/employee pair. A fetch failure forces it off even when stale
//! data is still present.

use crate::actions::CompanyAction;
use crate::environment::B2BEnvironment;
use crate::types::{CompanyState, LoadingStatus};
use b2b_state_core::reducer::Reducer;
use std::sync::Arc;

/// Reducer for the company slice
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanyReducer;

impl CompanyReducer {
    /// Create a new company reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for CompanyReducer {
    type State = CompanyState;
    type Action = CompanyAction;
    type Environment = B2BEnvironment;

    fn reduce(&self, state: &mut Arc<CompanyState>, action: CompanyAction, env: &B2BEnvironment) {
        match action {
            CompanyAction::FetchStart => {
                let company = Arc::make_mut(state);
                company.status = LoadingStatus::Loading;
                company.error = None;
            },

            CompanyAction::FetchSuccess {
                company: record,
                employee,
            } => {
                let company = Arc::make_mut(state);
                company.current_company = Some(Arc::new(record));
                company.current_employee = Some(Arc::new(employee));
                company.status = LoadingStatus::Succeeded;
                company.error = None;
                company.last_refreshed_at = Some(env.clock.now());
                company.sync_active_flag();
            },

            CompanyAction::FetchFailure { error } => {
                tracing::debug!(%error, "Company context fetch failed");
                let company = Arc::make_mut(state);
                company.status = LoadingStatus::Failed;
                company.error = Some(error);
                company.is_b2b_active = false;
            },

            CompanyAction::SetCurrentEmployee { employee } => {
                let company = Arc::make_mut(state);
                company.current_employee = employee.map(Arc::new);
                company.sync_active_flag();
            },

            CompanyAction::UpdateCompany { company: record } => {
                let company = Arc::make_mut(state);
                company.current_company = Some(Arc::new(record));
                company.sync_active_flag();
            },

            CompanyAction::FetchEmployeesSuccess { employees } => {
                Arc::make_mut(state).employees = Arc::new(employees);
            },

            CompanyAction::ClearContext => {
                let company = Arc::make_mut(state);
                company.current_company = None;
                company.current_employee = None;
                company.employees = Arc::default();
                company.last_refreshed_at = None;
                company.sync_active_flag();
            },

            CompanyAction::Reset => {
                *state = Arc::default();
            },
        }
    }
}
