//! Company context actions and their creators.

use crate::error::ActionError;
use crate::types::{Company, Employee, EmployeeSummary};
use b2b_state_macros::Action;
use serde::{Deserialize, Serialize};

/// Actions handled by the company reducer
#[derive(Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(prefix = "COMPANY")]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum CompanyAction {
    /// Context fetch started
    FetchStart,

    /// Context fetch returned company and employee
    FetchSuccess {
        /// Company record
        company: Company,
        /// Signed-in employee
        employee: Employee,
    },

    /// Context fetch failed
    FetchFailure {
        /// Error message
        error: String,
    },

    /// Switch or clear the signed-in employee
    SetCurrentEmployee {
        /// New employee
        employee: Option<Employee>,
    },

    /// Replace the company record
    UpdateCompany {
        /// New record
        company: Company,
    },

    /// Employee directory fetched
    FetchEmployeesSuccess {
        /// Directory entries
        employees: Vec<EmployeeSummary>,
    },

    /// Leave the B2B context (sign-out of the company account)
    ClearContext,

    /// Restore the initial slice
    Reset,
}

impl CompanyAction {
    /// [`CompanyAction::FetchSuccess`] for a consistent pair
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::EmployeeCompanyMismatch`] if the employee
    /// belongs to a different company.
    pub fn fetch_success(company: Company, employee: Employee) -> Result<Self, ActionError> {
        if employee.company_id != company.id {
            return Err(ActionError::EmployeeCompanyMismatch {
                employee_id: employee.id,
                company_id: company.id,
            });
        }
        Ok(Self::FetchSuccess { company, employee })
    }

    /// [`CompanyAction::FetchFailure`]
    pub fn fetch_failure(error: impl Into<String>) -> Self {
        Self::FetchFailure {
            error: error.into(),
        }
    }

    /// [`CompanyAction::SetCurrentEmployee`]
    #[must_use]
    pub fn set_current_employee(employee: Option<Employee>) -> Self {
        Self::SetCurrentEmployee { employee }
    }
}
