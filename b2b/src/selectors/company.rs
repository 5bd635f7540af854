//! Company and employee selectors.

use crate::config::B2BConfig;
use crate::types::{
    Company, CompanyState, CompanyTier, Employee, EmployeeRole, EmployeeSummary, LoadingStatus,
    Permission, RootState, ShippingAddress,
};
use b2b_state_core::memo::{
    create_shallow_selector, memoize, memoize_with_param, DerivedSelector, Memoized,
    ParamMemoized,
};
use b2b_state_macros::ShallowEq;
use chrono::{DateTime, Utc};
use std::sync::Arc;

// ========== Raw accessors ==========

/// The company slice
#[must_use]
pub fn select_company_state(state: &RootState) -> Arc<CompanyState> {
    Arc::clone(&state.company)
}

/// Buying company
#[must_use]
pub fn select_current_company(state: &RootState) -> Option<Arc<Company>> {
    state.company.current_company.clone()
}

/// Signed-in employee
#[must_use]
pub fn select_current_employee(state: &RootState) -> Option<Arc<Employee>> {
    state.company.current_employee.clone()
}

/// Employee directory
#[must_use]
pub fn select_employees(state: &RootState) -> Arc<Vec<EmployeeSummary>> {
    Arc::clone(&state.company.employees)
}

/// Context fetch lifecycle
#[must_use]
pub fn select_company_status(state: &RootState) -> LoadingStatus {
    state.company.status
}

/// Last context fetch error
#[must_use]
pub fn select_company_error(state: &RootState) -> Option<String> {
    state.company.error.clone()
}

/// Whether both halves of the B2B context are loaded
#[must_use]
pub fn select_is_b2b_active(state: &RootState) -> bool {
    state.company.is_b2b_active
}

/// Last successful context fetch
#[must_use]
pub fn select_company_last_refreshed_at(state: &RootState) -> Option<DateTime<Utc>> {
    state.company.last_refreshed_at
}

// ========== Simple derivations ==========

/// Pricing tier of the company
#[must_use]
pub fn select_company_tier(state: &RootState) -> Option<CompanyTier> {
    state.company.current_company.as_ref().map(|company| company.tier)
}

/// Role of the signed-in employee
#[must_use]
pub fn select_employee_role(state: &RootState) -> Option<EmployeeRole> {
    state.company.current_employee.as_ref().map(|employee| employee.role)
}

/// Display name of the signed-in employee
#[must_use]
pub fn select_employee_full_name(state: &RootState) -> Option<String> {
    state.company.current_employee.as_ref().map(|employee| employee.full_name())
}

/// Per-order cap of the signed-in employee
#[must_use]
pub fn select_employee_spending_limit(state: &RootState) -> Option<f64> {
    state
        .company
        .current_employee
        .as_ref()
        .and_then(|employee| employee.spending_limit)
}

/// Whether the signed-in employee may decide approvals
#[must_use]
pub fn select_can_approve(state: &RootState) -> bool {
    employee_has(state, Permission::ApproveOrders)
}

/// Whether the signed-in employee may submit orders
#[must_use]
pub fn select_can_place_orders(state: &RootState) -> bool {
    employee_has(state, Permission::PlaceOrders)
}

fn employee_has(state: &RootState, permission: Permission) -> bool {
    state
        .company
        .current_employee
        .as_ref()
        .is_some_and(|employee| employee.has_permission(permission))
}

// ========== Read models ==========

/// Who is buying, for whom, and what they may do
#[derive(Clone, Debug, PartialEq, ShallowEq)]
pub struct CompanyContext {
    /// Buying company
    pub company: Option<Arc<Company>>,
    /// Signed-in employee
    pub employee: Option<Arc<Employee>>,
    /// Both halves loaded
    pub is_b2b_active: bool,
    /// Holds `ApproveOrders`
    pub can_approve: bool,
    /// Holds `PlaceOrders`
    pub can_place_orders: bool,
}

type ContextInputs = (Option<Arc<Company>>, Option<Arc<Employee>>, bool);

fn company_context((company, employee, is_b2b_active): &ContextInputs) -> Arc<CompanyContext> {
    let allowed = |permission: Permission| {
        employee
            .as_ref()
            .is_some_and(|employee| employee.has_permission(permission))
    };
    Arc::new(CompanyContext {
        company: company.clone(),
        employee: employee.clone(),
        is_b2b_active: *is_b2b_active,
        can_approve: allowed(Permission::ApproveOrders),
        can_place_orders: allowed(Permission::PlaceOrders),
    })
}

/// Memoized company selectors
pub struct CompanySelectors {
    has_permission: ParamMemoized<Option<Arc<Employee>>, Permission, bool>,
    shipping_addresses: Memoized<Option<Arc<Company>>, Arc<Vec<ShippingAddress>>>,
    default_address: Memoized<Option<Arc<Company>>, Option<ShippingAddress>>,
    employee_by_id: ParamMemoized<Arc<Vec<EmployeeSummary>>, String, Option<EmployeeSummary>>,
    employees_by_role: ParamMemoized<Arc<Vec<EmployeeSummary>>, EmployeeRole, Arc<Vec<EmployeeSummary>>>,
    active_employees: Memoized<Arc<Vec<EmployeeSummary>>, Arc<Vec<EmployeeSummary>>>,
    context: DerivedSelector<RootState, ContextInputs, Arc<CompanyContext>>,
}

impl CompanySelectors {
    /// Selectors whose parameterized caches hold `config.selector_cache_size` entries
    #[must_use]
    pub fn new(config: &B2BConfig) -> Self {
        let capacity = config.selector_cache_size;
        Self {
            has_permission: memoize_with_param(
                |employee: &Option<Arc<Employee>>, permission: &Permission| {
                    employee
                        .as_ref()
                        .is_some_and(|employee| employee.has_permission(*permission))
                },
                capacity,
            ),
            shipping_addresses: memoize(|company: &Option<Arc<Company>>| {
                Arc::new(
                    company
                        .as_ref()
                        .map(|company| company.shipping_addresses.clone())
                        .unwrap_or_default(),
                )
            }),
            default_address: memoize(|company: &Option<Arc<Company>>| {
                company
                    .as_ref()
                    .and_then(|company| company.default_shipping_address().cloned())
            }),
            employee_by_id: memoize_with_param(
                |employees: &Arc<Vec<EmployeeSummary>>, id: &String| {
                    employees.iter().find(|employee| &employee.id == id).cloned()
                },
                capacity,
            ),
            employees_by_role: memoize_with_param(
                |employees: &Arc<Vec<EmployeeSummary>>, role: &EmployeeRole| {
                    Arc::new(
                        employees
                            .iter()
                            .filter(|employee| employee.role == *role)
                            .cloned()
                            .collect(),
                    )
                },
                capacity,
            ),
            active_employees: memoize(|employees: &Arc<Vec<EmployeeSummary>>| {
                Arc::new(
                    employees
                        .iter()
                        .filter(|employee| employee.is_active)
                        .cloned()
                        .collect(),
                )
            }),
            context: create_shallow_selector(
                (
                    select_current_company,
                    select_current_employee,
                    select_is_b2b_active,
                ),
                company_context,
            ),
        }
    }

    /// Whether the signed-in employee holds `permission`
    #[must_use]
    pub fn has_permission(&self, state: &RootState, permission: Permission) -> bool {
        self.has_permission
            .call(&state.company.current_employee, &permission)
    }

    /// Delivery addresses of the company, empty without one
    #[must_use]
    pub fn shipping_addresses(&self, state: &RootState) -> Arc<Vec<ShippingAddress>> {
        self.shipping_addresses.call(&state.company.current_company)
    }

    /// Default delivery address, falling back to the first
    #[must_use]
    pub fn default_shipping_address(&self, state: &RootState) -> Option<ShippingAddress> {
        self.default_address.call(&state.company.current_company)
    }

    /// Directory entry with `id`
    #[must_use]
    pub fn employee_by_id(&self, state: &RootState, id: &str) -> Option<EmployeeSummary> {
        self.employee_by_id.call(&state.company.employees, id)
    }

    /// Directory entries holding `role`
    #[must_use]
    pub fn employees_by_role(
        &self,
        state: &RootState,
        role: EmployeeRole,
    ) -> Arc<Vec<EmployeeSummary>> {
        self.employees_by_role.call(&state.company.employees, &role)
    }

    /// Directory entries that are active
    #[must_use]
    pub fn active_employees(&self, state: &RootState) -> Arc<Vec<EmployeeSummary>> {
        self.active_employees.call(&state.company.employees)
    }

    /// Context read model
    #[must_use]
    pub fn company_context(&self, state: &RootState) -> Arc<CompanyContext> {
        self.context.call(state)
    }

    /// Drops every cached value
    pub fn clear(&self) {
        self.has_permission.clear();
        self.shipping_addresses.clear();
        self.default_address.clear();
        self.employee_by_id.clear();
        self.employees_by_role.clear();
        self.active_employees.clear();
        self.context.clear();
    }
}

impl Default for CompanySelectors {
    fn default() -> Self {
        Self::new(&B2BConfig::default())
    }
}

impl std::fmt::Debug for CompanySelectors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompanySelectors")
            .field("has_permission", &self.has_permission)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn signed_in(employee: Employee) -> RootState {
        let mut slice = CompanyState::default();
        slice.current_company = Some(Arc::new(fixtures::company()));
        slice.current_employee = Some(Arc::new(employee));
        slice.employees = Arc::new(vec![
            EmployeeSummary::from(&fixtures::employee()),
            EmployeeSummary::from(&fixtures::approver()),
        ]);
        slice.sync_active_flag();
        RootState {
            company: Arc::new(slice),
            ..RootState::default()
        }
    }

    #[test]
    fn signed_out_defaults() {
        let selectors = CompanySelectors::default();
        let state = RootState::default();

        assert!(!select_is_b2b_active(&state));
        assert_eq!(select_company_tier(&state), None);
        assert!(!select_can_place_orders(&state));
        assert!(selectors.shipping_addresses(&state).is_empty());
        assert!(selectors.default_shipping_address(&state).is_none());
        assert!(!selectors.has_permission(&state, Permission::ViewPricing));
    }

    #[test]
    fn buyer_permissions() {
        let selectors = CompanySelectors::default();
        let state = signed_in(fixtures::employee());

        assert_eq!(select_company_tier(&state), Some(CompanyTier::Gold));
        assert_eq!(select_employee_full_name(&state).as_deref(), Some("Dana Buyer"));
        assert_eq!(select_employee_spending_limit(&state), Some(2_500.0));
        assert!(select_can_place_orders(&state));
        assert!(!select_can_approve(&state));
        assert!(selectors.has_permission(&state, Permission::RequestQuotes));
        assert!(!selectors.has_permission(&state, Permission::ManageBudgets));
    }

    #[test]
    fn addresses_and_directory() {
        let selectors = CompanySelectors::default();
        let state = signed_in(fixtures::approver());

        assert_eq!(selectors.shipping_addresses(&state).len(), 2);
        assert_eq!(
            selectors.default_shipping_address(&state).map(|a| a.id),
            Some("addr-1".to_string())
        );
        assert_eq!(
            selectors.employee_by_id(&state, "employee-2").map(|e| e.role),
            Some(EmployeeRole::Approver)
        );
        assert_eq!(selectors.employees_by_role(&state, EmployeeRole::Buyer).len(), 1);
        assert_eq!(selectors.active_employees(&state).len(), 2);
    }

    #[test]
    fn context_is_stable_until_pair_changes() {
        let selectors = CompanySelectors::default();
        let state = signed_in(fixtures::approver());
        let first = selectors.company_context(&state);
        assert!(first.can_approve);

        let mut slice = (*state.company).clone();
        slice.status = LoadingStatus::Loading;
        let refreshing = RootState {
            company: Arc::new(slice),
            ..state.clone()
        };
        assert!(Arc::ptr_eq(&first, &selectors.company_context(&refreshing)));

        let swapped = signed_in(fixtures::employee());
        let second = selectors.company_context(&swapped);
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(!second.can_approve);
    }
}
