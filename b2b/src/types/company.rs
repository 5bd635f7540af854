//! Company and employee context.

use super::common::LoadingStatus;
use b2b_state_core::impl_identical_by_value;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Commercial tier of a company account
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyTier {
    /// Default tier
    Standard,
    /// Silver
    Silver,
    /// Gold
    Gold,
    /// Platinum
    Platinum,
}

/// Account standing of a company
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyStatus {
    /// May place orders
    Active,
    /// Blocked from ordering
    Suspended,
    /// Awaiting verification
    Pending,
}

/// Role of an employee inside their company
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeRole {
    /// Full control of the account
    Admin,
    /// Approves orders and quotes
    Approver,
    /// Places orders
    Buyer,
    /// Read-only access
    Viewer,
}

/// Fine-grained capability granted to an employee
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Submit orders
    PlaceOrders,
    /// Decide on approval requests
    ApproveOrders,
    /// Request quotes
    RequestQuotes,
    /// Add and remove employees
    ManageEmployees,
    /// Change spending limits
    ManageBudgets,
    /// See negotiated pricing
    ViewPricing,
}

/// Period a spending limit applies to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitPeriod {
    /// A single order
    PerOrder,
    /// One calendar day
    Daily,
    /// One calendar week
    Weekly,
    /// One calendar month
    Monthly,
}

impl_identical_by_value!(CompanyTier, CompanyStatus, EmployeeRole, Permission, LimitPeriod);

/// A delivery address registered on the company account
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Address id
    pub id: String,
    /// Display label ("Main warehouse")
    pub label: String,
    /// Street line
    pub line1: String,
    /// Optional second line
    pub line2: Option<String>,
    /// City
    pub city: String,
    /// State, province or region
    pub region: String,
    /// Postal code
    pub postal_code: String,
    /// ISO country code
    pub country: String,
    /// Whether this is the account's default address
    pub is_default: bool,
}

/// A company-wide spending limit
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingLimit {
    /// Period the limit resets over
    pub period: LimitPeriod,
    /// Maximum spend within the period
    pub amount: f64,
}

/// The company record behind the B2B context
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Company id
    pub id: String,
    /// Legal name
    pub name: String,
    /// Customer account number
    pub account_number: String,
    /// Commercial tier
    pub tier: CompanyTier,
    /// Account standing
    pub status: CompanyStatus,
    /// Total credit line
    pub credit_limit: f64,
    /// Unused part of the credit line
    pub available_credit: f64,
    /// Payment terms ("NET30")
    pub payment_terms: String,
    /// Billing currency
    pub currency: String,
    /// Registered delivery addresses
    pub shipping_addresses: Vec<ShippingAddress>,
    /// Company-wide limits
    pub spending_limits: Vec<SpendingLimit>,
    /// Orders above this amount need approval
    pub approval_threshold: Option<f64>,
    /// Account creation time
    pub created_at: DateTime<Utc>,
}

impl Company {
    /// Whether the account may place orders
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == CompanyStatus::Active
    }

    /// The address flagged as default, else the first one
    #[must_use]
    pub fn default_shipping_address(&self) -> Option<&ShippingAddress> {
        self.shipping_addresses
            .iter()
            .find(|address| address.is_default)
            .or_else(|| self.shipping_addresses.first())
    }
}

/// The signed-in employee
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Employee id
    pub id: String,
    /// Owning company
    pub company_id: String,
    /// Login email
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Role
    pub role: EmployeeRole,
    /// Explicit capability grants
    pub permissions: Vec<Permission>,
    /// Per-order limit for this employee
    pub spending_limit: Option<f64>,
    /// Department
    pub department: Option<String>,
    /// Whether the login is enabled
    pub is_active: bool,
}

impl Employee {
    /// `"First Last"`, trimmed
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Admins hold every permission; everyone else needs an explicit grant.
    #[must_use]
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.role == EmployeeRole::Admin || self.permissions.contains(&permission)
    }
}

/// Directory entry for an employee
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    /// Employee id
    pub id: String,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Role
    pub role: EmployeeRole,
    /// Whether the login is enabled
    pub is_active: bool,
}

impl From<&Employee> for EmployeeSummary {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id.clone(),
            name: employee.full_name(),
            email: employee.email.clone(),
            role: employee.role,
            is_active: employee.is_active,
        }
    }
}

/// Company slice of the root state
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyState {
    /// The authoritative company record
    pub current_company: Option<Arc<Company>>,
    /// The signed-in employee
    pub current_employee: Option<Arc<Employee>>,
    /// Employee directory
    pub employees: Arc<Vec<EmployeeSummary>>,
    /// Context fetch lifecycle
    pub status: LoadingStatus,
    /// Last fetch error
    pub error: Option<String>,
    /// True iff both company and employee are present
    #[serde(rename = "isB2BActive")]
    pub is_b2b_active: bool,
    /// When the context was last fetched
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

impl CompanyState {
    /// Recomputes `is_b2b_active` from the company/employee pair
    pub fn sync_active_flag(&mut self) {
        self.is_b2b_active = self.current_company.is_some() && self.current_employee.is_some();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn admin_holds_every_permission() {
        let mut employee = fixtures::employee();
        employee.role = EmployeeRole::Admin;
        employee.permissions.clear();
        assert!(employee.has_permission(Permission::ManageBudgets));

        employee.role = EmployeeRole::Viewer;
        assert!(!employee.has_permission(Permission::PlaceOrders));
    }

    #[test]
    fn default_address_falls_back_to_first() {
        let mut company = fixtures::company();
        for address in &mut company.shipping_addresses {
            address.is_default = false;
        }
        let first = company.shipping_addresses.first().map(|a| a.id.clone());
        assert_eq!(company.default_shipping_address().map(|a| a.id.clone()), first);
    }

    #[test]
    fn summary_uses_full_name() {
        let employee = fixtures::employee();
        let summary = EmployeeSummary::from(&employee);
        assert_eq!(summary.name, employee.full_name());
        assert_eq!(summary.role, employee.role);
    }
}
