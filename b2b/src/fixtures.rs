//! Sample records for tests, demos and documentation.
//!
//! Every builder is deterministic: timestamps are derived from [`epoch`]
//! (2025-01-01 00:00:00 UTC) and ids from the arguments.

use crate::types::{
    ApprovalEntityType, ApprovalPriority, ApprovalRequest, ApprovalStatus, B2BCartItem, Company,
    CompanyStatus, CompanyTier, Employee, EmployeeRole, LimitPeriod, Permission, Quote, QuoteItem,
    QuoteStatus, ShippingAddress, SpendingLimit,
};
use chrono::{DateTime, Duration, Utc};

/// Company id used by [`company`] and [`employee`]
pub const COMPANY_ID: &str = "company-1";

/// 2025-01-01 00:00:00 UTC
#[must_use]
pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default()
}

/// A gold-tier company with two shipping addresses
#[must_use]
pub fn company() -> Company {
    Company {
        id: COMPANY_ID.to_string(),
        name: "Acme Industrial Supply".to_string(),
        account_number: "ACME-00042".to_string(),
        tier: CompanyTier::Gold,
        status: CompanyStatus::Active,
        credit_limit: 50_000.0,
        available_credit: 32_500.0,
        payment_terms: "NET30".to_string(),
        currency: "USD".to_string(),
        shipping_addresses: vec![
            shipping_address("addr-1", "Main warehouse", true),
            shipping_address("addr-2", "East depot", false),
        ],
        spending_limits: vec![
            SpendingLimit {
                period: LimitPeriod::PerOrder,
                amount: 10_000.0,
            },
            SpendingLimit {
                period: LimitPeriod::Monthly,
                amount: 40_000.0,
            },
        ],
        approval_threshold: Some(5_000.0),
        created_at: epoch() - Duration::days(365),
    }
}

/// A delivery address in Chicago
#[must_use]
pub fn shipping_address(id: &str, label: &str, is_default: bool) -> ShippingAddress {
    ShippingAddress {
        id: id.to_string(),
        label: label.to_string(),
        line1: "100 Industrial Way".to_string(),
        line2: None,
        city: "Chicago".to_string(),
        region: "IL".to_string(),
        postal_code: "60601".to_string(),
        country: "US".to_string(),
        is_default,
    }
}

/// A buyer of [`company`] who may place orders and request quotes
#[must_use]
pub fn employee() -> Employee {
    Employee {
        id: "employee-1".to_string(),
        company_id: COMPANY_ID.to_string(),
        email: "dana.buyer@acme.example".to_string(),
        first_name: "Dana".to_string(),
        last_name: "Buyer".to_string(),
        role: EmployeeRole::Buyer,
        permissions: vec![Permission::PlaceOrders, Permission::RequestQuotes],
        spending_limit: Some(2_500.0),
        department: Some("Procurement".to_string()),
        is_active: true,
    }
}

/// An approver of [`company`]
#[must_use]
pub fn approver() -> Employee {
    Employee {
        id: "employee-2".to_string(),
        email: "sam.approver@acme.example".to_string(),
        first_name: "Sam".to_string(),
        last_name: "Approver".to_string(),
        role: EmployeeRole::Approver,
        permissions: vec![Permission::ApproveOrders, Permission::PlaceOrders],
        spending_limit: Some(25_000.0),
        ..employee()
    }
}

/// A cart line with bounds `[1, 1000]`
#[must_use]
pub fn cart_item(product_id: &str, unit_price: f64, quantity: u32) -> B2BCartItem {
    B2BCartItem::new(
        product_id,
        format!("SKU-{}", product_id.to_uppercase()),
        format!("Product {product_id}"),
        unit_price,
        quantity,
    )
    .with_order_bounds(1, 1_000)
}

/// A two-line quote titled after its id
#[must_use]
pub fn quote(id: &str, status: QuoteStatus) -> Quote {
    let items = vec![
        QuoteItem {
            product_id: "p1".to_string(),
            sku: "SKU-P1".to_string(),
            name: "Hex bolts M8".to_string(),
            quantity: 500,
            requested_price: Some(0.18),
            quoted_price: Some(0.2),
            line_total: 100.0,
        },
        QuoteItem {
            product_id: "p2".to_string(),
            sku: "SKU-P2".to_string(),
            name: "Washers M8".to_string(),
            quantity: 500,
            requested_price: None,
            quoted_price: Some(0.05),
            line_total: 25.0,
        },
    ];
    Quote {
        id: id.to_string(),
        quote_number: format!("Q-2025-{id}"),
        title: format!("Fasteners order {id}"),
        status,
        company_id: COMPANY_ID.to_string(),
        requested_by: "employee-1".to_string(),
        items,
        messages: Vec::new(),
        unread_message_count: 0,
        subtotal: 125.0,
        discount: 0.0,
        total: 125.0,
        currency: "USD".to_string(),
        valid_until: Some(epoch() + Duration::days(30)),
        notes: None,
        created_at: epoch() - Duration::days(2),
        updated_at: epoch() - Duration::days(1),
    }
}

/// A normal-priority order approval due one day after [`epoch`]
#[must_use]
pub fn approval(id: &str, status: ApprovalStatus) -> ApprovalRequest {
    ApprovalRequest {
        id: id.to_string(),
        entity_type: ApprovalEntityType::Order,
        entity_id: format!("order-{id}"),
        entity_reference: format!("PO-{id}"),
        status,
        priority: ApprovalPriority::Normal,
        requested_by_id: "employee-1".to_string(),
        requested_by_name: "Dana Buyer".to_string(),
        amount: 7_500.0,
        currency: "USD".to_string(),
        reason: Some("Order exceeds approval threshold".to_string()),
        history: Vec::new(),
        due_at: Some(epoch() + Duration::days(1)),
        created_at: epoch() - Duration::days(1),
        updated_at: epoch() - Duration::days(1),
    }
}
