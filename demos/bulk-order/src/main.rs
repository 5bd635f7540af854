//! Bulk order walkthrough
//!
//! Drives the B2B state container through a typical buyer session: load the
//! company context, fill a bulk cart, pass spending validation and clear an
//! approval, printing the selector views after each step.
//!
//! ```bash
//! RUST_LOG=bulk_order=debug,b2b_state_runtime=debug cargo run -p bulk-order
//! ```

use anyhow::Context;
use b2b_state::actions::{ApprovalAction, CartAction, CompanyAction, QuoteAction, RootAction};
use b2b_state::fixtures;
use b2b_state::types::{
    ApprovalDecision, ApprovalStatus, ApprovalSummary, QuoteStatus, RootState, SpendingValidation,
};
use b2b_state::{B2BConfig, B2BEnvironment, RootReducer, Selectors};
use b2b_state_core::action::Action;
use b2b_state_runtime::{Store, StoreConfig};
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bulk_order=info,b2b_state_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Bulk Order: B2B State Container ===\n");

    let config = B2BConfig::from_env();
    let store = Store::with_config(
        RootState::with_config(&config),
        RootReducer::new(&config),
        B2BEnvironment::system(),
        StoreConfig::default().with_broadcast_capacity(config.action_broadcast_capacity),
    );
    let selectors = Selectors::new(&config);

    // Log every dispatched action tag
    let mut actions = store.subscribe_actions();
    let observer = tokio::spawn(async move {
        let mut seen = 0_usize;
        while let Ok(action) = actions.recv().await {
            seen += 1;
            tracing::info!(tag = action.action_type(), "dispatched");
        }
        seen
    });

    // Company context
    println!(">>> Loading company context");
    store.send(CompanyAction::FetchStart.into()).await?;
    store
        .send(CompanyAction::fetch_success(fixtures::company(), fixtures::approver())?.into())
        .await?;
    let state = store.snapshot().await;
    let context = selectors.company.company_context(&*state);
    if let (Some(company), Some(employee)) = (&context.company, &context.employee) {
        println!(
            "Signed in as {} {} at {} (approver: {})",
            employee.first_name, employee.last_name, company.name, context.can_approve
        );
    }

    // Cart
    println!("\n>>> Building a bulk cart");
    let items = vec![
        fixtures::cart_item("bolt-m8", 0.35, 2_000),
        fixtures::cart_item("washer-m8", 0.05, 2_000),
        fixtures::cart_item("nut-m8", 0.12, 1_500),
    ];
    store.send(CartAction::bulk_add(items)?.into()).await?;
    print_checkout(&store, &selectors).await;

    let state = store.snapshot().await;
    let default_address = selectors
        .company
        .default_shipping_address(&*state)
        .context("company has no default shipping address")?;
    store
        .send(CartAction::set_shipping_address(Some(default_address.id.clone())).into())
        .await?;
    store
        .send(CartAction::set_purchase_order_number(Some("PO-2025-0117".into())).into())
        .await?;
    store
        .send(
            CartAction::UpdateSpendingValidation {
                validation: SpendingValidation::default(),
            }
            .into(),
        )
        .await?;
    print_checkout(&store, &selectors).await;

    let state = store.snapshot().await;
    let snapshot = selectors.cart.cart_for_persistence(&*state);
    println!("Persisted cart: {}", snapshot.to_json()?);

    // Quotes
    println!("\n>>> Loading quotes");
    let quotes = [
        fixtures::quote("q-1", QuoteStatus::Sent),
        fixtures::quote("q-2", QuoteStatus::Accepted),
        fixtures::quote("q-3", QuoteStatus::Draft),
    ];
    store
        .send(QuoteAction::fetch_list_success(&quotes, 3).into())
        .await?;
    store
        .send(QuoteAction::set_status_filter("sent")?.into())
        .await?;
    let state = store.snapshot().await;
    println!(
        "{} quotes match the filter, open value {:.2}",
        selectors.quotes.filtered_quotes(&*state).len(),
        selectors.quotes.open_quotes_value(&*state)
    );

    // Approvals
    println!("\n>>> Working the approval queue");
    let now = Utc::now();
    let pending: Vec<ApprovalSummary> = ["apr-1", "apr-2"]
        .iter()
        .map(|id| {
            ApprovalSummary::from_request(&fixtures::approval(id, ApprovalStatus::Pending), now)
        })
        .collect();
    store
        .send(ApprovalAction::update_pending_count(2).into())
        .await?;
    store
        .send(ApprovalAction::FetchPendingSuccess { approvals: pending }.into())
        .await?;
    store.send(ApprovalAction::action_start("apr-1").into()).await?;
    let decided = fixtures::approval("apr-1", ApprovalStatus::Approved);
    store
        .send(ApprovalAction::action_success("apr-1", ApprovalDecision::Approve, decided)?.into())
        .await?;
    let state = store.snapshot().await;
    let dashboard = selectors.approvals.approvals_dashboard(&*state);
    println!(
        "{} pending ({} overdue, {} high priority)",
        dashboard.pending_count,
        dashboard.overdue.len(),
        dashboard.high_priority.len()
    );

    // Reset
    println!("\n>>> Signing out");
    store.send(RootAction::from(CompanyAction::ClearContext)).await?;
    store.send(CartAction::Clear.into()).await?;
    print_checkout(&store, &selectors).await;

    store.shutdown();
    drop(store);
    let seen = observer.await?;
    println!("\n=== Done: {seen} actions dispatched ===");

    Ok(())
}

async fn print_checkout(
    store: &Store<RootState, RootAction, B2BEnvironment, RootReducer>,
    selectors: &Selectors,
) {
    let state = store.snapshot().await;
    let summary = selectors.cart.checkout_summary(&*state);
    println!(
        "Cart: {} units, total {:.2} {}",
        summary.item_count, summary.totals.total, summary.totals.currency
    );
    match summary.checkout_blocked_reason {
        Some(reason) => println!("Checkout blocked: {reason}"),
        None => println!("Ready to check out"),
    }
}
