use super::{normalize, Operation, Response, Router, RouterError, SummaryStatus};
use crate::models::{FinancialSummary, NotificationResult, TransactionType};
use crate::notifications::LocalPlatform;
use crate::settings::Settings;
use crate::testing::{expense, income, record, FixedIdentity, MemoryRecordStore};

use std::str::FromStr;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use serde_json::{json, Value};

const TABLE: &str = "Transaction-abc123-main";
const ACCOUNT: &str = "123456789012";
const MONTHLY_CHANNEL: &str = "arn:aws:sns:us-east-1:123456789012:finance-monthly-reports-main";
const ALERT_CHANNEL: &str = "arn:aws:sns:us-east-1:123456789012:finance-budget-alerts-main";

struct Harness {
    store: Arc<MemoryRecordStore>,
    platform: Arc<LocalPlatform>,
    router: Router<MemoryRecordStore, LocalPlatform, FixedIdentity>
}

fn harness_with(settings: Settings, store: MemoryRecordStore) -> Harness {
    let store = Arc::new(store);
    let platform = Arc::new(LocalPlatform::new(&settings.region, ACCOUNT));
    let router = Router::new(store.clone(), platform.clone(), Arc::new(FixedIdentity(ACCOUNT)), Arc::new(settings));

    Harness { store, platform, router }
}

fn harness() -> Harness {
    harness_with(Settings::default(), MemoryRecordStore::with_table(TABLE, vec![
        income("1", "1000"),
        expense("2", "Food", "80"),
        expense("3", "Food", "70"),
        expense("4", "Rent", "250"),
        record("5", TransactionType::Other, "Transfer", "999")
    ]))
}

fn event(field_name: &str, arguments: Value) -> Value {
    json!({ "info": { "fieldName": field_name }, "arguments": arguments })
}

fn notification(response: Response) -> Result<NotificationResult> {
    match response {
        Response::Notification(result) => Ok(result),
        other => Err(anyhow!("expected a notification result, got {other:?}"))
    }
}

#[test]
fn test_normalize_reads_both_operation_layouts() -> Result<()> {
    let nested = normalize(&json!({ "info": { "fieldName": "sendMonthlyReport" }, "arguments": { "email": "a@example.com" } }))?;
    let flat = normalize(&json!({ "fieldName": "sendMonthlyReport", "args": { "email": "a@example.com" } }))?;

    assert_eq!(nested.operation, Operation::SendMonthlyReport);
    assert_eq!(flat.operation, Operation::SendMonthlyReport);
    assert_eq!(nested.arguments.text("email")?.as_deref(), Some("a@example.com"));
    assert_eq!(flat.arguments.text("email")?.as_deref(), Some("a@example.com"));

    Ok(())
}

#[test]
fn test_normalize_treats_missing_or_null_arguments_as_empty() -> Result<()> {
    let missing = normalize(&json!({ "fieldName": "sendBudgetAlert" }))?;
    let null = normalize(&json!({ "fieldName": "sendBudgetAlert", "arguments": null, "args": { "category": "Food" } }))?;

    assert!(missing.arguments.text("email")?.is_none());
    assert_eq!(null.arguments.text("category")?.as_deref(), Some("Food"));

    Ok(())
}

#[test]
fn test_normalize_accepts_exceeded_as_number_or_string() -> Result<()> {
    let number = normalize(&event("sendBudgetAlert", json!({ "exceeded": 25.5 })))?;
    let text = normalize(&event("sendBudgetAlert", json!({ "exceeded": "25.50" })))?;

    assert_eq!(number.arguments.decimal("exceeded")?, Some(Decimal::from_str("25.5")?));
    assert_eq!(text.arguments.decimal("exceeded")?, Some(Decimal::from_str("25.5")?));

    Ok(())
}

#[test]
fn test_normalize_rejects_non_object_arguments() {
    let result = normalize(&event("sendMonthlyReport", json!(["a@example.com"])));

    assert!(matches!(result, Err(RouterError::InvalidArgument { ref reason }) if reason == "Invalid arguments: expected an object"));
}

#[test]
fn test_normalize_rejects_unknown_and_missing_operations() {
    assert!(matches!(normalize(&json!({ "fieldName": "doThing" })), Err(RouterError::UnknownOperation { .. })));
    assert!(matches!(normalize(&json!({ "arguments": {} })), Err(RouterError::UnknownOperation { .. })));
}

#[tokio::test]
async fn test_summary_scenario() -> Result<()> {
    let harness = harness_with(Settings::default(), MemoryRecordStore::with_table(TABLE, vec![
        income("1", "1000"),
        expense("2", "Food", "400")
    ]));

    let response = harness.router.handle(&event("calculateFinancialSummary", json!({}))).await?;

    let Response::Summary(summary) = response else {
        return Err(anyhow!("expected a summary"));
    };

    assert_eq!(summary.status, SummaryStatus::Ok);
    assert_eq!(summary.summary.total_income, Decimal::from(1000));
    assert_eq!(summary.summary.total_expenses, Decimal::from(400));
    assert_eq!(summary.summary.balance, Decimal::from(600));
    assert_eq!(summary.summary.savings_rate, Decimal::from_str("60.00")?);

    Ok(())
}

#[tokio::test]
async fn test_summary_response_shape() -> Result<()> {
    let harness = harness_with(Settings::default(), MemoryRecordStore::with_table(TABLE, vec![
        income("1", "1000"),
        expense("2", "Food", "400")
    ]));

    let response = harness.router.handle(&json!({ "fieldName": "calculateFinancialSummary" })).await?;

    assert_eq!(serde_json::to_value(response)?, json!({
        "totalIncome": 1000.0,
        "totalExpenses": 400.0,
        "balance": 600.0,
        "savingsRate": 60.0,
        "status": "ok"
    }));

    Ok(())
}

#[tokio::test]
async fn test_summary_read_failure_degrades_to_zero_with_status() -> Result<()> {
    let harness = harness();
    harness.store.fail_reads.store(true, Ordering::Relaxed);

    let response = harness.router.handle(&event("calculateFinancialSummary", json!({}))).await?;

    let Response::Summary(summary) = response else {
        return Err(anyhow!("expected a summary"));
    };

    assert_eq!(summary.summary, FinancialSummary::zero());
    assert_eq!(summary.status, SummaryStatus::Degraded);
    assert!(summary.error.as_deref().is_some_and(|error| error.contains("connection reset")));

    Ok(())
}

#[tokio::test]
async fn test_summary_without_resolvable_table_degrades() -> Result<()> {
    let harness = harness_with(Settings::default(), MemoryRecordStore::with_table("Budget-abc123-main", vec![]));

    let response = harness.router.handle(&event("calculateFinancialSummary", json!({}))).await?;

    assert!(matches!(response, Response::Summary(summary) if summary.status == SummaryStatus::Degraded));

    Ok(())
}

#[tokio::test]
async fn test_unknown_operation_is_an_error_not_a_zero_summary() {
    let harness = harness();

    let result = harness.router.handle(&event("doThing", json!({}))).await;

    assert!(matches!(result, Err(RouterError::UnknownOperation { ref operation }) if operation == "doThing"));
    assert_eq!(harness.store.scans(), 0);
}

#[tokio::test]
async fn test_monthly_report_without_email_touches_nothing() -> Result<()> {
    let harness = harness();

    let result = notification(harness.router.handle(&event("sendMonthlyReport", json!({}))).await?)?;

    assert_eq!(result, NotificationResult::failed("Email is required"));
    assert_eq!(harness.store.scans(), 0);
    assert_eq!(harness.platform.topic_count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_monthly_report_publishes_current_summary() -> Result<()> {
    let harness = harness();

    let first = notification(harness.router.handle(&event("sendMonthlyReport", json!({ "email": "a@example.com" }))).await?)?;

    assert!(first.success);
    assert!(first.message.contains("confirmation email"));

    let outbox = harness.platform.outbox(MONTHLY_CHANNEL);

    assert_eq!(outbox.len(), 1);
    assert!(outbox[0].body.contains("Total Income: $1000.00\n"));
    assert!(outbox[0].body.contains("Total Expenses: $400.00\n"));
    assert!(outbox[0].body.contains("Savings Rate: 60.00%\n"));
    assert!(outbox[0].body.contains("Total Transactions: 5\n"));

    assert!(harness.platform.confirm(MONTHLY_CHANNEL, "a@example.com"));

    let second = notification(harness.router.handle(&event("sendMonthlyReport", json!({ "email": "a@example.com" }))).await?)?;

    assert_eq!(second, NotificationResult::sent("Monthly report sent to a@example.com."));
    assert_eq!(harness.platform.subscriptions(MONTHLY_CHANNEL).len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_monthly_report_store_failure_is_reported() -> Result<()> {
    let harness = harness();
    harness.store.fail_reads.store(true, Ordering::Relaxed);

    let result = notification(harness.router.handle(&event("sendMonthlyReport", json!({ "email": "a@example.com" }))).await?)?;

    assert!(!result.success);
    assert!(result.message.starts_with("Failed to send report: "));
    assert!(harness.platform.outbox(MONTHLY_CHANNEL).is_empty());

    Ok(())
}

#[tokio::test]
async fn test_budget_alert_recomputes_category_spend() -> Result<()> {
    let harness = harness();

    let result = notification(harness.router.handle(&event("sendBudgetAlert", json!({
        "email": "a@example.com",
        "category": "Food",
        "exceeded": 25.00
    }))).await?)?;

    assert_eq!(result, NotificationResult::sent("Budget alert sent successfully!"));

    let outbox = harness.platform.outbox(ALERT_CHANNEL);

    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].subject, "Budget Alert: Food");
    assert!(outbox[0].body.contains("Total Spent: $150.00\n"));
    assert!(outbox[0].body.contains("by $25.00."));
    assert!(outbox[0].body.contains("Number of Transactions: 2\n"));

    Ok(())
}

#[tokio::test]
async fn test_budget_alert_requires_all_arguments() -> Result<()> {
    let harness = harness();

    let cases = vec![
        (json!({ "category": "Food", "exceeded": 1 }), "Email is required"),
        (json!({ "email": "a@example.com", "exceeded": 1 }), "Category is required"),
        (json!({ "email": "a@example.com", "category": "Food" }), "Exceeded amount is required")
    ];

    for (arguments, expected) in cases {
        let result = notification(harness.router.handle(&event("sendBudgetAlert", arguments)).await?)?;
        assert_eq!(result, NotificationResult::failed(expected));
    }

    assert_eq!(harness.store.scans(), 0);

    Ok(())
}

#[tokio::test]
async fn test_budget_alert_with_malformed_arguments_fails_softly() -> Result<()> {
    let harness = harness();

    let result = notification(harness.router.handle(&event("sendBudgetAlert", json!({
        "email": "a@example.com",
        "category": "Food",
        "exceeded": "a lot"
    }))).await?)?;

    assert!(!result.success);
    assert!(result.message.starts_with("Invalid argument exceeded: "));
    assert_eq!(harness.store.scans(), 0);

    Ok(())
}

#[tokio::test]
async fn test_monthly_report_ignores_arguments_it_does_not_read() -> Result<()> {
    let harness = harness();

    let result = notification(harness.router.handle(&event("sendMonthlyReport", json!({
        "email": "a@example.com",
        "exceeded": "n/a",
        "category": 5
    }))).await?)?;

    assert!(result.success);
    assert_eq!(harness.platform.outbox(MONTHLY_CHANNEL).len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_monthly_report_without_email_ignores_malformed_extras() -> Result<()> {
    let harness = harness();

    let result = notification(harness.router.handle(&event("sendMonthlyReport", json!({ "category": 5 }))).await?)?;

    assert_eq!(result, NotificationResult::failed("Email is required"));

    Ok(())
}

#[tokio::test]
async fn test_budget_alert_rejects_email_of_wrong_type() -> Result<()> {
    let harness = harness();

    let result = notification(harness.router.handle(&event("sendBudgetAlert", json!({
        "email": 42,
        "category": "Food",
        "exceeded": 10
    }))).await?)?;

    assert_eq!(result, NotificationResult::failed("Invalid argument email: expected a string"));
    assert_eq!(harness.store.scans(), 0);

    Ok(())
}

#[tokio::test]
async fn test_budget_alert_with_placeholder_topic_fails_softly() -> Result<()> {
    let settings = Settings {
        budget_alert_topic: Some("NONE".to_string()),
        ..Settings::default()
    };
    let harness = harness_with(settings, MemoryRecordStore::with_table(TABLE, vec![]));

    let result = notification(harness.router.handle(&event("sendBudgetAlert", json!({
        "email": "a@example.com",
        "category": "Food",
        "exceeded": 10
    }))).await?)?;

    assert_eq!(result, NotificationResult::failed("Failed to send alert: Budget alert topic is not configured"));
    assert_eq!(harness.store.scans(), 0);

    Ok(())
}

#[tokio::test]
async fn test_configured_table_is_read_directly() -> Result<()> {
    let settings = Settings {
        table_name: Some("Transaction-configured-dev".to_string()),
        ..Settings::default()
    };
    let store = MemoryRecordStore::with_table("Transaction-configured-dev", vec![income("1", "50")]);
    store.insert_table(TABLE, vec![income("2", "5000")]);
    let harness = harness_with(settings, store);

    let response = harness.router.handle(&event("calculateFinancialSummary", json!({}))).await?;

    assert!(matches!(response, Response::Summary(summary) if summary.summary.total_income == Decimal::from(50)));
    assert_eq!(harness.store.list_calls.load(Ordering::Relaxed), 0);

    Ok(())
}

const HUGE: &str = "50000000000000000000000000000";

#[tokio::test]
async fn test_summary_overflow_degrades_to_zero_with_status() -> Result<()> {
    let harness = harness_with(Settings::default(), MemoryRecordStore::with_table(TABLE, vec![
        income("1", "0.01"),
        expense("2", "Food", HUGE),
        expense("3", "Rent", HUGE)
    ]));

    let response = harness.router.handle(&event("calculateFinancialSummary", json!({}))).await?;

    let Response::Summary(summary) = response else {
        return Err(anyhow!("expected a summary"));
    };

    assert_eq!(summary.summary, FinancialSummary::zero());
    assert_eq!(summary.status, SummaryStatus::Degraded);
    assert!(summary.error.as_deref().is_some_and(|error| error.contains("overflow")));

    Ok(())
}

#[tokio::test]
async fn test_budget_alert_overflow_fails_softly() -> Result<()> {
    let harness = harness_with(Settings::default(), MemoryRecordStore::with_table(TABLE, vec![
        expense("1", "Food", HUGE),
        expense("2", "Food", HUGE)
    ]));

    let result = notification(harness.router.handle(&event("sendBudgetAlert", json!({
        "email": "a@example.com",
        "category": "Food",
        "exceeded": 10
    }))).await?)?;

    assert!(!result.success);
    assert!(result.message.starts_with("Failed to send alert: "));
    assert!(harness.platform.outbox(ALERT_CHANNEL).is_empty());

    Ok(())
}

#[tokio::test]
async fn test_monthly_report_overflow_fails_softly() -> Result<()> {
    let harness = harness_with(Settings::default(), MemoryRecordStore::with_table(TABLE, vec![
        income("1", "0.01"),
        expense("2", "Food", "70000000000000000000000000000")
    ]));

    let result = notification(harness.router.handle(&event("sendMonthlyReport", json!({ "email": "a@example.com" }))).await?)?;

    assert!(!result.success);
    assert!(result.message.starts_with("Failed to send report: "));
    assert!(harness.platform.outbox(MONTHLY_CHANNEL).is_empty());

    Ok(())
}

#[tokio::test]
async fn test_budget_alert_rejected_by_platform_fails_softly() -> Result<()> {
    let harness = harness();
    let category = "Groceries".repeat(12);

    let result = notification(harness.router.handle(&event("sendBudgetAlert", json!({
        "email": "a@example.com",
        "category": category,
        "exceeded": 10
    }))).await?)?;

    assert!(!result.success);
    assert!(result.message.starts_with(&format!("Failed to send alert: Failed to publish to topic [{ALERT_CHANNEL}]")));
    assert!(harness.platform.outbox(ALERT_CHANNEL).is_empty());

    Ok(())
}
