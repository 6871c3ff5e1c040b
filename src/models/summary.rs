use rust_decimal::Decimal;
use serde::Serialize;

/// Derived totals over a record set. Never persisted.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expenses: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub savings_rate: Decimal
}

impl FinancialSummary {
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Current spend for one expense category, used by budget alerts.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CategorySpend {
    pub category: String,
    pub total_spent: Decimal,
    pub transaction_count: usize
}
