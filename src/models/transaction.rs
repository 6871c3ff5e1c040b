use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::TransactionType;

/// A single financial record as held by the record store.
///
/// Records are read-only from this service's point of view. The `amount` is never
/// negative; direction is carried by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub amount: Decimal,
    /// INCOME or EXPENSE. Anything else is carried as `Other` and ignored by aggregation.
    #[serde(rename = "type", default)]
    pub kind: TransactionType,
    #[serde(default)]
    pub category: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub receipt_url: Option<String>,
    #[serde(default)]
    pub owner: Option<String>
}
