mod csv_store;
mod errors;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::models::{TransactionRecord, TransactionType};
use crate::settings::is_placeholder;
use crate::types::TableName;

pub use csv_store::CsvRecordStore;
pub use errors::StoreError;

const DISCOVERY_PREFIX: &str = "Transaction-";
const DISCOVERY_SUFFIX: &str = "-main";

/// Equality filter on category and transaction type.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RecordFilter {
    pub category: String,
    pub kind: TransactionType
}

impl RecordFilter {
    pub fn expenses_in(category: &str) -> Self {
        Self {
            category: category.to_string(),
            kind: TransactionType::Expense
        }
    }

    pub fn matches(&self, record: &TransactionRecord) -> bool {
        record.kind == self.kind && record.category == self.category
    }
}

/// Read-only access to a durable store of transaction records, addressed by table.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    async fn list_tables(&self) -> Result<Vec<TableName>, StoreError>;

    /// Every record in the table, unfiltered by owner.
    async fn scan(&self, table: &str) -> Result<Vec<TransactionRecord>, StoreError>;

    async fn scan_filtered(&self, table: &str, filter: &RecordFilter) -> Result<Vec<TransactionRecord>, StoreError> {
        let records = self.scan(table).await?;
        Ok(records.into_iter().filter(|record| filter.matches(record)).collect())
    }
}

/// Resolves the transaction table: the configured identifier when usable, otherwise the
/// first listed table named `Transaction-*-main`.
pub async fn resolve_table_identifier<S: RecordStore + ?Sized>(store: &S, configured: Option<&str>) -> Result<TableName, StoreError> {
    if let Some(table) = configured.filter(|value| !is_placeholder(value)) {
        debug!("Using configured table [{table}]");
        return Ok(table.to_string());
    }

    warn!("Table identifier missing or placeholder ({configured:?}), falling back to discovery");

    let tables = store.list_tables().await?;
    let table = tables.into_iter()
        .find(|name| is_transaction_table(name))
        .ok_or_else(|| StoreError::TableNotFound {
            pattern: format!("{DISCOVERY_PREFIX}*{DISCOVERY_SUFFIX}")
        })?;

    info!("Discovered transaction table [{table}]");

    Ok(table)
}

fn is_transaction_table(name: &str) -> bool {
    name.len() >= DISCOVERY_PREFIX.len() + DISCOVERY_SUFFIX.len()
        && name.starts_with(DISCOVERY_PREFIX)
        && name.ends_with(DISCOVERY_SUFFIX)
}
