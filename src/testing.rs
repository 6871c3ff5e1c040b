use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;

use crate::models::{TransactionRecord, TransactionType};
use crate::notifications::{ChannelError, IdentityService};
use crate::storage::{RecordStore, StoreError};
use crate::types::TableName;

pub fn record(id: &str, kind: TransactionType, category: &str, amount: &str) -> TransactionRecord {
    TransactionRecord {
        id: id.to_string(),
        description: format!("record {id}"),
        amount: Decimal::from_str(amount).unwrap_or_default(),
        kind,
        category: category.to_string(),
        date: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).single().unwrap_or_default(),
        receipt_url: None,
        owner: None
    }
}

/// In-memory record store that counts reads and can be told to fail.
#[derive(Default)]
pub struct MemoryRecordStore {
    tables: DashMap<TableName, Vec<TransactionRecord>>,
    pub scan_calls: AtomicU64,
    pub list_calls: AtomicU64,
    pub fail_reads: AtomicBool
}

impl MemoryRecordStore {
    pub fn with_table(table: &str, records: Vec<TransactionRecord>) -> Self {
        let store = Self::default();
        store.tables.insert(table.to_string(), records);
        store
    }

    pub fn insert_table(&self, table: &str, records: Vec<TransactionRecord>) {
        self.tables.insert(table.to_string(), records);
    }

    pub fn scans(&self) -> u64 {
        self.scan_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list_tables(&self) -> Result<Vec<TableName>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);

        let mut tables: Vec<TableName> = self.tables.iter().map(|entry| entry.key().clone()).collect();
        tables.sort();

        Ok(tables)
    }

    async fn scan(&self, table: &str) -> Result<Vec<TransactionRecord>, StoreError> {
        self.scan_calls.fetch_add(1, Ordering::Relaxed);

        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(StoreError::read_failed(table, "connection reset"));
        }

        self.tables.get(table)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::read_failed(table, "requested resource not found"))
    }
}

pub struct FixedIdentity(pub &'static str);

#[async_trait]
impl IdentityService for FixedIdentity {
    async fn account_id(&self) -> Result<String, ChannelError> {
        Ok(self.0.to_string())
    }
}

pub struct UnreachableIdentity;

#[async_trait]
impl IdentityService for UnreachableIdentity {
    async fn account_id(&self) -> Result<String, ChannelError> {
        Err(ChannelError::identity("credentials expired"))
    }
}

pub fn income(id: &str, amount: &str) -> TransactionRecord {
    record(id, TransactionType::Income, "Salary", amount)
}

pub fn expense(id: &str, category: &str, amount: &str) -> TransactionRecord {
    record(id, TransactionType::Expense, category, amount)
}
