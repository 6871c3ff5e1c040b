use std::fs::{read_dir, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use csv::{ReaderBuilder, Trim};
use tokio::task::spawn_blocking;
use tracing::{debug, error};

use crate::models::TransactionRecord;
use crate::storage::{RecordStore, StoreError};
use crate::types::TableName;

const TABLE_EXTENSION: &str = "csv";

/// Record store backed by a directory of CSV files, one file per table.
///
/// The table name is the file stem, so `Transaction-abc-main.csv` is the table
/// `Transaction-abc-main`. Rows that fail to deserialize are logged and skipped.
pub struct CsvRecordStore {
    root: PathBuf
}

impl CsvRecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into()
        }
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.root.join(format!("{table}.{TABLE_EXTENSION}"))
    }
}

#[async_trait]
impl RecordStore for CsvRecordStore {
    async fn list_tables(&self) -> Result<Vec<TableName>, StoreError> {
        let root = self.root.clone();

        spawn_blocking(move || list_csv_stems(&root))
            .await
            .map_err(StoreError::list_tables)?
    }

    async fn scan(&self, table: &str) -> Result<Vec<TransactionRecord>, StoreError> {
        let path = self.table_path(table);
        let table_name = table.to_string();

        spawn_blocking(move || read_records(&table_name, &path))
            .await
            .map_err(|error| StoreError::read_failed(table, error))?
    }
}

fn list_csv_stems(root: &Path) -> Result<Vec<TableName>, StoreError> {
    let entries = read_dir(root).map_err(|error| {
        StoreError::list_tables(format!("{}: {error}", root.display()))
    })?;

    let mut tables = Vec::new();

    for entry in entries {
        let path = entry.map_err(StoreError::list_tables)?.path();

        if path.extension().and_then(|extension| extension.to_str()) != Some(TABLE_EXTENSION) {
            continue;
        }

        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            tables.push(stem.to_string());
        }
    }

    tables.sort();

    Ok(tables)
}

fn read_records(table: &str, path: &Path) -> Result<Vec<TransactionRecord>, StoreError> {
    let file = File::open(path).map_err(|error| StoreError::read_failed(table, error))?;

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut records = Vec::new();

    for result in reader.deserialize::<TransactionRecord>() {
        match result {
            Ok(record) => records.push(record),
            Err(error) => {
                error!("CSV deserialization error in table [{table}]: {error}");
            }
        }
    }

    debug!("Read {} records from table [{table}]", records.len());

    Ok(records)
}
