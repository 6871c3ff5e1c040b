use thiserror::Error;

use crate::types::TableName;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Could not find a table matching [{pattern}]")]
    TableNotFound {
        pattern: String
    },
    #[error("Could not list tables: {reason}")]
    ListTables {
        reason: String
    },
    #[error("Could not read table [{table}]: {reason}")]
    ReadFailed {
        table: TableName,
        reason: String
    }
}

impl StoreError {
    pub fn list_tables(reason: impl ToString) -> Self {
        Self::ListTables { reason: reason.to_string() }
    }

    pub fn read_failed(table: &str, reason: impl ToString) -> Self {
        Self::ReadFailed {
            table: table.to_string(),
            reason: reason.to_string()
        }
    }
}
