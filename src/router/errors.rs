use thiserror::Error;

use crate::aggregator::AggregateError;
use crate::notifications::ChannelError;
use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("Unknown field: {operation}")]
    UnknownOperation {
        operation: String
    },
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
    #[error(transparent)]
    ChannelUnavailable(#[from] ChannelError),
    #[error(transparent)]
    Aggregation(#[from] AggregateError),
    #[error("{reason}")]
    InvalidArgument {
        reason: String
    }
}

impl RouterError {
    pub fn unknown_operation(operation: Option<&str>) -> Self {
        Self::UnknownOperation {
            operation: operation.unwrap_or("<missing>").to_string()
        }
    }

    pub fn invalid_argument(reason: &str) -> Self {
        Self::InvalidArgument { reason: reason.to_string() }
    }
}
