mod notification;
mod summary;
mod transaction;

use serde::{Deserialize, Serialize};

pub use notification::{
    AttributeType, MessageAttribute, NotificationResult, OutboundMessage, PublishReceipt, Subscription, SubscriptionStatus
};
pub use summary::{CategorySpend, FinancialSummary};
pub use transaction::TransactionRecord;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Income,
    Expense,
    #[default]
    #[serde(other)]
    Other
}
