use serde::Serialize;

use crate::models::{FinancialSummary, NotificationResult};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStatus {
    Ok,
    /// The totals are zero because the records could not be read.
    Degraded
}

/// Summary response: always the summary shape, plus an explicit status.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: FinancialSummary,
    pub status: SummaryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>
}

impl SummaryResponse {
    pub fn ok(summary: FinancialSummary) -> Self {
        Self {
            summary,
            status: SummaryStatus::Ok,
            error: None
        }
    }

    pub fn degraded(cause: impl ToString) -> Self {
        Self {
            summary: FinancialSummary::zero(),
            status: SummaryStatus::Degraded,
            error: Some(cause.to_string())
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Summary(SummaryResponse),
    Notification(NotificationResult)
}
