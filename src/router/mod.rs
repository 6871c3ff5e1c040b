mod errors;
mod request;
mod responses;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::aggregator::{category_spend, summarize};
use crate::models::{FinancialSummary, NotificationResult, Subscription, SubscriptionStatus};
use crate::notifications::{templates, ChannelKind, Dispatcher, IdentityService, NotificationPlatform};
use crate::settings::Settings;
use crate::storage::{resolve_table_identifier, RecordFilter, RecordStore};

pub use errors::RouterError;
pub use request::{normalize, Arguments, BudgetAlertRequest, MonthlyReportRequest, Operation, OperationRequest};
pub use responses::{Response, SummaryResponse, SummaryStatus};

/// Single entry point: one event in, one response out.
///
/// Collaborators are built once per process and shared by every invocation; no other
/// state survives between calls.
pub struct Router<S: RecordStore, N: NotificationPlatform, I: IdentityService> {
    store: Arc<S>,
    dispatcher: Dispatcher<N, I>,
    settings: Arc<Settings>
}

impl<S: RecordStore, N: NotificationPlatform, I: IdentityService> Router<S, N, I> {
    pub fn new(store: Arc<S>, platform: Arc<N>, identity: Arc<I>, settings: Arc<Settings>) -> Self {
        Self {
            store,
            dispatcher: Dispatcher::new(platform, identity, settings.clone()),
            settings
        }
    }

    /// Dispatches one event.
    ///
    /// Only an unknown or missing operation name is returned as an error. Summary
    /// failures degrade to a zero summary with `status: degraded`; notification
    /// failures become `{ success: false, message }`.
    pub async fn handle(&self, event: &Value) -> Result<Response, RouterError> {
        let request = match normalize(event) {
            Ok(request) => request,
            Err(RouterError::InvalidArgument { reason }) => {
                warn!("Rejected arguments: {reason}");
                return Ok(Response::Notification(NotificationResult::failed(reason)));
            }
            Err(error) => {
                error!("{error}. Event structure: {event}");
                return Err(error);
            }
        };

        info!("Handling [{:?}]", request.operation);
        debug!("Arguments: {:?}", request.arguments);

        let response = match request.operation {
            Operation::CalculateFinancialSummary => Response::Summary(self.calculate_financial_summary().await),
            Operation::SendMonthlyReport => Response::Notification(self.send_monthly_report(&request.arguments).await),
            Operation::SendBudgetAlert => Response::Notification(self.send_budget_alert(&request.arguments).await)
        };

        Ok(response)
    }

    pub async fn calculate_financial_summary(&self) -> SummaryResponse {
        match self.current_summary().await {
            Ok((summary, _)) => SummaryResponse::ok(summary),
            Err(error) => {
                error!("Returning default summary due to error: {error}");
                SummaryResponse::degraded(error)
            }
        }
    }

    pub async fn send_monthly_report(&self, arguments: &Arguments) -> NotificationResult {
        let request = match arguments.monthly_report() {
            Ok(request) => request,
            Err(error) => {
                warn!("sendMonthlyReport rejected: {error}");
                return NotificationResult::failed(error.to_string());
            }
        };

        match self.deliver_monthly_report(&request).await {
            Ok(subscription) if subscription.status == SubscriptionStatus::PendingConfirmation => NotificationResult::sent(format!(
                "Monthly report sent! Check {} for a confirmation email, then request the report again.",
                request.email
            )),
            Ok(_) => NotificationResult::sent(format!("Monthly report sent to {}.", request.email)),
            Err(error) => {
                error!("Error sending monthly report: {error:?}");
                NotificationResult::failed(format!("Failed to send report: {error}"))
            }
        }
    }

    pub async fn send_budget_alert(&self, arguments: &Arguments) -> NotificationResult {
        let request = match arguments.budget_alert() {
            Ok(request) => request,
            Err(error) => {
                warn!("sendBudgetAlert rejected: {error}");
                return NotificationResult::failed(error.to_string());
            }
        };

        match self.deliver_budget_alert(&request).await {
            Ok(_) => NotificationResult::sent("Budget alert sent successfully!"),
            Err(error) => {
                error!("Error sending budget alert: {error:?}");
                NotificationResult::failed(format!("Failed to send alert: {error}"))
            }
        }
    }

    async fn current_summary(&self) -> Result<(FinancialSummary, usize), RouterError> {
        let table = resolve_table_identifier(self.store.as_ref(), self.settings.table_identifier()).await?;
        let records = self.store.scan(&table).await?;
        let summary = summarize(&records)?;

        debug!("Summary over {} records of [{table}]: {summary:?}", records.len());

        Ok((summary, records.len()))
    }

    async fn deliver_monthly_report(&self, request: &MonthlyReportRequest) -> Result<Subscription, RouterError> {
        let subscription = self.dispatcher.subscribe(ChannelKind::MonthlyReports, &request.email).await?;
        let (summary, transaction_count) = self.current_summary().await?;
        let message = templates::monthly_report(&summary, transaction_count, &request.email, Utc::now().date_naive());

        self.dispatcher.publish(&subscription.channel_id, &message).await?;

        Ok(subscription)
    }

    async fn deliver_budget_alert(&self, request: &BudgetAlertRequest) -> Result<Subscription, RouterError> {
        let subscription = self.dispatcher.subscribe(ChannelKind::BudgetAlerts, &request.email).await?;
        let table = resolve_table_identifier(self.store.as_ref(), self.settings.table_identifier()).await?;

        // Spend is re-read right before publishing; only `exceeded` comes from the caller.
        let records = self.store.scan_filtered(&table, &RecordFilter::expenses_in(&request.category)).await?;
        let spend = category_spend(&request.category, &records)?;
        let message = templates::budget_alert(&spend, request.exceeded, &request.email);

        self.dispatcher.publish(&subscription.channel_id, &message).await?;

        Ok(subscription)
    }
}
