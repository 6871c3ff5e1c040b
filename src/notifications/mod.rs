mod dispatcher;
mod errors;
mod local_platform;
pub mod templates;

use std::fmt;
use std::fmt::{Display, Formatter};

use async_trait::async_trait;

use crate::models::{OutboundMessage, PublishReceipt, SubscriptionStatus};
use crate::types::ChannelId;

pub use dispatcher::Dispatcher;
pub use errors::ChannelError;
pub use local_platform::{LocalPlatform, StaticIdentity};

/// Broadcast platform holding topics and their email subscriptions.
#[async_trait]
pub trait NotificationPlatform: Send + Sync + 'static {
    /// Creates the topic, or returns the existing one with the same name.
    async fn create_topic(&self, name: &str) -> Result<ChannelId, ChannelError>;

    /// Registers an email endpoint. Subscribing an already registered endpoint returns
    /// its current status without adding a second subscription.
    async fn subscribe_email(&self, channel: &str, email: &str) -> Result<SubscriptionStatus, ChannelError>;

    /// Sends one message to every confirmed subscriber. Delivery is the platform's concern.
    async fn publish(&self, channel: &str, message: &OutboundMessage) -> Result<PublishReceipt, ChannelError>;
}

/// Resolves the account the service runs under.
#[async_trait]
pub trait IdentityService: Send + Sync + 'static {
    async fn account_id(&self) -> Result<String, ChannelError>;
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ChannelKind {
    MonthlyReports,
    BudgetAlerts
}

impl ChannelKind {
    fn slug(&self) -> &'static str {
        match self {
            ChannelKind::MonthlyReports => "monthly-reports",
            ChannelKind::BudgetAlerts => "budget-alerts"
        }
    }

    /// `finance-<kind>-<environment>`
    pub fn topic_name(&self, environment: &str) -> String {
        format!("finance-{}-{environment}", self.slug())
    }
}

impl Display for ChannelKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::MonthlyReports => write!(formatter, "Monthly report"),
            ChannelKind::BudgetAlerts => write!(formatter, "Budget alert")
        }
    }
}

/// Where a channel identifier comes from for one kind of notification.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ChannelSource {
    /// Created by infrastructure setup; the identifier is taken as configured.
    Provisioned(ChannelId),
    /// Built from the naming template and created on first use.
    Convention
}

pub fn channel_id(region: &str, account_id: &str, name: &str) -> ChannelId {
    format!("arn:aws:sns:{region}:{account_id}:{name}")
}

/// Last `:` separated segment of a channel identifier.
pub fn channel_name(channel: &str) -> &str {
    channel.rsplit(':').next().unwrap_or(channel)
}
