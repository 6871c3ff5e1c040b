use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::models::{OutboundMessage, PublishReceipt, Subscription, SubscriptionStatus};
use crate::notifications::{channel_id, ChannelError, ChannelKind, ChannelSource, IdentityService, NotificationPlatform};
use crate::settings::{is_placeholder, Settings};

/// Resolves notification channels, registers subscribers and publishes messages.
///
/// Nothing is remembered between calls: the channel identifier is re-derived from
/// configuration (and, for conventional channels, the account identity) every time.
pub struct Dispatcher<N: NotificationPlatform, I: IdentityService> {
    platform: Arc<N>,
    identity: Arc<I>,
    settings: Arc<Settings>
}

impl<N: NotificationPlatform, I: IdentityService> Dispatcher<N, I> {
    pub fn new(platform: Arc<N>, identity: Arc<I>, settings: Arc<Settings>) -> Self {
        Self {
            platform,
            identity,
            settings
        }
    }

    /// Creates the named channel if absent and registers `email` on it.
    ///
    /// Returns as soon as the platform accepts the registration; a pending subscription
    /// must be confirmed by the endpoint owner before it receives anything.
    pub async fn ensure_channel(&self, name: &str, email: &str) -> Result<Subscription, ChannelError> {
        let channel_id = self.platform.create_topic(name).await?;
        debug!("Topic [{name}] resolved to [{channel_id}]");

        self.register(channel_id, email).await
    }

    /// Registers `email` on the channel for `kind`, following the configured source.
    pub async fn subscribe(&self, kind: ChannelKind, email: &str) -> Result<Subscription, ChannelError> {
        match self.settings.channel_source(kind) {
            ChannelSource::Provisioned(channel) => {
                if is_placeholder(&channel) {
                    return Err(ChannelError::NotConfigured { kind });
                }

                debug!("Using provisioned {kind} topic [{channel}]");
                self.register(channel, email).await
            }
            ChannelSource::Convention => {
                let name = kind.topic_name(&self.settings.environment);
                let expected = self.conventional_channel_id(&name).await?;
                let subscription = self.ensure_channel(&name, email).await?;

                if subscription.channel_id != expected {
                    warn!("Topic [{name}] resolved to [{}], expected [{expected}]", subscription.channel_id);
                }

                Ok(subscription)
            }
        }
    }

    /// Publishes once. No retry is attempted here.
    pub async fn publish(&self, channel: &str, message: &OutboundMessage) -> Result<PublishReceipt, ChannelError> {
        let receipt = self.platform.publish(channel, message).await?;

        info!(
            "Published [{}] to [{channel}] as [{}], {} confirmed subscriber(s)",
            message.subject, receipt.message_id, receipt.delivered_to
        );

        Ok(receipt)
    }

    async fn conventional_channel_id(&self, name: &str) -> Result<String, ChannelError> {
        let account_id = self.identity.account_id().await?;

        Ok(channel_id(&self.settings.region, &account_id, name))
    }

    async fn register(&self, channel_id: String, email: &str) -> Result<Subscription, ChannelError> {
        let status = self.platform.subscribe_email(&channel_id, email).await?;

        if status == SubscriptionStatus::PendingConfirmation {
            info!("Subscription of [{email}] to [{channel_id}] is pending confirmation");
        }

        Ok(Subscription {
            channel_id,
            email: email.to_string(),
            status
        })
    }
}
