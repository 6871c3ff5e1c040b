use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, info};

use crate::models::{OutboundMessage, PublishReceipt, Subscription, SubscriptionStatus};
use crate::notifications::{channel_id, channel_name, ChannelError, IdentityService, NotificationPlatform};
use crate::types::ChannelId;

const MAX_TOPIC_NAME: usize = 256;
const MAX_SUBJECT: usize = 100;

/// In-process notification platform.
///
/// Topics are keyed by name and identified the same way the hosted platform would
/// identify them. Publishing only counts confirmed subscribers and keeps a copy of
/// every message in a per-channel outbox.
pub struct LocalPlatform {
    region: String,
    account_id: String,
    topics: DashMap<String, ChannelId>,
    subscriptions: DashMap<ChannelId, Vec<Subscription>>,
    outbox: DashMap<ChannelId, Vec<OutboundMessage>>,
    sequence: AtomicU64
}

impl LocalPlatform {
    pub fn new(region: &str, account_id: &str) -> Self {
        Self {
            region: region.to_string(),
            account_id: account_id.to_string(),
            topics: DashMap::new(),
            subscriptions: DashMap::new(),
            outbox: DashMap::new(),
            sequence: AtomicU64::new(0)
        }
    }

    /// Registers a topic created elsewhere under its full identifier.
    pub fn provision(&self, channel: &str) {
        self.topics.insert(channel_name(channel).to_string(), channel.to_string());
        self.subscriptions.entry(channel.to_string()).or_default();
    }

    /// Out-of-band confirmation by the endpoint owner.
    pub fn confirm(&self, channel: &str, email: &str) -> bool {
        let Some(mut subscriptions) = self.subscriptions.get_mut(channel) else {
            return false
        };

        match subscriptions.iter_mut().find(|subscription| subscription.email == email) {
            Some(subscription) => {
                subscription.status = SubscriptionStatus::Confirmed;
                true
            }
            None => false
        }
    }

    pub fn subscriptions(&self, channel: &str) -> Vec<Subscription> {
        self.subscriptions.get(channel).map(|entry| entry.value().clone()).unwrap_or_default()
    }

    pub fn outbox(&self, channel: &str) -> Vec<OutboundMessage> {
        self.outbox.get(channel).map(|entry| entry.value().clone()).unwrap_or_default()
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}

#[async_trait]
impl NotificationPlatform for LocalPlatform {
    async fn create_topic(&self, name: &str) -> Result<ChannelId, ChannelError> {
        if !is_valid_topic_name(name) {
            return Err(ChannelError::create_topic(name, "invalid topic name"));
        }

        let channel = self.topics.entry(name.to_string())
            .or_insert_with(|| channel_id(&self.region, &self.account_id, name))
            .value()
            .clone();

        self.subscriptions.entry(channel.clone()).or_default();

        Ok(channel)
    }

    async fn subscribe_email(&self, channel: &str, email: &str) -> Result<SubscriptionStatus, ChannelError> {
        if !is_plausible_email(email) {
            return Err(ChannelError::subscribe(channel, format!("invalid email endpoint [{email}]")));
        }

        let mut subscriptions = self.subscriptions.get_mut(channel)
            .ok_or_else(|| ChannelError::topic_not_found(channel))?;

        if let Some(existing) = subscriptions.iter().find(|subscription| subscription.email == email) {
            debug!("[{email}] already subscribed to [{channel}]");
            return Ok(existing.status);
        }

        subscriptions.push(Subscription {
            channel_id: channel.to_string(),
            email: email.to_string(),
            status: SubscriptionStatus::PendingConfirmation
        });

        Ok(SubscriptionStatus::PendingConfirmation)
    }

    async fn publish(&self, channel: &str, message: &OutboundMessage) -> Result<PublishReceipt, ChannelError> {
        if let Some(reason) = subject_violation(&message.subject) {
            return Err(ChannelError::publish(channel, reason));
        }

        let delivered_to = self.subscriptions.get(channel)
            .map(|subscriptions| {
                subscriptions.iter()
                    .filter(|subscription| subscription.status == SubscriptionStatus::Confirmed)
                    .count()
            })
            .ok_or_else(|| ChannelError::topic_not_found(channel))?;

        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let message_id = format!("local-{sequence:08}");

        self.outbox.entry(channel.to_string()).or_default().push(message.clone());

        info!("[{message_id}] {}\n{}", message.subject, message.body);

        Ok(PublishReceipt {
            message_id,
            delivered_to
        })
    }
}

/// Identity service returning a fixed account, for running outside the hosted platform.
pub struct StaticIdentity {
    account_id: String
}

impl StaticIdentity {
    pub fn new(account_id: &str) -> Self {
        Self {
            account_id: account_id.to_string()
        }
    }
}

#[async_trait]
impl IdentityService for StaticIdentity {
    async fn account_id(&self) -> Result<String, ChannelError> {
        Ok(self.account_id.clone())
    }
}

fn is_valid_topic_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_TOPIC_NAME
        && name.chars().all(|character| character.is_ascii_alphanumeric() || character == '-' || character == '_')
}

// Subjects must be non-empty single-line text of at most 100 characters.
fn subject_violation(subject: &str) -> Option<String> {
    if subject.trim().is_empty() {
        Some("subject is empty".to_string())
    } else if subject.chars().count() > MAX_SUBJECT {
        Some(format!("subject is longer than {MAX_SUBJECT} characters"))
    } else if subject.chars().any(char::is_control) {
        Some("subject contains control characters".to_string())
    } else {
        None
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !email.contains(char::is_whitespace),
        None => false
    }
}
