use thiserror::Error;

use crate::notifications::ChannelKind;
use crate::types::ChannelId;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("{kind} topic is not configured")]
    NotConfigured {
        kind: ChannelKind
    },
    #[error("Could not resolve account identity: {reason}")]
    Identity {
        reason: String
    },
    #[error("Failed to create/access topic [{name}]: {reason}")]
    CreateTopic {
        name: String,
        reason: String
    },
    #[error("Topic [{channel}] does not exist")]
    TopicNotFound {
        channel: ChannelId
    },
    #[error("Failed to subscribe email to topic [{channel}]: {reason}")]
    Subscribe {
        channel: ChannelId,
        reason: String
    },
    #[error("Failed to publish to topic [{channel}]: {reason}")]
    Publish {
        channel: ChannelId,
        reason: String
    }
}

impl ChannelError {
    pub fn identity(reason: impl ToString) -> Self {
        Self::Identity { reason: reason.to_string() }
    }

    pub fn create_topic(name: &str, reason: impl ToString) -> Self {
        Self::CreateTopic {
            name: name.to_string(),
            reason: reason.to_string()
        }
    }

    pub fn topic_not_found(channel: &str) -> Self {
        Self::TopicNotFound { channel: channel.to_string() }
    }

    pub fn subscribe(channel: &str, reason: impl ToString) -> Self {
        Self::Subscribe {
            channel: channel.to_string(),
            reason: reason.to_string()
        }
    }

    pub fn publish(channel: &str, reason: impl ToString) -> Self {
        Self::Publish {
            channel: channel.to_string(),
            reason: reason.to_string()
        }
    }
}
