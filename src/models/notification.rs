use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{ChannelId, MessageId};

/// Structured outcome returned for both notification operations.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct NotificationResult {
    pub success: bool,
    pub message: String
}

impl NotificationResult {
    pub fn sent(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SubscriptionStatus {
    Confirmed,
    /// Registered, but nothing is delivered until the endpoint owner confirms.
    PendingConfirmation
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Subscription {
    pub channel_id: ChannelId,
    pub email: String,
    pub status: SubscriptionStatus
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AttributeType {
    String,
    Number
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MessageAttribute {
    pub data_type: AttributeType,
    pub value: String
}

/// A formatted notification. The body is for humans and is not meant to be parsed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct OutboundMessage {
    pub subject: String,
    pub body: String,
    pub attributes: BTreeMap<String, MessageAttribute>
}

impl OutboundMessage {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            attributes: BTreeMap::new()
        }
    }

    pub fn with_attribute(mut self, name: &str, data_type: AttributeType, value: impl Into<String>) -> Self {
        self.attributes.insert(name.to_string(), MessageAttribute { data_type, value: value.into() });
        self
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PublishReceipt {
    pub message_id: MessageId,
    pub delivered_to: usize
}
