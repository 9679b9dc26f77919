//! Messaging provider abstraction and wire types.

pub mod discord;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ChannelError;
use crate::report::RecipientId;

/// Message body sent to a channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<serde_json::Value>,
}

impl OutboundMessage {
    /// A plain text message.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embeds: vec![],
        }
    }

    /// A message carrying a single embed.
    #[must_use]
    pub fn embed(embed: serde_json::Value) -> Self {
        Self {
            content: None,
            embeds: vec![embed],
        }
    }

    /// Build from optional raw parts, as relayed by the HTTP gateway.
    #[must_use]
    pub fn from_parts(content: Option<String>, embed: Option<serde_json::Value>) -> Self {
        Self {
            content: content.filter(|c| !c.is_empty()),
            embeds: embed.filter(|e| !e.is_null()).into_iter().collect(),
        }
    }
}

/// Where a message is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryChannel {
    /// Private channel opened for one recipient
    Direct {
        recipient: RecipientId,
        channel_id: String,
    },
    /// Pre-existing channel supplied by the caller
    Shared { channel_id: String },
}

impl DeliveryChannel {
    #[must_use]
    pub fn channel_id(&self) -> &str {
        match self {
            Self::Direct { channel_id, .. } | Self::Shared { channel_id } => channel_id,
        }
    }
}

/// Trait for messaging providers (Discord, or a fake in tests).
#[async_trait]
pub trait MessagingProvider: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &'static str;

    /// Open (or fetch) the private channel for a user. Returns the channel id.
    async fn open_direct_channel(&self, recipient: &RecipientId) -> Result<String, ChannelError>;

    /// Post a message to a channel. Returns the created message id.
    async fn create_message(
        &self,
        channel_id: &str,
        message: &OutboundMessage,
    ) -> Result<String, ChannelError>;
}
