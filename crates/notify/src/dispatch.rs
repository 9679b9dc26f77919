//! Delivery dispatcher: resolves recipients and sends one message to each.
//!
//! Direct-message delivery is strictly sequential. Each recipient is resolved
//! and sent to before the next one starts, and a failure for one recipient is
//! recorded in the [`DeliveryReport`] without stopping the loop.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::channels::{DeliveryChannel, MessagingProvider, OutboundMessage};
use crate::error::NotifyError;
use crate::report::{DeliveryOutcome, DeliveryReport, RecipientId};

/// Who a dispatch call delivers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryTarget {
    /// One shared channel (broadcast mode)
    Channel(String),
    /// One private channel per recipient (DM mode)
    Recipients(Vec<RecipientId>),
}

impl DeliveryTarget {
    /// Pick the delivery mode from the identifiers a caller supplied.
    ///
    /// A non-empty recipient list selects DM mode; otherwise a channel id
    /// selects broadcast mode.
    ///
    /// # Errors
    /// Returns [`NotifyError::InvalidRequest`] when neither is present, or
    /// when the channel id is not a Discord snowflake.
    pub fn select(
        channel_id: Option<String>,
        recipients: Vec<RecipientId>,
    ) -> Result<Self, NotifyError> {
        if !recipients.is_empty() {
            return Ok(Self::Recipients(recipients));
        }

        match channel_id.filter(|c| !c.trim().is_empty()) {
            Some(channel_id) if is_snowflake(&channel_id) => Ok(Self::Channel(channel_id)),
            Some(_) => Err(NotifyError::InvalidRequest(
                "channelId must be a numeric Discord id".to_string(),
            )),
            None => Err(NotifyError::InvalidRequest(
                "Either channelId or userIds must be provided".to_string(),
            )),
        }
    }
}

/// Discord ids are unsigned 64-bit integers in decimal.
#[must_use]
pub fn is_snowflake(id: &str) -> bool {
    !id.is_empty() && id.len() <= 20 && id.bytes().all(|b| b.is_ascii_digit())
}

/// A message posted to a shared channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastReceipt {
    pub channel_id: String,
    pub message_id: String,
}

/// Result of a dispatch call, by mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Broadcast(BroadcastReceipt),
    Direct(DeliveryReport),
}

/// Sends messages through a long-lived provider handle.
#[derive(Clone)]
pub struct Dispatcher {
    provider: Arc<dyn MessagingProvider>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(provider: Arc<dyn MessagingProvider>) -> Self {
        Self { provider }
    }

    /// Open the private channel for one recipient.
    ///
    /// # Errors
    /// Any provider failure is a [`NotifyError::Resolution`].
    pub async fn resolve(&self, recipient: &RecipientId) -> Result<DeliveryChannel, NotifyError> {
        let channel_id = self
            .provider
            .open_direct_channel(recipient)
            .await
            .map_err(NotifyError::Resolution)?;

        Ok(DeliveryChannel::Direct {
            recipient: recipient.clone(),
            channel_id,
        })
    }

    /// Send a message to an already-resolved channel. Returns the message id.
    ///
    /// # Errors
    /// Any provider failure is a [`NotifyError::Delivery`].
    pub async fn send(
        &self,
        channel: &DeliveryChannel,
        message: &OutboundMessage,
    ) -> Result<String, NotifyError> {
        self.provider
            .create_message(channel.channel_id(), message)
            .await
            .map_err(NotifyError::Delivery)
    }

    /// Resolve one recipient and send to them.
    ///
    /// # Errors
    /// Returns the resolution or delivery failure for this recipient.
    pub async fn send_direct(
        &self,
        recipient: &RecipientId,
        message: &OutboundMessage,
    ) -> Result<String, NotifyError> {
        let channel = self.resolve(recipient).await?;
        self.send(&channel, message).await
    }

    /// Post a message to a shared channel. No recipient resolution happens.
    ///
    /// # Errors
    /// Returns [`NotifyError::Delivery`] if the provider rejects the message.
    pub async fn broadcast(
        &self,
        channel_id: &str,
        message: &OutboundMessage,
    ) -> Result<BroadcastReceipt, NotifyError> {
        let channel = DeliveryChannel::Shared {
            channel_id: channel_id.to_string(),
        };
        let message_id = self.send(&channel, message).await?;

        info!(
            provider = self.provider.name(),
            channel_id,
            message_id = %message_id,
            "Broadcast sent"
        );

        Ok(BroadcastReceipt {
            channel_id: channel_id.to_string(),
            message_id,
        })
    }

    /// Deliver to every recipient in order, recording one outcome each.
    pub async fn deliver_all(
        &self,
        recipients: &[RecipientId],
        message: &OutboundMessage,
    ) -> DeliveryReport {
        let mut report = DeliveryReport::new();

        for recipient in recipients {
            let outcome = match self.send_direct(recipient, message).await {
                Ok(message_id) => {
                    debug!(recipient = %recipient, message_id = %message_id, "DM sent");
                    DeliveryOutcome::delivered(recipient.clone(), message_id)
                }
                Err(e) => {
                    warn!(recipient = %recipient, error = %e, "Failed to send DM");
                    let detail = e
                        .channel_error()
                        .map_or_else(|| e.to_string(), |ce| ce.detail());
                    DeliveryOutcome::failed(recipient.clone(), detail)
                }
            };
            report.record(outcome);
        }

        info!(
            provider = self.provider.name(),
            delivered = report.successful_count(),
            total = report.total_count(),
            "Direct messages dispatched"
        );

        report
    }

    /// Deliver a message to a target, in whichever mode the target selects.
    ///
    /// # Errors
    /// Returns [`NotifyError::InvalidRequest`] for an empty recipient list and
    /// the provider failure for a broadcast. DM failures are never errors.
    pub async fn dispatch(
        &self,
        message: &OutboundMessage,
        target: &DeliveryTarget,
    ) -> Result<Dispatch, NotifyError> {
        match target {
            DeliveryTarget::Channel(channel_id) => {
                self.broadcast(channel_id, message).await.map(Dispatch::Broadcast)
            }
            DeliveryTarget::Recipients(recipients) if recipients.is_empty() => Err(
                NotifyError::InvalidRequest("Recipient list is empty".to_string()),
            ),
            DeliveryTarget::Recipients(recipients) => {
                Ok(Dispatch::Direct(self.deliver_all(recipients, message).await))
            }
        }
    }
}
