//! Error types for the notification system.

use thiserror::Error;

/// Errors returned by a messaging provider for a single request.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("Discord returned {status}: {body}")]
    Api { status: u16, body: String },

    /// Rate limited by the service
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

impl ChannelError {
    /// HTTP status the provider answered with, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Raw provider error text, suitable for relaying to a caller.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Api { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}

/// Errors that abort a whole notification call.
///
/// Per-recipient failures never surface here; they are folded into the
/// [`DeliveryReport`](crate::report::DeliveryReport).
#[derive(Debug, Error)]
pub enum NotifyError {
    /// A required credential or setting is missing
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A notification kind was composed without its required parameters
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// The dispatch target is malformed (no channel and no recipients)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A direct channel could not be opened for the recipient
    #[error("Failed to resolve recipient channel: {0}")]
    Resolution(#[source] ChannelError),

    /// The provider rejected or never received the message
    #[error("Failed to deliver message: {0}")]
    Delivery(#[source] ChannelError),
}

impl NotifyError {
    /// The provider error behind a resolution or delivery failure.
    #[must_use]
    pub const fn channel_error(&self) -> Option<&ChannelError> {
        match self {
            Self::Resolution(e) | Self::Delivery(e) => Some(e),
            _ => None,
        }
    }
}
