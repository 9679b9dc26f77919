//! HTTP-facing error type for the gateway.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;
use tourney_notify::NotifyError;
use tracing::error;

use crate::stripe::StripeError;

/// Errors returned from gateway handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or incomplete request body
    #[error("{0}")]
    BadRequest(String),

    /// Only POST (or GET where allowed) is accepted
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// A credential the endpoint needs is not configured
    #[error("{0}")]
    NotConfigured(String),

    /// An upstream provider rejected the call; its status is relayed
    #[error("{error}: {details}")]
    Upstream {
        status: StatusCode,
        error: String,
        details: String,
    },

    /// Payment provider failure
    #[error(transparent)]
    Stripe(#[from] StripeError),

    /// Anything else
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Relay a provider status, falling back to 502 for out-of-range codes.
    #[must_use]
    pub fn upstream(status: u16, error: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Upstream {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            error: error.into(),
            details: details.into(),
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotConfigured(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream { status, .. } => *status,
            Self::Stripe(e) => stripe_status(e),
        }
    }
}

/// Map a Stripe failure onto the gateway's response status.
fn stripe_status(e: &StripeError) -> StatusCode {
    match e {
        StripeError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        StripeError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
        e if e.is_resource_missing() => StatusCode::NOT_FOUND,
        // A rejected key is our misconfiguration, not the caller's
        e if e.is_authentication() => StatusCode::INTERNAL_SERVER_ERROR,
        e if e.is_invalid_request() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn stripe_label(e: &StripeError) -> &'static str {
    match e {
        StripeError::Timeout => "Payment provider timed out",
        StripeError::Connection(_) => "Payment provider unavailable",
        e if e.is_resource_missing() => "Resource not found",
        e if e.is_authentication() => "Payment provider authentication failed",
        e if e.is_invalid_request() => "Invalid payment request",
        _ => "Payment provider error",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::BadRequest(message) | Self::NotConfigured(message) => {
                json!({ "error": message })
            }
            Self::MethodNotAllowed => json!({ "error": self.to_string() }),
            Self::Upstream { error, details, .. } => {
                json!({ "error": error, "details": details })
            }
            Self::Stripe(e) => {
                // Key problems stay in the logs
                let details = if e.is_authentication() {
                    "Check the server's Stripe configuration".to_string()
                } else {
                    e.to_string()
                };
                json!({ "error": stripe_label(e), "details": details })
            }
            Self::Internal(message) => {
                error!(error = %message, "Unhandled gateway error");
                json!({ "error": "Internal server error", "message": message })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<NotifyError> for ApiError {
    fn from(e: NotifyError) -> Self {
        match e {
            NotifyError::InvalidRequest(message) | NotifyError::InvalidParameters(message) => {
                Self::BadRequest(message)
            }
            NotifyError::Configuration(message) => Self::NotConfigured(message),
            NotifyError::Resolution(ce) | NotifyError::Delivery(ce) => match ce.status() {
                Some(status) => {
                    Self::upstream(status, "Failed to send Discord message", ce.detail())
                }
                None => Self::Internal(ce.to_string()),
            },
        }
    }
}
