//! Minimal Stripe REST client for Connect accounts and Checkout sessions.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Errors from the Stripe API.
#[derive(Debug, Error)]
pub enum StripeError {
    /// The request did not complete in time
    #[error("Stripe request timed out")]
    Timeout,

    /// Stripe could not be reached
    #[error("Could not connect to Stripe: {0}")]
    Connection(String),

    /// Any other transport failure
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Stripe answered with an error object
    #[error("Stripe returned {status}: {message}")]
    Api {
        status: u16,
        kind: Option<String>,
        code: Option<String>,
        message: String,
    },

    /// Stripe answered 2xx with a body we could not read
    #[error("Failed to parse Stripe response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for StripeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connection(e.to_string())
        } else {
            Self::Http(e.to_string())
        }
    }
}

impl StripeError {
    /// Whether Stripe reported that the requested object does not exist.
    #[must_use]
    pub fn is_resource_missing(&self) -> bool {
        matches!(self, Self::Api { code: Some(code), .. } if code == "resource_missing")
    }

    /// Whether Stripe rejected our API key.
    #[must_use]
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            Self::Api { status: 401, .. }
        ) || matches!(self, Self::Api { kind: Some(kind), .. } if kind == "authentication_error")
    }

    /// Whether the caller's request was at fault.
    #[must_use]
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            Self::Api { kind: Some(kind), .. }
                if kind == "invalid_request_error" || kind == "card_error"
        )
    }
}

/// A Stripe Connect account.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub charges_enabled: bool,
    #[serde(default)]
    pub payouts_enabled: bool,
    #[serde(default)]
    pub details_submitted: bool,
    #[serde(default)]
    pub requirements: Option<Requirements>,
}

impl Account {
    /// Onboarding is complete once the account can both charge and pay out.
    #[must_use]
    pub const fn onboarding_complete(&self) -> bool {
        self.charges_enabled && self.payouts_enabled && self.details_submitted
    }

    /// Requirement ids Stripe still needs from the account holder.
    #[must_use]
    pub fn currently_due(&self) -> &[String] {
        self.requirements
            .as_ref()
            .map_or(&[], |r| r.currently_due.as_slice())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Requirements {
    #[serde(default)]
    pub currently_due: Vec<String>,
}

/// A Stripe Checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub payment_status: String,
    #[serde(default)]
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CheckoutSession {
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }

    /// Email entered at checkout, falling back to the prefilled one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.customer_details
            .as_ref()
            .and_then(|d| d.email.as_deref())
            .or(self.customer_email.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub email: Option<String>,
}

/// Stripe error envelope.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<String>,
    message: Option<String>,
}

/// Stripe REST client authenticated with a secret key.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    secret_key: String,
    api_url: String,
}

impl StripeClient {
    /// Create a client that reuses an existing connection pool.
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        secret_key: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            secret_key: secret_key.into(),
            api_url: api_url.into(),
        }
    }

    /// Stripe object ids are alphanumeric with underscores.
    #[must_use]
    pub fn is_valid_id(id: &str) -> bool {
        !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    /// Retrieve a Connect account.
    ///
    /// # Errors
    /// Returns a [`StripeError`] for transport failures or Stripe error responses.
    #[instrument(skip(self))]
    pub async fn retrieve_account(&self, account_id: &str) -> Result<Account, StripeError> {
        self.get(&format!("/v1/accounts/{account_id}")).await
    }

    /// Retrieve a Checkout session.
    ///
    /// # Errors
    /// Returns a [`StripeError`] for transport failures or Stripe error responses.
    #[instrument(skip(self))]
    pub async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, StripeError> {
        self.get(&format!("/v1/checkout/sessions/{session_id}"))
            .await
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, StripeError> {
        let url = format!("{}{path}", self.api_url.trim_end_matches('/'));
        debug!(path, "Calling Stripe API");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| StripeError::Parse(e.to_string()));
        }

        let error = serde_json::from_str::<ErrorEnvelope>(&body).map_or(
            ErrorBody {
                kind: None,
                code: None,
                message: None,
            },
            |envelope| envelope.error,
        );

        warn!(
            path,
            status = %status,
            kind = ?error.kind,
            code = ?error.code,
            "Stripe API request failed"
        );

        Err(StripeError::Api {
            status: status.as_u16(),
            kind: error.kind,
            code: error.code,
            message: error.message.unwrap_or(body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16, kind: Option<&str>, code: Option<&str>) -> StripeError {
        StripeError::Api {
            status,
            kind: kind.map(str::to_string),
            code: code.map(str::to_string),
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_error_classification() {
        assert!(api_error(404, Some("invalid_request_error"), Some("resource_missing"))
            .is_resource_missing());
        assert!(api_error(401, None, None).is_authentication());
        assert!(api_error(400, Some("card_error"), Some("card_declined")).is_invalid_request());
        assert!(!api_error(500, Some("api_error"), None).is_invalid_request());
    }

    #[test]
    fn test_valid_ids() {
        assert!(StripeClient::is_valid_id("cs_test_a1B2c3"));
        assert!(StripeClient::is_valid_id("acct_1Nv0FGQ9RKHgCVdK"));
        assert!(!StripeClient::is_valid_id(""));
        assert!(!StripeClient::is_valid_id("../v1/charges"));
    }

    #[test]
    fn test_session_email_prefers_checkout_details() {
        let session: CheckoutSession = serde_json::from_value(serde_json::json!({
            "id": "cs_1",
            "payment_status": "paid",
            "customer_email": "prefill@example.com",
            "customer_details": { "email": "entered@example.com" }
        }))
        .unwrap();
        assert!(session.is_paid());
        assert_eq!(session.email(), Some("entered@example.com"));
    }

    #[test]
    fn test_account_onboarding() {
        let account: Account = serde_json::from_value(serde_json::json!({
            "id": "acct_1",
            "charges_enabled": true,
            "payouts_enabled": false,
            "details_submitted": true,
            "requirements": { "currently_due": ["external_account"] }
        }))
        .unwrap();
        assert!(!account.onboarding_complete());
        assert_eq!(account.currently_due(), ["external_account".to_string()]);
    }
}
