//! Stripe Connect onboarding status and Checkout session verification.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use tracing::{info, warn};

use super::{non_blank, parse_json};
use crate::error::ApiError;
use crate::server::AppState;
use crate::stripe::{CheckoutSession, StripeClient};

/// Body of `POST /stripe/check-account-status`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStatusRequest {
    #[serde(default)]
    pub account_id: Option<String>,
}

/// Onboarding state of a connected account.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStatus {
    pub account_id: String,
    pub charges_enabled: bool,
    pub payouts_enabled: bool,
    pub details_submitted: bool,
    pub onboarding_complete: bool,
    pub currently_due: Vec<String>,
}

/// Checkout session id, from the query string or a JSON body.
#[derive(Debug, Default, Deserialize)]
pub struct SessionParams {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// A verified, paid Checkout session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedPayment {
    pub success: bool,
    pub session_id: String,
    pub payment_status: String,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    pub customer_email: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl From<CheckoutSession> for VerifiedPayment {
    fn from(session: CheckoutSession) -> Self {
        Self {
            success: true,
            customer_email: session.email().map(str::to_string),
            session_id: session.id,
            payment_status: session.payment_status,
            amount_total: session.amount_total,
            currency: session.currency,
            metadata: session.metadata,
        }
    }
}

fn stripe(state: &AppState) -> Result<&StripeClient, ApiError> {
    state
        .stripe
        .as_ref()
        .ok_or_else(|| ApiError::NotConfigured("Stripe is not configured".to_string()))
}

fn require_id(value: Option<String>, name: &str) -> Result<String, ApiError> {
    let id = non_blank(value).ok_or_else(|| ApiError::bad_request(format!("Missing {name}")))?;
    if !StripeClient::is_valid_id(&id) {
        return Err(ApiError::bad_request(format!("Invalid {name}")));
    }
    Ok(id)
}

/// Report whether a connected account has finished onboarding.
pub async fn check_account_status(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AccountStatus>, ApiError> {
    let client = stripe(&state)?;
    let request: AccountStatusRequest = parse_json(&body)?;
    let account_id = require_id(request.account_id, "accountId")?;

    let account = client.retrieve_account(&account_id).await?;

    info!(
        account_id = %account.id,
        charges_enabled = account.charges_enabled,
        payouts_enabled = account.payouts_enabled,
        "Checked Stripe account status"
    );

    Ok(Json(AccountStatus {
        onboarding_complete: account.onboarding_complete(),
        currently_due: account.currently_due().to_vec(),
        account_id: account.id,
        charges_enabled: account.charges_enabled,
        payouts_enabled: account.payouts_enabled,
        details_submitted: account.details_submitted,
    }))
}

/// `GET /stripe/verify-payment-session?session_id=...`
pub async fn verify_session_query(
    State(state): State<AppState>,
    Query(params): Query<SessionParams>,
) -> Result<Response, ApiError> {
    verify_session(&state, params).await
}

/// `POST /stripe/verify-payment-session` with `{"session_id": "..."}`
pub async fn verify_session_body(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let params: SessionParams = parse_json(&body)?;
    verify_session(&state, params).await
}

async fn verify_session(state: &AppState, params: SessionParams) -> Result<Response, ApiError> {
    let client = stripe(state)?;
    let session_id = require_id(params.session_id, "session_id")?;

    let session = client.retrieve_checkout_session(&session_id).await?;

    if !session.is_paid() {
        warn!(
            session_id = %session.id,
            payment_status = %session.payment_status,
            "Checkout session not paid"
        );
        let body = json!({
            "error": "Payment not completed",
            "paymentStatus": session.payment_status,
        });
        return Ok((StatusCode::BAD_REQUEST, Json(body)).into_response());
    }

    info!(
        session_id = %session.id,
        amount_total = ?session.amount_total,
        "Verified Checkout session"
    );
    Ok(Json(VerifiedPayment::from(session)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_id() {
        assert!(matches!(
            require_id(None, "session_id"),
            Err(ApiError::BadRequest(m)) if m == "Missing session_id"
        ));
        assert!(matches!(
            require_id(Some("cs/../x".into()), "session_id"),
            Err(ApiError::BadRequest(m)) if m == "Invalid session_id"
        ));
        assert_eq!(require_id(Some("cs_123".into()), "session_id").unwrap(), "cs_123");
    }

    #[test]
    fn test_verified_payment_envelope() {
        let session: CheckoutSession = serde_json::from_value(json!({
            "id": "cs_9",
            "payment_status": "paid",
            "amount_total": 2500,
            "currency": "usd",
            "customer_email": "p@example.com",
            "metadata": { "tournamentId": "t-1" }
        }))
        .unwrap();

        let body = serde_json::to_value(VerifiedPayment::from(session)).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["sessionId"], "cs_9");
        assert_eq!(body["amountTotal"], 2500);
        assert_eq!(body["customerEmail"], "p@example.com");
        assert_eq!(body["metadata"]["tournamentId"], "t-1");
    }
}
