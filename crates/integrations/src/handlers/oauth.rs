//! Discord OAuth authorization-code exchange.

use axum::{body::Bytes, extract::State, response::Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{non_blank, parse_json};
use crate::error::ApiError;
use crate::server::AppState;

/// Body of `POST /discord/token`.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub redirect_uri: Option<String>,
}

/// Access token returned to the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    #[serde(default)]
    pub scope: String,
}

/// Exchange an authorization code for a Discord access token.
pub async fn exchange_token(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TokenResponse>, ApiError> {
    let Some((client_id, client_secret)) = state.config.discord_oauth_credentials() else {
        return Err(ApiError::NotConfigured(
            "Discord OAuth is not configured".to_string(),
        ));
    };

    let request: TokenRequest = parse_json(&body)?;
    let (Some(code), Some(redirect_uri)) =
        (non_blank(request.code), non_blank(request.redirect_uri))
    else {
        return Err(ApiError::bad_request(
            "Missing required parameters: code and redirect_uri",
        ));
    };

    let url = format!(
        "{}/oauth2/token",
        state.config.discord_api_url.trim_end_matches('/')
    );
    let form = [
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("grant_type", "authorization_code"),
        ("code", code.as_str()),
        ("redirect_uri", redirect_uri.as_str()),
    ];

    let response = state
        .http
        .post(&url)
        .form(&form)
        .send()
        .await
        .map_err(|e| ApiError::Internal(format!("Token exchange request failed: {e}")))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to read token response: {e}")))?;

    if !status.is_success() {
        warn!(status = %status, "Discord rejected authorization code");
        return Err(ApiError::upstream(
            400,
            "Failed to exchange authorization code",
            text,
        ));
    }

    let token: TokenResponse = serde_json::from_str(&text)
        .map_err(|e| ApiError::Internal(format!("Invalid token response: {e}")))?;

    info!(scope = %token.scope, "Exchanged Discord authorization code");
    Ok(Json(token))
}
