//! Discord notification relay.
//!
//! Callers supply their own bot token plus a pre-built message or embed; the
//! gateway picks broadcast or DM mode and relays the provider's answer.

use axum::{body::Bytes, extract::State, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tourney_notify::{
    recipients, DeliveryTarget, DiscordClient, Dispatch, Dispatcher, OutboundMessage,
};
use tracing::info;

use super::{non_blank, parse_json};
use crate::error::ApiError;
use crate::server::AppState;

/// Body of `POST /discord/send-notification`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationRequest {
    /// Notification type label, used for logging.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub embed: Option<Value>,
    pub bot_token: Option<String>,
    #[serde(default)]
    pub user_ids: Option<Vec<String>>,
}

/// Relay a notification to a channel or to each listed user.
pub async fn send_notification(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let request: SendNotificationRequest = parse_json(&body)?;

    let (Some(kind), Some(bot_token)) = (non_blank(request.kind), non_blank(request.bot_token))
    else {
        return Err(ApiError::bad_request(
            "Missing required fields: type and botToken",
        ));
    };

    let target = DeliveryTarget::select(
        request.channel_id,
        recipients(request.user_ids.unwrap_or_default()),
    )?;
    let message = OutboundMessage::from_parts(request.message, request.embed);

    let client = DiscordClient::with_http(
        state.http.clone(),
        bot_token,
        state.config.discord_api_url.clone(),
    );
    let dispatcher = Dispatcher::new(Arc::new(client));

    info!(kind = %kind, target = ?target, "Relaying Discord notification");

    let response = match dispatcher.dispatch(&message, &target).await? {
        Dispatch::Broadcast(receipt) => json!({
            "success": true,
            "messageId": receipt.message_id,
            "type": "channel",
        }),
        Dispatch::Direct(report) => json!({
            "success": true,
            "type": "dm",
            "results": report.results(),
            "successfulDMs": report.successful_count(),
            "totalDMs": report.total_count(),
        }),
    };

    Ok(Json(response))
}
