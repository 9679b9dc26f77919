//! Discord bot REST client.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{MessagingProvider, OutboundMessage};
use crate::error::ChannelError;
use crate::report::RecipientId;

/// Environment variable for the Discord bot token.
pub const ENV_DISCORD_BOT_TOKEN: &str = "DISCORD_BOT_TOKEN";

/// Environment variable overriding the Discord API base URL.
pub const ENV_DISCORD_API_URL: &str = "DISCORD_API_URL";

/// Discord REST API base URL.
pub const DEFAULT_API_URL: &str = "https://discord.com/api/v10";

/// Discord bot client authenticated with a bot token.
#[derive(Clone)]
pub struct DiscordClient {
    token: String,
    api_url: String,
    client: reqwest::Client,
}

impl DiscordClient {
    /// Create a Discord client with a specific bot token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), token, DEFAULT_API_URL)
    }

    /// Create a client that reuses an existing connection pool.
    #[must_use]
    pub fn with_http(
        client: reqwest::Client,
        token: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            api_url: api_url.into(),
            client,
        }
    }

    /// Point the client at a different API base URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_url.trim_end_matches('/'))
    }

    /// POST a JSON body and return the `id` of the created object.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    async fn create<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String, ChannelError> {
        let response = self
            .client
            .post(self.url(path))
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let created: Created = response.json().await?;
            return Ok(created.id);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<f64>().ok())
                .map_or(5, |secs| secs.ceil() as u64);

            warn!(
                channel = "discord",
                path,
                retry_after_secs = retry_after,
                "Rate limited by Discord"
            );

            return Err(ChannelError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let body = response.text().await.unwrap_or_default();

        warn!(
            channel = "discord",
            path,
            status = %status,
            body = %body,
            "Discord API request failed"
        );

        Err(ChannelError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl MessagingProvider for DiscordClient {
    fn name(&self) -> &'static str {
        "discord"
    }

    async fn open_direct_channel(&self, recipient: &RecipientId) -> Result<String, ChannelError> {
        debug!(channel = "discord", recipient = %recipient, "Opening DM channel");

        self.create(
            "/users/@me/channels",
            &OpenDirectChannel {
                recipient_id: recipient.as_str(),
            },
        )
        .await
    }

    async fn create_message(
        &self,
        channel_id: &str,
        message: &OutboundMessage,
    ) -> Result<String, ChannelError> {
        debug!(channel = "discord", channel_id, "Sending message");

        self.create(&format!("/channels/{channel_id}/messages"), message)
            .await
    }
}

// =============================================================================
// Discord API types
// =============================================================================

#[derive(Debug, Serialize)]
struct OpenDirectChannel<'a> {
    recipient_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: String,
}
