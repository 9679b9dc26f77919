//! Configuration for the gateway service.

use std::env;
use std::time::Duration;

pub use tourney_notify::channels::discord::DEFAULT_API_URL as DEFAULT_DISCORD_API_URL;

/// Stripe REST API base URL.
pub const DEFAULT_STRIPE_API_URL: &str = "https://api.stripe.com";

/// Gateway configuration.
#[derive(Clone)]
pub struct Config {
    /// HTTP server port.
    pub port: u16,
    /// Discord API base URL (overridable for testing).
    pub discord_api_url: String,
    /// Discord OAuth application client ID.
    pub discord_client_id: Option<String>,
    /// Discord OAuth application client secret.
    pub discord_client_secret: Option<String>,
    /// Stripe secret API key.
    pub stripe_secret_key: Option<String>,
    /// Stripe API base URL (overridable for testing).
    pub stripe_api_url: String,
    /// Timeout for outbound provider requests.
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: env::var("GATEWAY_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            discord_api_url: non_empty_var("DISCORD_API_URL")
                .unwrap_or_else(|| DEFAULT_DISCORD_API_URL.to_string()),
            discord_client_id: non_empty_var("DISCORD_CLIENT_ID"),
            discord_client_secret: non_empty_var("DISCORD_CLIENT_SECRET"),
            stripe_secret_key: non_empty_var("STRIPE_SECRET_KEY"),
            stripe_api_url: non_empty_var("STRIPE_API_URL")
                .unwrap_or_else(|| DEFAULT_STRIPE_API_URL.to_string()),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl Config {
    /// Discord OAuth client credentials, if both halves are configured.
    #[must_use]
    pub fn discord_oauth_credentials(&self) -> Option<(&str, &str)> {
        Some((
            self.discord_client_id.as_deref()?,
            self.discord_client_secret.as_deref()?,
        ))
    }

    /// Timeout applied to every outbound request.
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}
