//! Bot-facing notification API.
//!
//! [`TournamentBot`] is built once at startup and shared by reference. Each
//! operation composes its payload once, then hands it to the [`Dispatcher`].

use std::sync::Arc;
use tracing::{info, instrument};

use crate::channels::discord::{
    DiscordClient, DEFAULT_API_URL, ENV_DISCORD_API_URL, ENV_DISCORD_BOT_TOKEN,
};
use crate::channels::MessagingProvider;
use crate::compose::compose;
use crate::dispatch::{BroadcastReceipt, Dispatcher};
use crate::error::NotifyError;
use crate::events::{NotificationKind, Severity};
use crate::report::{DeliveryReport, RecipientId, RecipientSummary};

/// Bot configuration.
#[derive(Clone)]
pub struct BotConfig {
    /// Discord bot token.
    pub token: Option<String>,
    /// Discord API base URL.
    pub api_url: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: std::env::var(ENV_DISCORD_BOT_TOKEN)
                .ok()
                .filter(|s| !s.trim().is_empty()),
            api_url: std::env::var(ENV_DISCORD_API_URL)
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }
}

/// Sends tournament notifications as direct messages or channel posts.
#[derive(Clone)]
pub struct TournamentBot {
    dispatcher: Dispatcher,
}

impl TournamentBot {
    /// Create a bot backed by the Discord API.
    ///
    /// # Errors
    /// Returns [`NotifyError::Configuration`] if no bot token is configured.
    pub fn from_config(config: &BotConfig) -> Result<Self, NotifyError> {
        let token = config.token.as_deref().ok_or_else(|| {
            NotifyError::Configuration(format!("{ENV_DISCORD_BOT_TOKEN} is not set"))
        })?;

        let client = DiscordClient::new(token).with_api_url(&config.api_url);
        info!(api_url = %config.api_url, "Tournament bot initialized");
        Ok(Self::with_provider(Arc::new(client)))
    }

    /// Create a bot from environment variables.
    ///
    /// # Errors
    /// Returns [`NotifyError::Configuration`] if `DISCORD_BOT_TOKEN` is unset.
    pub fn from_env() -> Result<Self, NotifyError> {
        Self::from_config(&BotConfig::default())
    }

    /// Create a bot with a specific provider.
    #[must_use]
    pub fn with_provider(provider: Arc<dyn MessagingProvider>) -> Self {
        Self {
            dispatcher: Dispatcher::new(provider),
        }
    }

    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Compose `kind` once and DM it to every recipient.
    ///
    /// # Errors
    /// Returns [`NotifyError::InvalidParameters`] if `kind` is incomplete.
    /// Delivery failures are reported in the returned report.
    pub async fn notify(
        &self,
        kind: &NotificationKind,
        recipient_ids: &[RecipientId],
    ) -> Result<DeliveryReport, NotifyError> {
        let payload = compose(kind)?;
        let report = self
            .dispatcher
            .deliver_all(recipient_ids, &payload.to_message())
            .await;

        info!(
            kind = kind.name(),
            delivered = report.successful_count(),
            failed = report.failed_count(),
            "Notification sent"
        );

        Ok(report)
    }

    /// Compose `kind` once and post it to a shared channel.
    ///
    /// # Errors
    /// Returns [`NotifyError::InvalidParameters`] if `kind` is incomplete, or
    /// the provider failure.
    pub async fn announce(
        &self,
        channel_id: &str,
        kind: &NotificationKind,
    ) -> Result<BroadcastReceipt, NotifyError> {
        let payload = compose(kind)?;
        self.dispatcher
            .broadcast(channel_id, &payload.to_message())
            .await
    }

    /// DM a tournament announcement.
    ///
    /// # Errors
    /// Returns [`NotifyError::InvalidParameters`] for blank parameters.
    #[instrument(skip(self, recipient_ids, message), fields(recipients = recipient_ids.len()))]
    pub async fn send_tournament_notification(
        &self,
        recipient_ids: &[RecipientId],
        tournament_name: &str,
        start_time: &str,
        message: &str,
    ) -> Result<RecipientSummary, NotifyError> {
        let kind = NotificationKind::Tournament {
            tournament_name: tournament_name.to_string(),
            start_time: start_time.to_string(),
            message: message.to_string(),
        };
        Ok(self.notify(&kind, recipient_ids).await?.summary())
    }

    /// DM a match notification. `map` defaults to `TBD`.
    ///
    /// # Errors
    /// Returns [`NotifyError::InvalidParameters`] for blank parameters.
    #[instrument(skip(self, recipient_ids), fields(recipients = recipient_ids.len()))]
    pub async fn send_match_notification(
        &self,
        recipient_ids: &[RecipientId],
        team1_name: &str,
        team2_name: &str,
        match_time: &str,
        map: Option<&str>,
    ) -> Result<RecipientSummary, NotifyError> {
        let kind = NotificationKind::Match {
            team1_name: team1_name.to_string(),
            team2_name: team2_name.to_string(),
            match_time: match_time.to_string(),
            map: map.map(str::to_string),
        };
        Ok(self.notify(&kind, recipient_ids).await?.summary())
    }

    /// DM a team invitation to a single user. Returns whether it was delivered.
    ///
    /// # Errors
    /// Returns [`NotifyError::InvalidParameters`] for blank parameters.
    #[instrument(skip(self))]
    pub async fn send_team_invitation(
        &self,
        recipient_id: &RecipientId,
        team_name: &str,
        inviter_name: &str,
    ) -> Result<bool, NotifyError> {
        let kind = NotificationKind::TeamInvite {
            team_name: team_name.to_string(),
            inviter_name: inviter_name.to_string(),
        };
        let report = self
            .notify(&kind, std::slice::from_ref(recipient_id))
            .await?;
        Ok(report.failed_count() == 0)
    }

    /// DM an admin notification. `severity` defaults to info.
    ///
    /// # Errors
    /// Returns [`NotifyError::InvalidParameters`] for blank parameters.
    #[instrument(skip(self, recipient_ids, message), fields(recipients = recipient_ids.len()))]
    pub async fn send_admin_notification(
        &self,
        recipient_ids: &[RecipientId],
        title: &str,
        message: &str,
        severity: Option<Severity>,
    ) -> Result<RecipientSummary, NotifyError> {
        let kind = NotificationKind::Admin {
            title: title.to_string(),
            message: message.to_string(),
            severity: severity.unwrap_or_default(),
        };
        Ok(self.notify(&kind, recipient_ids).await?.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::tests::FakeProvider;
    use crate::report::recipients;

    fn bot(provider: &Arc<FakeProvider>) -> TournamentBot {
        TournamentBot::with_provider(provider.clone())
    }

    // Use a mutex to serialize tests that modify environment variables
    static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn test_blank_env_values_fall_back_to_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_DISCORD_BOT_TOKEN, " ");
        std::env::set_var(ENV_DISCORD_API_URL, "");

        let config = BotConfig::default();
        assert!(config.token.is_none());
        assert_eq!(config.api_url, DEFAULT_API_URL);

        std::env::set_var(ENV_DISCORD_API_URL, "http://localhost:9999");
        assert_eq!(BotConfig::default().api_url, "http://localhost:9999");

        std::env::remove_var(ENV_DISCORD_BOT_TOKEN);
        std::env::remove_var(ENV_DISCORD_API_URL);
    }

    #[test]
    fn test_missing_token_is_configuration_error() {
        let config = BotConfig {
            token: None,
            api_url: DEFAULT_API_URL.to_string(),
        };
        let err = TournamentBot::from_config(&config).err().unwrap();
        assert!(matches!(err, NotifyError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_tournament_notification_summary() {
        let provider = Arc::new(FakeProvider::unreachable(&["u2"]));
        let summary = bot(&provider)
            .send_tournament_notification(
                &recipients(["u1", "u2", "u3"]),
                "Winter Cup",
                "2024-01-15T18:30:00Z",
                "Check-in is open",
            )
            .await
            .unwrap();

        assert_eq!(summary.success, recipients(["u1", "u3"]));
        assert_eq!(summary.failed, recipients(["u2"]));
    }

    #[tokio::test]
    async fn test_invalid_parameters_send_nothing() {
        let provider = Arc::new(FakeProvider::default());
        let err = bot(&provider)
            .send_match_notification(&recipients(["u1"]), "", "Blue", "tonight", None)
            .await
            .unwrap_err();

        assert!(matches!(err, NotifyError::InvalidParameters(_)));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_team_invitation_returns_bool() {
        let provider = Arc::new(FakeProvider::unreachable(&["blocked"]));
        let bot = bot(&provider);

        assert!(bot
            .send_team_invitation(&"u1".into(), "Owls", "sam")
            .await
            .unwrap());
        assert!(!bot
            .send_team_invitation(&"blocked".into(), "Owls", "sam")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_admin_notification_default_severity() {
        let provider = Arc::new(FakeProvider::default());
        let summary = bot(&provider)
            .send_admin_notification(&recipients(["u1"]), "Heads up", "Restart at 2am", None)
            .await
            .unwrap();
        assert_eq!(summary.success.len(), 1);
    }

    #[tokio::test]
    async fn test_announce_posts_once() {
        let provider = Arc::new(FakeProvider::default());
        let kind = NotificationKind::Admin {
            title: "Brackets".to_string(),
            message: "Round 2 is live".to_string(),
            severity: Severity::Success,
        };
        let receipt = bot(&provider).announce("news", &kind).await.unwrap();

        assert_eq!(receipt.channel_id, "news");
        assert_eq!(provider.calls(), ["send:news"]);
    }
}
