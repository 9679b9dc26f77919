//! notify-send - send tournament notifications from the command line.
//!
//! # Environment Variables
//!
//! - `DISCORD_BOT_TOKEN` - Bot token (required, or pass via --token)
//! - `DISCORD_API_URL` - API base URL override
//!
//! # Examples
//!
//! ```bash
//! # DM a match notification to two players
//! notify-send match --team1 "Red Owls" --team2 "Blue Foxes" \
//!     --time 2024-01-15T18:30:00Z 1234 5678
//!
//! # Post an admin notice to a channel instead
//! notify-send --channel 998877 admin --title "Maintenance" \
//!     --message "Back at 02:00 UTC" --severity warning
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tourney_notify::{
    recipients, BotConfig, DeliveryTarget, NotificationKind, Severity, TournamentBot,
};

/// Send tournament notifications through the Discord bot.
#[derive(Parser)]
#[command(name = "notify-send")]
#[command(about = "Send tournament notifications to Discord users or channels")]
#[command(version)]
struct Cli {
    /// Discord bot token (or set `DISCORD_BOT_TOKEN` env var)
    #[arg(long, env = "DISCORD_BOT_TOKEN", hide_env_values = true)]
    token: String,

    /// Discord API base URL
    #[arg(long, env = "DISCORD_API_URL", default_value = "https://discord.com/api/v10")]
    api_url: String,

    /// Post to this channel instead of sending direct messages
    #[arg(long, global = true)]
    channel: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tournament announcement
    Tournament {
        /// Tournament name
        #[arg(long)]
        name: String,

        /// Start time (RFC 3339 or free text)
        #[arg(long)]
        start_time: String,

        /// Message body
        #[arg(long)]
        message: String,

        /// Discord user ids
        users: Vec<String>,
    },

    /// Match notification
    Match {
        #[arg(long)]
        team1: String,

        #[arg(long)]
        team2: String,

        /// Match start time (RFC 3339 or free text)
        #[arg(long)]
        time: String,

        /// Map name (defaults to TBD)
        #[arg(long)]
        map: Option<String>,

        /// Discord user ids
        users: Vec<String>,
    },

    /// Team invitation (single user)
    Invite {
        #[arg(long)]
        team: String,

        #[arg(long)]
        inviter: String,

        /// Discord user id
        user: String,
    },

    /// Admin notification
    Admin {
        #[arg(long)]
        title: String,

        #[arg(long)]
        message: String,

        /// info, warning, error or success
        #[arg(long)]
        severity: Option<String>,

        /// Discord user ids
        users: Vec<String>,
    },
}

impl Commands {
    fn into_parts(self) -> Result<(NotificationKind, Vec<String>)> {
        Ok(match self {
            Self::Tournament {
                name,
                start_time,
                message,
                users,
            } => (
                NotificationKind::Tournament {
                    tournament_name: name,
                    start_time,
                    message,
                },
                users,
            ),
            Self::Match {
                team1,
                team2,
                time,
                map,
                users,
            } => (
                NotificationKind::Match {
                    team1_name: team1,
                    team2_name: team2,
                    match_time: time,
                    map,
                },
                users,
            ),
            Self::Invite {
                team,
                inviter,
                user,
            } => (
                NotificationKind::TeamInvite {
                    team_name: team,
                    inviter_name: inviter,
                },
                vec![user],
            ),
            Self::Admin {
                title,
                message,
                severity,
                users,
            } => {
                let severity = severity
                    .as_deref()
                    .map(str::parse::<Severity>)
                    .transpose()?
                    .unwrap_or_default();
                (
                    NotificationKind::Admin {
                        title,
                        message,
                        severity,
                    },
                    users,
                )
            }
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    let bot = TournamentBot::from_config(&BotConfig {
        token: Some(cli.token),
        api_url: cli.api_url,
    })
    .context("Failed to initialize Discord bot")?;

    let (kind, users) = cli.command.into_parts()?;
    let target = DeliveryTarget::select(cli.channel, recipients(users))?;

    let output = match target {
        DeliveryTarget::Channel(channel_id) => {
            let receipt = bot
                .announce(&channel_id, &kind)
                .await
                .context("Failed to post notification")?;
            json!({
                "success": true,
                "type": "channel",
                "channelId": receipt.channel_id,
                "messageId": receipt.message_id,
            })
        }
        DeliveryTarget::Recipients(ids) => {
            let report = bot.notify(&kind, &ids).await?;
            json!({
                "type": "dm",
                "summary": report.summary(),
                "results": report.results(),
                "successfulDMs": report.successful_count(),
                "totalDMs": report.total_count(),
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
