//! Notification dispatch for tournament platform events.
//!
//! This crate delivers tournament, match, team-invite and admin notifications
//! to players through Discord, either as direct messages to each player or as
//! a single post in a shared channel.
//!
//! # Usage
//!
//! ```no_run
//! use tourney_notify::{recipients, TournamentBot};
//!
//! # async fn run() -> Result<(), tourney_notify::NotifyError> {
//! // Build once at startup from DISCORD_BOT_TOKEN
//! let bot = TournamentBot::from_env()?;
//!
//! let summary = bot
//!     .send_match_notification(
//!         &recipients(["1234", "5678"]),
//!         "Red Owls",
//!         "Blue Foxes",
//!         "2024-01-15T18:30:00Z",
//!         None,
//!     )
//!     .await?;
//!
//! println!("delivered: {:?}, failed: {:?}", summary.success, summary.failed);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! - `DISCORD_BOT_TOKEN`: bot token used for every API call (required)
//! - `DISCORD_API_URL`: API base URL (defaults to `https://discord.com/api/v10`)
//!
//! # Architecture
//!
//! - [`compose()`] builds an immutable [`NotificationPayload`] from a [`NotificationKind`]
//! - [`MessagingProvider`] is the provider seam; [`DiscordClient`] implements it
//! - [`Dispatcher`] resolves recipients and sends, one recipient at a time
//! - [`DeliveryReport`] aggregates per-recipient outcomes in processing order

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bot;
pub mod channels;
pub mod compose;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod report;
pub mod time;

pub use bot::{BotConfig, TournamentBot};
pub use channels::discord::DiscordClient;
pub use channels::{DeliveryChannel, MessagingProvider, OutboundMessage};
pub use compose::{compose, compose_at, EmbedField, NotificationPayload};
pub use dispatch::{BroadcastReceipt, DeliveryTarget, Dispatch, Dispatcher};
pub use error::{ChannelError, NotifyError};
pub use events::{ColorTag, NotificationKind, Severity};
pub use report::{
    recipients, DeliveryOutcome, DeliveryReport, DeliveryStatus, RecipientId, RecipientResult,
    RecipientSummary,
};
