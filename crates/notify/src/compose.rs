//! Message composer: turns a [`NotificationKind`] into an embed payload.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use crate::channels::OutboundMessage;
use crate::error::NotifyError;
use crate::events::{ColorTag, NotificationKind};
use crate::time;

/// Footer shown on every notification.
pub const FOOTER_TEXT: &str = "Tournament Platform";

/// Map shown when a match has no map assigned yet.
pub const DEFAULT_MAP: &str = "TBD";

const MATCH_DESCRIPTION: &str = "Your match is ready! Good luck and have fun.";

/// A single name/value row of an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    fn inline(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: true,
        }
    }

    fn block(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: false,
        }
    }
}

/// A composed notification. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationPayload {
    title: String,
    body: String,
    color_tag: ColorTag,
    fields: Vec<EmbedField>,
    footer_text: String,
    issued_at: DateTime<Utc>,
}

impl NotificationPayload {
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    #[must_use]
    pub const fn color_tag(&self) -> ColorTag {
        self.color_tag
    }

    #[must_use]
    pub fn fields(&self) -> &[EmbedField] {
        &self.fields
    }

    #[must_use]
    pub fn footer_text(&self) -> &str {
        &self.footer_text
    }

    #[must_use]
    pub const fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Look up a field value by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Render as a Discord embed object.
    #[must_use]
    pub fn to_embed(&self) -> serde_json::Value {
        json!({
            "title": self.title,
            "description": self.body,
            "color": self.color_tag.value(),
            "fields": self.fields,
            "footer": { "text": self.footer_text },
            "timestamp": self.issued_at.to_rfc3339(),
        })
    }

    /// Wrap the embed in a message body ready to send.
    #[must_use]
    pub fn to_message(&self) -> OutboundMessage {
        OutboundMessage::embed(self.to_embed())
    }
}

/// Compose a notification issued now.
///
/// # Errors
/// Returns [`NotifyError::InvalidParameters`] if a required parameter is blank.
pub fn compose(kind: &NotificationKind) -> Result<NotificationPayload, NotifyError> {
    compose_at(kind, Utc::now())
}

/// Compose a notification with an explicit issue time.
///
/// # Errors
/// Returns [`NotifyError::InvalidParameters`] if a required parameter is blank.
pub fn compose_at(
    kind: &NotificationKind,
    issued_at: DateTime<Utc>,
) -> Result<NotificationPayload, NotifyError> {
    let missing: Vec<&str> = kind
        .required_params()
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

    if !missing.is_empty() {
        return Err(NotifyError::InvalidParameters(format!(
            "{} notification is missing {}",
            kind.name(),
            missing.join(", ")
        )));
    }

    let (title, body, color_tag, fields) = match kind {
        NotificationKind::Tournament {
            tournament_name,
            start_time,
            message,
        } => (
            format!("🏆 Tournament: {tournament_name}"),
            message.clone(),
            // Red accent for visibility; this is not an error signal.
            ColorTag::Error,
            vec![
                EmbedField::inline("Tournament", tournament_name),
                EmbedField::inline(
                    "Start Time",
                    time::display_start_time(start_time, issued_at),
                ),
            ],
        ),

        NotificationKind::Match {
            team1_name,
            team2_name,
            match_time,
            map,
        } => {
            let map = map
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_MAP);
            (
                "⚔️ Match Ready".to_string(),
                MATCH_DESCRIPTION.to_string(),
                ColorTag::Success,
                vec![
                    EmbedField::block("Match", format!("{team1_name} vs {team2_name}")),
                    EmbedField::inline("Map", map),
                    EmbedField::inline(
                        "Start Time",
                        time::display_start_time(match_time, issued_at),
                    ),
                ],
            )
        }

        NotificationKind::TeamInvite {
            team_name,
            inviter_name,
        } => (
            "📨 Team Invitation".to_string(),
            format!("**{inviter_name}** invited you to join **{team_name}**"),
            ColorTag::Info,
            vec![
                EmbedField::inline("Team", team_name),
                EmbedField::inline("Invited by", inviter_name),
            ],
        ),

        NotificationKind::Admin {
            title,
            message,
            severity,
        } => (
            title.clone(),
            message.clone(),
            severity.color_tag(),
            vec![],
        ),
    };

    Ok(NotificationPayload {
        title,
        body,
        color_tag,
        fields,
        footer_text: FOOTER_TEXT.to_string(),
        issued_at,
    })
}
