//! Notification kinds for tournament platform events.

use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

/// Severity levels for admin notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational - normal operations
    #[default]
    Info,
    /// Warning - something needs attention
    Warning,
    /// Error - something went wrong
    Error,
    /// Success - an operation completed
    Success,
}

impl Severity {
    /// Get the embed color tag for this severity.
    #[must_use]
    pub const fn color_tag(self) -> ColorTag {
        match self {
            Self::Info => ColorTag::Info,
            Self::Warning => ColorTag::Warning,
            Self::Error => ColorTag::Error,
            Self::Success => ColorTag::Success,
        }
    }

    /// Get display name for this severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Success => "Success",
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = NotifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "success" => Ok(Self::Success),
            other => Err(NotifyError::InvalidParameters(format!(
                "unknown severity '{other}'"
            ))),
        }
    }
}

/// Accent color of a notification embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTag {
    Info,
    Warning,
    Error,
    Success,
    Custom(u32),
}

impl ColorTag {
    /// Get the Discord embed color value.
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            Self::Info => 0x0034_98db,    // Blue
            Self::Warning => 0x00f3_9c12, // Orange
            Self::Error => 0x00e7_4c3c,   // Red
            Self::Success => 0x002e_cc71, // Green
            Self::Custom(rgb) => rgb,
        }
    }
}

/// A notification kind together with its parameters.
///
/// The JSON form is tagged by `type` with camelCase field names, e.g.
/// `{"type": "match", "team1Name": "A", "team2Name": "B", "matchTime": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NotificationKind {
    /// Tournament announcement or reminder
    Tournament {
        tournament_name: String,
        start_time: String,
        message: String,
    },

    /// A scheduled match between two teams
    Match {
        team1_name: String,
        team2_name: String,
        match_time: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        map: Option<String>,
    },

    /// Invitation to join a team (single recipient)
    TeamInvite {
        team_name: String,
        inviter_name: String,
    },

    /// Free-form message from platform administrators
    Admin {
        title: String,
        message: String,
        #[serde(default)]
        severity: Severity,
    },
}

impl NotificationKind {
    /// Parse a kind and its parameters from loosely-typed JSON.
    ///
    /// # Errors
    /// Returns [`NotifyError::InvalidParameters`] when the kind is unknown or
    /// a required parameter is missing or has the wrong type.
    pub fn from_json(value: serde_json::Value) -> Result<Self, NotifyError> {
        serde_json::from_value(value).map_err(|e| NotifyError::InvalidParameters(e.to_string()))
    }

    /// Short machine name of this kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Tournament { .. } => "tournament",
            Self::Match { .. } => "match",
            Self::TeamInvite { .. } => "teamInvite",
            Self::Admin { .. } => "admin",
        }
    }

    /// Required string parameters, by their wire name.
    pub(crate) fn required_params(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::Tournament {
                tournament_name,
                start_time,
                message,
            } => vec![
                ("tournamentName", tournament_name.as_str()),
                ("startTime", start_time.as_str()),
                ("message", message.as_str()),
            ],
            Self::Match {
                team1_name,
                team2_name,
                match_time,
                ..
            } => vec![
                ("team1Name", team1_name.as_str()),
                ("team2Name", team2_name.as_str()),
                ("matchTime", match_time.as_str()),
            ],
            Self::TeamInvite {
                team_name,
                inviter_name,
            } => vec![
                ("teamName", team_name.as_str()),
                ("inviterName", inviter_name.as_str()),
            ],
            Self::Admin { title, message, .. } => {
                vec![("title", title.as_str()), ("message", message.as_str())]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_severity_colors() {
        assert_eq!(Severity::Info.color_tag().value(), 0x0034_98db);
        assert_eq!(Severity::Warning.color_tag().value(), 0x00f3_9c12);
        assert_eq!(Severity::Error.color_tag().value(), 0x00e7_4c3c);
        assert_eq!(Severity::Success.color_tag().value(), 0x002e_cc71);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!("WARNING".parse::<Severity>().unwrap(), Severity::Warning);
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn test_kind_from_json() {
        let kind = NotificationKind::from_json(json!({
            "type": "match",
            "team1Name": "Red",
            "team2Name": "Blue",
            "matchTime": "2024-01-15T18:30:00Z"
        }))
        .unwrap();

        assert_eq!(
            kind,
            NotificationKind::Match {
                team1_name: "Red".to_string(),
                team2_name: "Blue".to_string(),
                match_time: "2024-01-15T18:30:00Z".to_string(),
                map: None,
            }
        );
        assert_eq!(kind.name(), "match");
    }

    #[test]
    fn test_admin_severity_defaults_to_info() {
        let kind = NotificationKind::from_json(json!({
            "type": "admin",
            "title": "Maintenance",
            "message": "Back soon"
        }))
        .unwrap();

        assert!(matches!(
            kind,
            NotificationKind::Admin {
                severity: Severity::Info,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_param_is_invalid() {
        let err = NotificationKind::from_json(json!({
            "type": "teamInvite",
            "teamName": "Owls"
        }))
        .unwrap_err();
        assert!(matches!(err, NotifyError::InvalidParameters(_)));
    }
}
