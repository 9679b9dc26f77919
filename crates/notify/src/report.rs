//! Per-recipient outcomes and their aggregate report.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque external user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipientId(String);

impl RecipientId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecipientId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecipientId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Build a recipient set from anything string-like. Order and duplicates are kept.
pub fn recipients<I, S>(ids: I) -> Vec<RecipientId>
where
    I: IntoIterator<Item = S>,
    S: Into<RecipientId>,
{
    ids.into_iter().map(Into::into).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Success,
    Failed,
}

/// Result of delivering to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub recipient_id: RecipientId,
    pub status: DeliveryStatus,
    pub message_id: Option<String>,
    pub error_detail: Option<String>,
}

impl DeliveryOutcome {
    #[must_use]
    pub fn delivered(recipient_id: RecipientId, message_id: impl Into<String>) -> Self {
        Self {
            recipient_id,
            status: DeliveryStatus::Success,
            message_id: Some(message_id.into()),
            error_detail: None,
        }
    }

    #[must_use]
    pub fn failed(recipient_id: RecipientId, error_detail: impl Into<String>) -> Self {
        Self {
            recipient_id,
            status: DeliveryStatus::Failed,
            message_id: None,
            error_detail: Some(error_detail.into()),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == DeliveryStatus::Success
    }
}

/// Outcomes of one dispatch call, in the order recipients were processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    outcomes: Vec<DeliveryOutcome>,
}

impl DeliveryReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one outcome.
    pub fn record(&mut self, outcome: DeliveryOutcome) {
        self.outcomes.push(outcome);
    }

    #[must_use]
    pub fn outcomes(&self) -> &[DeliveryOutcome] {
        &self.outcomes
    }

    /// Recipients that received the message.
    pub fn successes(&self) -> impl Iterator<Item = &RecipientId> {
        self.outcomes
            .iter()
            .filter(|o| o.is_success())
            .map(|o| &o.recipient_id)
    }

    /// Recipients that did not.
    pub fn failures(&self) -> impl Iterator<Item = &RecipientId> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_success())
            .map(|o| &o.recipient_id)
    }

    #[must_use]
    pub fn successful_count(&self) -> usize {
        self.successes().count()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.total_count() - self.successful_count()
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.outcomes.len()
    }

    /// Bot-facing view: ids split by outcome.
    #[must_use]
    pub fn summary(&self) -> RecipientSummary {
        RecipientSummary {
            success: self.successes().cloned().collect(),
            failed: self.failures().cloned().collect(),
        }
    }

    /// HTTP-facing view: one entry per recipient with provider detail.
    #[must_use]
    pub fn results(&self) -> Vec<RecipientResult> {
        self.outcomes
            .iter()
            .map(|o| RecipientResult {
                user_id: o.recipient_id.clone(),
                success: o.is_success(),
                message_id: o.message_id.clone(),
                error: o.error_detail.clone(),
            })
            .collect()
    }
}

impl FromIterator<DeliveryOutcome> for DeliveryReport {
    fn from_iter<I: IntoIterator<Item = DeliveryOutcome>>(iter: I) -> Self {
        Self {
            outcomes: iter.into_iter().collect(),
        }
    }
}

/// Recipients split into delivered and failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientSummary {
    pub success: Vec<RecipientId>,
    pub failed: Vec<RecipientId>,
}

/// One recipient's entry in an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientResult {
    pub user_id: RecipientId,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
