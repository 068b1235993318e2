//! Domain types shared by the store and the messaging services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the fallback folder. Templates whose folder is deleted are
/// reassigned here rather than orphaned or deleted.
pub const DEFAULT_FOLDER: &str = "General";

/// A named grouping of templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique identifier.
    pub id: String,
    /// Display name. Templates reference folders by this name, not by id.
    pub name: String,
    /// Protected folders cannot be deleted.
    pub protected: bool,
}

/// A reusable message template.
///
/// Content may carry `{{placeholder}}` tokens. The engine never interpolates
/// them; [`crate::messaging::templates::placeholders`] extracts the names
/// for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Unique identifier.
    pub id: String,
    /// Short title shown in listings.
    pub title: String,
    /// Message body.
    pub content: String,
    /// Creation time. Listings are ordered by this field, newest first.
    pub created_at: DateTime<Utc>,
    /// Name of the folder this template belongs to.
    pub folder: String,
}

/// A message recipient. Immutable reference data in this engine: contacts
/// are seeded or inserted directly, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Avatar image URL.
    pub avatar_url: String,
}

/// Delivery lifecycle state of a scheduled message.
///
/// Messages start as [`Scheduled`](Self::Scheduled). The engine never
/// advances the state itself; an external delivery worker reports the
/// outcome via [`crate::messaging::timeline::update_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    /// Queued and awaiting delivery.
    Scheduled,
    /// Delivered successfully.
    Sent,
    /// Delivery failed.
    Failed,
}

impl MessageStatus {
    /// Returns the lowercase wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

impl std::str::FromStr for MessageStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "sent" => Ok(Self::Sent),
            "failed" => Ok(Self::Failed),
            other => Err(ParseStatusError(other.to_owned())),
        }
    }
}

impl std::fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised status string.
#[derive(Debug, thiserror::Error)]
#[error("unknown message status: {0}")]
pub struct ParseStatusError(pub String);

/// A message queued for future delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledMessage {
    /// Unique identifier.
    pub id: String,
    /// Recipients. Never empty for messages created through the scheduler.
    pub contacts: Vec<Contact>,
    /// Message body.
    pub content: String,
    /// Absolute delivery time (UTC), seconds and sub-seconds zeroed by the
    /// scheduling resolver.
    pub scheduled_at: DateTime<Utc>,
    /// Current lifecycle state.
    pub status: MessageStatus,
    /// Provenance: the template this message was composed from, if any.
    /// Not referentially enforced — the template may have been deleted
    /// since, in which case the reference goes stale on purpose.
    pub template_id: Option<String>,
}
