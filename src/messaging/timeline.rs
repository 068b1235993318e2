//! Delivery timeline: upcoming/sent views, search, status transitions and
//! relative-time labels.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::model::{MessageStatus, ScheduledMessage};
use crate::store::Store;

use super::MessagingError;

/// The two delivery views of the message collection.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    /// Messages still awaiting delivery, soonest first.
    pub upcoming: Vec<ScheduledMessage>,
    /// Delivered messages, most recent first.
    pub sent: Vec<ScheduledMessage>,
}

/// Case-insensitive substring match against a message's recipients and
/// content: any contact name, any contact email, or the body.
pub fn matches_query(message: &ScheduledMessage, query: &str) -> bool {
    let query = query.to_lowercase();
    if message.content.to_lowercase().contains(&query) {
        return true;
    }
    message.contacts.iter().any(|contact| {
        contact.name.to_lowercase().contains(&query)
            || contact.email.to_lowercase().contains(&query)
    })
}

/// Build the delivery timeline, optionally filtered by a search query.
///
/// Filtering is applied before the upcoming/sent split. The two views use
/// different orderings on purpose: upcoming is soonest-first because it is
/// actionable, sent is most-recent-first because it is a log. Failed
/// messages appear in neither view.
pub async fn timeline(store: &Store, query: Option<&str>) -> Timeline {
    let mut messages = store.list_messages().await;
    if let Some(query) = query {
        let query = query.trim();
        if !query.is_empty() {
            messages.retain(|m| matches_query(m, query));
        }
    }

    let mut upcoming = Vec::new();
    let mut sent = Vec::new();
    for message in messages {
        match message.status {
            MessageStatus::Scheduled => upcoming.push(message),
            MessageStatus::Sent => sent.push(message),
            MessageStatus::Failed => {}
        }
    }
    // list_messages is ascending; the sent log reads newest-first.
    sent.reverse();
    Timeline { upcoming, sent }
}

/// Record a delivery outcome for a message.
///
/// The engine never drives this transition itself; an external delivery
/// worker reports `sent` or `failed` here. Returns the updated message.
///
/// # Errors
///
/// Returns [`MessagingError::Store`] if the id is unknown.
pub async fn update_status(
    store: &Store,
    id: &str,
    status: MessageStatus,
) -> Result<ScheduledMessage, MessagingError> {
    let updated = store.set_message_status(id, status).await?;
    info!(message_id = %id, status = status.as_str(), "message status updated");
    Ok(updated)
}

/// Humanized distance between a delivery time and `now`.
///
/// Future times read `"in 2 days"`, past times `"3 hours ago"`; anything
/// under a minute in either direction is `"less than a minute"` with the
/// matching prefix or suffix.
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = at.signed_duration_since(now);
    let future = delta >= chrono::Duration::zero();
    let minutes = delta.num_minutes().abs();

    let phrase = if minutes < 1 {
        "less than a minute".to_owned()
    } else if minutes < 60 {
        plural(minutes, "minute")
    } else if minutes < 1_440 {
        plural(delta.num_hours().abs(), "hour")
    } else {
        plural(delta.num_days().abs(), "day")
    };

    if future {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}
