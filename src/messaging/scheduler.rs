//! Scheduling resolver: turns a calendar date plus an `"HH:MM"` string into
//! a validated [`ScheduledMessage`].
//!
//! Validation deliberately checks only the calendar date against today, not
//! the combined date and time against the current instant — a message for
//! today at a time already past is accepted. That matches the product's
//! date-picker behavior and is covered by an explicit test.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use regex::Regex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::model::{Contact, MessageStatus, ScheduledMessage};
use crate::store::{MessagePatch, Store};

use super::templates::MIN_CONTENT_CHARS;
use super::MessagingError;

/// 24-hour zero-padded time-of-day pattern: `"09:00"` yes, `"9:00"` no.
const TIME_PATTERN: &str = r"^([01]\d|2[0-3]):([0-5]\d)$";

/// Input to [`schedule_message`] and [`reschedule_message`].
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    /// Recipient contact ids. Must be non-empty.
    pub contact_ids: Vec<String>,
    /// Message body.
    pub content: String,
    /// Delivery calendar date.
    pub date: NaiveDate,
    /// Delivery time of day, `"HH:MM"` 24-hour zero-padded.
    pub time: String,
    /// Template the message was composed from, if any. Ignored on edits.
    pub template_id: Option<String>,
}

/// Parse an `"HH:MM"` time-of-day string.
///
/// # Errors
///
/// Returns [`MessagingError::Validation`] unless the string is 24-hour
/// zero-padded (`"25:00"`, `"9:00"` and `"09:60"` are all rejected).
pub fn parse_time(time: &str) -> Result<NaiveTime, MessagingError> {
    let valid = Regex::new(TIME_PATTERN)
        .map(|re| re.is_match(time))
        .unwrap_or(false);
    if !valid {
        return Err(MessagingError::validation("invalid time format (HH:MM)"));
    }
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| MessagingError::validation("invalid time format (HH:MM)"))
}

/// Resolve the absolute delivery timestamp for a date and time-of-day.
///
/// The calendar date must not be before `today`; the time-of-day is not
/// checked against the current instant. Seconds and sub-seconds are zeroed.
///
/// # Errors
///
/// Returns [`MessagingError::Validation`] when `date < today`.
pub fn resolve_send_at(
    date: NaiveDate,
    time: NaiveTime,
    today: NaiveDate,
) -> Result<DateTime<Utc>, MessagingError> {
    if date < today {
        return Err(MessagingError::validation(
            "scheduled date must not be in the past",
        ));
    }
    Ok(Utc.from_utc_datetime(&date.and_time(time)))
}

/// Validate a request and resolve its recipients and delivery time.
///
/// Validation order: recipients non-empty, content length, time format,
/// date not in the past, then contact resolution. An unresolvable contact
/// id is a data-integrity violation and fails the whole request rather
/// than silently dropping the recipient.
async fn resolve_request(
    store: &Store,
    request: &ScheduleRequest,
) -> Result<(Vec<Contact>, DateTime<Utc>), MessagingError> {
    if request.contact_ids.is_empty() {
        return Err(MessagingError::validation("select at least one contact"));
    }
    if request.content.chars().count() < MIN_CONTENT_CHARS {
        return Err(MessagingError::validation(
            "content must be at least 10 characters long",
        ));
    }
    let time = parse_time(&request.time)?;
    let scheduled_at = resolve_send_at(request.date, time, Utc::now().date_naive())?;

    let mut contacts = Vec::with_capacity(request.contact_ids.len());
    for id in &request.contact_ids {
        let contact = store
            .get_contact(id)
            .await
            .map_err(|_| MessagingError::validation(format!("unknown contact: {id}")))?;
        contacts.push(contact);
    }
    Ok((contacts, scheduled_at))
}

/// Validate a request and persist a new message in the scheduled state.
///
/// # Errors
///
/// Returns [`MessagingError::Validation`] for empty recipients, short
/// content, a malformed time, a past date, or an unresolvable contact id.
pub async fn schedule_message(
    store: &Store,
    request: ScheduleRequest,
) -> Result<ScheduledMessage, MessagingError> {
    let (contacts, scheduled_at) = resolve_request(store, &request).await?;
    let message = ScheduledMessage {
        id: Uuid::new_v4().to_string(),
        contacts,
        content: request.content,
        scheduled_at,
        status: MessageStatus::Scheduled,
        template_id: request.template_id,
    };
    let created = store.insert_message(message).await;
    info!(
        message_id = %created.id,
        scheduled_at = %created.scheduled_at,
        recipients = created.contacts.len(),
        "message scheduled"
    );
    Ok(created)
}

/// Re-validate a request and overwrite an existing message's content,
/// recipients and delivery time in place.
///
/// `id`, `status` and `template_id` are preserved; the request's
/// `template_id` is ignored. Only messages still in the scheduled state may
/// be edited.
///
/// # Errors
///
/// - [`MessagingError::Store`] if the id is unknown.
/// - [`MessagingError::Validation`] if the message is no longer scheduled,
///   or for any of the [`schedule_message`] validation failures.
pub async fn reschedule_message(
    store: &Store,
    id: &str,
    request: ScheduleRequest,
) -> Result<ScheduledMessage, MessagingError> {
    let existing = store.get_message(id).await?;
    if existing.status != MessageStatus::Scheduled {
        return Err(MessagingError::validation(format!(
            "only scheduled messages can be edited (status is '{}')",
            existing.status
        )));
    }
    let (contacts, scheduled_at) = resolve_request(store, &request).await?;
    let updated = store
        .update_message(
            id,
            MessagePatch {
                contacts,
                content: request.content,
                scheduled_at,
            },
        )
        .await?;
    debug!(message_id = %id, scheduled_at = %updated.scheduled_at, "message rescheduled");
    Ok(updated)
}

/// Delete a message. Allowed at any status.
///
/// # Errors
///
/// Returns [`MessagingError::Store`] if the id is unknown.
pub async fn delete_message(store: &Store, id: &str) -> Result<(), MessagingError> {
    store.remove_message(id).await?;
    info!(message_id = %id, "scheduled message deleted");
    Ok(())
}
