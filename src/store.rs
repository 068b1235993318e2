//! In-memory entity store.
//!
//! The [`Store`] owns all four entity collections behind a single
//! [`RwLock`]. It is constructed explicitly and handed to the service
//! functions — never a shared module-level global — so every test gets an
//! isolated instance.
//!
//! Every operation first awaits the configured latency, standing in for a
//! future database or network boundary. Reads hand out clones; a result set
//! returned to a caller is never mutated by a later write. Writers hold the
//! lock for the whole mutation, so multi-step writes (folder deletion with
//! template reassignment) are atomic to readers. Two racing edits to the
//! same entity resolve last-writer-wins; there is no conflict detection and
//! no cancellation.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::RwLock;
use tracing::trace;

use crate::config::StoreConfig;
use crate::model::{Contact, Folder, MessageStatus, ScheduledMessage, Template};

/// Errors returned by the entity store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The entity does not exist — deleted, or the id was never valid.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind: "folder", "template", "contact" or "message".
        entity: &'static str,
        /// The id that failed to resolve.
        id: String,
    },
}

impl StoreError {
    fn not_found(entity: &'static str, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_owned(),
        }
    }
}

/// Fields of a template that [`Store::update_template`] may rewrite.
///
/// `id` and `created_at` are always preserved.
#[derive(Debug, Clone)]
pub struct TemplatePatch {
    /// New title.
    pub title: String,
    /// New content.
    pub content: String,
    /// New folder name.
    pub folder: String,
}

/// Fields of a message that [`Store::update_message`] may rewrite.
///
/// `id`, `status` and `template_id` are always preserved.
#[derive(Debug, Clone)]
pub struct MessagePatch {
    /// New recipient set.
    pub contacts: Vec<Contact>,
    /// New content.
    pub content: String,
    /// New delivery time.
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Collections {
    folders: Vec<Folder>,
    templates: Vec<Template>,
    contacts: Vec<Contact>,
    messages: Vec<ScheduledMessage>,
}

/// In-memory store for folders, templates, contacts and scheduled messages.
///
/// Cheap to clone; clones share the same collections.
#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<Collections>>,
    latency: Duration,
}

impl Store {
    /// Create an empty store with no simulated latency.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that sleeps `latency` before every operation.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Collections::default())),
            latency,
        }
    }

    /// Build a store from configuration: latency from `latency_ms`, demo
    /// fixtures when `seed` is set.
    pub fn from_config(config: &StoreConfig) -> Self {
        let latency = Duration::from_millis(config.latency_ms);
        if config.seed {
            let mut store = Self::seeded();
            store.latency = latency;
            store
        } else {
            Self::with_latency(latency)
        }
    }

    /// Create a store pre-populated with the demo fixture set: three folders
    /// ("Appointment Reminders" protected), four templates, four contacts,
    /// and four scheduled messages with pre-assigned statuses. No delivery
    /// engine drives those statuses; they exist to exercise the timeline.
    pub fn seeded() -> Self {
        let mut data = Collections::default();
        seed(&mut data);
        Self {
            inner: Arc::new(RwLock::new(data)),
            latency: Duration::ZERO,
        }
    }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    // ── Folders ─────────────────────────────────────────────────

    /// List all folders.
    pub async fn list_folders(&self) -> Vec<Folder> {
        self.pause().await;
        self.inner.read().await.folders.clone()
    }

    /// Fetch a folder by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub async fn get_folder(&self, id: &str) -> Result<Folder, StoreError> {
        self.pause().await;
        self.inner
            .read()
            .await
            .folders
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("folder", id))
    }

    /// Append a folder and return a copy of it.
    pub async fn insert_folder(&self, folder: Folder) -> Folder {
        self.pause().await;
        let mut data = self.inner.write().await;
        data.folders.push(folder.clone());
        trace!(folder_id = %folder.id, "folder inserted");
        folder
    }

    /// Remove a folder, rewriting every template that referenced it to
    /// `fallback` under the same write lock. A reader never observes the
    /// folder gone while templates still point at it, nor the reverse.
    ///
    /// Returns the removed folder.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub async fn remove_folder_reassigning(
        &self,
        id: &str,
        fallback: &str,
    ) -> Result<Folder, StoreError> {
        self.pause().await;
        let mut data = self.inner.write().await;
        let pos = data
            .folders
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| StoreError::not_found("folder", id))?;
        let folder = data.folders.remove(pos);
        let mut reassigned = 0_usize;
        for template in &mut data.templates {
            if template.folder == folder.name {
                template.folder = fallback.to_owned();
                reassigned = reassigned.saturating_add(1);
            }
        }
        trace!(folder_id = %folder.id, name = %folder.name, reassigned, "folder removed");
        Ok(folder)
    }

    // ── Templates ───────────────────────────────────────────────

    /// List all templates ordered by `created_at` descending (newest
    /// first). Callers rely on this ordering; it is contractual.
    pub async fn list_templates(&self) -> Vec<Template> {
        self.pause().await;
        let mut templates = self.inner.read().await.templates.clone();
        templates.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        templates
    }

    /// Fetch a template by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub async fn get_template(&self, id: &str) -> Result<Template, StoreError> {
        self.pause().await;
        self.inner
            .read()
            .await
            .templates
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("template", id))
    }

    /// Append a template and return a copy of it.
    pub async fn insert_template(&self, template: Template) -> Template {
        self.pause().await;
        let mut data = self.inner.write().await;
        data.templates.push(template.clone());
        trace!(template_id = %template.id, "template inserted");
        template
    }

    /// Merge a patch into an existing template, preserving `id` and
    /// `created_at`. Returns the post-mutation record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub async fn update_template(
        &self,
        id: &str,
        patch: TemplatePatch,
    ) -> Result<Template, StoreError> {
        self.pause().await;
        let mut data = self.inner.write().await;
        let template = data
            .templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::not_found("template", id))?;
        template.title = patch.title;
        template.content = patch.content;
        template.folder = patch.folder;
        trace!(template_id = %id, "template updated");
        Ok(template.clone())
    }

    /// Remove a template.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub async fn remove_template(&self, id: &str) -> Result<(), StoreError> {
        self.pause().await;
        let mut data = self.inner.write().await;
        let pos = data
            .templates
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::not_found("template", id))?;
        data.templates.remove(pos);
        trace!(template_id = %id, "template removed");
        Ok(())
    }

    // ── Contacts ────────────────────────────────────────────────

    /// List all contacts.
    pub async fn list_contacts(&self) -> Vec<Contact> {
        self.pause().await;
        self.inner.read().await.contacts.clone()
    }

    /// Fetch a contact by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub async fn get_contact(&self, id: &str) -> Result<Contact, StoreError> {
        self.pause().await;
        self.inner
            .read()
            .await
            .contacts
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("contact", id))
    }

    /// Append a contact and return a copy of it. Contacts are reference
    /// data; there is no update or delete.
    pub async fn insert_contact(&self, contact: Contact) -> Contact {
        self.pause().await;
        let mut data = self.inner.write().await;
        data.contacts.push(contact.clone());
        contact
    }

    // ── Scheduled messages ──────────────────────────────────────

    /// List all messages ordered by `scheduled_at` ascending.
    pub async fn list_messages(&self) -> Vec<ScheduledMessage> {
        self.pause().await;
        let mut messages = self.inner.read().await.messages.clone();
        messages.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at));
        messages
    }

    /// Fetch a message by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub async fn get_message(&self, id: &str) -> Result<ScheduledMessage, StoreError> {
        self.pause().await;
        self.inner
            .read()
            .await
            .messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("message", id))
    }

    /// Append a message and return a copy of it.
    pub async fn insert_message(&self, message: ScheduledMessage) -> ScheduledMessage {
        self.pause().await;
        let mut data = self.inner.write().await;
        data.messages.push(message.clone());
        trace!(message_id = %message.id, "message inserted");
        message
    }

    /// Merge a patch into an existing message, preserving `id`, `status`
    /// and `template_id`. Returns the post-mutation record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub async fn update_message(
        &self,
        id: &str,
        patch: MessagePatch,
    ) -> Result<ScheduledMessage, StoreError> {
        self.pause().await;
        let mut data = self.inner.write().await;
        let message = data
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| StoreError::not_found("message", id))?;
        message.contacts = patch.contacts;
        message.content = patch.content;
        message.scheduled_at = patch.scheduled_at;
        trace!(message_id = %id, "message updated");
        Ok(message.clone())
    }

    /// Overwrite a message's lifecycle status. Returns the post-mutation
    /// record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub async fn set_message_status(
        &self,
        id: &str,
        status: MessageStatus,
    ) -> Result<ScheduledMessage, StoreError> {
        self.pause().await;
        let mut data = self.inner.write().await;
        let message = data
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| StoreError::not_found("message", id))?;
        message.status = status;
        trace!(message_id = %id, status = status.as_str(), "message status set");
        Ok(message.clone())
    }

    /// Remove a message. Allowed at any status.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is unknown.
    pub async fn remove_message(&self, id: &str) -> Result<(), StoreError> {
        self.pause().await;
        let mut data = self.inner.write().await;
        let pos = data
            .messages
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| StoreError::not_found("message", id))?;
        data.messages.remove(pos);
        trace!(message_id = %id, "message removed");
        Ok(())
    }
}

// ── Seed fixtures ───────────────────────────────────────────────

fn fixed(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn days_from_now(days: i64) -> DateTime<Utc> {
    Utc::now()
        .checked_add_signed(chrono::Duration::days(days))
        .unwrap_or_else(Utc::now)
}

fn seed(data: &mut Collections) {
    data.folders = vec![
        Folder {
            id: "folder-marketing".to_owned(),
            name: "Marketing".to_owned(),
            protected: false,
        },
        Folder {
            id: "folder-appointments".to_owned(),
            name: "Appointment Reminders".to_owned(),
            protected: true,
        },
        Folder {
            id: "folder-general".to_owned(),
            name: crate::model::DEFAULT_FOLDER.to_owned(),
            protected: false,
        },
    ];

    data.templates = vec![
        Template {
            id: "template-welcome".to_owned(),
            title: "Welcome Message".to_owned(),
            content: "Hi {{client_name}}, welcome to our service! We are excited to have \
                      you on board. Let us know if you have any questions."
                .to_owned(),
            created_at: fixed(2023, 10, 26, 10, 0),
            folder: crate::model::DEFAULT_FOLDER.to_owned(),
        },
        Template {
            id: "template-reminder".to_owned(),
            title: "Appointment Reminder".to_owned(),
            content: "Hi {{client_name}}, this is a reminder for your appointment tomorrow \
                      at '{{appointment_time}}'. We look forward to seeing you!"
                .to_owned(),
            created_at: fixed(2023, 10, 25, 15, 30),
            folder: "Appointment Reminders".to_owned(),
        },
        Template {
            id: "template-promo".to_owned(),
            title: "Promotional Offer".to_owned(),
            content: "Hi {{client_name}}, we have a special offer for you! Get 20% off on \
                      your next purchase with the code PROMO20. Don't miss out!"
                .to_owned(),
            created_at: fixed(2023, 10, 24, 11, 0),
            folder: "Marketing".to_owned(),
        },
        Template {
            id: "template-followup".to_owned(),
            title: "Follow-up".to_owned(),
            content: "Hi {{client_name}}, just following up on our last conversation. Let \
                      me know if you need anything else."
                .to_owned(),
            created_at: fixed(2023, 10, 23, 11, 0),
            folder: crate::model::DEFAULT_FOLDER.to_owned(),
        },
    ];

    let contact = |id: &str, name: &str, email: &str| Contact {
        id: id.to_owned(),
        name: name.to_owned(),
        email: email.to_owned(),
        avatar_url: "https://placehold.co/40x40.png".to_owned(),
    };
    data.contacts = vec![
        contact("contact-alice", "Alice Johnson", "alice@example.com"),
        contact("contact-bob", "Bob Williams", "bob@example.com"),
        contact("contact-charlie", "Charlie Brown", "charlie@example.com"),
        contact("contact-diana", "Diana Prince", "diana@example.com"),
    ];

    data.messages = vec![
        ScheduledMessage {
            id: "message-1".to_owned(),
            contacts: vec![data.contacts[0].clone()],
            content: "Hi Alice, just a reminder about our meeting tomorrow at 10 AM. See \
                      you then!"
                .to_owned(),
            scheduled_at: days_from_now(1),
            status: MessageStatus::Scheduled,
            template_id: None,
        },
        ScheduledMessage {
            id: "message-2".to_owned(),
            contacts: vec![data.contacts[1].clone()],
            content: "Hey Bob, did you get a chance to look at the proposal? Let me know \
                      your thoughts."
                .to_owned(),
            scheduled_at: days_from_now(2),
            status: MessageStatus::Scheduled,
            template_id: Some("template-reminder".to_owned()),
        },
        ScheduledMessage {
            id: "message-3".to_owned(),
            contacts: vec![data.contacts[0].clone()],
            content: "Welcome aboard, Alice! We are thrilled to have you.".to_owned(),
            scheduled_at: days_from_now(-1),
            status: MessageStatus::Sent,
            template_id: Some("template-welcome".to_owned()),
        },
        ScheduledMessage {
            id: "message-4".to_owned(),
            contacts: vec![
                data.contacts[0].clone(),
                data.contacts[1].clone(),
                data.contacts[2].clone(),
            ],
            content: "Hi team, project update meeting is scheduled for Friday. Please \
                      confirm your availability."
                .to_owned(),
            scheduled_at: days_from_now(3),
            status: MessageStatus::Scheduled,
            template_id: None,
        },
    ];
}
