//! Template repository: validation, create/update, listing, placeholder
//! inspection and the enrichment pass-through.

use std::time::Duration;

use chrono::Utc;
use regex::Regex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::enrich::{enrich_with_timeout, ContentEnricher};
use crate::model::Template;
use crate::store::{Store, TemplatePatch};

use super::MessagingError;

/// Minimum title length accepted by [`validate_draft`].
pub const MIN_TITLE_CHARS: usize = 3;

/// Minimum content length accepted by [`validate_draft`] and the scheduler.
pub const MIN_CONTENT_CHARS: usize = 10;

/// User-supplied fields of a template, before validation.
#[derive(Debug, Clone)]
pub struct TemplateDraft {
    /// Template title.
    pub title: String,
    /// Message body; may contain `{{placeholder}}` tokens.
    pub content: String,
    /// Name of the folder the template belongs to.
    pub folder: String,
}

/// Validate a draft: title at least 3 characters, content at least 10,
/// folder non-empty.
///
/// # Errors
///
/// Returns [`MessagingError::Validation`] naming the first failing field.
pub fn validate_draft(draft: &TemplateDraft) -> Result<(), MessagingError> {
    if draft.title.chars().count() < MIN_TITLE_CHARS {
        return Err(MessagingError::validation(
            "title must be at least 3 characters long",
        ));
    }
    if draft.content.chars().count() < MIN_CONTENT_CHARS {
        return Err(MessagingError::validation(
            "content must be at least 10 characters long",
        ));
    }
    if draft.folder.trim().is_empty() {
        return Err(MessagingError::validation("a folder must be selected"));
    }
    Ok(())
}

/// Create a template, or update an existing one when `id` is given.
///
/// Updates merge the draft into the existing record, preserving `id` and
/// `created_at`. Creates assign a fresh id and stamp `created_at` with the
/// current time.
///
/// # Errors
///
/// - [`MessagingError::Validation`] if the draft fails [`validate_draft`].
/// - [`MessagingError::Store`] if `id` is given but unknown.
pub async fn save_template(
    store: &Store,
    draft: TemplateDraft,
    id: Option<&str>,
) -> Result<Template, MessagingError> {
    validate_draft(&draft)?;
    match id {
        Some(id) => {
            let updated = store
                .update_template(
                    id,
                    TemplatePatch {
                        title: draft.title,
                        content: draft.content,
                        folder: draft.folder,
                    },
                )
                .await?;
            debug!(template_id = %updated.id, "template updated");
            Ok(updated)
        }
        None => {
            let template = Template {
                id: Uuid::new_v4().to_string(),
                title: draft.title,
                content: draft.content,
                created_at: Utc::now(),
                folder: draft.folder,
            };
            let created = store.insert_template(template).await;
            info!(template_id = %created.id, folder = %created.folder, "template created");
            Ok(created)
        }
    }
}

/// Delete a template.
///
/// Scheduled messages composed from it keep their now-stale `template_id`;
/// the reference is provenance, not a foreign key.
///
/// # Errors
///
/// Returns [`MessagingError::Store`] if the id is unknown.
pub async fn delete_template(store: &Store, id: &str) -> Result<(), MessagingError> {
    store.remove_template(id).await?;
    info!(template_id = %id, "template deleted");
    Ok(())
}

/// List templates, newest first, optionally restricted to one folder name.
pub async fn list_templates(store: &Store, folder: Option<&str>) -> Vec<Template> {
    let mut templates = store.list_templates().await;
    if let Some(folder) = folder {
        templates.retain(|t| t.folder == folder);
    }
    templates
}

/// Fetch a template by id.
///
/// # Errors
///
/// Returns [`MessagingError::Store`] if the id is unknown.
pub async fn get_template(store: &Store, id: &str) -> Result<Template, MessagingError> {
    Ok(store.get_template(id).await?)
}

/// Extract the `{{placeholder}}` token names carried by template content,
/// in order of first appearance, without duplicates. The engine never
/// interpolates these; they are display hints for composing callers.
pub fn placeholders(content: &str) -> Vec<String> {
    let mut names = Vec::new();
    if let Ok(re) = Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}") {
        for captures in re.captures_iter(content) {
            if let Some(m) = captures.get(1) {
                let name = m.as_str().to_owned();
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
    }
    names
}

/// Run template content through the enrichment gateway.
///
/// A pure pass-through: on failure the caller's content is untouched and the
/// error is surfaced. The service never retries; retry policy belongs to the
/// caller.
///
/// # Errors
///
/// - [`MessagingError::Validation`] if `content` is blank.
/// - [`MessagingError::Enrichment`] on gateway failure or timeout.
pub async fn enrich_content(
    enricher: &dyn ContentEnricher,
    content: &str,
    timeout: Duration,
) -> Result<String, MessagingError> {
    if content.trim().is_empty() {
        return Err(MessagingError::validation("nothing to enrich"));
    }
    let enriched = enrich_with_timeout(enricher, content, timeout).await?;
    debug!(model = enricher.model_id(), "content enriched");
    Ok(enriched)
}
