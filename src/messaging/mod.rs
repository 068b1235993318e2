//! Services over the entity store: folder lifecycle, the template
//! repository, the scheduling resolver and the delivery timeline.
//!
//! Every service takes the [`crate::store::Store`] (and, for enrichment,
//! a [`crate::enrich::ContentEnricher`]) as an explicit argument — there is
//! no ambient shared state.

pub mod folders;
pub mod scheduler;
pub mod templates;
pub mod timeline;

use crate::enrich::EnrichError;
use crate::store::StoreError;

/// Errors surfaced by the messaging services.
///
/// All variants are per-operation and recoverable, never fatal to the
/// process: validation failures are corrected by the caller and resubmitted;
/// not-found failures mean the caller's view is stale and should be
/// refreshed; enrichment failures leave the original content untouched so
/// the caller may retry manually. Nothing is retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    /// Input failed validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The store could not resolve an id.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The enrichment gateway failed.
    #[error("enrichment failed: {0}")]
    Enrichment(#[from] EnrichError),
}

impl MessagingError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
