//! Folder lifecycle.

use tracing::info;
use uuid::Uuid;

use crate::model::{Folder, DEFAULT_FOLDER};
use crate::store::Store;

use super::MessagingError;

/// Create a folder.
///
/// The name is trimmed before use. New folders are never protected.
///
/// # Errors
///
/// Returns [`MessagingError::Validation`] if the trimmed name is empty.
pub async fn create_folder(store: &Store, name: &str) -> Result<Folder, MessagingError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MessagingError::validation("folder name must not be empty"));
    }
    let folder = Folder {
        id: Uuid::new_v4().to_string(),
        name: name.to_owned(),
        protected: false,
    };
    let created = store.insert_folder(folder).await;
    info!(folder_id = %created.id, name = %created.name, "folder created");
    Ok(created)
}

/// Delete a folder, reassigning its templates to [`DEFAULT_FOLDER`].
///
/// Templates that referenced the deleted folder are rewritten in the same
/// store transaction, so a reader never observes the folder gone while
/// templates still point at it. No template is deleted as a side effect.
///
/// # Errors
///
/// - [`MessagingError::Store`] if no folder has this id.
/// - [`MessagingError::Validation`] if the folder is protected.
pub async fn delete_folder(store: &Store, id: &str) -> Result<(), MessagingError> {
    let folder = store.get_folder(id).await?;
    if folder.protected {
        return Err(MessagingError::validation(format!(
            "folder '{}' is protected and cannot be deleted",
            folder.name
        )));
    }
    let removed = store.remove_folder_reassigning(id, DEFAULT_FOLDER).await?;
    info!(folder_id = %removed.id, name = %removed.name, "folder deleted");
    Ok(())
}

/// List all folders.
pub async fn list_folders(store: &Store) -> Vec<Folder> {
    store.list_folders().await
}
