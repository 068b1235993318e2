//! Tests for the template repository.

use sendcue::messaging::templates::{self, TemplateDraft};
use sendcue::messaging::MessagingError;
use sendcue::store::Store;

fn draft(title: &str, content: &str, folder: &str) -> TemplateDraft {
    TemplateDraft {
        title: title.to_owned(),
        content: content.to_owned(),
        folder: folder.to_owned(),
    }
}

#[test]
fn validate_draft_enforces_field_minimums() {
    let ok = draft("Promo", "ten chars at least", "Marketing");
    assert!(templates::validate_draft(&ok).is_ok());

    let short_title = draft("Pr", "ten chars at least", "Marketing");
    assert!(matches!(
        templates::validate_draft(&short_title),
        Err(MessagingError::Validation(_))
    ));

    let short_content = draft("Promo", "too short", "Marketing");
    assert!(matches!(
        templates::validate_draft(&short_content),
        Err(MessagingError::Validation(_))
    ));

    let no_folder = draft("Promo", "ten chars at least", "  ");
    assert!(matches!(
        templates::validate_draft(&no_folder),
        Err(MessagingError::Validation(_))
    ));
}

#[tokio::test]
async fn save_without_id_creates_with_fresh_id_and_timestamp() {
    let store = Store::new();
    let before = chrono::Utc::now();
    let created = templates::save_template(
        &store,
        draft("Promo", "10+ chars here for sure", "Sales"),
        None,
    )
    .await
    .expect("save");

    assert!(!created.id.is_empty());
    assert!(created.created_at >= before);
    assert_eq!(created.folder, "Sales");
    assert_eq!(templates::list_templates(&store, None).await.len(), 1);
}

#[tokio::test]
async fn save_with_id_merges_preserving_id_and_created_at() {
    let store = Store::new();
    let original = templates::save_template(
        &store,
        draft("Promo", "the original body text", "Sales"),
        None,
    )
    .await
    .expect("save");

    let updated = templates::save_template(
        &store,
        draft("Promo v2", "the replacement body text", "Marketing"),
        Some(&original.id),
    )
    .await
    .expect("update");

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.title, "Promo v2");
    assert_eq!(updated.content, "the replacement body text");
    assert_eq!(updated.folder, "Marketing");
    assert_eq!(templates::list_templates(&store, None).await.len(), 1);
}

#[tokio::test]
async fn save_with_unknown_id_fails_not_found() {
    let store = Store::new();
    let result = templates::save_template(
        &store,
        draft("Promo", "ten chars at least", "Sales"),
        Some("missing"),
    )
    .await;
    assert!(matches!(result, Err(MessagingError::Store(_))));
}

#[tokio::test]
async fn save_rejects_invalid_draft_before_touching_the_store() {
    let store = Store::new();
    let result =
        templates::save_template(&store, draft("Pr", "ten chars at least", "Sales"), None).await;
    assert!(matches!(result, Err(MessagingError::Validation(_))));
    assert!(templates::list_templates(&store, None).await.is_empty());
}

#[tokio::test]
async fn delete_template_fails_not_found_on_unknown_id() {
    let store = Store::new();
    let result = templates::delete_template(&store, "missing").await;
    assert!(matches!(result, Err(MessagingError::Store(_))));
}

#[tokio::test]
async fn list_templates_filters_by_folder_name() {
    let store = Store::seeded();
    let marketing = templates::list_templates(&store, Some("Marketing")).await;
    assert_eq!(marketing.len(), 1);
    assert_eq!(marketing[0].title, "Promotional Offer");

    let none = templates::list_templates(&store, Some("Nowhere")).await;
    assert!(none.is_empty());
}

#[test]
fn placeholders_extracts_unique_tokens_in_order() {
    let content =
        "Hi {{client_name}}, your appointment is at {{ appointment_time }}. See you, {{client_name}}!";
    assert_eq!(
        templates::placeholders(content),
        vec!["client_name".to_owned(), "appointment_time".to_owned()]
    );

    assert!(templates::placeholders("no tokens here").is_empty());
    assert!(templates::placeholders("half open {{oops").is_empty());
}
