//! Tests for the in-memory entity store.

use std::time::Duration;

use chrono::Utc;
use sendcue::config::StoreConfig;
use sendcue::model::{Contact, MessageStatus, ScheduledMessage, Template};
use sendcue::store::{MessagePatch, Store, StoreError, TemplatePatch};

fn template(id: &str, title: &str, created_at: chrono::DateTime<chrono::Utc>) -> Template {
    Template {
        id: id.to_owned(),
        title: title.to_owned(),
        content: "placeholder body long enough".to_owned(),
        created_at,
        folder: "General".to_owned(),
    }
}

fn contact(id: &str, name: &str, email: &str) -> Contact {
    Contact {
        id: id.to_owned(),
        name: name.to_owned(),
        email: email.to_owned(),
        avatar_url: String::new(),
    }
}

fn message(id: &str, at: chrono::DateTime<chrono::Utc>, status: MessageStatus) -> ScheduledMessage {
    ScheduledMessage {
        id: id.to_owned(),
        contacts: vec![contact("c1", "Alice", "alice@example.com")],
        content: "a message body long enough".to_owned(),
        scheduled_at: at,
        status,
        template_id: None,
    }
}

#[tokio::test]
async fn seeded_store_carries_fixture_set() {
    let store = Store::seeded();

    let folders = store.list_folders().await;
    assert_eq!(folders.len(), 3);
    let reminders = folders
        .iter()
        .find(|f| f.name == "Appointment Reminders")
        .expect("reminders folder");
    assert!(reminders.protected);
    assert!(folders.iter().any(|f| f.name == "General"));

    assert_eq!(store.list_templates().await.len(), 4);
    assert_eq!(store.list_contacts().await.len(), 4);

    let messages = store.list_messages().await;
    assert_eq!(messages.len(), 4);
    assert!(messages
        .iter()
        .any(|m| m.status == MessageStatus::Sent && m.template_id.is_some()));
}

#[tokio::test]
async fn repeated_reads_are_deep_equal_and_defensive() {
    let store = Store::seeded();

    let first = store.list_templates().await;
    let second = store.list_templates().await;
    assert_eq!(first, second);

    // Mutating a returned result set must not leak back into the store.
    let mut leaked = store.list_templates().await;
    leaked.clear();
    assert_eq!(store.list_templates().await.len(), 4);

    let mut one = store.get_template("template-welcome").await.expect("get");
    one.title = "Tampered".to_owned();
    let fresh = store.get_template("template-welcome").await.expect("get");
    assert_eq!(fresh.title, "Welcome Message");
}

#[tokio::test]
async fn templates_list_newest_first() {
    let store = Store::new();
    let base = Utc::now();
    let older = base
        .checked_sub_signed(chrono::Duration::days(2))
        .expect("older");
    let middle = base
        .checked_sub_signed(chrono::Duration::days(1))
        .expect("middle");
    store.insert_template(template("t1", "Oldest", older)).await;
    store.insert_template(template("t3", "Newest", base)).await;
    store
        .insert_template(template("t2", "Middle", middle))
        .await;

    let titles: Vec<String> = store
        .list_templates()
        .await
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["Newest", "Middle", "Oldest"]);
}

#[tokio::test]
async fn update_template_preserves_id_and_created_at() {
    let store = Store::new();
    let created_at = Utc::now();
    store
        .insert_template(template("t1", "Before", created_at))
        .await;

    let updated = store
        .update_template(
            "t1",
            TemplatePatch {
                title: "After".to_owned(),
                content: "an entirely different body".to_owned(),
                folder: "Marketing".to_owned(),
            },
        )
        .await
        .expect("update");

    assert_eq!(updated.id, "t1");
    assert_eq!(updated.created_at, created_at);
    assert_eq!(updated.title, "After");
    assert_eq!(updated.folder, "Marketing");
}

#[tokio::test]
async fn unknown_ids_fail_not_found() {
    let store = Store::new();

    assert!(matches!(
        store.get_folder("nope").await,
        Err(StoreError::NotFound { entity: "folder", .. })
    ));
    assert!(matches!(
        store.remove_template("nope").await,
        Err(StoreError::NotFound { entity: "template", .. })
    ));
    assert!(matches!(
        store.get_contact("nope").await,
        Err(StoreError::NotFound { entity: "contact", .. })
    ));
    assert!(matches!(
        store.remove_message("nope").await,
        Err(StoreError::NotFound { entity: "message", .. })
    ));
}

#[tokio::test]
async fn messages_list_soonest_first() {
    let store = Store::new();
    let now = Utc::now();
    let later = now
        .checked_add_signed(chrono::Duration::days(2))
        .expect("later");
    let soon = now
        .checked_add_signed(chrono::Duration::days(1))
        .expect("soon");
    store
        .insert_message(message("m-later", later, MessageStatus::Scheduled))
        .await;
    store
        .insert_message(message("m-soon", soon, MessageStatus::Scheduled))
        .await;

    let ids: Vec<String> = store
        .list_messages()
        .await
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, vec!["m-soon", "m-later"]);
}

#[tokio::test]
async fn update_message_preserves_id_status_and_template_id() {
    let store = Store::new();
    let now = Utc::now();
    let mut seeded = message("m1", now, MessageStatus::Scheduled);
    seeded.template_id = Some("template-promo".to_owned());
    store.insert_message(seeded).await;

    let new_at = now
        .checked_add_signed(chrono::Duration::days(5))
        .expect("new at");
    let updated = store
        .update_message(
            "m1",
            MessagePatch {
                contacts: vec![contact("c2", "Bob", "bob@example.com")],
                content: "a rewritten message body".to_owned(),
                scheduled_at: new_at,
            },
        )
        .await
        .expect("update");

    assert_eq!(updated.id, "m1");
    assert_eq!(updated.status, MessageStatus::Scheduled);
    assert_eq!(updated.template_id.as_deref(), Some("template-promo"));
    assert_eq!(updated.scheduled_at, new_at);
    assert_eq!(updated.contacts.len(), 1);
    assert_eq!(updated.contacts[0].name, "Bob");
}

#[tokio::test]
async fn set_message_status_overwrites_status_only() {
    let store = Store::new();
    let now = Utc::now();
    store
        .insert_message(message("m1", now, MessageStatus::Scheduled))
        .await;

    let updated = store
        .set_message_status("m1", MessageStatus::Failed)
        .await
        .expect("set status");
    assert_eq!(updated.status, MessageStatus::Failed);
    assert_eq!(updated.scheduled_at, now);
}

#[tokio::test(start_paused = true)]
async fn configured_latency_delays_operations() {
    let store = Store::with_latency(Duration::from_millis(500));
    let before = tokio::time::Instant::now();
    store.list_folders().await;
    assert!(before.elapsed() >= Duration::from_millis(500));
}

#[tokio::test]
async fn from_config_seeds_when_asked() {
    let seeded = Store::from_config(&StoreConfig {
        latency_ms: 0,
        seed: true,
    });
    assert_eq!(seeded.list_contacts().await.len(), 4);

    let empty = Store::from_config(&StoreConfig {
        latency_ms: 0,
        seed: false,
    });
    assert!(empty.list_contacts().await.is_empty());
}
