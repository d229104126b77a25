//! End-to-end scenarios across permissions, contexts and stores.

use std::sync::Arc;

use eventpass::{
    EventPass, EventPassConfig, EventPassError, LoadState, SaveErrorPolicy, StorageConfig,
};
use eventpass_core::{
    MessageChannel, MessageStatus, MessageTemplate, ScheduledMessage, TicketType,
};
use eventpass_perms::PermsError;
use eventpass_store::{MemoryStore, SqliteStore, StoreError};
use eventpass_testkit::{multi_org_fixtures, recipients, FaultyStore, TestFixture};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn template(event: &eventpass_core::Event, name: &str) -> MessageTemplate {
    MessageTemplate::new(
        event.id.clone(),
        name,
        "Subject",
        "Body",
        MessageChannel::Email,
        0,
    )
}

#[tokio::test]
async fn seeding_twice_keeps_four_notifications() {
    init_tracing();
    let fixture = TestFixture::new("org-1");
    let event = fixture.event("evt-1");
    let mut app = fixture.app().await;

    assert!(app
        .initialize_event_notifications_as(&event, Some(&fixture.owner))
        .await
        .unwrap());
    assert!(!app
        .initialize_event_notifications_as(&event, Some(&fixture.seller_admin))
        .await
        .unwrap());

    assert_eq!(app.messaging().notifications_for_event(&event.id).len(), 4);
}

#[tokio::test]
async fn collaborator_edits_but_cannot_delete() {
    init_tracing();
    let fixture = TestFixture::new("org-1");
    let event = fixture.event("evt-1");
    let app = fixture.app().await;

    let caps = app.capabilities(&event, Some(&fixture.collaborator));
    assert!(caps.can_edit);
    assert!(caps.can_send_messages);
    assert!(!caps.can_delete);
    assert!(!caps.can_manage_tickets);
}

#[tokio::test]
async fn admin_from_other_org_edits_but_cannot_delete() {
    init_tracing();
    let orgs = multi_org_fixtures(2);
    let event = orgs[0].event("evt-1");
    let mut app = orgs[0].app().await;

    let outsider = &orgs[1].seller_admin;
    let caps = app.capabilities(&event, Some(outsider));
    assert!(caps.can_edit);
    assert!(!caps.can_delete);

    let err = app
        .add_ticket_type_as(
            &event,
            Some(outsider),
            TicketType::new(event.id.clone(), "GA", 500, "USD", 10, 0),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EventPassError::Permission(PermsError::Denied { .. })));
}

#[tokio::test]
async fn send_unknown_message_leaves_storage_unchanged() {
    init_tracing();
    let fixture = TestFixture::new("org-1");
    let event = fixture.event("evt-1");
    let mut app = fixture.app().await;

    app.add_template_as(&event, Some(&fixture.owner), template(&event, "welcome"))
        .await
        .unwrap();
    let before = app.store().snapshot().unwrap();

    let result = app
        .messaging_mut()
        .send_message(&"missing".into())
        .await
        .unwrap();

    assert_eq!((result.sent_count, result.failed_count), (0, 0));
    assert_eq!(app.store().snapshot().unwrap(), before);
}

#[tokio::test]
async fn send_records_history_for_every_recipient() {
    init_tracing();
    let fixture = TestFixture::new("org-1");
    let event = fixture.event("evt-1");
    let mut app = fixture.app().await;

    let message = ScheduledMessage::draft(
        event.id.clone(),
        "Doors open",
        "Doors open at 7",
        MessageChannel::Sms,
        recipients(3),
        0,
    );
    let id = app
        .create_scheduled_message_as(&event, Some(&fixture.collaborator), message)
        .await
        .unwrap();
    let result = app
        .send_message_as(&event, Some(&fixture.collaborator), &id)
        .await
        .unwrap();

    assert_eq!(result.sent_count, 3);
    let sent = app.messaging().scheduled_message(&id).unwrap();
    assert_eq!(sent.status, MessageStatus::Sent);
    assert!(sent.sent_at.is_some());
    assert_eq!(app.messaging().history_for_message(&id).len(), 3);
}

#[tokio::test]
async fn sqlite_survives_restart_in_order() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eventpass.db");
    let fixture = TestFixture::new("org-1");
    let event = fixture.event("evt-1");

    let expected: Vec<MessageTemplate> = {
        let mut app = EventPass::new(SqliteStore::open(&path).unwrap(), EventPassConfig::default());
        app.load().await;
        for name in ["welcome", "reminder", "thanks", "survey"] {
            app.add_template_as(&event, Some(&fixture.owner), template(&event, name))
                .await
                .unwrap();
        }
        app.settings_mut()
            .update(|s| s.timezone = "Europe/Paris".into())
            .await
            .unwrap();
        app.messaging()
            .templates_for_event(&event.id)
            .into_iter()
            .cloned()
            .collect()
    };

    let mut app = EventPass::new(SqliteStore::open(&path).unwrap(), EventPassConfig::default());
    app.load().await;

    let reloaded: Vec<MessageTemplate> = app
        .messaging()
        .templates_for_event(&event.id)
        .into_iter()
        .cloned()
        .collect();
    assert_eq!(reloaded, expected);
    assert_eq!(app.settings().settings().timezone, "Europe/Paris");
}

#[tokio::test]
async fn corrupt_key_leaves_only_that_collection_empty() {
    init_tracing();
    let fixture = TestFixture::new("org-1");
    let event = fixture.event("evt-1");
    let templates = vec![template(&event, "welcome"), template(&event, "thanks")];

    let store = MemoryStore::with_items([
        (
            "@eventpass/message_templates".to_string(),
            serde_json::to_string(&templates).unwrap(),
        ),
        ("@eventpass/scheduled_messages".to_string(), "{oops".to_string()),
        ("@eventpass/app_settings".to_string(), r#"{"language":"es"}"#.to_string()),
    ]);
    let mut app = EventPass::new(store, EventPassConfig::default());
    app.load().await;

    assert_eq!(app.messaging().state(), LoadState::Ready);
    assert_eq!(app.messaging().templates_for_event(&event.id).len(), 2);
    assert!(app.messaging().scheduled_messages_for_event(&event.id).is_empty());
    assert_eq!(app.settings().settings().language, "es");
    assert_eq!(app.settings().settings().currency, "USD");
}

#[tokio::test]
async fn failed_save_propagates_and_keeps_change() {
    init_tracing();
    let fixture = TestFixture::new("org-1");
    let event = fixture.event("evt-1");
    let mut app = EventPass::new(FaultyStore::new(MemoryStore::new()), EventPassConfig::default());
    app.load().await;

    app.store().set_fail_writes(true);
    let err = app
        .add_template_as(&event, Some(&fixture.owner), template(&event, "welcome"))
        .await
        .unwrap_err();
    assert!(matches!(err, EventPassError::Store(StoreError::WriteRejected { .. })));
    assert_eq!(app.messaging().templates_for_event(&event.id).len(), 1);
    assert!(app.store().inner().snapshot().unwrap().is_empty());

    // The next successful save writes both templates.
    app.store().set_fail_writes(false);
    app.add_template_as(&event, Some(&fixture.owner), template(&event, "thanks"))
        .await
        .unwrap();

    let raw = app.store().inner().snapshot().unwrap();
    let stored: Vec<MessageTemplate> =
        serde_json::from_str(&raw["@eventpass/message_templates"]).unwrap();
    assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn failed_send_save_leaves_message_sendable() {
    init_tracing();
    let fixture = TestFixture::new("org-1");
    let event = fixture.event("evt-1");
    let mut app = EventPass::new(FaultyStore::new(MemoryStore::new()), EventPassConfig::default());
    app.load().await;

    let message = ScheduledMessage::draft(
        event.id.clone(),
        "Doors open",
        "Doors open at 7",
        MessageChannel::Email,
        recipients(2),
        0,
    );
    let id = app
        .create_scheduled_message_as(&event, Some(&fixture.owner), message)
        .await
        .unwrap();

    app.store().set_fail_writes(true);
    let err = app
        .send_message_as(&event, Some(&fixture.owner), &id)
        .await
        .unwrap_err();
    assert!(matches!(err, EventPassError::Store(StoreError::WriteRejected { .. })));
    assert_eq!(app.messaging().scheduled_message(&id).unwrap().status, MessageStatus::Draft);
    assert!(app.messaging().history_for_message(&id).is_empty());

    app.store().set_fail_writes(false);
    app.messaging_mut()
        .update_scheduled_message(&id, |m| m.subject = "Doors open early".into())
        .await
        .unwrap();
    let result = app
        .send_message_as(&event, Some(&fixture.owner), &id)
        .await
        .unwrap();

    assert_eq!(result.sent_count, 2);
    assert_eq!(app.messaging().scheduled_message(&id).unwrap().status, MessageStatus::Sent);
}

#[tokio::test]
async fn failed_save_is_swallowed_when_configured() {
    init_tracing();
    let fixture = TestFixture::new("org-1");
    let event = fixture.event("evt-1");
    let config = EventPassConfig {
        storage: StorageConfig {
            save_errors: SaveErrorPolicy::LogAndSwallow,
            ..StorageConfig::default()
        },
        ..EventPassConfig::default()
    };
    let store = Arc::new(FaultyStore::new(MemoryStore::new()));
    let mut app = EventPass::from_arc(Arc::clone(&store), config);
    app.load().await;

    store.set_fail_writes(true);
    app.add_template_as(&event, Some(&fixture.owner), template(&event, "welcome"))
        .await
        .unwrap();

    assert_eq!(store.rejected(), 1);
    assert_eq!(app.messaging().templates_for_event(&event.id).len(), 1);
}

#[tokio::test]
async fn tickets_respect_capacity() {
    init_tracing();
    let fixture = TestFixture::new("org-1");
    let event = fixture.event("evt-1");
    let mut app = fixture.app().await;

    let type_id = app
        .add_ticket_type_as(
            &event,
            Some(&fixture.seller_admin),
            TicketType::new(event.id.clone(), "VIP", 10_000, "USD", 2, 0),
        )
        .await
        .unwrap();

    let first = app
        .issue_ticket_as(&event, Some(&fixture.collaborator), &type_id, "Ada", "ada@example.com")
        .await
        .unwrap();
    app.issue_ticket_as(&event, Some(&fixture.collaborator), &type_id, "Bob", "bob@example.com")
        .await
        .unwrap();

    let err = app
        .issue_ticket_as(&event, Some(&fixture.collaborator), &type_id, "Cy", "cy@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, EventPassError::SoldOut(_)));

    app.tickets_mut().cancel_ticket(&first.id).await.unwrap();
    app.issue_ticket_as(&event, Some(&fixture.collaborator), &type_id, "Cy", "cy@example.com")
        .await
        .unwrap();

    let stats = app.tickets().ticket_stats(&event.id);
    assert_eq!((stats.capacity, stats.sold, stats.cancelled), (2, 2, 1));
}

#[tokio::test]
async fn viewer_cannot_check_in() {
    init_tracing();
    let fixture = TestFixture::new("org-1");
    let event = fixture.event("evt-1");
    let mut app = fixture.app().await;

    let type_id = app
        .add_ticket_type_as(
            &event,
            Some(&fixture.owner),
            TicketType::new(event.id.clone(), "GA", 0, "USD", 5, 0),
        )
        .await
        .unwrap();
    let ticket = app
        .issue_ticket_as(&event, Some(&fixture.owner), &type_id, "Ada", "ada@example.com")
        .await
        .unwrap();

    let err = app
        .check_in_as(&event, Some(&fixture.viewer), &ticket.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EventPassError::Permission(_)));
    assert!(app
        .check_in_as(&event, Some(&fixture.collaborator), &ticket.id)
        .await
        .is_ok());
}
