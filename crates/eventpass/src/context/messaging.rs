//! Messaging context: templates, scheduled messages, delivery history,
//! and automated notifications.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use eventpass_core::{
    now_millis, AutomatedNotification, DeliveryStatus, Event, EventId, HistoryId,
    MessageHistory, MessageId, MessageStatus, MessageTemplate, NotificationId,
    NotificationTrigger, ScheduledMessage, TemplateId,
};
use eventpass_store::{CollectionKey, JsonSlot, KvStore, Repository};

use crate::config::{SaveErrorPolicy, StorageConfig};
use crate::context::dispatch::{MessageDispatcher, SimulatedDispatcher};
use crate::context::{load_or_default, persist, LoadState};
use crate::error::{EventPassError, Result};

type Repo<T> = Box<dyn Repository<Vec<T>>>;

/// Outcome of [`MessagingContext::send_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResult {
    pub sent_count: u32,
    pub failed_count: u32,
}

/// Per-event messaging counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageStats {
    pub templates: usize,
    pub drafts: usize,
    pub scheduled: usize,
    pub sent: usize,
    pub failed: usize,
    pub delivered: usize,
    pub delivery_failures: usize,
}

/// Owns the four messaging collections.
pub struct MessagingContext {
    state: LoadState,
    templates: Vec<MessageTemplate>,
    messages: Vec<ScheduledMessage>,
    history: Vec<MessageHistory>,
    notifications: Vec<AutomatedNotification>,
    templates_repo: Repo<MessageTemplate>,
    messages_repo: Repo<ScheduledMessage>,
    history_repo: Repo<MessageHistory>,
    notifications_repo: Repo<AutomatedNotification>,
    dispatcher: Box<dyn MessageDispatcher>,
    save_errors: SaveErrorPolicy,
}

impl MessagingContext {
    /// Create an unloaded context over `store`.
    pub fn new<S: KvStore + 'static>(store: Arc<S>, storage: &StorageConfig) -> Self {
        let key = |k: CollectionKey| k.storage_key(&storage.key_prefix);

        Self {
            state: LoadState::Uninitialized,
            templates: Vec::new(),
            messages: Vec::new(),
            history: Vec::new(),
            notifications: Vec::new(),
            templates_repo: Box::new(JsonSlot::new(
                Arc::clone(&store),
                key(CollectionKey::MessageTemplates),
            )),
            messages_repo: Box::new(JsonSlot::new(
                Arc::clone(&store),
                key(CollectionKey::ScheduledMessages),
            )),
            history_repo: Box::new(JsonSlot::new(
                Arc::clone(&store),
                key(CollectionKey::MessageHistory),
            )),
            notifications_repo: Box::new(JsonSlot::new(
                store,
                key(CollectionKey::AutomatedNotifications),
            )),
            dispatcher: Box::new(SimulatedDispatcher),
            save_errors: storage.save_errors,
        }
    }

    /// Replace the delivery transport.
    pub fn with_dispatcher(mut self, dispatcher: impl MessageDispatcher + 'static) -> Self {
        self.dispatcher = Box::new(dispatcher);
        self
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Load all four collections concurrently.
    ///
    /// A collection that fails to load stays empty; the others still load.
    pub async fn load(&mut self) {
        self.state = LoadState::Loading;

        let (templates, messages, history, notifications) = tokio::join!(
            load_or_default(&*self.templates_repo),
            load_or_default(&*self.messages_repo),
            load_or_default(&*self.history_repo),
            load_or_default(&*self.notifications_repo),
        );

        self.templates = templates;
        self.messages = messages;
        self.history = history;
        self.notifications = notifications;
        self.state = LoadState::Ready;

        tracing::info!(
            templates = self.templates.len(),
            messages = self.messages.len(),
            history = self.history.len(),
            notifications = self.notifications.len(),
            "messaging context ready"
        );
    }

    async fn save_templates(&self) -> Result<()> {
        persist(&*self.templates_repo, &self.templates, self.save_errors).await
    }

    async fn save_messages(&self) -> Result<()> {
        persist(&*self.messages_repo, &self.messages, self.save_errors).await
    }

    async fn save_history(&self) -> Result<()> {
        persist(&*self.history_repo, &self.history, self.save_errors).await
    }

    async fn save_notifications(&self) -> Result<()> {
        persist(&*self.notifications_repo, &self.notifications, self.save_errors).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Templates
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a template.
    pub async fn add_template(&mut self, template: MessageTemplate) -> Result<TemplateId> {
        let id = template.id.clone();
        tracing::debug!(template_id = %id, event_id = %template.event_id, "adding template");

        self.templates.push(template);
        self.save_templates().await?;
        Ok(id)
    }

    /// Apply `edit` to a template. Returns `None` if it does not exist.
    ///
    /// The id and owning event cannot be changed.
    pub async fn update_template(
        &mut self,
        id: &TemplateId,
        edit: impl FnOnce(&mut MessageTemplate),
    ) -> Result<Option<MessageTemplate>> {
        let Some(template) = self.templates.iter_mut().find(|t| &t.id == id) else {
            return Ok(None);
        };

        let (keep_id, keep_event) = (template.id.clone(), template.event_id.clone());
        edit(template);
        template.id = keep_id;
        template.event_id = keep_event;
        template.updated_at = now_millis();
        let updated = template.clone();

        self.save_templates().await?;
        Ok(Some(updated))
    }

    /// Delete a template. Returns whether it existed.
    pub async fn delete_template(&mut self, id: &TemplateId) -> Result<bool> {
        let before = self.templates.len();
        self.templates.retain(|t| &t.id != id);
        if self.templates.len() == before {
            return Ok(false);
        }

        self.save_templates().await?;
        Ok(true)
    }

    pub fn template(&self, id: &TemplateId) -> Option<&MessageTemplate> {
        self.templates.iter().find(|t| &t.id == id)
    }

    pub fn templates_for_event(&self, event_id: &EventId) -> Vec<&MessageTemplate> {
        self.templates
            .iter()
            .filter(|t| &t.event_id == event_id)
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scheduled messages
    // ─────────────────────────────────────────────────────────────────────────

    /// Store a new message.
    ///
    /// It starts `scheduled` if it has a send time and `draft` otherwise,
    /// with delivery counters cleared.
    pub async fn create_scheduled_message(&mut self, mut message: ScheduledMessage) -> Result<MessageId> {
        message.status = if message.scheduled_for.is_some() {
            MessageStatus::Scheduled
        } else {
            MessageStatus::Draft
        };
        message.sent_at = None;
        message.sent_count = 0;
        message.failed_count = 0;

        let id = message.id.clone();
        tracing::debug!(message_id = %id, event_id = %message.event_id, status = %message.status, "creating message");

        self.messages.push(message);
        self.save_messages().await?;
        Ok(id)
    }

    /// Apply `edit` to a draft or scheduled message.
    ///
    /// Returns `None` if it does not exist. Status, counters, id, and event
    /// are managed by the context and cannot be changed here.
    pub async fn update_scheduled_message(
        &mut self,
        id: &MessageId,
        edit: impl FnOnce(&mut ScheduledMessage),
    ) -> Result<Option<ScheduledMessage>> {
        let Some(message) = self.messages.iter_mut().find(|m| &m.id == id) else {
            return Ok(None);
        };
        if !message.status.is_editable() {
            return Err(EventPassError::NotEditable {
                id: id.clone(),
                status: message.status,
            });
        }

        let before = message.clone();
        edit(message);
        message.id = before.id;
        message.event_id = before.event_id;
        message.status = before.status;
        message.scheduled_for = before.scheduled_for;
        message.sent_at = before.sent_at;
        message.sent_count = before.sent_count;
        message.failed_count = before.failed_count;
        message.updated_at = now_millis();
        let updated = message.clone();

        self.save_messages().await?;
        Ok(Some(updated))
    }

    /// Delete a message. Its history is kept. Returns whether it existed.
    pub async fn delete_scheduled_message(&mut self, id: &MessageId) -> Result<bool> {
        let before = self.messages.len();
        self.messages.retain(|m| &m.id != id);
        if self.messages.len() == before {
            return Ok(false);
        }

        self.save_messages().await?;
        Ok(true)
    }

    /// Set or move the send time. Drafts and failed messages become scheduled.
    pub async fn schedule_message(&mut self, id: &MessageId, at: i64) -> Result<Option<ScheduledMessage>> {
        let Some(message) = self.messages.iter_mut().find(|m| &m.id == id) else {
            return Ok(None);
        };
        if message.status != MessageStatus::Scheduled {
            message.status = message.status.transition(MessageStatus::Scheduled)?;
        }
        message.scheduled_for = Some(at);
        message.updated_at = now_millis();
        let updated = message.clone();

        self.save_messages().await?;
        Ok(Some(updated))
    }

    /// Return a scheduled message to draft.
    pub async fn unschedule_message(&mut self, id: &MessageId) -> Result<Option<ScheduledMessage>> {
        let Some(message) = self.messages.iter_mut().find(|m| &m.id == id) else {
            return Ok(None);
        };
        message.status = message.status.transition(MessageStatus::Draft)?;
        message.scheduled_for = None;
        message.updated_at = now_millis();
        let updated = message.clone();

        self.save_messages().await?;
        Ok(Some(updated))
    }

    pub fn scheduled_message(&self, id: &MessageId) -> Option<&ScheduledMessage> {
        self.messages.iter().find(|m| &m.id == id)
    }

    pub fn scheduled_messages_for_event(&self, event_id: &EventId) -> Vec<&ScheduledMessage> {
        self.messages
            .iter()
            .filter(|m| &m.event_id == event_id)
            .collect()
    }

    /// Scheduled messages whose send time has passed.
    pub fn due_messages(&self, now: i64) -> Vec<&ScheduledMessage> {
        self.messages
            .iter()
            .filter(|m| m.status == MessageStatus::Scheduled)
            .filter(|m| m.scheduled_for.is_some_and(|at| at <= now))
            .collect()
    }

    /// Deliver a message to every recipient.
    ///
    /// An unknown id yields a zeroed result and touches nothing. Otherwise
    /// the message moves to `sending`, each recipient gets one delivery
    /// attempt and one history record, and the message ends `sent`, or
    /// `failed` if no delivery succeeded.
    pub async fn send_message(&mut self, id: &MessageId) -> Result<SendResult> {
        let Some(index) = self.messages.iter().position(|m| &m.id == id) else {
            tracing::debug!(message_id = %id, "send requested for unknown message");
            return Ok(SendResult::default());
        };

        let (prior_status, prior_updated_at) = {
            let message = &mut self.messages[index];
            let prior = (message.status, message.updated_at);
            message.status = message.status.transition(MessageStatus::Sending)?;
            message.updated_at = now_millis();
            prior
        };

        // Roll back on a failed save. Nothing has been delivered yet.
        if let Err(e) = self.save_messages().await {
            let message = &mut self.messages[index];
            message.status = prior_status;
            message.updated_at = prior_updated_at;
            return Err(e);
        }

        let message = self.messages[index].clone();
        let mut result = SendResult::default();
        let mut records = Vec::with_capacity(message.recipients.len());

        for recipient in &message.recipients {
            let outcome = self.dispatcher.deliver(&message, recipient).await;
            let (status, error) = match outcome {
                Ok(()) => {
                    result.sent_count += 1;
                    (DeliveryStatus::Sent, None)
                }
                Err(failure) => {
                    result.failed_count += 1;
                    tracing::warn!(message_id = %message.id, to = %recipient.contact, error = %failure, "delivery failed");
                    (DeliveryStatus::Failed, Some(failure.reason))
                }
            };

            records.push(MessageHistory {
                id: HistoryId::generate(),
                event_id: message.event_id.clone(),
                message_id: message.id.clone(),
                recipient: recipient.clone(),
                channel: message.channel,
                status,
                sent_at: now_millis(),
                error,
            });
        }

        self.history.extend(records);
        self.save_history().await?;

        let all_failed = result.sent_count == 0 && result.failed_count > 0;
        let final_status = if all_failed {
            MessageStatus::Failed
        } else {
            MessageStatus::Sent
        };

        {
            let now = now_millis();
            let message = &mut self.messages[index];
            message.status = message.status.transition(final_status)?;
            message.sent_count = result.sent_count;
            message.failed_count = result.failed_count;
            message.sent_at = Some(now);
            message.updated_at = now;
        }
        self.save_messages().await?;

        tracing::info!(
            message_id = %id,
            sent = result.sent_count,
            failed = result.failed_count,
            status = %final_status,
            "message sent"
        );
        Ok(result)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // History
    // ─────────────────────────────────────────────────────────────────────────

    pub fn history_for_event(&self, event_id: &EventId) -> Vec<&MessageHistory> {
        self.history
            .iter()
            .filter(|h| &h.event_id == event_id)
            .collect()
    }

    pub fn history_for_message(&self, message_id: &MessageId) -> Vec<&MessageHistory> {
        self.history
            .iter()
            .filter(|h| &h.message_id == message_id)
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Automated notifications
    // ─────────────────────────────────────────────────────────────────────────

    /// Seed the default notifications for an event.
    ///
    /// Does nothing if the event already has any. Returns whether it seeded.
    pub async fn initialize_event_notifications(&mut self, event_id: &EventId) -> Result<bool> {
        if self.notifications.iter().any(|n| &n.event_id == event_id) {
            tracing::debug!(event_id = %event_id, "notifications already initialized");
            return Ok(false);
        }

        let defaults = AutomatedNotification::defaults_for(event_id, now_millis());
        tracing::debug!(event_id = %event_id, count = defaults.len(), "seeding notifications");

        self.notifications.extend(defaults);
        self.save_notifications().await?;
        Ok(true)
    }

    pub fn notifications_for_event(&self, event_id: &EventId) -> Vec<&AutomatedNotification> {
        self.notifications
            .iter()
            .filter(|n| &n.event_id == event_id)
            .collect()
    }

    pub fn notification(&self, id: &NotificationId) -> Option<&AutomatedNotification> {
        self.notifications.iter().find(|n| &n.id == id)
    }

    /// Turn a notification on or off.
    pub async fn set_notification_enabled(
        &mut self,
        id: &NotificationId,
        enabled: bool,
    ) -> Result<Option<AutomatedNotification>> {
        self.update_notification(id, |n| n.enabled = enabled).await
    }

    /// Apply `edit` to a notification. The id, event, and kind are fixed.
    pub async fn update_notification(
        &mut self,
        id: &NotificationId,
        edit: impl FnOnce(&mut AutomatedNotification),
    ) -> Result<Option<AutomatedNotification>> {
        let Some(notification) = self.notifications.iter_mut().find(|n| &n.id == id) else {
            return Ok(None);
        };

        let before = notification.clone();
        edit(notification);
        notification.id = before.id;
        notification.event_id = before.event_id;
        notification.kind = before.kind;
        notification.updated_at = now_millis();
        let updated = notification.clone();

        self.save_notifications().await?;
        Ok(Some(updated))
    }

    /// Enabled `before_event` notifications whose fire time has passed.
    ///
    /// Events without a start time have nothing due.
    pub fn due_notifications(&self, event: &Event, now: i64) -> Vec<&AutomatedNotification> {
        let Some(starts_at) = event.starts_at else {
            return Vec::new();
        };

        self.notifications
            .iter()
            .filter(|n| n.event_id == event.id && n.enabled)
            .filter(|n| matches!(n.trigger, NotificationTrigger::BeforeEvent { .. }))
            .filter(|n| n.trigger.fire_at(starts_at).is_some_and(|at| at <= now))
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Event-wide
    // ─────────────────────────────────────────────────────────────────────────

    /// Counters for one event.
    pub fn message_stats(&self, event_id: &EventId) -> MessageStats {
        let mut stats = MessageStats {
            templates: self.templates_for_event(event_id).len(),
            ..MessageStats::default()
        };

        for message in self.messages.iter().filter(|m| &m.event_id == event_id) {
            match message.status {
                MessageStatus::Draft => stats.drafts += 1,
                MessageStatus::Scheduled | MessageStatus::Sending => stats.scheduled += 1,
                MessageStatus::Sent => stats.sent += 1,
                MessageStatus::Failed => stats.failed += 1,
            }
        }

        for record in self.history.iter().filter(|h| &h.event_id == event_id) {
            match record.status {
                DeliveryStatus::Sent => stats.delivered += 1,
                DeliveryStatus::Failed => stats.delivery_failures += 1,
            }
        }

        stats
    }

    /// Drop every messaging record of a deleted event.
    ///
    /// Returns how many records were removed. Only collections that
    /// changed are rewritten.
    pub async fn remove_event(&mut self, event_id: &EventId) -> Result<usize> {
        let counts = (
            self.templates.len(),
            self.messages.len(),
            self.history.len(),
            self.notifications.len(),
        );

        self.templates.retain(|t| &t.event_id != event_id);
        self.messages.retain(|m| &m.event_id != event_id);
        self.history.retain(|h| &h.event_id != event_id);
        self.notifications.retain(|n| &n.event_id != event_id);

        let mut removed = 0;
        if self.templates.len() != counts.0 {
            removed += counts.0 - self.templates.len();
            self.save_templates().await?;
        }
        if self.messages.len() != counts.1 {
            removed += counts.1 - self.messages.len();
            self.save_messages().await?;
        }
        if self.history.len() != counts.2 {
            removed += counts.2 - self.history.len();
            self.save_history().await?;
        }
        if self.notifications.len() != counts.3 {
            removed += counts.3 - self.notifications.len();
            self.save_notifications().await?;
        }

        tracing::debug!(event_id = %event_id, removed, "removed event messaging data");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventpass_core::{MessageChannel, Recipient};
    use eventpass_store::MemoryStore;

    use crate::context::dispatch::DeliveryFailure;

    fn context() -> (Arc<MemoryStore>, MessagingContext) {
        let store = Arc::new(MemoryStore::new());
        let ctx = MessagingContext::new(Arc::clone(&store), &StorageConfig::default());
        (store, ctx)
    }

    fn recipients(n: usize) -> Vec<Recipient> {
        (0..n)
            .map(|i| Recipient::new(format!("att-{}", i), format!("Guest {}", i), format!("g{}@example.com", i)))
            .collect()
    }

    fn draft(event: &str, n: usize) -> ScheduledMessage {
        ScheduledMessage::draft(
            EventId::new(event),
            "Doors open",
            "See you at 7",
            MessageChannel::Email,
            recipients(n),
            0,
        )
    }

    /// Fails delivery to any contact containing "bounce".
    struct BouncingDispatcher;

    #[async_trait::async_trait]
    impl MessageDispatcher for BouncingDispatcher {
        async fn deliver(
            &self,
            _message: &ScheduledMessage,
            recipient: &Recipient,
        ) -> std::result::Result<(), DeliveryFailure> {
            if recipient.contact.contains("bounce") {
                Err(DeliveryFailure::new("mailbox unavailable"))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_load_moves_to_ready() {
        let (_store, mut ctx) = context();
        assert_eq!(ctx.state(), LoadState::Uninitialized);

        ctx.load().await;
        assert_eq!(ctx.state(), LoadState::Ready);
    }

    #[tokio::test]
    async fn test_send_marks_everyone_sent() {
        let (_store, mut ctx) = context();
        ctx.load().await;

        let id = ctx.create_scheduled_message(draft("evt-1", 3)).await.unwrap();
        let result = ctx.send_message(&id).await.unwrap();

        assert_eq!(result, SendResult { sent_count: 3, failed_count: 0 });

        let message = ctx.scheduled_message(&id).unwrap();
        assert_eq!(message.status, MessageStatus::Sent);
        assert_eq!(message.sent_count, 3);
        assert!(message.sent_at.is_some());

        let history = ctx.history_for_message(&id);
        assert_eq!(history.len(), 3);
        assert!(history.iter().all(|h| h.status == DeliveryStatus::Sent));
    }

    #[tokio::test]
    async fn test_send_unknown_message_is_noop() {
        let (store, mut ctx) = context();
        ctx.load().await;
        ctx.create_scheduled_message(draft("evt-1", 1)).await.unwrap();
        let before = store.snapshot().unwrap();

        let result = ctx.send_message(&MessageId::new("missing")).await.unwrap();

        assert_eq!(result, SendResult { sent_count: 0, failed_count: 0 });
        assert_eq!(store.snapshot().unwrap(), before);
    }

    #[tokio::test]
    async fn test_partial_failures_are_counted() {
        let (_store, ctx) = context();
        let mut ctx = ctx.with_dispatcher(BouncingDispatcher);
        ctx.load().await;

        let mut message = draft("evt-1", 2);
        message.recipients.push(Recipient::new("att-x", "Bouncer", "bounce@example.com"));
        let id = ctx.create_scheduled_message(message).await.unwrap();

        let result = ctx.send_message(&id).await.unwrap();
        assert_eq!(result, SendResult { sent_count: 2, failed_count: 1 });
        assert_eq!(ctx.scheduled_message(&id).unwrap().status, MessageStatus::Sent);

        let failed: Vec<_> = ctx
            .history_for_message(&id)
            .into_iter()
            .filter(|h| h.status == DeliveryStatus::Failed)
            .collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].error.as_deref(), Some("mailbox unavailable"));
    }

    #[tokio::test]
    async fn test_all_failures_mark_failed_and_allow_retry() {
        let (_store, ctx) = context();
        let mut ctx = ctx.with_dispatcher(BouncingDispatcher);
        ctx.load().await;

        let mut message = draft("evt-1", 0);
        message.recipients = vec![Recipient::new("a", "A", "bounce-a"), Recipient::new("b", "B", "bounce-b")];
        let id = ctx.create_scheduled_message(message).await.unwrap();

        let result = ctx.send_message(&id).await.unwrap();
        assert_eq!(result.failed_count, 2);
        assert_eq!(ctx.scheduled_message(&id).unwrap().status, MessageStatus::Failed);

        let rescheduled = ctx.schedule_message(&id, 10_000).await.unwrap().unwrap();
        assert_eq!(rescheduled.status, MessageStatus::Scheduled);
    }

    #[tokio::test]
    async fn test_sent_message_cannot_be_resent_or_edited() {
        let (_store, mut ctx) = context();
        ctx.load().await;

        let id = ctx.create_scheduled_message(draft("evt-1", 1)).await.unwrap();
        ctx.send_message(&id).await.unwrap();

        assert!(matches!(
            ctx.send_message(&id).await,
            Err(EventPassError::Core(_))
        ));
        assert!(matches!(
            ctx.update_scheduled_message(&id, |m| m.subject = "late".into()).await,
            Err(EventPassError::NotEditable { .. })
        ));
        assert_eq!(ctx.history_for_message(&id).len(), 1);
    }

    #[tokio::test]
    async fn test_create_with_time_is_scheduled() {
        let (_store, mut ctx) = context();
        ctx.load().await;

        let id = ctx
            .create_scheduled_message(draft("evt-1", 1).scheduled_for(5_000))
            .await
            .unwrap();
        assert_eq!(ctx.scheduled_message(&id).unwrap().status, MessageStatus::Scheduled);
        assert_eq!(ctx.due_messages(4_999).len(), 0);
        assert_eq!(ctx.due_messages(5_000).len(), 1);

        let draft = ctx.unschedule_message(&id).await.unwrap().unwrap();
        assert_eq!(draft.status, MessageStatus::Draft);
        assert_eq!(draft.scheduled_for, None);
    }

    #[tokio::test]
    async fn test_update_keeps_managed_fields() {
        let (_store, mut ctx) = context();
        ctx.load().await;

        let id = ctx.create_scheduled_message(draft("evt-1", 1)).await.unwrap();
        let updated = ctx
            .update_scheduled_message(&id, |m| {
                m.subject = "New subject".into();
                m.status = MessageStatus::Sent;
                m.event_id = EventId::new("evt-other");
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.subject, "New subject");
        assert_eq!(updated.status, MessageStatus::Draft);
        assert_eq!(updated.event_id, EventId::new("evt-1"));
    }

    #[tokio::test]
    async fn test_seeding_is_idempotent() {
        let (_store, mut ctx) = context();
        ctx.load().await;
        let event_id = EventId::new("evt-1");

        assert!(ctx.initialize_event_notifications(&event_id).await.unwrap());
        assert!(!ctx.initialize_event_notifications(&event_id).await.unwrap());

        assert_eq!(ctx.notifications_for_event(&event_id).len(), 4);
    }

    #[tokio::test]
    async fn test_due_notifications() {
        let (_store, mut ctx) = context();
        ctx.load().await;

        let hour = eventpass_core::time::MILLIS_PER_HOUR;
        let event = Event::new("evt-1", "owner").starting_at(100 * hour);
        ctx.initialize_event_notifications(&event.id).await.unwrap();

        assert!(ctx.due_notifications(&event, 75 * hour).is_empty());
        assert_eq!(ctx.due_notifications(&event, 76 * hour).len(), 1);
        assert_eq!(ctx.due_notifications(&event, 99 * hour).len(), 2);

        let reminder_id = ctx.due_notifications(&event, 99 * hour)[0].id.clone();
        ctx.set_notification_enabled(&reminder_id, false).await.unwrap();
        assert_eq!(ctx.due_notifications(&event, 99 * hour).len(), 1);

        let undated = Event::new("evt-1", "owner");
        assert!(ctx.due_notifications(&undated, i64::MAX).is_empty());
    }

    #[tokio::test]
    async fn test_templates_crud_and_filter() {
        let (_store, mut ctx) = context();
        ctx.load().await;

        let a = MessageTemplate::new(EventId::new("evt-1"), "A", "s", "b", MessageChannel::Email, 0);
        let b = MessageTemplate::new(EventId::new("evt-2"), "B", "s", "b", MessageChannel::Push, 0);
        let a_id = ctx.add_template(a).await.unwrap();
        ctx.add_template(b).await.unwrap();

        assert_eq!(ctx.templates_for_event(&EventId::new("evt-1")).len(), 1);

        let updated = ctx
            .update_template(&a_id, |t| t.name = "Renamed".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Renamed");

        assert!(ctx.delete_template(&a_id).await.unwrap());
        assert!(!ctx.delete_template(&a_id).await.unwrap());
        assert!(ctx
            .update_template(&a_id, |_| {})
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_stats_and_remove_event() {
        let (_store, mut ctx) = context();
        ctx.load().await;
        let event_id = EventId::new("evt-1");

        ctx.add_template(MessageTemplate::new(event_id.clone(), "T", "s", "b", MessageChannel::Email, 0))
            .await
            .unwrap();
        let sent = ctx.create_scheduled_message(draft("evt-1", 2)).await.unwrap();
        ctx.create_scheduled_message(draft("evt-1", 1)).await.unwrap();
        ctx.create_scheduled_message(draft("evt-2", 1)).await.unwrap();
        ctx.send_message(&sent).await.unwrap();

        let stats = ctx.message_stats(&event_id);
        assert_eq!(
            stats,
            MessageStats {
                templates: 1,
                drafts: 1,
                scheduled: 0,
                sent: 1,
                failed: 0,
                delivered: 2,
                delivery_failures: 0,
            }
        );

        // 1 template + 2 messages + 2 history records
        assert_eq!(ctx.remove_event(&event_id).await.unwrap(), 5);
        assert_eq!(ctx.message_stats(&event_id), MessageStats::default());
        assert_eq!(ctx.scheduled_messages_for_event(&EventId::new("evt-2")).len(), 1);
    }

    #[tokio::test]
    async fn test_reload_restores_collections() {
        let (store, mut ctx) = context();
        ctx.load().await;

        let id = ctx.create_scheduled_message(draft("evt-1", 2)).await.unwrap();
        ctx.send_message(&id).await.unwrap();
        ctx.initialize_event_notifications(&EventId::new("evt-1")).await.unwrap();

        let mut reloaded = MessagingContext::new(store, &StorageConfig::default());
        reloaded.load().await;

        assert_eq!(reloaded.scheduled_message(&id), ctx.scheduled_message(&id));
        assert_eq!(reloaded.history_for_message(&id), ctx.history_for_message(&id));
        assert_eq!(
            reloaded.notifications_for_event(&EventId::new("evt-1")),
            ctx.notifications_for_event(&EventId::new("evt-1"))
        );
    }
}
