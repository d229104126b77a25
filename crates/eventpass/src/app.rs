//! The EventPass facade: contexts plus permission gating.

use std::sync::Arc;

use eventpass_core::{
    Event, EventId, MessageId, MessageTemplate, ScheduledMessage, TemplateId, Ticket, TicketId,
    TicketType, TicketTypeId, User,
};
use eventpass_perms::{Capability, EventCapabilities, PermissionEvaluator};
use eventpass_store::KvStore;

use crate::config::EventPassConfig;
use crate::context::{
    MessageDispatcher, MessagingContext, SendResult, SettingsContext, TicketsContext,
};
use crate::error::{EventPassError, Result};

/// One store, one evaluator, and a context per domain.
///
/// Reads go straight through the context accessors. Mutations that act on
/// behalf of a user go through the `*_as` methods, which check the
/// matching capability on the event first.
pub struct EventPass<S: KvStore> {
    store: Arc<S>,
    config: EventPassConfig,
    evaluator: PermissionEvaluator,
    messaging: MessagingContext,
    settings: SettingsContext,
    tickets: TicketsContext,
}

impl<S: KvStore + 'static> EventPass<S> {
    /// Create an unloaded instance that owns `store`.
    pub fn new(store: S, config: EventPassConfig) -> Self {
        Self::from_arc(Arc::new(store), config)
    }

    /// Create an unloaded instance over a shared store.
    pub fn from_arc(store: Arc<S>, config: EventPassConfig) -> Self {
        let storage = &config.storage;
        Self {
            messaging: MessagingContext::new(Arc::clone(&store), storage),
            settings: SettingsContext::new(Arc::clone(&store), storage),
            tickets: TicketsContext::new(Arc::clone(&store), storage),
            evaluator: PermissionEvaluator::new(config.permissions),
            store,
            config,
        }
    }

    /// Replace the messaging dispatcher.
    pub fn with_dispatcher(mut self, dispatcher: impl MessageDispatcher + 'static) -> Self {
        self.messaging = self.messaging.with_dispatcher(dispatcher);
        self
    }

    /// Load every context concurrently.
    pub async fn load(&mut self) {
        tokio::join!(
            self.messaging.load(),
            self.settings.load(),
            self.tickets.load(),
        );
        tracing::info!(prefix = %self.config.storage.key_prefix, "eventpass loaded");
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EventPassConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &PermissionEvaluator {
        &self.evaluator
    }

    pub fn messaging(&self) -> &MessagingContext {
        &self.messaging
    }

    pub fn messaging_mut(&mut self) -> &mut MessagingContext {
        &mut self.messaging
    }

    pub fn settings(&self) -> &SettingsContext {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsContext {
        &mut self.settings
    }

    pub fn tickets(&self) -> &TicketsContext {
        &self.tickets
    }

    pub fn tickets_mut(&mut self) -> &mut TicketsContext {
        &mut self.tickets
    }

    /// Everything `actor` may do on `event`.
    pub fn capabilities(&self, event: &Event, actor: Option<&User>) -> EventCapabilities {
        self.evaluator.capabilities(event, actor)
    }

    fn require(&self, capability: Capability, event: &Event, actor: Option<&User>) -> Result<()> {
        self.evaluator.require(capability, event, actor).map_err(|e| {
            tracing::debug!(event_id = %event.id, capability = %capability, "permission denied");
            EventPassError::from(e)
        })
    }

    fn same_event(event: &Event, found: &EventId) -> Result<()> {
        if &event.id == found {
            return Ok(());
        }
        Err(EventPassError::EventMismatch {
            expected: event.id.clone(),
            found: found.clone(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Messaging
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn add_template_as(
        &mut self,
        event: &Event,
        actor: Option<&User>,
        template: MessageTemplate,
    ) -> Result<TemplateId> {
        self.require(Capability::SendMessages, event, actor)?;
        Self::same_event(event, &template.event_id)?;
        self.messaging.add_template(template).await
    }

    pub async fn create_scheduled_message_as(
        &mut self,
        event: &Event,
        actor: Option<&User>,
        message: ScheduledMessage,
    ) -> Result<MessageId> {
        self.require(Capability::SendMessages, event, actor)?;
        Self::same_event(event, &message.event_id)?;
        self.messaging.create_scheduled_message(message).await
    }

    /// Send a message of `event`. A message of another event is treated as
    /// unknown.
    pub async fn send_message_as(
        &mut self,
        event: &Event,
        actor: Option<&User>,
        id: &MessageId,
    ) -> Result<SendResult> {
        self.require(Capability::SendMessages, event, actor)?;

        let belongs = self
            .messaging
            .scheduled_message(id)
            .is_some_and(|m| m.event_id == event.id);
        if !belongs {
            return Ok(SendResult::default());
        }

        self.messaging.send_message(id).await
    }

    pub async fn initialize_event_notifications_as(
        &mut self,
        event: &Event,
        actor: Option<&User>,
    ) -> Result<bool> {
        self.require(Capability::ManageSettings, event, actor)?;
        self.messaging.initialize_event_notifications(&event.id).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tickets
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn add_ticket_type_as(
        &mut self,
        event: &Event,
        actor: Option<&User>,
        ticket_type: TicketType,
    ) -> Result<TicketTypeId> {
        self.require(Capability::ManageTickets, event, actor)?;
        Self::same_event(event, &ticket_type.event_id)?;
        self.tickets.add_ticket_type(ticket_type).await
    }

    pub async fn issue_ticket_as(
        &mut self,
        event: &Event,
        actor: Option<&User>,
        ticket_type_id: &TicketTypeId,
        holder_name: impl Into<String>,
        holder_email: impl Into<String>,
    ) -> Result<Ticket> {
        self.require(Capability::ManageAttendees, event, actor)?;

        let ticket_type = self
            .tickets
            .ticket_type(ticket_type_id)
            .ok_or_else(|| EventPassError::not_found("ticket type", ticket_type_id))?;
        Self::same_event(event, &ticket_type.event_id)?;

        self.tickets
            .issue_ticket(ticket_type_id, holder_name, holder_email)
            .await
    }

    pub async fn check_in_as(
        &mut self,
        event: &Event,
        actor: Option<&User>,
        ticket_id: &TicketId,
    ) -> Result<Ticket> {
        self.require(Capability::ManageAttendees, event, actor)?;

        let ticket = self
            .tickets
            .ticket(ticket_id)
            .ok_or_else(|| EventPassError::not_found("ticket", ticket_id))?;
        Self::same_event(event, &ticket.event_id)?;

        self.tickets.check_in(ticket_id).await
    }
}
