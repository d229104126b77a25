//! Tickets context: ticket types and issued tickets.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use eventpass_core::{
    now_millis, EventId, Ticket, TicketId, TicketStatus, TicketType, TicketTypeId,
};
use eventpass_store::{CollectionKey, JsonSlot, KvStore, Repository};

use crate::config::{SaveErrorPolicy, StorageConfig};
use crate::context::{load_or_default, persist, LoadState};
use crate::error::{EventPassError, Result};

/// Per-event ticket counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketStats {
    pub capacity: u64,
    pub sold: u64,
    pub checked_in: usize,
    pub cancelled: usize,
    pub revenue_cents: u64,
}

/// Owns ticket types and tickets.
pub struct TicketsContext {
    state: LoadState,
    ticket_types: Vec<TicketType>,
    tickets: Vec<Ticket>,
    ticket_types_repo: Box<dyn Repository<Vec<TicketType>>>,
    tickets_repo: Box<dyn Repository<Vec<Ticket>>>,
    save_errors: SaveErrorPolicy,
}

impl TicketsContext {
    pub fn new<S: KvStore + 'static>(store: Arc<S>, storage: &StorageConfig) -> Self {
        Self {
            state: LoadState::Uninitialized,
            ticket_types: Vec::new(),
            tickets: Vec::new(),
            ticket_types_repo: Box::new(JsonSlot::new(
                Arc::clone(&store),
                CollectionKey::TicketTypes.storage_key(&storage.key_prefix),
            )),
            tickets_repo: Box::new(JsonSlot::new(
                store,
                CollectionKey::Tickets.storage_key(&storage.key_prefix),
            )),
            save_errors: storage.save_errors,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Load both collections concurrently.
    pub async fn load(&mut self) {
        self.state = LoadState::Loading;

        let (ticket_types, tickets) = tokio::join!(
            load_or_default(&*self.ticket_types_repo),
            load_or_default(&*self.tickets_repo),
        );

        self.ticket_types = ticket_types;
        self.tickets = tickets;
        self.state = LoadState::Ready;

        tracing::info!(
            ticket_types = self.ticket_types.len(),
            tickets = self.tickets.len(),
            "tickets context ready"
        );
    }

    async fn save_ticket_types(&self) -> Result<()> {
        persist(&*self.ticket_types_repo, &self.ticket_types, self.save_errors).await
    }

    async fn save_tickets(&self) -> Result<()> {
        persist(&*self.tickets_repo, &self.tickets, self.save_errors).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ticket types
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn add_ticket_type(&mut self, ticket_type: TicketType) -> Result<TicketTypeId> {
        if ticket_type.quantity < ticket_type.sold {
            return Err(EventPassError::QuantityBelowSold {
                quantity: ticket_type.quantity,
                sold: ticket_type.sold,
            });
        }

        let id = ticket_type.id.clone();
        tracing::debug!(ticket_type_id = %id, event_id = %ticket_type.event_id, "adding ticket type");

        self.ticket_types.push(ticket_type);
        self.save_ticket_types().await?;
        Ok(id)
    }

    /// Apply `edit` to a ticket type. Returns `None` if it does not exist.
    ///
    /// `sold` is maintained by issuing and cancelling; the new quantity
    /// may not drop below it.
    pub async fn update_ticket_type(
        &mut self,
        id: &TicketTypeId,
        edit: impl FnOnce(&mut TicketType),
    ) -> Result<Option<TicketType>> {
        let Some(ticket_type) = self.ticket_types.iter_mut().find(|t| &t.id == id) else {
            return Ok(None);
        };

        let mut edited = ticket_type.clone();
        edit(&mut edited);
        edited.id = ticket_type.id.clone();
        edited.event_id = ticket_type.event_id.clone();
        edited.sold = ticket_type.sold;
        edited.created_at = ticket_type.created_at;
        if edited.quantity < edited.sold {
            return Err(EventPassError::QuantityBelowSold {
                quantity: edited.quantity,
                sold: edited.sold,
            });
        }
        edited.updated_at = now_millis();
        *ticket_type = edited.clone();

        self.save_ticket_types().await?;
        Ok(Some(edited))
    }

    /// Delete a ticket type that has no live tickets.
    pub async fn delete_ticket_type(&mut self, id: &TicketTypeId) -> Result<bool> {
        let live = self
            .tickets
            .iter()
            .filter(|t| &t.ticket_type_id == id && t.status != TicketStatus::Cancelled)
            .count();
        if live > 0 {
            return Err(EventPassError::TicketTypeInUse {
                id: id.clone(),
                tickets: live,
            });
        }

        let before = self.ticket_types.len();
        self.ticket_types.retain(|t| &t.id != id);
        if self.ticket_types.len() == before {
            return Ok(false);
        }

        self.save_ticket_types().await?;
        Ok(true)
    }

    pub fn ticket_type(&self, id: &TicketTypeId) -> Option<&TicketType> {
        self.ticket_types.iter().find(|t| &t.id == id)
    }

    pub fn ticket_types_for_event(&self, event_id: &EventId) -> Vec<&TicketType> {
        self.ticket_types
            .iter()
            .filter(|t| &t.event_id == event_id)
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tickets
    // ─────────────────────────────────────────────────────────────────────────

    /// Issue one ticket of `ticket_type_id`, taking a seat.
    pub async fn issue_ticket(
        &mut self,
        ticket_type_id: &TicketTypeId,
        holder_name: impl Into<String>,
        holder_email: impl Into<String>,
    ) -> Result<Ticket> {
        let ticket_type = self
            .ticket_types
            .iter_mut()
            .find(|t| &t.id == ticket_type_id)
            .ok_or_else(|| EventPassError::not_found("ticket type", ticket_type_id))?;

        if !ticket_type.active {
            return Err(EventPassError::Inactive(ticket_type_id.clone()));
        }
        if ticket_type.is_sold_out() {
            return Err(EventPassError::SoldOut(ticket_type_id.clone()));
        }

        let now = now_millis();
        ticket_type.sold += 1;
        ticket_type.updated_at = now;

        let ticket = Ticket {
            id: TicketId::generate(),
            event_id: ticket_type.event_id.clone(),
            ticket_type_id: ticket_type_id.clone(),
            holder_name: holder_name.into(),
            holder_email: holder_email.into(),
            status: TicketStatus::Valid,
            purchased_at: now,
            checked_in_at: None,
        };
        tracing::debug!(ticket_id = %ticket.id, ticket_type_id = %ticket_type_id, "issuing ticket");

        self.tickets.push(ticket.clone());
        self.save_ticket_types().await?;
        self.save_tickets().await?;
        Ok(ticket)
    }

    /// Check a valid ticket in.
    pub async fn check_in(&mut self, id: &TicketId) -> Result<Ticket> {
        let ticket = self
            .tickets
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| EventPassError::not_found("ticket", id))?;

        ticket.status = ticket.status.transition(TicketStatus::CheckedIn)?;
        ticket.checked_in_at = Some(now_millis());
        let checked_in = ticket.clone();

        self.save_tickets().await?;
        Ok(checked_in)
    }

    /// Cancel a valid ticket and release its seat.
    pub async fn cancel_ticket(&mut self, id: &TicketId) -> Result<Ticket> {
        let ticket = self
            .tickets
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| EventPassError::not_found("ticket", id))?;

        ticket.status = ticket.status.transition(TicketStatus::Cancelled)?;
        let cancelled = ticket.clone();

        if let Some(ticket_type) = self
            .ticket_types
            .iter_mut()
            .find(|t| t.id == cancelled.ticket_type_id)
        {
            ticket_type.sold = ticket_type.sold.saturating_sub(1);
            ticket_type.updated_at = now_millis();
        }

        self.save_ticket_types().await?;
        self.save_tickets().await?;
        Ok(cancelled)
    }

    pub fn ticket(&self, id: &TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| &t.id == id)
    }

    pub fn tickets_for_event(&self, event_id: &EventId) -> Vec<&Ticket> {
        self.tickets
            .iter()
            .filter(|t| &t.event_id == event_id)
            .collect()
    }

    /// Counters for one event.
    pub fn ticket_stats(&self, event_id: &EventId) -> TicketStats {
        let mut stats = TicketStats::default();

        for ticket_type in self.ticket_types_for_event(event_id) {
            stats.capacity += u64::from(ticket_type.quantity);
            stats.sold += u64::from(ticket_type.sold);
            stats.revenue_cents = stats
                .revenue_cents
                .saturating_add(u64::from(ticket_type.sold).saturating_mul(ticket_type.price_cents));
        }

        for ticket in self.tickets_for_event(event_id) {
            match ticket.status {
                TicketStatus::CheckedIn => stats.checked_in += 1,
                TicketStatus::Cancelled => stats.cancelled += 1,
                TicketStatus::Valid => {}
            }
        }

        stats
    }
}
