//! Ticketing records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::types::{EventId, TicketId, TicketTypeId};

/// A kind of ticket sold for an event, with a fixed capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketType {
    pub id: TicketTypeId,
    pub event_id: EventId,
    pub name: String,
    pub price_cents: u64,
    pub currency: String,
    pub quantity: u32,
    #[serde(default)]
    pub sold: u32,
    pub active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TicketType {
    /// Create an active ticket type with a fresh id and nothing sold.
    pub fn new(
        event_id: EventId,
        name: impl Into<String>,
        price_cents: u64,
        currency: impl Into<String>,
        quantity: u32,
        now: i64,
    ) -> Self {
        Self {
            id: TicketTypeId::generate(),
            event_id,
            name: name.into(),
            price_cents,
            currency: currency.into(),
            quantity,
            sold: 0,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Seats left to sell.
    pub fn remaining(&self) -> u32 {
        self.quantity.saturating_sub(self.sold)
    }

    pub fn is_sold_out(&self) -> bool {
        self.remaining() == 0
    }
}

/// State of an issued ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Valid,
    CheckedIn,
    Cancelled,
}

impl TicketStatus {
    /// Valid tickets can be checked in or cancelled; the rest is terminal.
    pub fn transition(self, next: TicketStatus) -> Result<TicketStatus> {
        match (self, next) {
            (TicketStatus::Valid, TicketStatus::CheckedIn)
            | (TicketStatus::Valid, TicketStatus::Cancelled) => Ok(next),
            _ => Err(CoreError::InvalidTicketTransition {
                from: self,
                to: next,
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Valid => "valid",
            TicketStatus::CheckedIn => "checked_in",
            TicketStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ticket issued to an attendee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub event_id: EventId,
    pub ticket_type_id: TicketTypeId,
    pub holder_name: String,
    pub holder_email: String,
    pub status: TicketStatus,
    pub purchased_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_in_at: Option<i64>,
}
