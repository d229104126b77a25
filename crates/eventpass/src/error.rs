//! Error types for EventPass.

use eventpass_core::{CoreError, EventId, MessageId, MessageStatus, TicketTypeId};
use eventpass_perms::PermsError;
use eventpass_store::StoreError;
use thiserror::Error;

/// Errors that can occur during EventPass operations.
#[derive(Debug, Error)]
pub enum EventPassError {
    /// Data model rule violated (e.g. a status transition).
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Permission error.
    #[error("permission error: {0}")]
    Permission(#[from] PermsError),

    /// A record an operation needs to act on does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A record belongs to a different event than the one authorized.
    #[error("record belongs to event {found}, not {expected}")]
    EventMismatch { expected: EventId, found: EventId },

    /// Message content can no longer change.
    #[error("message {id} is {status} and can no longer be edited")]
    NotEditable { id: MessageId, status: MessageStatus },

    /// No seats left on a ticket type.
    #[error("ticket type {0} is sold out")]
    SoldOut(TicketTypeId),

    /// Ticket type is not on sale.
    #[error("ticket type {0} is not active")]
    Inactive(TicketTypeId),

    /// Ticket type still has live tickets.
    #[error("ticket type {id} still has {tickets} live ticket(s)")]
    TicketTypeInUse { id: TicketTypeId, tickets: usize },

    /// Capacity set below what has already been sold.
    #[error("quantity {quantity} is below the {sold} ticket(s) already sold")]
    QuantityBelowSold { quantity: u32, sold: u32 },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl EventPassError {
    pub(crate) fn not_found(kind: &'static str, id: impl ToString) -> Self {
        EventPassError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Result type for EventPass operations.
pub type Result<T> = std::result::Result<T, EventPassError>;
