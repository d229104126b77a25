//! Error types for the EventPass core.

use thiserror::Error;

use crate::messaging::MessageStatus;
use crate::ticket::TicketStatus;

/// Errors raised by core data model operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// An identifier was empty or malformed.
    #[error("invalid identifier: {0:?}")]
    InvalidId(String),

    /// A scheduled message cannot move between these statuses.
    #[error("invalid message status transition: {from} -> {to}")]
    InvalidMessageTransition {
        from: MessageStatus,
        to: MessageStatus,
    },

    /// A ticket cannot move between these statuses.
    #[error("invalid ticket status transition: {from} -> {to}")]
    InvalidTicketTransition {
        from: TicketStatus,
        to: TicketStatus,
    },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
