//! Error types for the permissions module.

use thiserror::Error;

use eventpass_core::{EventId, UserId};

use crate::capability::Capability;

/// Errors that can occur during permission checks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PermsError {
    /// No actor is signed in.
    #[error("authentication required for {capability} on event {event_id}")]
    Unauthenticated {
        capability: Capability,
        event_id: EventId,
    },

    /// The actor lacks the capability.
    #[error("user {actor} may not {capability} on event {event_id}")]
    Denied {
        capability: Capability,
        event_id: EventId,
        actor: UserId,
    },
}

/// Result type for permission operations.
pub type Result<T> = std::result::Result<T, PermsError>;
