//! Message delivery seam.

use async_trait::async_trait;
use thiserror::Error;

use eventpass_core::{Recipient, ScheduledMessage};

/// Why a single delivery did not go through.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("delivery failed: {reason}")]
pub struct DeliveryFailure {
    pub reason: String,
}

impl DeliveryFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Delivers a message to one recipient.
///
/// The messaging context calls this once per recipient and records the
/// outcome in history; it never retries.
#[async_trait]
pub trait MessageDispatcher: Send + Sync {
    async fn deliver(
        &self,
        message: &ScheduledMessage,
        recipient: &Recipient,
    ) -> Result<(), DeliveryFailure>;
}

/// Stand-in transport that reports every delivery as sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedDispatcher;

#[async_trait]
impl MessageDispatcher for SimulatedDispatcher {
    async fn deliver(
        &self,
        message: &ScheduledMessage,
        recipient: &Recipient,
    ) -> Result<(), DeliveryFailure> {
        tracing::trace!(message_id = %message.id, to = %recipient.contact, "simulated delivery");
        Ok(())
    }
}
