//! Persistent-store contexts.
//!
//! Each context owns one domain's collections. It loads them from the
//! key-value store once, serves queries from memory, and rewrites the
//! whole affected collection after every mutation.
//!
//! Contexts are independent of each other and of the permission
//! evaluator; gating happens in [`EventPass`](crate::EventPass).

pub mod dispatch;
pub mod messaging;
pub mod settings;
pub mod tickets;

use eventpass_store::Repository;

use crate::config::SaveErrorPolicy;
use crate::error::Result;

/// Lifecycle of a context.
///
/// A context is only `Ready` once every collection read has settled,
/// successfully or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Uninitialized,
    Loading,
    Ready,
}

/// Load a value, falling back to its default on a miss or any failure.
///
/// Failures are logged and never propagated: one unreadable collection
/// must not keep the others from loading.
pub(crate) async fn load_or_default<T: Default>(repo: &dyn Repository<T>) -> T {
    match repo.load().await {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(key = repo.location(), error = %e, "failed to load collection, using default");
            T::default()
        }
    }
}

/// Persist a value under the configured save-error policy.
pub(crate) async fn persist<T>(
    repo: &dyn Repository<T>,
    value: &T,
    policy: SaveErrorPolicy,
) -> Result<()> {
    match repo.save(value).await {
        Ok(()) => Ok(()),
        Err(e) => match policy {
            SaveErrorPolicy::Propagate => Err(e.into()),
            SaveErrorPolicy::LogAndSwallow => {
                tracing::warn!(key = repo.location(), error = %e, "failed to save collection");
                Ok(())
            }
        },
    }
}

pub use dispatch::{DeliveryFailure, MessageDispatcher, SimulatedDispatcher};
pub use messaging::{MessageStats, MessagingContext, SendResult};
pub use settings::SettingsContext;
pub use tickets::{TicketStats, TicketsContext};
