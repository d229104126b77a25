//! Storage traits: raw key-value access and typed repositories.

use async_trait::async_trait;

use crate::error::Result;

/// Async key-value store holding string values under string keys.
///
/// This mirrors the device storage the app runs against: no transactions,
/// no per-record access, last write wins.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove_item(&self, key: &str) -> Result<()>;

    /// List all keys, sorted.
    async fn keys(&self) -> Result<Vec<String>>;
}

/// Typed load/save interface for one persisted value.
///
/// Contexts program against this instead of [`KvStore`], so the
/// whole-collection layout can be swapped without touching them.
#[async_trait]
pub trait Repository<T>: Send + Sync {
    /// Key or location this repository persists to, for logging.
    fn location(&self) -> &str;

    /// Load the stored value. `Ok(None)` means nothing has been stored yet.
    async fn load(&self) -> Result<Option<T>>;

    /// Persist `value`, replacing whatever was stored.
    async fn save(&self, value: &T) -> Result<()>;

    /// Drop the stored value.
    async fn clear(&self) -> Result<()>;
}
