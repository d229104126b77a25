//! Whole-value JSON repository over a [`KvStore`].

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};
use crate::traits::{KvStore, Repository};

/// One JSON value persisted under a single key.
///
/// Every save serializes and rewrites the entire value. Collections are
/// stored as `JsonSlot<S, Vec<T>>`, so a one-record change rewrites the
/// whole array.
pub struct JsonSlot<S, T> {
    store: Arc<S>,
    key: String,
    _value: PhantomData<fn() -> T>,
}

impl<S: KvStore, T> JsonSlot<S, T> {
    /// Bind a slot to `key` in `store`.
    pub fn new(store: Arc<S>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            _value: PhantomData,
        }
    }

    /// The storage key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl<S, T> Repository<T> for JsonSlot<S, T>
where
    S: KvStore + 'static,
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    fn location(&self) -> &str {
        &self.key
    }

    async fn load(&self) -> Result<Option<T>> {
        let Some(raw) = self.store.get_item(&self.key).await? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Serialization {
                key: self.key.clone(),
                source,
            })
    }

    async fn save(&self, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialization {
            key: self.key.clone(),
            source,
        })?;

        self.store.set_item(&self.key, &raw).await?;
        tracing::trace!(key = %self.key, bytes = raw.len(), "saved slot");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.store.remove_item(&self.key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use eventpass_core::{EventId, MessageChannel, MessageTemplate};

    #[tokio::test]
    async fn test_missing_key_loads_none() {
        let store = Arc::new(MemoryStore::new());
        let slot: JsonSlot<_, Vec<MessageTemplate>> = JsonSlot::new(store, "templates");

        assert_eq!(slot.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_order() {
        let store = Arc::new(MemoryStore::new());
        let slot: JsonSlot<_, Vec<MessageTemplate>> = JsonSlot::new(store.clone(), "templates");

        let templates: Vec<_> = (0..5)
            .map(|i| {
                MessageTemplate::new(
                    EventId::new(format!("evt-{}", i % 2)),
                    format!("t{}", i),
                    "s",
                    "b",
                    MessageChannel::Email,
                    i,
                )
            })
            .collect();

        slot.save(&templates).await.unwrap();

        // A second slot over the same store sees the same data.
        let reopened: JsonSlot<_, Vec<MessageTemplate>> = JsonSlot::new(store, "templates");
        assert_eq!(reopened.load().await.unwrap(), Some(templates));
    }

    #[tokio::test]
    async fn test_corrupt_value_is_serialization_error() {
        let store = Arc::new(MemoryStore::with_items([("templates", "{not json")]));
        let slot: JsonSlot<_, Vec<MessageTemplate>> = JsonSlot::new(store, "templates");

        let err = slot.load().await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization { ref key, .. } if key == "templates"));
    }

    #[tokio::test]
    async fn test_clear_removes_value() {
        let store = Arc::new(MemoryStore::new());
        let slot: JsonSlot<_, Vec<u32>> = JsonSlot::new(store.clone(), "numbers");

        slot.save(&vec![1, 2]).await.unwrap();
        slot.clear().await.unwrap();

        assert!(store.keys().await.unwrap().is_empty());
    }
}
