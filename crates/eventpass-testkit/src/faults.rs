//! Fault injection for storage tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use eventpass_store::{KvStore, MemoryStore, Result, StoreError};

/// Wraps a store and rejects every write while failing is switched on.
///
/// Reads always pass through, so a test can switch failures on, mutate,
/// and then inspect what actually reached the inner store.
#[derive(Debug, Default)]
pub struct FaultyStore<S = MemoryStore> {
    inner: S,
    fail_writes: AtomicBool,
    rejected: AtomicUsize,
}

impl<S: KvStore> FaultyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_writes: AtomicBool::new(false),
            rejected: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of writes rejected so far.
    pub fn rejected(&self) -> usize {
        self.rejected.load(Ordering::SeqCst)
    }

    fn check_write(&self, key: &str) -> Result<()> {
        if !self.fail_writes.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.rejected.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::WriteRejected {
            key: key.to_string(),
            reason: "injected fault".to_string(),
        })
    }
}

#[async_trait]
impl<S: KvStore> KvStore for FaultyStore<S> {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.check_write(key)?;
        self.inner.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.check_write(key)?;
        self.inner.remove_item(key).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.inner.keys().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_toggle() {
        let store = FaultyStore::new(MemoryStore::new());

        store.set_item("a", "1").await.unwrap();
        store.set_fail_writes(true);
        assert!(matches!(
            store.set_item("b", "2").await,
            Err(StoreError::WriteRejected { ref key, .. }) if key == "b"
        ));
        assert!(store.remove_item("a").await.is_err());

        store.set_fail_writes(false);
        assert_eq!(store.keys().await.unwrap(), vec!["a".to_string()]);
        assert_eq!(store.rejected(), 2);
    }
}
