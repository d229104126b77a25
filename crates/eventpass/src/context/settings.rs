//! Settings context: one device-wide settings object.

use std::sync::Arc;

use eventpass_core::AppSettings;
use eventpass_store::{CollectionKey, JsonSlot, KvStore, Repository};

use crate::config::{SaveErrorPolicy, StorageConfig};
use crate::context::{load_or_default, persist, LoadState};
use crate::error::Result;

/// Owns the persisted [`AppSettings`].
pub struct SettingsContext {
    state: LoadState,
    settings: AppSettings,
    repo: Box<dyn Repository<AppSettings>>,
    save_errors: SaveErrorPolicy,
}

impl SettingsContext {
    pub fn new<S: KvStore + 'static>(store: Arc<S>, storage: &StorageConfig) -> Self {
        Self {
            state: LoadState::Uninitialized,
            settings: AppSettings::default(),
            repo: Box::new(JsonSlot::new(
                store,
                CollectionKey::AppSettings.storage_key(&storage.key_prefix),
            )),
            save_errors: storage.save_errors,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Load settings. A missing or unreadable value yields defaults.
    pub async fn load(&mut self) {
        self.state = LoadState::Loading;
        self.settings = load_or_default(&*self.repo).await;
        self.state = LoadState::Ready;
        tracing::info!(language = %self.settings.language, "settings context ready");
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Apply `edit` and persist the result.
    pub async fn update(&mut self, edit: impl FnOnce(&mut AppSettings)) -> Result<&AppSettings> {
        edit(&mut self.settings);
        tracing::debug!("updating settings");
        persist(&*self.repo, &self.settings, self.save_errors).await?;
        Ok(&self.settings)
    }

    /// Restore defaults and persist them.
    pub async fn reset(&mut self) -> Result<()> {
        self.settings = AppSettings::default();
        persist(&*self.repo, &self.settings, self.save_errors).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventpass_store::MemoryStore;

    #[tokio::test]
    async fn test_defaults_when_nothing_stored() {
        let store = Arc::new(MemoryStore::new());
        let mut ctx = SettingsContext::new(store, &StorageConfig::default());
        ctx.load().await;

        assert_eq!(ctx.settings(), &AppSettings::default());
        assert_eq!(ctx.state(), LoadState::Ready);
    }

    #[tokio::test]
    async fn test_update_persists() {
        let store = Arc::new(MemoryStore::new());
        let mut ctx = SettingsContext::new(Arc::clone(&store), &StorageConfig::default());
        ctx.load().await;

        ctx.update(|s| {
            s.language = "fr".into();
            s.notifications.sms = true;
        })
        .await
        .unwrap();

        let mut reloaded = SettingsContext::new(store, &StorageConfig::default());
        reloaded.load().await;
        assert_eq!(reloaded.settings().language, "fr");
        assert!(reloaded.settings().notifications.sms);
    }

    #[tokio::test]
    async fn test_corrupt_settings_fall_back() {
        let store = Arc::new(MemoryStore::with_items([("@eventpass/app_settings", "{oops")]));
        let mut ctx = SettingsContext::new(store, &StorageConfig::default());
        ctx.load().await;

        assert_eq!(ctx.settings(), &AppSettings::default());
    }

    #[tokio::test]
    async fn test_reset() {
        let store = Arc::new(MemoryStore::new());
        let mut ctx = SettingsContext::new(store, &StorageConfig::default());
        ctx.load().await;

        ctx.update(|s| s.currency = "EUR".into()).await.unwrap();
        ctx.reset().await.unwrap();
        assert_eq!(ctx.settings().currency, "USD");
    }
}
