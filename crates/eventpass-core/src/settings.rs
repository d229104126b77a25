//! Device-wide application settings.

use serde::{Deserialize, Serialize};

/// Which channels the organizer wants to be notified on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationPreferences {
    pub email: bool,
    pub push: bool,
    pub sms: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
            sms: false,
        }
    }
}

/// Preferences persisted as a single JSON object.
///
/// Every field falls back to its default, so older stored objects with
/// missing keys still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub notifications: NotificationPreferences,
    pub language: String,
    pub currency: String,
    pub timezone: String,
    pub date_format: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            notifications: NotificationPreferences::default(),
            language: "en".to_string(),
            currency: "USD".to_string(),
            timezone: "UTC".to_string(),
            date_format: "YYYY-MM-DD".to_string(),
        }
    }
}
