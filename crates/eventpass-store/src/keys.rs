//! Fixed storage keys, one per collection.

use std::fmt;

/// A persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    MessageTemplates,
    ScheduledMessages,
    MessageHistory,
    AutomatedNotifications,
    AppSettings,
    TicketTypes,
    Tickets,
}

impl CollectionKey {
    /// Every collection key.
    pub const ALL: [CollectionKey; 7] = [
        CollectionKey::MessageTemplates,
        CollectionKey::ScheduledMessages,
        CollectionKey::MessageHistory,
        CollectionKey::AutomatedNotifications,
        CollectionKey::AppSettings,
        CollectionKey::TicketTypes,
        CollectionKey::Tickets,
    ];

    /// Unprefixed key name.
    pub fn name(self) -> &'static str {
        match self {
            CollectionKey::MessageTemplates => "message_templates",
            CollectionKey::ScheduledMessages => "scheduled_messages",
            CollectionKey::MessageHistory => "message_history",
            CollectionKey::AutomatedNotifications => "automated_notifications",
            CollectionKey::AppSettings => "app_settings",
            CollectionKey::TicketTypes => "ticket_types",
            CollectionKey::Tickets => "tickets",
        }
    }

    /// Full key as written to the store.
    pub fn storage_key(self, prefix: &str) -> String {
        format!("{}{}", prefix, self.name())
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
