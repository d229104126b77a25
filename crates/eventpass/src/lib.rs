//! # EventPass
//!
//! Local persistent-store contexts for an event-management app, with
//! role-based permission gating.
//!
//! ## Overview
//!
//! - **Messaging**: templates, scheduled messages, delivery history and
//!   automated notifications
//! - **Settings**: device-wide app settings
//! - **Tickets**: ticket types with capacity, issued tickets, check-in
//! - **Permissions**: per-event capabilities derived from role, ownership
//!   and organization
//!
//! Each context loads its collections once, serves reads from memory, and
//! rewrites a whole collection under its key after every mutation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use eventpass::{EventPass, EventPassConfig};
//! use eventpass::core::{Event, Role, User};
//! use eventpass::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("eventpass.db").unwrap();
//!     let mut app = EventPass::new(store, EventPassConfig::default());
//!     app.load().await;
//!
//!     let event = Event::new("evt-1", "owner").with_organization("org-1");
//!     let helper = User::new("helper", Role::Collaborator).with_organization("org-1");
//!
//!     // Seed the default notifications for the event.
//!     app.initialize_event_notifications_as(&event, Some(&helper))
//!         .await
//!         .unwrap();
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `eventpass::core` - Data model (users, events, messages, tickets)
//! - `eventpass::perms` - Permission evaluator
//! - `eventpass::store` - Key-value stores and repositories

pub mod app;
pub mod config;
pub mod context;
pub mod error;

pub use eventpass_core as core;
pub use eventpass_perms as perms;
pub use eventpass_store as store;

pub use app::EventPass;
pub use config::{EventPassConfig, SaveErrorPolicy, StorageConfig, DEFAULT_KEY_PREFIX};
pub use context::{
    DeliveryFailure, LoadState, MessageDispatcher, MessageStats, MessagingContext, SendResult,
    SettingsContext, SimulatedDispatcher, TicketStats, TicketsContext,
};
pub use error::{EventPassError, Result};
