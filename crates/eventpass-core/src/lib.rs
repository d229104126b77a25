//! # EventPass Core
//!
//! Plain data structures shared by every EventPass crate: actors, events,
//! and the records kept by the local persistent-store contexts.
//!
//! This crate contains no I/O, no storage, no permission logic. It is the
//! vocabulary the other crates speak.
//!
//! ## Key Types
//!
//! - [`User`] / [`Role`] - The actor attempting an operation
//! - [`Event`] - An event owned by a creator, optionally scoped to an organization
//! - [`MessageTemplate`], [`ScheduledMessage`], [`MessageHistory`],
//!   [`AutomatedNotification`] - Messaging records, each scoped to an event
//! - [`TicketType`], [`Ticket`] - Ticketing records, each scoped to an event
//! - [`AppSettings`] - Device-wide preferences
//!
//! ## Serialization
//!
//! Records serialize as camelCase JSON objects and enums as snake_case
//! strings, matching the layout the contexts write to device storage.

pub mod error;
pub mod event;
pub mod messaging;
pub mod settings;
pub mod ticket;
pub mod time;
pub mod types;
pub mod user;

pub use error::{CoreError, Result};
pub use event::Event;
pub use messaging::{
    AutomatedNotification, DeliveryStatus, MessageChannel, MessageHistory, MessageStatus,
    MessageTemplate, NotificationKind, NotificationTrigger, Recipient, ScheduledMessage,
};
pub use settings::{AppSettings, NotificationPreferences};
pub use ticket::{Ticket, TicketStatus, TicketType};
pub use time::now_millis;
pub use types::{
    AttendeeId, EventId, HistoryId, MessageId, NotificationId, OrganizationId, TemplateId,
    TicketId, TicketTypeId, UserId,
};
pub use user::{Role, User};
