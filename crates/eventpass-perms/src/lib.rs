//! # EventPass Permissions
//!
//! Role-based access decisions for events.
//!
//! ## Overview
//!
//! Every screen asks the evaluator before offering an action. The evaluator
//! is a pure, total function of `(capability, event, actor)`: no state, no
//! I/O, no panics. An absent actor or a mismatched organization simply
//! yields `false`.
//!
//! ## Decision Shape
//!
//! 1. No actor → deny
//! 2. Actor created the event → allow
//! 3. Admin roles → allow the edit family everywhere; allow the
//!    org-scoped family only inside their organization
//! 4. Collaborator in the event's organization → allow the edit family
//! 5. Otherwise → deny
//!
//! Viewing is always allowed.
//!
//! ## Usage
//!
//! ```rust
//! use eventpass_core::{Event, Role, User};
//! use eventpass_perms::{can_delete_event, can_edit_event};
//!
//! let event = Event::new("evt-1", "owner").with_organization("org-1");
//! let collaborator = User::new("helper", Role::Collaborator).with_organization("org-1");
//!
//! assert!(can_edit_event(&event, Some(&collaborator)));
//! assert!(!can_delete_event(&event, Some(&collaborator)));
//! ```

pub mod capability;
pub mod error;
pub mod evaluator;
pub mod policy;

pub use capability::{Capability, CapabilityFamily, EventCapabilities};
pub use error::{PermsError, Result};
pub use evaluator::{
    can_create_event, can_delete_event, can_edit_event, can_manage_attendees,
    can_manage_organization, can_manage_prizes, can_manage_settings, can_manage_tickets,
    can_manage_users, can_send_messages, can_view_event, is_event_owner, PermissionEvaluator,
};
pub use policy::{OrgMatchPolicy, PermissionPolicy};
