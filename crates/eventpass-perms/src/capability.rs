//! Named capabilities and how they group.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A permission decision a screen may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Edit,
    Delete,
    ManageSettings,
    ManageTickets,
    ManageAttendees,
    ManagePrizes,
    SendMessages,
    View,
}

/// How a capability is decided for non-owners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityFamily {
    /// Admins anywhere, collaborators inside the event's organization.
    Edit,
    /// Admins inside the event's organization only.
    OrgScoped,
    /// Everyone, signed in or not.
    Public,
}

impl Capability {
    /// Every capability, in display order.
    pub const ALL: [Capability; 8] = [
        Capability::Edit,
        Capability::Delete,
        Capability::ManageSettings,
        Capability::ManageTickets,
        Capability::ManageAttendees,
        Capability::ManagePrizes,
        Capability::SendMessages,
        Capability::View,
    ];

    pub fn family(self) -> CapabilityFamily {
        match self {
            Capability::Edit
            | Capability::ManageSettings
            | Capability::ManageAttendees
            | Capability::ManagePrizes
            | Capability::SendMessages => CapabilityFamily::Edit,
            Capability::Delete | Capability::ManageTickets => CapabilityFamily::OrgScoped,
            Capability::View => CapabilityFamily::Public,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Capability::Edit => "edit",
            Capability::Delete => "delete",
            Capability::ManageSettings => "manage_settings",
            Capability::ManageTickets => "manage_tickets",
            Capability::ManageAttendees => "manage_attendees",
            Capability::ManagePrizes => "manage_prizes",
            Capability::SendMessages => "send_messages",
            Capability::View => "view",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every decision for one (event, actor) pair, computed at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCapabilities {
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_manage_settings: bool,
    pub can_manage_tickets: bool,
    pub can_manage_attendees: bool,
    pub can_manage_prizes: bool,
    pub can_send_messages: bool,
    pub can_view: bool,
}

impl EventCapabilities {
    /// Look up one decision.
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::Edit => self.can_edit,
            Capability::Delete => self.can_delete,
            Capability::ManageSettings => self.can_manage_settings,
            Capability::ManageTickets => self.can_manage_tickets,
            Capability::ManageAttendees => self.can_manage_attendees,
            Capability::ManagePrizes => self.can_manage_prizes,
            Capability::SendMessages => self.can_send_messages,
            Capability::View => self.can_view,
        }
    }

    /// Capabilities that were granted.
    pub fn granted(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|c| self.allows(*c))
            .collect()
    }
}
