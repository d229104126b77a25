//! Actors: the users attempting operations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{OrganizationId, UserId};

/// Role of an actor.
///
/// Roles are ordered from most to least privileged, but the permission
/// evaluator matches on them explicitly rather than comparing ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform-wide administrator.
    SuperAdmin,
    /// Administrator of a seller organization.
    SellerAdmin,
    /// Organization member helping run events.
    Collaborator,
    /// Read-only account.
    Viewer,
}

impl Role {
    /// All roles, most privileged first.
    pub const ALL: [Role; 4] = [
        Role::SuperAdmin,
        Role::SellerAdmin,
        Role::Collaborator,
        Role::Viewer,
    ];

    /// Whether this is one of the two administrator roles.
    pub fn is_admin(self) -> bool {
        matches!(self, Role::SuperAdmin | Role::SellerAdmin)
    }

    /// The snake_case name used in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::SellerAdmin => "seller_admin",
            Role::Collaborator => "collaborator",
            Role::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated actor.
///
/// Identity is immutable. Role and organization change only through admin
/// action, modelled here as builders that return a modified copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<OrganizationId>,
}

impl User {
    /// Create a user with no organization.
    pub fn new(id: impl Into<UserId>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            email: String::new(),
            role,
            organization_id: None,
        }
    }

    /// Set display name and email.
    pub fn with_profile(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.name = name.into();
        self.email = email.into();
        self
    }

    /// Assign a role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Move the user into an organization.
    pub fn with_organization(mut self, org: impl Into<OrganizationId>) -> Self {
        self.organization_id = Some(org.into());
        self
    }
}
