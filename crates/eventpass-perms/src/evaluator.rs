//! Permission evaluation.
//!
//! All decisions are pure functions of the event, the actor, and the
//! policy. The evaluator never mutates the event and never fails: the
//! `require` variant only reshapes a `false` into an error.

use eventpass_core::{Event, OrganizationId, Role, User};

use crate::capability::{Capability, CapabilityFamily, EventCapabilities};
use crate::error::{PermsError, Result};
use crate::policy::PermissionPolicy;

/// Evaluates capabilities under a fixed policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PermissionEvaluator {
    policy: PermissionPolicy,
}

impl PermissionEvaluator {
    /// Create an evaluator with the given policy.
    pub fn new(policy: PermissionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PermissionPolicy {
        &self.policy
    }

    /// Whether `actor` created `event`.
    pub fn is_event_owner(&self, event: &Event, actor: Option<&User>) -> bool {
        actor.is_some_and(|a| a.id == event.created_by)
    }

    /// Decide one capability.
    pub fn evaluate(&self, capability: Capability, event: &Event, actor: Option<&User>) -> bool {
        let family = capability.family();
        if family == CapabilityFamily::Public {
            return true;
        }

        let Some(actor) = actor else {
            return false;
        };

        if actor.id == event.created_by {
            return true;
        }

        let same_org = self.policy.org_match.matches(
            actor.organization_id.as_ref(),
            event.organization_id.as_ref(),
        );

        match (family, actor.role) {
            (CapabilityFamily::Edit, role) if role.is_admin() => true,
            (CapabilityFamily::Edit, Role::Collaborator) => same_org,
            (CapabilityFamily::OrgScoped, role) if role.is_admin() => same_org,
            _ => false,
        }
    }

    /// Decide every capability at once.
    pub fn capabilities(&self, event: &Event, actor: Option<&User>) -> EventCapabilities {
        let eval = |c| self.evaluate(c, event, actor);
        EventCapabilities {
            can_edit: eval(Capability::Edit),
            can_delete: eval(Capability::Delete),
            can_manage_settings: eval(Capability::ManageSettings),
            can_manage_tickets: eval(Capability::ManageTickets),
            can_manage_attendees: eval(Capability::ManageAttendees),
            can_manage_prizes: eval(Capability::ManagePrizes),
            can_send_messages: eval(Capability::SendMessages),
            can_view: eval(Capability::View),
        }
    }

    /// Like [`evaluate`](Self::evaluate), but a denial becomes an error.
    pub fn require(&self, capability: Capability, event: &Event, actor: Option<&User>) -> Result<()> {
        if self.evaluate(capability, event, actor) {
            return Ok(());
        }

        Err(match actor {
            None => PermsError::Unauthenticated {
                capability,
                event_id: event.id.clone(),
            },
            Some(actor) => PermsError::Denied {
                capability,
                event_id: event.id.clone(),
                actor: actor.id.clone(),
            },
        })
    }

    /// Whether `actor` may create events at all.
    pub fn can_create_event(&self, actor: Option<&User>) -> bool {
        actor.is_some_and(|a| a.role != Role::Viewer)
    }

    /// Whether `actor` may change other users' roles and organizations.
    pub fn can_manage_users(&self, actor: Option<&User>) -> bool {
        actor.is_some_and(|a| a.role == Role::SuperAdmin)
    }

    /// Whether `actor` may administer `org`.
    pub fn can_manage_organization(&self, actor: Option<&User>, org: Option<&OrganizationId>) -> bool {
        match actor {
            Some(a) if a.role == Role::SuperAdmin => true,
            Some(a) if a.role == Role::SellerAdmin => {
                self.policy.org_match.matches(a.organization_id.as_ref(), org)
            }
            _ => false,
        }
    }
}

// Free functions under the default policy, for call sites that don't
// carry an evaluator around.

pub fn is_event_owner(event: &Event, actor: Option<&User>) -> bool {
    PermissionEvaluator::default().is_event_owner(event, actor)
}

pub fn can_edit_event(event: &Event, actor: Option<&User>) -> bool {
    PermissionEvaluator::default().evaluate(Capability::Edit, event, actor)
}

pub fn can_delete_event(event: &Event, actor: Option<&User>) -> bool {
    PermissionEvaluator::default().evaluate(Capability::Delete, event, actor)
}

pub fn can_manage_settings(event: &Event, actor: Option<&User>) -> bool {
    PermissionEvaluator::default().evaluate(Capability::ManageSettings, event, actor)
}

pub fn can_manage_tickets(event: &Event, actor: Option<&User>) -> bool {
    PermissionEvaluator::default().evaluate(Capability::ManageTickets, event, actor)
}

pub fn can_manage_attendees(event: &Event, actor: Option<&User>) -> bool {
    PermissionEvaluator::default().evaluate(Capability::ManageAttendees, event, actor)
}

pub fn can_manage_prizes(event: &Event, actor: Option<&User>) -> bool {
    PermissionEvaluator::default().evaluate(Capability::ManagePrizes, event, actor)
}

pub fn can_send_messages(event: &Event, actor: Option<&User>) -> bool {
    PermissionEvaluator::default().evaluate(Capability::SendMessages, event, actor)
}

/// Always true: events are publicly readable.
pub fn can_view_event(event: &Event, actor: Option<&User>) -> bool {
    PermissionEvaluator::default().evaluate(Capability::View, event, actor)
}

pub fn can_create_event(actor: Option<&User>) -> bool {
    PermissionEvaluator::default().can_create_event(actor)
}

pub fn can_manage_users(actor: Option<&User>) -> bool {
    PermissionEvaluator::default().can_manage_users(actor)
}

pub fn can_manage_organization(actor: Option<&User>, org: Option<&OrganizationId>) -> bool {
    PermissionEvaluator::default().can_manage_organization(actor, org)
}
