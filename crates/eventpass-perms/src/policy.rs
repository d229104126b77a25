//! Tunable permission policy.

use serde::{Deserialize, Serialize};

use eventpass_core::OrganizationId;

/// How two possibly-unset organization ids are compared.
///
/// Historically an event with no organization and an actor with no
/// organization were treated as matching. That behavior is kept as the
/// default and named here so it can be switched off deliberately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgMatchPolicy {
    /// Unset equals unset: org-less admins may manage org-less events.
    #[default]
    UnsetMatchesUnset,
    /// A match needs both ids present and equal.
    RequireExplicit,
}

impl OrgMatchPolicy {
    /// Compare an actor's organization with an event's.
    pub fn matches(self, actor: Option<&OrganizationId>, event: Option<&OrganizationId>) -> bool {
        match self {
            OrgMatchPolicy::UnsetMatchesUnset => actor == event,
            OrgMatchPolicy::RequireExplicit => matches!((actor, event), (Some(a), Some(e)) if a == e),
        }
    }
}

/// Policy knobs for the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionPolicy {
    pub org_match: OrgMatchPolicy,
}

impl PermissionPolicy {
    pub fn with_org_match(mut self, org_match: OrgMatchPolicy) -> Self {
        self.org_match = org_match;
        self
    }
}
