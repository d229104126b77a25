//! Events.

use serde::{Deserialize, Serialize};

use crate::types::{EventId, OrganizationId, UserId};

/// An event, owned by the actor that created it.
///
/// The permission evaluator only reads `created_by` and `organization_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub created_by: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<OrganizationId>,
    /// Start time (Unix ms), anchors `before_event` notification triggers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<i64>,
}

impl Event {
    /// Create an event with no organization and no start time.
    pub fn new(id: impl Into<EventId>, created_by: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            created_by: created_by.into(),
            organization_id: None,
            starts_at: None,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Scope the event to an organization.
    pub fn with_organization(mut self, org: impl Into<OrganizationId>) -> Self {
        self.organization_id = Some(org.into());
        self
    }

    /// Set the start time.
    pub fn starting_at(mut self, starts_at: i64) -> Self {
        self.starts_at = Some(starts_at);
        self
    }
}
