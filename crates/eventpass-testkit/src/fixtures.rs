//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use eventpass::{EventPass, EventPassConfig};
use eventpass_core::{Event, OrganizationId, Recipient, Role, User};
use eventpass_store::MemoryStore;

/// One organization with an actor for every role.
///
/// `owner` creates the fixture's events and is a plain viewer, so any
/// capability it holds comes from ownership alone.
pub struct TestFixture {
    pub org: OrganizationId,
    pub owner: User,
    pub super_admin: User,
    pub seller_admin: User,
    pub collaborator: User,
    pub viewer: User,
}

impl TestFixture {
    pub fn new(org: &str) -> Self {
        let actor = |name: &str, role: Role| {
            User::new(format!("{org}-{name}"), role)
                .with_profile(name, format!("{name}@{org}.example"))
                .with_organization(org)
        };

        Self {
            org: OrganizationId::new(org),
            owner: actor("owner", Role::Viewer),
            super_admin: actor("super", Role::SuperAdmin),
            seller_admin: actor("seller", Role::SellerAdmin),
            collaborator: actor("collab", Role::Collaborator),
            viewer: actor("viewer", Role::Viewer),
        }
    }

    /// An event in this organization created by `owner`.
    pub fn event(&self, id: &str) -> Event {
        Event::new(id, self.owner.id.clone())
            .with_title(format!("Event {id}"))
            .with_organization(self.org.clone())
    }

    /// Every non-owner actor.
    pub fn members(&self) -> [&User; 4] {
        [
            &self.super_admin,
            &self.seller_admin,
            &self.collaborator,
            &self.viewer,
        ]
    }

    /// A loaded app over a fresh memory store.
    pub async fn app(&self) -> EventPass<MemoryStore> {
        let mut app = EventPass::new(MemoryStore::new(), EventPassConfig::default());
        app.load().await;
        app
    }
}

/// Fixtures for `count` distinct organizations.
pub fn multi_org_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| TestFixture::new(&format!("org-{}", i + 1)))
        .collect()
}

/// `count` recipients with distinct contacts.
pub fn recipients(count: usize) -> Vec<Recipient> {
    (0..count)
        .map(|i| {
            Recipient::new(
                format!("att-{i}"),
                format!("Attendee {i}"),
                format!("att-{i}@example.com"),
            )
        })
        .collect()
}
