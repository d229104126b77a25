//! Proptest generators for property-based testing.

use proptest::prelude::*;

use eventpass_core::{Event, OrganizationId, Role, User};

/// Generate a role.
pub fn role() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::SuperAdmin),
        Just(Role::SellerAdmin),
        Just(Role::Collaborator),
        Just(Role::Viewer),
    ]
}

/// Generate an optional organization from a small pool, so that matches
/// and mismatches both show up often.
pub fn org_id() -> impl Strategy<Value = Option<OrganizationId>> {
    prop::option::of((1u8..=3).prop_map(|n| OrganizationId::new(format!("org-{n}"))))
}

/// Generate a user id from a small pool, so ownership shows up often.
pub fn user_id() -> impl Strategy<Value = String> {
    (1u8..=4).prop_map(|n| format!("user-{n}"))
}

/// Generate a user.
pub fn user() -> impl Strategy<Value = User> {
    (user_id(), role(), org_id()).prop_map(|(id, role, org)| {
        let mut user = User::new(id, role);
        user.organization_id = org;
        user
    })
}

/// Generate an event.
pub fn event() -> impl Strategy<Value = Event> {
    (user_id(), org_id(), 0i64..=1_900_000_000_000i64).prop_map(|(creator, org, starts_at)| {
        let mut event = Event::new("evt", creator).starting_at(starts_at);
        event.organization_id = org;
        event
    })
}
