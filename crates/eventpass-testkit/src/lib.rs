//! # EventPass Testkit
//!
//! Testing utilities for EventPass.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a memory-backed app plus one actor per role
//! - **Generators**: Proptest strategies for users, events and roles
//! - **Faults**: a store wrapper that rejects writes on demand
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use eventpass_testkit::generators::{event, user};
//!
//! proptest! {
//!     #[test]
//!     fn view_is_public(event in event(), actor in user()) {
//!         prop_assert!(eventpass_perms::can_view_event(&event, Some(&actor)));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use eventpass_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new("org-1");
//! let event = fixture.event("evt-1");
//! assert_eq!(event.created_by, fixture.owner.id);
//! ```

pub mod faults;
pub mod fixtures;
pub mod generators;

pub use faults::FaultyStore;
pub use fixtures::{multi_org_fixtures, recipients, TestFixture};
pub use generators::{event, org_id, role, user};
