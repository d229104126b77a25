//! Strong type definitions for EventPass identifiers.
//!
//! All identifiers are string newtypes to prevent misuse at compile time:
//! an `EventId` can never be passed where a `UserId` is expected.

use rand::RngCore;

/// Number of random bytes in a generated record id.
pub const GENERATED_ID_BYTES: usize = 16;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Parse an identifier, rejecting empty or whitespace-only input.
            pub fn parse(id: &str) -> crate::error::Result<Self> {
                let trimmed = id.trim();
                if trimmed.is_empty() {
                    return Err(crate::error::CoreError::InvalidId(id.to_string()));
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Generate a fresh random identifier.
            pub fn generate() -> Self {
                Self(random_hex())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identity of an actor (user account).
    UserId
);
string_id!(
    /// Identity of an organization that scopes users and events.
    OrganizationId
);
string_id!(
    /// Identity of an event.
    EventId
);
string_id!(
    /// Identity of an attendee receiving messages.
    AttendeeId
);
string_id!(
    /// Identity of a message template.
    TemplateId
);
string_id!(
    /// Identity of a scheduled message.
    MessageId
);
string_id!(
    /// Identity of a message history record.
    HistoryId
);
string_id!(
    /// Identity of an automated notification.
    NotificationId
);
string_id!(
    /// Identity of a ticket type.
    TicketTypeId
);
string_id!(
    /// Identity of an issued ticket.
    TicketId
);

/// Random hex string used for generated record ids.
fn random_hex() -> String {
    let mut bytes = [0u8; GENERATED_ID_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
