//! Newtype wrappers for identifiers to ensure type safety.
//!
//! Ids are UUID v7: unique even when created within the same millisecond,
//! and ordered by creation time.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Create an id from an existing string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a new time-ordered id.
            pub fn generate() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            /// Get the inner string reference.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

define_id!(
    /// Unique identifier for a Message.
    MessageId
);

define_id!(
    /// Unique identifier for a Conversation.
    ConversationId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_is_unique_under_rapid_creation() {
        let ids: HashSet<MessageId> = (0..1_000).map(|_| MessageId::generate()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn test_generate_orders_by_creation() {
        let ids: Vec<ConversationId> = (0..1_000).map(|_| ConversationId::generate()).collect();
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_id_display() {
        let id = ConversationId::new("conv-123");
        assert_eq!(format!("{}", id), "conv-123");
        assert_eq!(id.as_str(), "conv-123");
    }
}
