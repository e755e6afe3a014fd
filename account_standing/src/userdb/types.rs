use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// A login account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    /// Database-assigned sequence number (primary key)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<i64>,
    /// Unique user identifier
    pub id: String,
    /// Login name, unique across the table
    pub username: String,
    /// PBKDF2 hash of the password, never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Whether the user is a staff (privileged) account
    pub is_staff: bool,
    /// When the user account was created
    pub created_at: DateTime<Utc>,
    /// When the user account was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, non-staff user with a fresh id
    pub fn new(username: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            sequence_number: None,
            id: uuid::Uuid::new_v4().to_string(),
            username,
            password_hash,
            is_staff: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Search field options for user lookup
#[derive(Debug, Clone)]
pub(crate) enum UserSearchField {
    /// Search by user id
    Id(String),
    /// Search by login name
    Username(String),
}

impl fmt::Display for UserSearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserSearchField::Id(id) => write!(f, "Id({id})"),
            UserSearchField::Username(username) => write!(f, "Username({username})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_user_new() {
        // Given a username and hash
        let user = User::new("good_user".to_string(), "hash".to_string());

        // Then the user is a fresh non-staff account
        assert_eq!(user.username, "good_user");
        assert!(!user.is_staff);
        assert_eq!(user.sequence_number, None);
        assert_eq!(user.created_at, user.updated_at);
        assert!(uuid::Uuid::parse_str(&user.id).is_ok());
    }

    #[test]
    fn test_user_ids_are_unique() {
        let a = User::new("a".to_string(), String::new());
        let b = User::new("a".to_string(), String::new());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new("alice".to_string(), "pbkdf2_sha256$1$salt$hash".to_string());

        let json = serde_json::to_string(&user).expect("Failed to serialize");

        assert!(!json.contains("password_hash"));
        assert!(!json.contains("pbkdf2_sha256"));
    }

    #[test]
    fn test_search_field_display() {
        assert_eq!(UserSearchField::Id("u1".into()).to_string(), "Id(u1)");
        assert_eq!(
            UserSearchField::Username("bob".into()).to_string(),
            "Username(bob)"
        );
    }

    proptest! {
        #[test]
        fn test_user_serde_keeps_public_fields(
            username in "[a-zA-Z0-9_.@+-]{1,64}",
            is_staff in proptest::bool::ANY,
            sequence_number in proptest::option::of(1..10000i64)
        ) {
            let mut user = User::new(username, "secret".to_string());
            user.is_staff = is_staff;
            user.sequence_number = sequence_number;

            let serialized = serde_json::to_string(&user).expect("Failed to serialize");
            let deserialized: User = serde_json::from_str(&serialized).expect("Failed to deserialize");

            prop_assert_eq!(&user.id, &deserialized.id);
            prop_assert_eq!(&user.username, &deserialized.username);
            prop_assert_eq!(user.is_staff, deserialized.is_staff);
            prop_assert_eq!(user.sequence_number, deserialized.sequence_number);
            prop_assert_eq!(deserialized.password_hash, "");
        }
    }
}
