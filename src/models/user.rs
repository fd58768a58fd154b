use chrono::{DateTime, Utc};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_EMAIL_LEN;

/// Data-access role of a user identity
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// User identity for API responses (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Stored credential record used by login
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Credentials {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl User {
    /// Lower-case and trim an email so lookups are case-insensitive
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// RFC 5322 address with a dotted hostname domain, at most `MAX_EMAIL_LEN` bytes
    pub fn validate_email(email: &str) -> bool {
        if email.is_empty() || email.len() > MAX_EMAIL_LEN {
            return false;
        }

        if !EmailAddress::is_valid(email) {
            return false;
        }

        // the address grammar also admits bare hosts and `_` in labels
        match email.rsplit_once('@') {
            Some((_, domain)) => domain.contains('.') && domain.split('.').all(is_hostname_label),
            None => false,
        }
    }
}

fn is_hostname_label(label: &str) -> bool {
    !label.is_empty()
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(User::validate_email("alice@example.com"));
        assert!(User::validate_email("a.b+c@mail.example.org"));

        assert!(!User::validate_email(""));
        assert!(!User::validate_email("alice"));
        assert!(!User::validate_email("@example.com"));
        assert!(!User::validate_email("alice@localhost"));
        assert!(!User::validate_email("alice@@example.com"));
        assert!(!User::validate_email("alice @example.com"));
        assert!(!User::validate_email(&format!("{}@example.com", "a".repeat(MAX_EMAIL_LEN))));
    }

    #[test]
    fn test_validate_email_rejects_malformed_addresses() {
        for email in [
            "a@b..com",
            "a@-bad-.com",
            "a..b@example.com",
            ".a@example.com",
            "a.@example.com",
            "a@exa_mple.com",
            "a@example.com.",
        ] {
            assert!(!User::validate_email(email), "{email} should be rejected");
        }
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(User::normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
        assert!(serde_json::from_str::<Role>("\"superuser\"").is_err());
    }
}
