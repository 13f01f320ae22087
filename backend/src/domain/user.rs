//! User directory model.
//!
//! Users are keyed by their email address. The password hash never leaves the
//! domain through [`PublicUser`], which is the only user shape adapters and
//! mirror sinks receive.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum accepted identifier length (RFC 5321 path limit).
pub const USER_ID_MAX: usize = 254;

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    PaddedId,
    IdTooLong { max: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::PaddedId => write!(f, "user id must not have surrounding whitespace"),
            Self::IdTooLong { max } => write!(f, "user id must be at most {max} characters"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier, conventionally the user's email address.
///
/// # Examples
/// ```
/// use ticketing::domain::UserId;
///
/// let id = UserId::new("ada@example.com").expect("valid id");
/// assert_eq!(id.as_ref(), "ada@example.com");
/// assert!(UserId::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::PaddedId);
        }
        if id.chars().count() > USER_ID_MAX {
            return Err(UserValidationError::IdTooLong { max: USER_ID_MAX });
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Opaque password hash produced by a [`crate::domain::ports::PasswordHasher`].
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash read from storage or produced by a hasher.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded hash string for persistence.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Profile attributes captured at registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub city: Option<String>,
    #[serde(default)]
    pub interests: BTreeSet<String>,
}

/// Stored user record including the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub profile: UserProfile,
    pub password_hash: PasswordHash,
}

impl User {
    /// Project the user into its public shape.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            profile: self.profile.clone(),
        }
    }
}

/// User shape safe to return to clients and mirror sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserId,
    #[serde(flatten)]
    pub profile: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case("   ", UserValidationError::EmptyId)]
    #[case(" ada@example.com", UserValidationError::PaddedId)]
    fn rejects_invalid_ids(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
    }

    #[rstest]
    fn rejects_overlong_ids() {
        let raw = format!("{}@example.com", "a".repeat(USER_ID_MAX));
        assert_eq!(
            UserId::new(raw).expect_err("too long"),
            UserValidationError::IdTooLong { max: USER_ID_MAX }
        );
    }

    #[rstest]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::new("$2b$12$secret");
        assert!(!format!("{hash:?}").contains("secret"));
    }

    #[rstest]
    fn public_user_omits_password_and_flattens_profile() {
        let user = User {
            id: UserId::new("ada@example.com").expect("id"),
            profile: UserProfile {
                city: Some("Vilnius".to_owned()),
                interests: BTreeSet::from(["jazz".to_owned()]),
                ..UserProfile::default()
            },
            password_hash: PasswordHash::new("$2b$12$secret"),
        };

        let value = serde_json::to_value(user.to_public()).expect("serialise user");
        assert_eq!(value.get("id"), Some(&json!("ada@example.com")));
        assert_eq!(value.get("city"), Some(&json!("Vilnius")));
        assert_eq!(value.get("interests"), Some(&json!(["jazz"])));
        assert!(value.get("passwordHash").is_none());
    }
}
