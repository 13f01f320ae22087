//! Authentication primitives: login credentials and registration requests.
//!
//! Constructors validate raw string inputs so handlers can reject malformed
//! payloads before a port or service is involved. Plaintext passwords are held
//! in [`Zeroizing`] buffers and never serialised.

use std::fmt;

use zeroize::Zeroizing;

use super::{UserId, UserProfile};

/// Domain error returned when credential or registration values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email does not look like `local@domain`.
    MalformedEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::MalformedEmail => write!(f, "email must look like name@domain"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

fn parse_email(email: &str) -> Result<UserId, CredentialsValidationError> {
    let normalized = email.trim();
    if normalized.is_empty() {
        return Err(CredentialsValidationError::EmptyEmail);
    }
    match normalized.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
        _ => return Err(CredentialsValidationError::MalformedEmail),
    }
    UserId::new(normalized).map_err(|_| CredentialsValidationError::MalformedEmail)
}

fn require_password(password: &str) -> Result<Zeroizing<String>, CredentialsValidationError> {
    if password.is_empty() {
        return Err(CredentialsValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Validated login credentials.
///
/// ## Invariants
/// - The email is trimmed and contains a non-empty local part and domain.
/// - The password is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use ticketing::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada@example.com ", "pw").unwrap();
/// assert_eq!(creds.user_id().as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    user_id: UserId,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            user_id: parse_email(email)?,
            password: require_password(password)?,
        })
    }

    /// User identifier derived from the email.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Plaintext password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    user_id: UserId,
    password: Zeroizing<String>,
    profile: UserProfile,
}

impl Registration {
    /// Validate the identifying fields of a registration.
    pub fn try_new(
        email: &str,
        password: &str,
        profile: UserProfile,
    ) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            user_id: parse_email(email)?,
            password: require_password(password)?,
            profile,
        })
    }

    /// Identifier the user will be stored under.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Plaintext password to hash before storage.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Profile attributes to persist.
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }
}
