//! Driving port for user registration and login.
use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, PublicUser, Registration};

/// Domain use-case port for account management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationCommand: Send + Sync {
    /// Create a user. Duplicate identifiers fail with a conflict.
    async fn register(&self, registration: Registration) -> Result<PublicUser, Error>;

    /// Check credentials and return the matching user.
    async fn login(&self, credentials: LoginCredentials) -> Result<PublicUser, Error>;
}
