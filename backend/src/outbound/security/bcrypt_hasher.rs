//! bcrypt implementation of the `PasswordHasher` port.
//!
//! bcrypt is CPU bound, so both operations run on Tokio's blocking pool. The
//! blocking task re-enters the caller's trace scope for its logs.

use async_trait::async_trait;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHasher, PasswordHasherError};
use crate::domain::{PasswordHash, TraceId};

/// Work factor used for new hashes.
pub const BCRYPT_COST: u32 = 12;

/// Lowest cost accepted by `bcrypt` (mirrors the crate's private bound).
const BCRYPT_MIN_COST: u32 = 4;
/// Highest cost accepted by `bcrypt` (mirrors the crate's private bound).
const BCRYPT_MAX_COST: u32 = 31;

/// Password hasher backed by the `bcrypt` crate.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self { cost: BCRYPT_COST }
    }
}

impl BcryptPasswordHasher {
    /// Build a hasher with a custom cost. Tests use the minimum cost.
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost: cost.clamp(BCRYPT_MIN_COST, BCRYPT_MAX_COST),
        }
    }
}

async fn run_blocking<T, F>(job: F) -> Result<T, PasswordHasherError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, bcrypt::BcryptError> + Send + 'static,
{
    let trace_id = TraceId::current();
    tokio::task::spawn_blocking(move || {
        let _span = tracing::debug_span!(
            "bcrypt",
            trace_id = trace_id.map(|id| id.to_string()).unwrap_or_default()
        )
        .entered();
        job()
    })
    .await
    .map_err(|err| PasswordHasherError::hashing(format!("hashing task aborted: {err}")))?
    .map_err(|err| PasswordHasherError::hashing(err.to_string()))
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        let secret = Zeroizing::new(password.to_owned());
        let cost = self.cost;
        let encoded = run_blocking(move || bcrypt::hash(secret.as_str(), cost)).await?;
        debug!(cost, "password hashed");
        Ok(PasswordHash::new(encoded))
    }

    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let secret = Zeroizing::new(password.to_owned());
        let encoded = hash.as_str().to_owned();
        match run_blocking(move || bcrypt::verify(secret.as_str(), &encoded)).await {
            Ok(matches) => Ok(matches),
            // A malformed stored hash cannot match any password.
            Err(err) => {
                debug!(error = %err, "stored hash could not be verified");
                Ok(false)
            }
        }
    }
}
