//! Embedded Diesel migrations for the ticketing schema.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use thiserror::Error;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("failed to connect for migrations: {message}")]
    Connect { message: String },
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
    #[error("migration task aborted: {message}")]
    Join { message: String },
}

/// Apply all pending embedded migrations.
///
/// Diesel's migration harness is synchronous, so the work runs on the
/// blocking pool with a dedicated connection.
pub async fn run_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut connection =
            PgConnection::establish(&url).map_err(|error| MigrationError::Connect {
                message: error.to_string(),
            })?;
        let applied = connection
            .run_pending_migrations(MIGRATIONS)
            .map_err(|error| MigrationError::Apply {
                message: error.to_string(),
            })?;
        Ok(applied.len())
    })
    .await
    .map_err(|error| MigrationError::Join {
        message: error.to_string(),
    })?
}
