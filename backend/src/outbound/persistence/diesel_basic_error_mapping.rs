//! Shared Diesel error mapping for the ticketing repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse classification of a Diesel failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped or could not be used.
    Connection,
    /// A unique or primary key constraint rejected the write.
    UniqueViolation,
    /// A `CHECK` constraint rejected the write.
    CheckViolation,
    /// Any other query failure.
    Query,
}

/// Classify a Diesel error, logging the underlying detail at debug level.
pub(crate) fn classify_diesel_error(error: &DieselError) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => DieselFailure::Connection,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DieselFailure::UniqueViolation
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            DieselFailure::CheckViolation
        }
        _ => DieselFailure::Query,
    }
}

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map Diesel errors into query/connection constructors.
///
/// Details stay in the debug log; the returned message is safe to surface.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match (classify_diesel_error(&error), error) {
        (DieselFailure::Connection, _) => connection("database connection error"),
        (_, DieselError::NotFound) => query("record not found"),
        (_, DieselError::QueryBuilderError(_)) => query("database query error"),
        _ => query("database error"),
    }
}
