//! Shared pool and Diesel error mapping for the repositories.
//!
//! Each repository passes its port error constructors so the mapping rules
//! live in one place: checkout failures and closed connections become
//! `connection` errors, everything else becomes a `query` error.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    connection(error.into_message())
}

pub(crate) fn map_diesel_error<E>(
    error: DieselError,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            query("unique constraint violated")
        }
        _ => query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::GadgetPersistenceError;
    use rstest::rstest;

    fn map(error: DieselError) -> GadgetPersistenceError {
        map_diesel_error(
            error,
            GadgetPersistenceError::query,
            GadgetPersistenceError::connection,
        )
    }

    #[rstest]
    fn not_found_is_a_query_error() {
        assert_eq!(
            map(DieselError::NotFound),
            GadgetPersistenceError::query("record not found")
        );
    }

    #[rstest]
    fn closed_connection_is_a_connection_error() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        );
        assert!(matches!(
            map(error),
            GadgetPersistenceError::Connection { .. }
        ));
    }

    #[rstest]
    fn pool_errors_keep_their_message() {
        let mapped = map_pool_error(
            PoolError::Checkout("timed out".to_owned()),
            GadgetPersistenceError::connection,
        );
        assert_eq!(mapped, GadgetPersistenceError::connection("timed out"));
    }
}
