//! Diesel and pool error translation shared by every repository.

use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure through a repository's connection constructor.
pub fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    connection(error.into_message())
}

/// Map Diesel failures onto query or connection constructors.
///
/// Unique violations are not special-cased here; repositories that care
/// inspect the error before delegating.
pub fn map_diesel_error<E>(
    error: diesel::result::Error,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

/// Whether `error` is a unique constraint violation.
pub fn is_unique_violation(error: &diesel::result::Error) -> bool {
    matches!(
        error,
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq)]
    enum Sample {
        Query(&'static str),
        Connection(String),
    }

    #[rstest]
    fn not_found_maps_to_query() {
        let mapped = map_diesel_error(
            diesel::result::Error::NotFound,
            Sample::Query,
            |message| Sample::Connection(message.to_owned()),
        );
        assert_eq!(mapped, Sample::Query("record not found"));
    }

    #[rstest]
    fn pool_errors_map_to_connection() {
        let mapped = map_pool_error(PoolError::checkout("timeout"), Sample::Connection);
        assert_eq!(mapped, Sample::Connection("timeout".into()));
    }

    #[rstest]
    fn not_found_is_not_a_unique_violation() {
        assert!(!is_unique_violation(&diesel::result::Error::NotFound));
    }
}
