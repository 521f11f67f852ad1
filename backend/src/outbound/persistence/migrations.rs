//! Embedded Diesel migrations applied at startup.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failure establishing the migration connection or applying a migration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("database migration failed: {message}")]
pub struct MigrationError {
    pub message: String,
}

fn migrate_blocking(database_url: &str) -> Result<usize, MigrationError> {
    let mut conn = PgConnection::establish(database_url).map_err(|err| MigrationError {
        message: err.to_string(),
    })?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError {
            message: err.to_string(),
        })?;
    Ok(applied.len())
}

/// Apply pending migrations on a blocking thread.
///
/// # Errors
///
/// Returns [`MigrationError`] when the database is unreachable or a
/// migration fails.
pub async fn run_migrations(database_url: &str) -> Result<(), MigrationError> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || migrate_blocking(&url))
        .await
        .map_err(|err| MigrationError {
            message: format!("migration task failed: {err}"),
        })??;
    info!(applied, "database migrations applied");
    Ok(())
}
