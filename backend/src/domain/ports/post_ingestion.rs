//! Driving port for triggering one ingestion run.
use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::ingestion::IngestionReport;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostIngestion: Send + Sync {
    /// Run ingestion once.
    ///
    /// # Errors
    ///
    /// - `conflict` when another run is in progress.
    /// - `internal_error` with `Failed to create post` when the upstream
    ///   fetch or the store fails outside per-item processing.
    async fn ingest(&self) -> Result<IngestionReport, Error>;
}
