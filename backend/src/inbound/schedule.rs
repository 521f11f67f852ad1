//! Timer-driven ingestion.
//!
//! The interval task is a driving adapter like the HTTP handlers: it calls
//! [`PostIngestion::ingest`] on a fixed cadence. A tick that lands while a
//! run is still in progress is rejected by the job's single-run guard and
//! logged, never queued.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

use crate::domain::ports::PostIngestion;
use crate::domain::{ErrorCode, TraceId};

/// Run `job` every `every`, starting one period from now.
///
/// The returned handle owns the loop; abort it to stop scheduling.
pub fn spawn_ingestion_schedule(job: Arc<dyn PostIngestion>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            run_once(job.as_ref()).await;
        }
    })
}

async fn run_once(job: &dyn PostIngestion) {
    let trace_id = TraceId::generate();
    match TraceId::scope(trace_id, job.ingest()).await {
        Ok(report) => info!(
            %trace_id,
            created = report.created.len(),
            skipped = report.skipped,
            failed = report.failed,
            evicted = report.evicted,
            "scheduled ingestion finished"
        ),
        Err(err) if err.code() == ErrorCode::Conflict => {
            info!(%trace_id, "scheduled ingestion skipped: previous run still active");
        }
        Err(err) => warn!(%trace_id, error = %err, "scheduled ingestion failed"),
    }
}
