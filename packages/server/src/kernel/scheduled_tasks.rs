//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! The only recurring task is the extract job sweep:
//!
//! ```text
//! Scheduler (every SWEEP_INTERVAL_SECS)
//!     │
//!     └─► sweep_extract_jobs()
//!             └─► For each pending job → poll → notify → delete
//! ```
//!
//! A sweep never fails as a whole; per-job problems are logged and counted
//! in the returned report.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::extracts::actions::sweep_extract_jobs;
use crate::domains::extracts::policy::SweepPolicy;
use crate::kernel::ServerDeps;

/// Start all scheduled tasks
pub async fn start_scheduler(
    deps: ServerDeps,
    policy: SweepPolicy,
    interval: Duration,
) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    // Ticks that land while a sweep is still running are skipped
    let running = Arc::new(Mutex::new(()));
    let sweep_deps = deps.clone();
    let sweep_policy = Arc::new(policy);

    let sweep_job = Job::new_repeated_async(interval, move |_uuid, _lock| {
        let deps = sweep_deps.clone();
        let policy = sweep_policy.clone();
        let running = running.clone();
        Box::pin(async move {
            let Ok(_guard) = running.try_lock() else {
                tracing::warn!("Previous extract job sweep still running, skipping this tick");
                return;
            };
            sweep_extract_jobs(&deps, &policy).await;
        })
    })?;

    scheduler.add(sweep_job).await?;
    scheduler.start().await?;

    tracing::info!(
        interval_secs = interval.as_secs(),
        "Scheduled tasks started (extract job sweep)"
    );
    Ok(scheduler)
}
