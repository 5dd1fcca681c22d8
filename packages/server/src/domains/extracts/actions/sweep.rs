//! Sweep action - one pass over all outstanding extract jobs.
//!
//! ```text
//! list_pending()
//!     └─► for each job (concurrently) → poll_status()
//!             ├─► non-terminal → leave the record for the next sweep
//!             └─► terminal     → notify owner → delete record
//! ```
//!
//! Polling is retried by simply leaving the record in place; nothing here
//! escalates a poll failure.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use crate::domains::extracts::client::ExtractJobClient;
use crate::domains::extracts::models::ExtractJob;
use crate::domains::extracts::notifications::NotificationTemplate;
use crate::domains::extracts::outcome::{JobOutcome, PollError};
use crate::domains::extracts::policy::{DeliveryPolicy, SweepPolicy};
use crate::kernel::ServerDeps;

/// Counters for one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub polled: usize,
    pub still_pending: usize,
    pub poll_errors: usize,
    /// Jobs the service reported terminal
    pub completed: usize,
    /// Jobs retired locally by the maximum-age policy
    pub expired: usize,
    pub notify_failures: usize,
    pub store_failures: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    StillPending,
    PollFailed,
    Retired {
        expired: bool,
        notified: bool,
        delete_failed: bool,
    },
}

impl SweepReport {
    fn record(&mut self, disposition: Disposition) {
        self.polled += 1;
        match disposition {
            Disposition::StillPending => self.still_pending += 1,
            Disposition::PollFailed => {
                self.still_pending += 1;
                self.poll_errors += 1;
            }
            Disposition::Retired {
                expired,
                notified,
                delete_failed,
            } => {
                if expired {
                    self.expired += 1;
                } else {
                    self.completed += 1;
                }
                if !notified {
                    self.notify_failures += 1;
                }
                if delete_failed {
                    self.store_failures += 1;
                }
            }
        }
    }
}

/// Run one sweep over every pending extract job.
pub async fn sweep_extract_jobs(deps: &ServerDeps, policy: &SweepPolicy) -> SweepReport {
    let mut report = SweepReport::default();

    let pending = match deps.job_store.list_pending().await {
        Ok(jobs) => jobs,
        Err(e) => {
            error!(error = %e, "Failed to list pending extract jobs");
            report.store_failures += 1;
            alert_admin(deps, format!("Failed to list pending extract jobs: {}", e)).await;
            return report;
        }
    };

    if pending.is_empty() {
        debug!("No pending extract jobs");
        return report;
    }

    info!("Polling {} pending extract jobs", pending.len());

    let client = ExtractJobClient::new(deps.geoprocessing.clone());
    let now = Utc::now();

    let dispositions: Vec<Disposition> = stream::iter(pending)
        .map(|job| process_job(deps, &client, policy, job, now))
        .buffer_unordered(policy.concurrency.max(1))
        .collect()
        .await;

    for disposition in dispositions {
        report.record(disposition);
    }

    info!(
        polled = report.polled,
        still_pending = report.still_pending,
        completed = report.completed,
        expired = report.expired,
        poll_errors = report.poll_errors,
        notify_failures = report.notify_failures,
        store_failures = report.store_failures,
        "Extract job sweep complete"
    );

    report
}

async fn process_job(
    deps: &ServerDeps,
    client: &ExtractJobClient,
    policy: &SweepPolicy,
    job: ExtractJob,
    now: DateTime<Utc>,
) -> Disposition {
    let outcome = client.poll_status(&job.job_id).await;

    if let Some(template) = NotificationTemplate::for_outcome(&outcome) {
        info!(
            job_id = %job.job_id,
            outcome = outcome.label(),
            email = %job.email,
            "Extract job reached terminal status"
        );
        return retire(deps, policy, &job, template, false).await;
    }

    let poll_failed = match &outcome {
        JobOutcome::PollError(e) => {
            warn!(job_id = %job.job_id, error = %e, "Failed to poll extract job, will retry next sweep");
            true
        }
        _ => {
            debug!(job_id = %job.job_id, "Extract job still pending");
            false
        }
    };

    // A succeeded job whose download link could not be fetched is never
    // expired; the link is retried on the next sweep.
    let reported_success = matches!(outcome, JobOutcome::PollError(PollError::ResultUrl(_)));

    if !reported_success && policy.is_expired(job.created_at, now) {
        warn!(
            job_id = %job.job_id,
            created_at = %job.created_at,
            "Extract job exceeded maximum age, retiring"
        );
        alert_admin(
            deps,
            format!(
                "Extract job {} for {} exceeded the maximum polling age and was retired without a terminal status.",
                job.job_id, job.email
            ),
        )
        .await;
        return retire(deps, policy, &job, NotificationTemplate::Timeout, true).await;
    }

    if poll_failed {
        Disposition::PollFailed
    } else {
        Disposition::StillPending
    }
}

/// Notify the owner, then stop tracking the job.
async fn retire(
    deps: &ServerDeps,
    policy: &SweepPolicy,
    job: &ExtractJob,
    template: NotificationTemplate,
    expired: bool,
) -> Disposition {
    let notified = match deps.notifier.send(&job.email, &template).await {
        Ok(()) => {
            info!(
                job_id = %job.job_id,
                template = template.name(),
                email = %job.email,
                "Extract notification sent"
            );
            true
        }
        Err(e) => {
            error!(
                job_id = %job.job_id,
                template = template.name(),
                email = %job.email,
                error = %e,
                "Failed to send extract notification"
            );
            false
        }
    };

    if !notified && policy.delivery == DeliveryPolicy::AtLeastOnce {
        warn!(job_id = %job.job_id, "Keeping extract job so the notification is retried");
        return Disposition::Retired {
            expired,
            notified,
            delete_failed: false,
        };
    }

    let delete_failed = match deps.job_store.delete(&job.job_id).await {
        Ok(()) => false,
        Err(e) => {
            error!(job_id = %job.job_id, error = %e, "Failed to delete extract job");
            alert_admin(
                deps,
                format!("Failed to delete extract job {}: {}", job.job_id, e),
            )
            .await;
            true
        }
    };

    Disposition::Retired {
        expired,
        notified,
        delete_failed,
    }
}

/// Send an internal-error alert to the administrator, if one is configured.
async fn alert_admin(deps: &ServerDeps, message: String) {
    let Some(admin) = deps.admin_email.as_deref() else {
        return;
    };

    let template = NotificationTemplate::InternalError { message };
    if let Err(e) = deps.notifier.send(admin, &template).await {
        warn!(error = %e, "Failed to send internal-error alert");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_dispositions() {
        let mut report = SweepReport::default();
        report.record(Disposition::StillPending);
        report.record(Disposition::PollFailed);
        report.record(Disposition::Retired {
            expired: false,
            notified: true,
            delete_failed: false,
        });
        report.record(Disposition::Retired {
            expired: true,
            notified: false,
            delete_failed: true,
        });

        assert_eq!(
            report,
            SweepReport {
                polled: 4,
                still_pending: 2,
                poll_errors: 1,
                completed: 1,
                expired: 1,
                notify_failures: 1,
                store_failures: 1,
            }
        );
    }
}
