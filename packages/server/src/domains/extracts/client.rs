//! Extract job client - speaks the geoprocessing job protocol and classifies
//! what the service reports.

use std::sync::Arc;

use geoprocessing::GpError;
use tracing::debug;

use super::outcome::{classify_status, JobOutcome, PollError, StatusClass, SubmitOutcome};
use crate::kernel::BaseGeoprocessingService;

#[derive(Clone)]
pub struct ExtractJobClient {
    service: Arc<dyn BaseGeoprocessingService>,
}

impl ExtractJobClient {
    pub fn new(service: Arc<dyn BaseGeoprocessingService>) -> Self {
        Self { service }
    }

    /// Submit a job. Only transport failures are errors; any answer that is not
    /// a submitted job (including service errors and unreadable bodies) is `Rejected`.
    pub async fn submit(&self, area_of_interest: &str) -> Result<SubmitOutcome, GpError> {
        let response = match self.service.submit_job(area_of_interest).await {
            Ok(response) => response,
            Err(e @ GpError::Transport(_)) => return Err(e),
            Err(e) => {
                debug!("Submit answered without a job: {}", e);
                return Ok(SubmitOutcome::Rejected { status: None });
            }
        };

        let submitted = response.status() == Some(geoprocessing::JobStatus::Submitted);
        match response.job_id {
            Some(job_id) if submitted && !job_id.trim().is_empty() => {
                Ok(SubmitOutcome::Accepted { job_id })
            }
            _ => Ok(SubmitOutcome::Rejected {
                status: response.job_status,
            }),
        }
    }

    /// Poll one job. Never fails: transport and parse problems come back as
    /// `JobOutcome::PollError`.
    pub async fn poll_status(&self, job_id: &str) -> JobOutcome {
        let response = match self.service.job_status(job_id).await {
            Ok(response) => response,
            Err(e) => return JobOutcome::PollError(e.into()),
        };

        match classify_status(response.status().as_ref()) {
            StatusClass::NonTerminal => JobOutcome::Pending,
            StatusClass::Succeeded => match self.service.job_result_url(job_id).await {
                Ok(result_url) => JobOutcome::Succeeded { result_url },
                Err(e) => JobOutcome::PollError(PollError::ResultUrl(e)),
            },
            StatusClass::Failed => JobOutcome::Failed,
            StatusClass::TimedOut => JobOutcome::TimedOut,
            StatusClass::Cancelled => JobOutcome::Cancelled,
            StatusClass::Deleted => JobOutcome::Deleted,
        }
    }
}
