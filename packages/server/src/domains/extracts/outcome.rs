use geoprocessing::{GpError, JobStatus};
use thiserror::Error;

/// Result of submitting a job to the geoprocessing service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted { job_id: String },
    /// The service answered with anything other than a submitted job
    Rejected { status: Option<String> },
}

/// Why a poll could not produce a status. Never terminal.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("status request timed out: {0}")]
    Timeout(#[source] GpError),

    #[error("status request failed: {0}")]
    Status(#[source] GpError),

    #[error("result url request failed: {0}")]
    ResultUrl(#[source] GpError),
}

/// Classified poll result for one job
#[derive(Debug)]
pub enum JobOutcome {
    Pending,
    Succeeded { result_url: String },
    Failed,
    TimedOut,
    Cancelled,
    Deleted,
    PollError(PollError),
}

impl JobOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobOutcome::Pending | JobOutcome::PollError(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobOutcome::Pending => "pending",
            JobOutcome::Succeeded { .. } => "succeeded",
            JobOutcome::Failed => "failed",
            JobOutcome::TimedOut => "timed_out",
            JobOutcome::Cancelled => "cancelled",
            JobOutcome::Deleted => "deleted",
            JobOutcome::PollError(_) => "poll_error",
        }
    }
}

/// What a reported status means for the job, before any result lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    NonTerminal,
    /// Terminal, but the download link still has to be fetched
    Succeeded,
    Failed,
    TimedOut,
    Cancelled,
    Deleted,
}

pub fn classify_status(status: Option<&JobStatus>) -> StatusClass {
    match status {
        Some(JobStatus::Succeeded) => StatusClass::Succeeded,
        Some(JobStatus::Failed) => StatusClass::Failed,
        Some(JobStatus::TimedOut) => StatusClass::TimedOut,
        Some(JobStatus::Cancelled) => StatusClass::Cancelled,
        Some(JobStatus::Deleted) => StatusClass::Deleted,
        Some(
            JobStatus::New
            | JobStatus::Submitted
            | JobStatus::Waiting
            | JobStatus::Executing
            | JobStatus::Cancelling
            | JobStatus::Deleting
            | JobStatus::Unknown(_),
        )
        | None => StatusClass::NonTerminal,
    }
}

impl From<GpError> for PollError {
    fn from(err: GpError) -> Self {
        if err.is_timeout() {
            PollError::Timeout(err)
        } else {
            PollError::Status(err)
        }
    }
}
