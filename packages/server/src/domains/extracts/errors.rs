use geoprocessing::GpError;
use thiserror::Error;

use crate::kernel::StoreError;

/// Submission failures. Each maps to a plain-text message for the user.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Geoprocessing service rejected the job (status: {status:?})")]
    SubmissionRejected { status: Option<String> },

    #[error("Could not reach geoprocessing service: {0}")]
    Network(#[source] GpError),

    #[error("Could not record extract job: {0}")]
    Store(#[from] StoreError),
}

impl ExtractError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ExtractError::SubmissionRejected { .. } => "Job failed to submit.",
            ExtractError::Network(_) => "Failed to post geom to service.",
            ExtractError::Store(_) => "Failed to record extract job.",
        }
    }
}
