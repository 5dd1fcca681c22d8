//! Submit extract action - hands an area of interest to the geoprocessing
//! service and starts tracking the job.

use tracing::{info, warn};

use crate::domains::extracts::client::ExtractJobClient;
use crate::domains::extracts::errors::ExtractError;
use crate::domains::extracts::models::Geom;
use crate::domains::extracts::outcome::SubmitOutcome;
use crate::kernel::ServerDeps;

/// The resolved identity of whoever is submitting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub user_id: String,
    pub email: String,
}

/// Submit an extract job for `geom` on behalf of `requester`.
///
/// This action:
/// 1. Submits the area of interest to the geoprocessing service
/// 2. Records the accepted job so the sweep will poll it
/// 3. Saves the area to the requester's history unless they opted out
///
/// Returns the message to show the user. Nothing is recorded unless the
/// service accepted the job.
pub async fn submit_extract(
    geom: &Geom,
    requester: &Requester,
    deps: &ServerDeps,
) -> Result<String, ExtractError> {
    let area_of_interest = geom.to_feature_set().to_string();
    let client = ExtractJobClient::new(deps.geoprocessing.clone());

    let job_id = match client.submit(&area_of_interest).await {
        Ok(SubmitOutcome::Accepted { job_id }) => job_id,
        Ok(SubmitOutcome::Rejected { status }) => {
            warn!(?status, user_id = %requester.user_id, "Extract job rejected by service");
            return Err(ExtractError::SubmissionRejected { status });
        }
        Err(e) => {
            warn!(error = %e, user_id = %requester.user_id, "Failed to post extract job");
            return Err(ExtractError::Network(e));
        }
    };

    deps.job_store.insert(&job_id, &requester.email).await?;
    info!(%job_id, email = %requester.email, "Extract job submitted");

    if !geom.skip_history {
        // The job is already tracked; a history failure only loses the saved area
        if let Err(e) = deps
            .history_store
            .insert(&requester.user_id, geom, &geom.title)
            .await
        {
            warn!(error = %e, user_id = %requester.user_id, "Failed to save area of interest");
        }
    }

    Ok(format!(
        "Extract task submitted. An e-mail will be sent to {} with job status updates.",
        requester.email
    ))
}
