use std::collections::HashMap;

use serde::Deserialize;

/// Status vocabulary used by the geoprocessing service for asynchronous jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    New,
    Submitted,
    Waiting,
    Executing,
    Succeeded,
    Failed,
    TimedOut,
    Cancelling,
    Cancelled,
    Deleting,
    Deleted,
    /// Anything the service reports that we do not recognise
    Unknown(String),
}

impl JobStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "esriJobNew" => Self::New,
            "esriJobSubmitted" => Self::Submitted,
            "esriJobWaiting" => Self::Waiting,
            "esriJobExecuting" => Self::Executing,
            "esriJobSucceeded" => Self::Succeeded,
            "esriJobFailed" => Self::Failed,
            "esriJobTimedOut" => Self::TimedOut,
            "esriJobCancelling" => Self::Cancelling,
            "esriJobCancelled" => Self::Cancelled,
            "esriJobDeleting" => Self::Deleting,
            "esriJobDeleted" => Self::Deleted,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Response of `submitJob`
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitJobResponse {
    #[serde(rename = "jobId", default)]
    pub job_id: Option<String>,
    #[serde(rename = "jobStatus", default)]
    pub job_status: Option<String>,
}

impl SubmitJobResponse {
    pub fn status(&self) -> Option<JobStatus> {
        self.job_status.as_deref().map(JobStatus::parse)
    }
}

/// Reference to a job output parameter
#[derive(Debug, Clone, Deserialize)]
pub struct ParamRef {
    #[serde(rename = "paramUrl")]
    pub param_url: String,
}

/// Response of `jobs/{jobId}`
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusResponse {
    #[serde(rename = "jobId", default)]
    pub job_id: Option<String>,
    #[serde(rename = "jobStatus", default)]
    pub job_status: Option<String>,
    #[serde(default)]
    pub results: HashMap<String, ParamRef>,
}

impl JobStatusResponse {
    pub fn status(&self) -> Option<JobStatus> {
        self.job_status.as_deref().map(JobStatus::parse)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ResultValue {
    #[serde(default)]
    pub url: Option<String>,
}

/// Response of `jobs/{jobId}/results/{param}`
#[derive(Debug, Clone, Deserialize)]
pub struct JobResultResponse {
    #[serde(default)]
    pub value: ResultValue,
}

/// Error envelope the service returns with a 200 status
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ServiceErrorBody,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_statuses() {
        assert_eq!(JobStatus::parse("esriJobSucceeded"), JobStatus::Succeeded);
        assert_eq!(JobStatus::parse("esriJobCancelled"), JobStatus::Cancelled);
        assert_eq!(
            JobStatus::parse("esriJobSomethingNew"),
            JobStatus::Unknown("esriJobSomethingNew".to_string())
        );
    }

    #[test]
    fn status_response_tolerates_missing_fields() {
        let parsed: JobStatusResponse = serde_json::from_str(r#"{"jobId":"J1"}"#).unwrap();
        assert_eq!(parsed.job_id.as_deref(), Some("J1"));
        assert!(parsed.status().is_none());
        assert!(parsed.results.is_empty());
    }

    #[test]
    fn status_response_reads_result_params() {
        let body = r#"{
            "jobId": "J1",
            "jobStatus": "esriJobSucceeded",
            "results": {"Output_Zip_File": {"paramUrl": "results/Output_Zip_File"}},
            "inputs": {"Area_of_Interest": {"paramUrl": "inputs/Area_of_Interest"}},
            "messages": [{"type": "esriJobMessageTypeInformative", "description": "Done"}]
        }"#;
        let parsed: JobStatusResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.status(), Some(JobStatus::Succeeded));
        assert_eq!(
            parsed.results["Output_Zip_File"].param_url,
            "results/Output_Zip_File"
        );
    }
}
