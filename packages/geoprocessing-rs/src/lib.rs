// Client for asynchronous geoprocessing services (ArcGIS GPServer task endpoints).
//
// Every method is a single HTTP round trip with a bounded timeout. Interpreting
// job statuses is left to the caller.

use std::time::Duration;

pub mod models;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::models::{ErrorEnvelope, JobResultResponse, JobStatusResponse, SubmitJobResponse};

pub use models::JobStatus;

#[derive(Debug, Error)]
pub enum GpError {
    #[error("request to geoprocessing service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("geoprocessing service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("geoprocessing service error {code}: {message}")]
    Service { code: i64, message: String },

    #[error("could not parse geoprocessing response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("job {job_id} has no url for result parameter {param}")]
    MissingResultUrl { job_id: String, param: String },
}

impl GpError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, GpError::Transport(e) if e.is_timeout())
    }
}

#[derive(Debug, Clone)]
pub struct GpOptions {
    /// Task URL, e.g. `https://host/arcgis/rest/services/X/GPServer/Extract%20Data`
    pub base_url: String,
    /// Output parameter holding the downloadable artifact
    pub result_param: String,
    pub timeout: Duration,
}

impl GpOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            result_param: "Output_Zip_File".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_result_param(mut self, param: impl Into<String>) -> Self {
        self.result_param = param.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct GpService {
    client: Client,
    options: GpOptions,
}

impl GpService {
    pub fn new(options: GpOptions) -> Result<Self, GpError> {
        let client = Client::builder().timeout(options.timeout).build()?;
        Ok(Self { client, options })
    }

    pub fn options(&self) -> &GpOptions {
        &self.options
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.options.base_url.trim_end_matches('/'), path)
    }

    /// Submit a job. `area_of_interest` is the feature set JSON for the
    /// `Area_of_Interest` parameter.
    pub async fn submit_job(&self, area_of_interest: &str) -> Result<SubmitJobResponse, GpError> {
        let url = self.url("submitJob");
        debug!(%url, "Submitting geoprocessing job");

        let response = self
            .client
            .post(url)
            .form(&[("f", "pjson"), ("Area_of_Interest", area_of_interest)])
            .send()
            .await?;

        read_json(response).await
    }

    pub async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, GpError> {
        let url = self.url(&format!("jobs/{}", urlencoding::encode(job_id)));

        let response = self
            .client
            .get(url)
            .query(&[("f", "pjson")])
            .send()
            .await?;

        read_json(response).await
    }

    /// Fetch the download URL of the configured result parameter.
    pub async fn job_result_url(&self, job_id: &str) -> Result<String, GpError> {
        let url = self.url(&format!(
            "jobs/{}/results/{}",
            urlencoding::encode(job_id),
            urlencoding::encode(&self.options.result_param)
        ));

        let response = self
            .client
            .get(url)
            .query(&[("f", "pjson")])
            .send()
            .await?;

        let result: JobResultResponse = read_json(response).await?;
        match result.value.url {
            Some(url) if !url.trim().is_empty() => Ok(url),
            _ => Err(GpError::MissingResultUrl {
                job_id: job_id.to_string(),
                param: self.options.result_param.clone(),
            }),
        }
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GpError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(GpError::Status {
            status: status.as_u16(),
            body,
        });
    }

    // The service reports failures as a 200 with an `error` object
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
        return Err(GpError::Service {
            code: envelope.error.code,
            message: envelope.error.message,
        });
    }

    serde_json::from_str(&body).map_err(GpError::Decode)
}
