//! Server dependencies for actions (using traits for testability)
//!
//! This module provides the central dependency container used by the extract actions
//! and the scheduled sweep. All external services use trait abstractions to enable testing.

use async_trait::async_trait;
use geoprocessing::models::{JobStatusResponse, SubmitJobResponse};
use geoprocessing::{GpError, GpService};
use std::sync::Arc;
use tracing::debug;

use crate::common::utils::smtp::SmtpClient;
use crate::domains::extracts::notifications::NotificationTemplate;
use crate::kernel::{
    BaseExtractJobStore, BaseGeoprocessingService, BaseHistoryStore, BaseNotifier, MailError,
};

// =============================================================================
// GpService Adapter (implements BaseGeoprocessingService trait)
// =============================================================================

/// Wrapper around GpService that implements BaseGeoprocessingService trait
pub struct GeoprocessingAdapter(pub Arc<GpService>);

impl GeoprocessingAdapter {
    pub fn new(service: Arc<GpService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseGeoprocessingService for GeoprocessingAdapter {
    async fn submit_job(&self, area_of_interest: &str) -> Result<SubmitJobResponse, GpError> {
        self.0.submit_job(area_of_interest).await
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, GpError> {
        self.0.job_status(job_id).await
    }

    async fn job_result_url(&self, job_id: &str) -> Result<String, GpError> {
        self.0.job_result_url(job_id).await
    }
}

// =============================================================================
// SMTP Notifier (implements BaseNotifier trait)
// =============================================================================

/// Renders notification templates and sends them through the SMTP relay
pub struct SmtpNotifier(pub SmtpClient);

impl SmtpNotifier {
    pub fn new(client: SmtpClient) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseNotifier for SmtpNotifier {
    async fn send(&self, recipient: &str, template: &NotificationTemplate) -> Result<(), MailError> {
        let mail = template.render();
        debug!(template = template.name(), %recipient, "Sending notification");
        self.0.send_html(recipient, mail.subject, &mail.html_body).await
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to actions (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub job_store: Arc<dyn BaseExtractJobStore>,
    pub history_store: Arc<dyn BaseHistoryStore>,
    pub geoprocessing: Arc<dyn BaseGeoprocessingService>,
    pub notifier: Arc<dyn BaseNotifier>,
    /// Recipient of internal-error alerts; alerts are skipped when None
    pub admin_email: Option<String>,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        job_store: Arc<dyn BaseExtractJobStore>,
        history_store: Arc<dyn BaseHistoryStore>,
        geoprocessing: Arc<dyn BaseGeoprocessingService>,
        notifier: Arc<dyn BaseNotifier>,
        admin_email: Option<String>,
    ) -> Self {
        Self {
            job_store,
            history_store,
            geoprocessing,
            notifier,
            admin_email,
        }
    }
}
