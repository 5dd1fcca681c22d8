// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (submitting extracts, sweeping jobs) lives in domain actions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseExtractJobStore, BaseNotifier)

use async_trait::async_trait;
use geoprocessing::models::{JobStatusResponse, SubmitJobResponse};
use geoprocessing::GpError;

use super::{MailError, StoreError};
use crate::domains::extracts::models::{AreaOfInterest, ExtractJob, Geom};
use crate::domains::extracts::notifications::NotificationTemplate;

// =============================================================================
// Extract Job Store (Infrastructure - outstanding geoprocessing jobs)
// =============================================================================

#[async_trait]
pub trait BaseExtractJobStore: Send + Sync {
    /// Start tracking a job. The job is only tracked once this returns Ok.
    async fn insert(&self, job_id: &str, owner_email: &str) -> Result<(), StoreError>;

    /// Snapshot of all jobs still being polled
    async fn list_pending(&self) -> Result<Vec<ExtractJob>, StoreError>;

    /// Stop tracking a job. Deleting an unknown id is not an error.
    async fn delete(&self, job_id: &str) -> Result<(), StoreError>;
}

// =============================================================================
// History Store (Infrastructure - saved areas of interest)
// =============================================================================

#[async_trait]
pub trait BaseHistoryStore: Send + Sync {
    /// Save an area of interest, returning its id
    async fn insert(&self, user_id: &str, geom: &Geom, title: &str) -> Result<i64, StoreError>;

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<AreaOfInterest>, StoreError>;

    /// Delete an area owned by `user_id`. Returns false when nothing matched.
    async fn delete_for_user(&self, id: i64, user_id: &str) -> Result<bool, StoreError>;
}

// =============================================================================
// Geoprocessing Service Trait (Infrastructure - external long-running jobs)
// =============================================================================

#[async_trait]
pub trait BaseGeoprocessingService: Send + Sync {
    /// Submit a job for the given `Area_of_Interest` feature set JSON
    async fn submit_job(&self, area_of_interest: &str) -> Result<SubmitJobResponse, GpError>;

    /// Fetch the current status of a job
    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, GpError>;

    /// Fetch the download URL of a succeeded job's result
    async fn job_result_url(&self, job_id: &str) -> Result<String, GpError>;
}

// =============================================================================
// Notifier Trait (Infrastructure - outbound e-mail)
// =============================================================================

#[async_trait]
pub trait BaseNotifier: Send + Sync {
    /// Render `template` and deliver it to `recipient`. No retries.
    async fn send(&self, recipient: &str, template: &NotificationTemplate) -> Result<(), MailError>;
}
