use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::kernel::{BaseExtractJobStore, StoreError};

/// The only status a stored job ever has. Terminal statuses are consumed
/// during the sweep and the row is deleted.
pub const STATUS_PENDING: &str = "pending";

/// ExtractJob model - an outstanding geoprocessing job being polled
///
/// A row's existence means "still polling".
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct ExtractJob {
    pub job_id: String,
    pub email: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl ExtractJob {
    /// Track a newly accepted job. Inserting an id that is already tracked is a no-op.
    pub async fn insert(job_id: &str, email: &str, pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO extract_jobs (job_id, email, status)
             VALUES ($1, $2, $3)
             ON CONFLICT (job_id) DO NOTHING",
        )
        .bind(job_id)
        .bind(email)
        .bind(STATUS_PENDING)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_job_id(job_id: &str, pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM extract_jobs WHERE job_id = $1")
            .bind(job_id)
            .fetch_optional(pool)
            .await
    }

    /// Find all jobs still awaiting a terminal status
    pub async fn find_pending(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM extract_jobs WHERE status = $1 ORDER BY created_at ASC",
        )
        .bind(STATUS_PENDING)
        .fetch_all(pool)
        .await
    }

    /// Delete by job id. Returns the number of rows removed (0 when already gone).
    pub async fn delete(job_id: &str, pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM extract_jobs WHERE job_id = $1")
            .bind(job_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Postgres-backed job store
#[derive(Clone)]
pub struct PgExtractJobStore {
    pool: PgPool,
}

impl PgExtractJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseExtractJobStore for PgExtractJobStore {
    async fn insert(&self, job_id: &str, owner_email: &str) -> Result<(), StoreError> {
        ExtractJob::insert(job_id, owner_email, &self.pool)
            .await
            .map_err(Into::into)
    }

    async fn list_pending(&self) -> Result<Vec<ExtractJob>, StoreError> {
        ExtractJob::find_pending(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn delete(&self, job_id: &str) -> Result<(), StoreError> {
        ExtractJob::delete(job_id, &self.pool).await?;
        Ok(())
    }
}
