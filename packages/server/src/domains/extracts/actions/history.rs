//! History actions - a user's saved areas of interest

use serde::Serialize;
use tracing::info;

use crate::domains::extracts::models::{AreaOfInterest, Geom};
use crate::kernel::{ServerDeps, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: String,
    pub geom: Geom,
    pub title: String,
}

impl From<AreaOfInterest> for HistoryEntry {
    fn from(area: AreaOfInterest) -> Self {
        Self {
            id: area.id.to_string(),
            geom: area.geom.0,
            title: area.title,
        }
    }
}

pub async fn list_history(user_id: &str, deps: &ServerDeps) -> Result<Vec<HistoryEntry>, StoreError> {
    let areas = deps.history_store.list_for_user(user_id).await?;
    Ok(areas.into_iter().map(HistoryEntry::from).collect())
}

/// Returns false when the area does not exist or is not owned by `user_id`.
pub async fn delete_history(id: i64, user_id: &str, deps: &ServerDeps) -> Result<bool, StoreError> {
    let deleted = deps.history_store.delete_for_user(id, user_id).await?;
    if deleted {
        info!(id, %user_id, "Deleted area of interest");
    }
    Ok(deleted)
}
