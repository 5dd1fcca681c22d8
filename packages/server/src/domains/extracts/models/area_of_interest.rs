use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::kernel::{BaseHistoryStore, StoreError};

/// Polygon submitted by a user: rings of `[x, y]` coordinates plus a title.
///
/// `history: true` asks for the area NOT to be saved to the user's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geom {
    pub rings: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "history", default)]
    pub skip_history: bool,
}

impl Geom {
    /// Feature set JSON for the geoprocessing `Area_of_Interest` parameter
    pub fn to_feature_set(&self) -> serde_json::Value {
        serde_json::json!({
            "features": [
                { "geometry": { "rings": self.rings } }
            ]
        })
    }
}

/// AreaOfInterest model - a saved request in a user's history
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct AreaOfInterest {
    pub id: i64,
    pub user_id: String,
    pub geom: Json<Geom>,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl AreaOfInterest {
    pub async fn insert(
        user_id: &str,
        geom: &Geom,
        title: &str,
        pool: &PgPool,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO areas_of_interest (user_id, geom, title)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(user_id)
        .bind(Json(geom))
        .bind(title)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_user(user_id: &str, pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM areas_of_interest WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Delete an area only if it belongs to `user_id`. Returns whether a row was removed.
    pub async fn delete_owned(id: i64, user_id: &str, pool: &PgPool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM areas_of_interest WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Postgres-backed history store
#[derive(Clone)]
pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseHistoryStore for PgHistoryStore {
    async fn insert(&self, user_id: &str, geom: &Geom, title: &str) -> Result<i64, StoreError> {
        let area = AreaOfInterest::insert(user_id, geom, title, &self.pool).await?;
        Ok(area.id)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<AreaOfInterest>, StoreError> {
        AreaOfInterest::find_by_user(user_id, &self.pool)
            .await
            .map_err(Into::into)
    }

    async fn delete_for_user(&self, id: i64, user_id: &str) -> Result<bool, StoreError> {
        AreaOfInterest::delete_owned(id, user_id, &self.pool)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_flag_maps_to_skip_history() {
        let geom: Geom = serde_json::from_str(
            r#"{"rings":[[[1.0,2.0],[3.0,4.0],[1.0,2.0]]],"title":"Ranch","history":true}"#,
        )
        .unwrap();
        assert!(geom.skip_history);
        assert_eq!(geom.title, "Ranch");
    }

    #[test]
    fn missing_flags_default() {
        let geom: Geom = serde_json::from_str(r#"{"rings":[]}"#).unwrap();
        assert!(!geom.skip_history);
        assert_eq!(geom.title, "");
    }

    #[test]
    fn feature_set_wraps_rings() {
        let geom = Geom {
            rings: vec![vec![vec![-106.6, 35.1], vec![-106.5, 35.2], vec![-106.6, 35.1]]],
            title: String::new(),
            skip_history: false,
        };
        let set = geom.to_feature_set();
        assert_eq!(set["features"][0]["geometry"]["rings"][0][1][0], -106.5);
    }
}
