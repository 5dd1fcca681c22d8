use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use super::{message, unauthorized};
use crate::domains::extracts::actions::{delete_history, list_history};
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

/// The caller's saved areas of interest, newest first
pub async fn list_history_handler(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
) -> Response {
    let Some(Extension(user)) = user else {
        return unauthorized();
    };

    match list_history(&user.user_id, &state.deps).await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => {
            error!(error = %e, user_id = %user.user_id, "Failed to list history");
            message(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load history.")
        }
    }
}

/// Delete one of the caller's saved areas. 404 when it is not theirs.
pub async fn delete_history_handler(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
) -> Response {
    let Some(Extension(user)) = user else {
        return unauthorized();
    };

    let Ok(id) = id.parse::<i64>() else {
        return message(StatusCode::NOT_FOUND, "History entry not found.");
    };

    match delete_history(id, &user.user_id, &state.deps).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => message(StatusCode::NOT_FOUND, "History entry not found."),
        Err(e) => {
            error!(error = %e, id, user_id = %user.user_id, "Failed to delete history entry");
            message(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete history entry.")
        }
    }
}
