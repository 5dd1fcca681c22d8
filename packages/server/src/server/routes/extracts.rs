use axum::{extract::Extension, http::StatusCode, response::Response, Json};
use tracing::error;

use super::{message, unauthorized};
use crate::domains::extracts::actions::{submit_extract, Requester};
use crate::domains::extracts::models::Geom;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

/// Submit an area of interest for extraction
///
/// 200 with the confirmation message, or 500 with a message the user can read.
pub async fn submit_extract_handler(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
    Json(geom): Json<Geom>,
) -> Response {
    let Some(Extension(user)) = user else {
        return unauthorized();
    };

    let requester = Requester {
        user_id: user.user_id,
        email: user.email,
    };

    match submit_extract(&geom, &requester, &state.deps).await {
        Ok(confirmation) => message(StatusCode::OK, confirmation),
        Err(e) => {
            error!(error = %e, user_id = %requester.user_id, "Extract submission failed");
            message(StatusCode::INTERNAL_SERVER_ERROR, e.user_message())
        }
    }
}
