// HTTP routes
pub mod extracts;
pub mod health;
pub mod history;

pub use extracts::*;
pub use health::*;
pub use history::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Plain message body shared by the extract and history routes
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub(crate) fn message(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(MessageResponse {
            message: message.into(),
        }),
    )
        .into_response()
}

pub(crate) fn unauthorized() -> Response {
    message(StatusCode::UNAUTHORIZED, "Authentication required.")
}
