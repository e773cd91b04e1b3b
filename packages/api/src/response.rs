// ABOUTME: Response helpers for API handlers
// ABOUTME: Converts internal results into the fixed user-facing error envelope

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Serialize;
use serde_json::json;
use tracing::error;

/// Respond with the value on success, or a fixed user-facing message on
/// failure. The original cause is logged for operator diagnosis and never
/// surfaced to the caller.
pub fn ok_or_internal_error<T: Serialize, E: std::fmt::Display>(
    result: Result<T, E>,
    message: &str,
) -> Response {
    match result {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(err) => {
            error!("{}: {}", message, err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }
}

/// A `{ "error": "..." }` envelope with the given status.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
