use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use haulnet_core::DomainError;

/// Map a domain error to its HTTP status and JSON body.
///
/// Infrastructure failures are logged in full and reported generically.
pub fn domain_error_to_response(err: DomainError) -> Response {
    let code = err.kind().as_str();
    match err {
        DomainError::Validation { field, message } => {
            let body = json!({
                "error": code,
                "message": message,
                "field": field,
            });
            (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
        }
        DomainError::Authorization(msg) => json_error(StatusCode::FORBIDDEN, code, msg),
        DomainError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, code, format!("{msg} not found")),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, code, msg),
        DomainError::Infrastructure(msg) => {
            error!(error = %msg, "infrastructure failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, code, "internal error")
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
