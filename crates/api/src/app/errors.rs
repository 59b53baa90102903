//! Consistent `{"message": ...}` error responses.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use labfunds_store::ServiceError;

pub fn json_message(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Map a service error to a response: not-found to 404, validation to 400,
/// anything else to 500 with the route's context sentence prepended.
pub fn service_error(context: &str, err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::NotFound(msg) => json_message(StatusCode::NOT_FOUND, msg),
        ServiceError::Validation(msg) => json_message(StatusCode::BAD_REQUEST, msg),
        other => {
            tracing::error!("{context}: {other}");
            json_message(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{context}: {other}"),
            )
        }
    }
}
