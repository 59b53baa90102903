//! Liveness and identity-check endpoints (no auth middleware).

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::middleware::{token_from_headers, AuthState};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Report whether the caller holds a valid session token.
pub async fn auth_check(State(state): State<AuthState>, headers: HeaderMap) -> axum::response::Response {
    let Some(token) = token_from_headers(&headers) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"authenticated": false, "message": "No token found"})),
        )
            .into_response();
    };

    match state.codec.verify(&token) {
        Ok(_) => (StatusCode::OK, Json(json!({"authenticated": true}))).into_response(),
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"authenticated": false, "message": "Invalid or expired token"})),
        )
            .into_response(),
    }
}
