//! HTTP application wiring (axum router + service wiring).
//!
//! Layout:
//! - `routes/`: HTTP routes + handlers (one file per surface)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent `{"message": ...}` error responses
//! - `export.rs`: CSV rendering of the project report

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use labfunds_auth::TokenCodec;
use labfunds_store::FinanceService;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod export;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(service: FinanceService, jwt_secret: &str) -> Router {
    let codec = Arc::new(TokenCodec::new(jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState { codec };
    let service = Arc::new(service);

    // Protected routes: require a valid session token.
    let protected = routes::router()
        .layer(Extension(service))
        .layer(axum::middleware::from_fn_with_state(
            auth_state.clone(),
            middleware::auth_middleware,
        ));

    let public = Router::new()
        .route("/health", get(routes::system::health))
        .route("/auth/check", get(routes::system::auth_check))
        .with_state(auth_state);

    public.merge(protected).layer(ServiceBuilder::new())
}
