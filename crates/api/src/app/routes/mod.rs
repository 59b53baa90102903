use axum::Router;

pub mod account;
pub mod reimburse;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/reimburse", reimburse::router())
        .nest("/account", account::router())
}
