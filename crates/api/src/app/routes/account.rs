//! Account ledger routes: listing, savings transfers, and deletion.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};

use labfunds_core::EntryId;
use labfunds_store::FinanceService;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_all))
        .route("/:id/transfer", post(transfer))
        .route("/:id", delete(remove_entry))
}

async fn list_all(Extension(service): Extension<Arc<FinanceService>>) -> axum::response::Response {
    match service.list_entries().await {
        Ok(entries) => {
            let body: Vec<_> = entries.iter().map(dto::entry_to_json).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::service_error("Error fetching account entries", e),
    }
}

/// Move an entry's transferable savings into a fresh savings-account entry.
async fn transfer(
    Extension(service): Extension<Arc<FinanceService>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let Ok(id) = id.parse::<EntryId>() else {
        return errors::json_message(StatusCode::BAD_REQUEST, "Invalid account entry id");
    };

    match service.transfer_out(id).await {
        Ok(entry) => (StatusCode::CREATED, Json(dto::entry_to_json(&entry))).into_response(),
        Err(e) => errors::service_error("Error transferring savings", e),
    }
}

async fn remove_entry(
    Extension(service): Extension<Arc<FinanceService>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let Ok(id) = id.parse::<EntryId>() else {
        return errors::json_message(StatusCode::BAD_REQUEST, "Invalid account entry id");
    };

    match service.delete_entry(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error("Error deleting account entry", e),
    }
}
