//! Reimbursement routes: listing, report/export, CRUD, and the paid/unpaid
//! reconciliation endpoints.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use labfunds_core::{ExpenseId, ProjectId, ReimbursementId};
use labfunds_store::{FinanceService, NewReimbursement, ReimbursementUpdate};

use crate::app::{dto, errors, export};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_all).post(create))
        .route("/paid", post(mark_paid))
        .route("/unpaid", post(mark_unpaid))
        .route(
            "/:id",
            get(project_report).put(update).delete(remove),
        )
}

async fn list_all(Extension(service): Extension<Arc<FinanceService>>) -> axum::response::Response {
    match service.list_reimbursements().await {
        Ok(items) => {
            let body: Vec<_> = items.iter().map(dto::reimbursement_to_json).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::service_error("Error fetching reimbursements", e),
    }
}

/// Project-scoped report: JSON by default, a CSV attachment when
/// `exportData` is present.
async fn project_report(
    Extension(service): Extension<Arc<FinanceService>>,
    Path(id): Path<String>,
    Query(query): Query<dto::ReportQuery>,
) -> axum::response::Response {
    let Ok(project_id) = id.parse::<ProjectId>() else {
        return errors::json_message(StatusCode::BAD_REQUEST, "Invalid project id");
    };

    let report = match service.project_report(project_id, &query.filter()).await {
        Ok(report) => report,
        Err(e) => return errors::service_error("Error fetching reimbursements", e),
    };

    if !query.wants_export() {
        return (
            StatusCode::OK,
            Json(serde_json::json!({
                "reimbursements": report.reimbursements.iter().map(dto::claim_to_json).collect::<Vec<_>>(),
                "instituteExpenses": report.institute_expenses.iter().map(dto::institute_expense_to_json).collect::<Vec<_>>(),
            })),
        )
            .into_response();
    }

    if report.reimbursements.is_empty() && report.institute_expenses.is_empty() {
        return errors::json_message(StatusCode::NOT_FOUND, "Nothing to export for this project");
    }

    match export::render_report_csv(&report) {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=reimbursements.csv",
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => errors::json_message(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error exporting reimbursements: {e}"),
        ),
    }
}

async fn create(
    Extension(service): Extension<Arc<FinanceService>>,
    Json(body): Json<dto::CreateReimbursementRequest>,
) -> axum::response::Response {
    let Ok(project_id) = body.project_id.parse::<ProjectId>() else {
        return errors::json_message(StatusCode::BAD_REQUEST, "Invalid project id");
    };
    let Ok(expense_ids) = parse_ids::<ExpenseId>(&body.expense_ids) else {
        return errors::json_message(StatusCode::BAD_REQUEST, "Invalid expense id");
    };

    let new = NewReimbursement {
        project_id,
        project_head: body.project_head,
        total_amount: body.total_amount,
        title: body.title,
        description: body.description,
        reference_url: body.reference_url,
        expense_ids,
    };

    match service.create_reimbursement(new).await {
        Ok(details) => {
            (StatusCode::CREATED, Json(dto::reimbursement_to_json(&details))).into_response()
        }
        Err(e) => errors::service_error("Error creating reimbursement", e),
    }
}

async fn update(
    Extension(service): Extension<Arc<FinanceService>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateReimbursementRequest>,
) -> axum::response::Response {
    let Ok(id) = id.parse::<ReimbursementId>() else {
        return errors::json_message(StatusCode::BAD_REQUEST, "Invalid reimbursement id");
    };
    let Ok(project_id) = body.project.parse::<ProjectId>() else {
        return errors::json_message(StatusCode::BAD_REQUEST, "Invalid project id");
    };
    let (Ok(expense_ids), Ok(removed_expense_ids)) = (
        parse_ids::<ExpenseId>(&body.expenses),
        parse_ids::<ExpenseId>(&body.removed_expenses),
    ) else {
        return errors::json_message(StatusCode::BAD_REQUEST, "Invalid expense id");
    };

    let fields = ReimbursementUpdate {
        project_id,
        project_head: body.project_head,
        total_amount: body.total_amount,
        title: body.title,
        description: body.description,
        reference_url: body.reference_url,
        expense_ids,
        removed_expense_ids,
    };

    match service.update_reimbursement(id, fields).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => errors::service_error("Error updating reimbursement", e),
    }
}

async fn remove(
    Extension(service): Extension<Arc<FinanceService>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let Ok(id) = id.parse::<ReimbursementId>() else {
        return errors::json_message(StatusCode::BAD_REQUEST, "Invalid reimbursement id");
    };

    match service.delete_reimbursement(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error("Error deleting reimbursement", e),
    }
}

async fn mark_paid(
    Extension(service): Extension<Arc<FinanceService>>,
    Json(body): Json<dto::ReimbursementIdsRequest>,
) -> axum::response::Response {
    let Some(ids) = validate_selection(&body) else {
        return invalid_selection();
    };

    match service.mark_paid(&ids).await {
        Ok(()) => updated_ok(),
        Err(e) => errors::service_error("Error updating reimbursements", e),
    }
}

async fn mark_unpaid(
    Extension(service): Extension<Arc<FinanceService>>,
    Json(body): Json<dto::ReimbursementIdsRequest>,
) -> axum::response::Response {
    let Some(ids) = validate_selection(&body) else {
        return invalid_selection();
    };

    match service.mark_unpaid(&ids).await {
        Ok(()) => updated_ok(),
        Err(e) => errors::service_error("Error updating reimbursements", e),
    }
}

/// A reconciliation request must carry a non-empty array of well-formed ids.
fn validate_selection(body: &dto::ReimbursementIdsRequest) -> Option<Vec<ReimbursementId>> {
    let raw = body.reimbursement_ids.as_ref()?;
    if raw.is_empty() {
        return None;
    }
    parse_ids::<ReimbursementId>(raw).ok()
}

fn invalid_selection() -> axum::response::Response {
    errors::json_message(
        StatusCode::BAD_REQUEST,
        "Invalid input. Please provide an array of reimbursement IDs.",
    )
}

fn updated_ok() -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({"message": "Reimbursements updated successfully"})),
    )
        .into_response()
}

fn parse_ids<T: core::str::FromStr>(raw: &[String]) -> Result<Vec<T>, T::Err> {
    raw.iter().map(|s| s.parse()).collect()
}
