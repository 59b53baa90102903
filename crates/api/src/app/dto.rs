//! Request/response DTOs and JSON mapping helpers.
//!
//! Field names follow the frontend contract: camelCase, `referenceURL`,
//! `paidStatus`, `accEntry`, `yearOrInstallment`. Amounts on the wire are
//! integer paise.

use serde::Deserialize;
use serde_json::{json, Value};

use labfunds_core::Paise;
use labfunds_finance::{AccountEntry, Expense, InstituteExpense, Project, ReimbursementWithExpenses};
use labfunds_store::{ReimbursementDetails, ReportFilter};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReimbursementRequest {
    pub project_id: String,
    pub project_head: String,
    pub total_amount: Paise,
    pub title: String,
    pub description: String,
    #[serde(rename = "referenceURL")]
    pub reference_url: Option<String>,
    #[serde(default)]
    pub expense_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReimbursementRequest {
    pub project: String,
    pub project_head: String,
    pub total_amount: Paise,
    pub title: String,
    pub description: String,
    #[serde(rename = "referenceURL")]
    pub reference_url: Option<String>,
    #[serde(default)]
    pub expenses: Vec<String>,
    #[serde(default)]
    pub removed_expenses: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReimbursementIdsRequest {
    pub reimbursement_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub head: Option<String>,
    /// Period index; non-numeric values (the frontend's stringified
    /// `undefined`) are ignored.
    pub index: Option<String>,
    pub all: Option<String>,
    pub export_data: Option<String>,
}

impl ReportQuery {
    pub fn filter(&self) -> ReportFilter {
        ReportFilter {
            head: self.head.clone(),
            index: self.index.as_deref().and_then(|s| s.parse().ok()),
            all: self.all.as_deref() == Some("true"),
        }
    }

    pub fn wants_export(&self) -> bool {
        self.export_data.is_some()
    }
}

// -------------------------
// Response mapping
// -------------------------

pub fn project_to_json(project: &Project) -> Value {
    json!({
        "id": project.id.to_string(),
        "name": project.name,
        "title": project.title,
        "fundingAgency": project.funding_agency,
        "kind": project.kind.as_str(),
        "startDate": project.start_date.to_rfc3339(),
        "currentInstallment": project.current_installment,
        "createdAt": project.created_at.to_rfc3339(),
    })
}

pub fn expense_to_json(expense: &Expense) -> Value {
    json!({
        "id": expense.id.to_string(),
        "description": expense.description,
        "amount": expense.amount,
        "settled": expense.settled.map(|s| s.as_str()),
        "reimbursedID": expense.reimbursement_id.map(|id| id.to_string()),
        "createdAt": expense.created_at.to_rfc3339(),
    })
}

pub fn institute_expense_to_json(expense: &InstituteExpense) -> Value {
    json!({
        "id": expense.id.to_string(),
        "project": expense.project_id.to_string(),
        "projectHead": expense.project_head,
        "expenseReason": expense.reason,
        "amount": expense.amount,
        "yearOrInstallment": expense.year_or_installment,
        "createdAt": expense.created_at.to_rfc3339(),
    })
}

/// A reimbursement with project and expenses expanded (the list-all shape).
pub fn reimbursement_to_json(details: &ReimbursementDetails) -> Value {
    let r = &details.reimbursement;
    json!({
        "id": r.id.to_string(),
        "project": project_to_json(&details.project),
        "expenses": details.expenses.iter().map(expense_to_json).collect::<Vec<_>>(),
        "projectHead": r.project_head,
        "title": r.title,
        "description": r.description,
        "totalAmount": r.total_amount,
        "referenceURL": r.reference_url,
        "paidStatus": r.paid,
        "accEntry": r.entry_id.map(|id| id.to_string()),
        "yearOrInstallment": r.year_or_installment,
        "createdAt": r.created_at.to_rfc3339(),
    })
}

/// A reimbursement with expenses expanded and the project left as an id (the
/// project-report shape).
pub fn claim_to_json(claim: &ReimbursementWithExpenses) -> Value {
    let r = &claim.reimbursement;
    json!({
        "id": r.id.to_string(),
        "project": r.project_id.to_string(),
        "expenses": claim.expenses.iter().map(expense_to_json).collect::<Vec<_>>(),
        "projectHead": r.project_head,
        "title": r.title,
        "description": r.description,
        "totalAmount": r.total_amount,
        "referenceURL": r.reference_url,
        "paidStatus": r.paid,
        "accEntry": r.entry_id.map(|id| id.to_string()),
        "yearOrInstallment": r.year_or_installment,
        "createdAt": r.created_at.to_rfc3339(),
    })
}

pub fn entry_to_json(entry: &AccountEntry) -> Value {
    json!({
        "id": entry.id.to_string(),
        "amount": entry.amount,
        "type": entry.kind.as_str(),
        "credited": entry.credited,
        "transferable": entry.transferable,
        "remarks": entry.remarks.display(),
        "transfer": entry.transfer.map(|id| id.to_string()),
        "createdAt": entry.created_at.to_rfc3339(),
    })
}
