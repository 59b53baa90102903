// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use labfunds_core::{ExpenseId, Paise, ProjectId, ReimbursementId};
use labfunds_finance::{Expense, InstituteExpense, Project, ProjectKind, Settlement};
use labfunds_store::{FinanceService, NewReimbursement};

/// Create a service backed by a temporary database.
pub async fn test_service() -> (FinanceService, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let service = FinanceService::init(db_path.to_str().unwrap())
        .await
        .unwrap();
    (service, temp_dir)
}

/// Seed an invoice-billed project on its given installment.
pub async fn seed_project(service: &FinanceService, installment: u32) -> Project {
    let project = Project {
        id: ProjectId::new(),
        name: "SERB-042".to_string(),
        title: "Adaptive sensing".to_string(),
        funding_agency: "SERB".to_string(),
        kind: ProjectKind::Invoice,
        start_date: Utc.with_ymd_and_hms(2022, 4, 1, 0, 0, 0).unwrap(),
        current_installment: installment,
        created_at: Utc::now(),
    };
    service.add_project(&project).await.unwrap();
    project
}

/// Seed one unclaimed expense.
pub async fn seed_expense(
    service: &FinanceService,
    amount: Paise,
    settled: Option<Settlement>,
) -> Expense {
    let expense = Expense {
        id: ExpenseId::new(),
        description: "seeded expense".to_string(),
        amount,
        settled,
        reimbursement_id: None,
        created_at: Utc::now(),
    };
    service.add_expense(&expense).await.unwrap();
    expense
}

/// Seed one institute expense under the project.
pub async fn seed_institute_expense(
    service: &FinanceService,
    project: &Project,
    head: &str,
    amount: Paise,
    index: u32,
) -> InstituteExpense {
    let expense = InstituteExpense {
        id: ExpenseId::new(),
        project_id: project.id,
        project_head: head.to_string(),
        reason: "maintenance contract".to_string(),
        amount,
        year_or_installment: index,
        created_at: Utc::now(),
    };
    service.add_institute_expense(&expense).await.unwrap();
    expense
}

/// File a claim over the given expenses and return its id.
pub async fn file_claim(
    service: &FinanceService,
    project: &Project,
    title: &str,
    total_amount: Paise,
    expense_ids: Vec<ExpenseId>,
) -> ReimbursementId {
    let details = service
        .create_reimbursement(NewReimbursement {
            project_id: project.id,
            project_head: "Consumables".to_string(),
            total_amount,
            title: title.to_string(),
            description: format!("claim {title}"),
            reference_url: None,
            expense_ids,
        })
        .await
        .unwrap();
    details.reimbursement.id
}
