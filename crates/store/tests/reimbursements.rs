//! Reimbursement CRUD, back-reference maintenance, and query filters.

mod common;

use common::{
    file_claim, seed_expense, seed_institute_expense, seed_project, test_service,
};
use labfunds_core::ProjectId;
use labfunds_store::{NewReimbursement, ReimbursementUpdate, ReportFilter, ServiceError};

#[tokio::test]
async fn create_links_expenses_and_takes_the_project_index() {
    let (service, _tmp) = test_service().await;
    let project = seed_project(&service, 2).await;
    let expense = seed_expense(&service, 1_000, None).await;

    let details = service
        .create_reimbursement(NewReimbursement {
            project_id: project.id,
            project_head: "Consumables".to_string(),
            total_amount: 1_000,
            title: "toner".to_string(),
            description: "printer toner".to_string(),
            reference_url: Some("https://docs.lab/claims/17".to_string()),
            expense_ids: vec![expense.id],
        })
        .await
        .unwrap();

    assert!(!details.reimbursement.paid);
    assert_eq!(details.reimbursement.entry_id, None);
    // Invoice project on installment 2.
    assert_eq!(details.reimbursement.year_or_installment, 2);
    assert_eq!(details.project.id, project.id);
    assert_eq!(details.expenses.len(), 1);

    let stored = service.get_expense(expense.id).await.unwrap().unwrap();
    assert_eq!(stored.reimbursement_id, Some(details.reimbursement.id));
}

#[tokio::test]
async fn create_with_unknown_project_is_not_found() {
    let (service, _tmp) = test_service().await;

    let err = service
        .create_reimbursement(NewReimbursement {
            project_id: ProjectId::new(),
            project_head: "Consumables".to_string(),
            total_amount: 1_000,
            title: "toner".to_string(),
            description: String::new(),
            reference_url: None,
            expense_ids: vec![],
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn update_replaces_fields_and_clears_removed_back_references() {
    let (service, _tmp) = test_service().await;
    let project = seed_project(&service, 0).await;
    let kept = seed_expense(&service, 400, None).await;
    let dropped = seed_expense(&service, 600, None).await;

    let id = file_claim(&service, &project, "old title", 1_000, vec![kept.id, dropped.id]).await;

    service
        .update_reimbursement(
            id,
            ReimbursementUpdate {
                project_id: project.id,
                project_head: "Equipment".to_string(),
                total_amount: 400,
                title: "new title".to_string(),
                description: "trimmed claim".to_string(),
                reference_url: None,
                expense_ids: vec![kept.id],
                removed_expense_ids: vec![dropped.id],
            },
        )
        .await
        .unwrap();

    let details = service.get_reimbursement(id).await.unwrap().unwrap();
    assert_eq!(details.reimbursement.title, "new title");
    assert_eq!(details.reimbursement.project_head, "Equipment");
    assert_eq!(details.reimbursement.total_amount, 400);
    assert_eq!(details.expenses.len(), 1);

    let dropped_stored = service.get_expense(dropped.id).await.unwrap().unwrap();
    assert_eq!(dropped_stored.reimbursement_id, None);
    // The kept expense still points back at the claim.
    let kept_stored = service.get_expense(kept.id).await.unwrap().unwrap();
    assert_eq!(kept_stored.reimbursement_id, Some(id));
}

#[tokio::test]
async fn delete_clears_back_references_of_remaining_expenses() {
    let (service, _tmp) = test_service().await;
    let project = seed_project(&service, 0).await;
    let expense = seed_expense(&service, 400, None).await;

    let id = file_claim(&service, &project, "claim", 400, vec![expense.id]).await;
    service.delete_reimbursement(id).await.unwrap();

    assert!(service.get_reimbursement(id).await.unwrap().is_none());
    let stored = service.get_expense(expense.id).await.unwrap().unwrap();
    assert_eq!(stored.reimbursement_id, None);

    let err = service.delete_reimbursement(id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn list_all_puts_unpaid_first_then_newest_first() {
    let (service, _tmp) = test_service().await;
    let project = seed_project(&service, 0).await;

    let first = file_claim(&service, &project, "first", 100, vec![]).await;
    let second = file_claim(&service, &project, "second", 200, vec![]).await;
    let third = file_claim(&service, &project, "third", 300, vec![]).await;
    service.mark_paid(&[second]).await.unwrap();

    let listed = service.list_reimbursements().await.unwrap();
    let ids: Vec<_> = listed.iter().map(|d| d.reimbursement.id).collect();
    assert_eq!(ids, vec![third, first, second]);
}

#[tokio::test]
async fn project_report_filters_by_head_and_index() {
    let (service, _tmp) = test_service().await;
    let project = seed_project(&service, 0).await;

    let consumables = file_claim(&service, &project, "toner", 100, vec![]).await;
    seed_institute_expense(&service, &project, "Consumables", 250, 0).await;
    seed_institute_expense(&service, &project, "Equipment", 900, 0).await;

    // Head filter matches the claim's head and one institute expense.
    let filtered = service
        .project_report(
            project.id,
            &ReportFilter {
                head: Some("Consumables".to_string()),
                index: None,
                all: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(filtered.reimbursements.len(), 1);
    assert_eq!(filtered.reimbursements[0].reimbursement.id, consumables);
    assert_eq!(filtered.institute_expenses.len(), 1);

    // `all` overrides the head filter.
    let everything = service
        .project_report(
            project.id,
            &ReportFilter {
                head: Some("Consumables".to_string()),
                index: None,
                all: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(everything.institute_expenses.len(), 2);

    // Index filter excludes other periods.
    let wrong_period = service
        .project_report(
            project.id,
            &ReportFilter {
                head: None,
                index: Some(5),
                all: true,
            },
        )
        .await
        .unwrap();
    assert!(wrong_period.reimbursements.is_empty());
    assert!(wrong_period.institute_expenses.is_empty());
}

#[tokio::test]
async fn project_report_for_unknown_project_is_not_found() {
    let (service, _tmp) = test_service().await;

    let err = service
        .project_report(ProjectId::new(), &ReportFilter::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
