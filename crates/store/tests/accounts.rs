//! Account entry surface: transfers and the deletion cascade.

mod common;

use common::{file_claim, seed_expense, seed_project, test_service};
use labfunds_core::EntryId;
use labfunds_finance::{EntryKind, Settlement};
use labfunds_store::ServiceError;

#[tokio::test]
async fn transfer_out_moves_the_transferable_sum() {
    let (service, _tmp) = test_service().await;
    let project = seed_project(&service, 0).await;

    let savings = seed_expense(&service, 200, Some(Settlement::Savings)).await;
    let a = file_claim(&service, &project, "A", 500, vec![savings.id]).await;
    service.mark_paid(&[a]).await.unwrap();
    let source_id = service.list_entries().await.unwrap()[0].id;

    let updated = service.transfer_out(source_id).await.unwrap();
    assert_eq!(updated.transferable, 0);
    let moved_id = updated.transfer.expect("source must link its transfer");

    let moved = service.get_entry(moved_id).await.unwrap().unwrap();
    assert_eq!(moved.amount, 200);
    assert_eq!(moved.kind, EntryKind::Savings);
    assert!(moved.credited);
    assert_eq!(moved.transferable, 0);
    assert_eq!(moved.transfer, None);
}

#[tokio::test]
async fn transfer_out_rejects_double_transfer_and_empty_transferable() {
    let (service, _tmp) = test_service().await;
    let project = seed_project(&service, 0).await;

    let savings = seed_expense(&service, 200, Some(Settlement::Savings)).await;
    let a = file_claim(&service, &project, "A", 500, vec![savings.id]).await;
    let b = file_claim(&service, &project, "B", 300, vec![]).await;
    service.mark_paid(&[a]).await.unwrap();
    service.mark_paid(&[b]).await.unwrap();

    let entries = service.list_entries().await.unwrap();
    let with_savings = entries.iter().find(|e| e.transferable > 0).unwrap().id;
    let without_savings = entries.iter().find(|e| e.transferable == 0).unwrap().id;

    service.transfer_out(with_savings).await.unwrap();
    let err = service.transfer_out(with_savings).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let err = service.transfer_out(without_savings).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn transfer_out_of_unknown_entry_is_not_found() {
    let (service, _tmp) = test_service().await;
    let err = service.transfer_out(EntryId::new()).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn deleting_a_transfer_record_cascades_to_its_holder() {
    let (service, _tmp) = test_service().await;
    let project = seed_project(&service, 0).await;

    let savings = seed_expense(&service, 200, Some(Settlement::Savings)).await;
    let a = file_claim(&service, &project, "A", 500, vec![savings.id]).await;
    service.mark_paid(&[a]).await.unwrap();
    let source_id = service.list_entries().await.unwrap()[0].id;

    let updated = service.transfer_out(source_id).await.unwrap();
    let moved_id = updated.transfer.unwrap();

    // Deleting the transfer record takes the holding entry with it, and the
    // reimbursement that entry paid reverts to unpaid.
    service.delete_entry(moved_id).await.unwrap();
    assert!(service.list_entries().await.unwrap().is_empty());

    let details = service.get_reimbursement(a).await.unwrap().unwrap();
    assert!(!details.reimbursement.paid);
    assert_eq!(details.reimbursement.entry_id, None);
}

#[tokio::test]
async fn deleting_a_plain_entry_reverts_its_reimbursements() {
    let (service, _tmp) = test_service().await;
    let project = seed_project(&service, 0).await;

    let a = file_claim(&service, &project, "A", 500, vec![]).await;
    let b = file_claim(&service, &project, "B", 300, vec![]).await;
    service.mark_paid(&[a, b]).await.unwrap();
    let entry_id = service.list_entries().await.unwrap()[0].id;

    service.delete_entry(entry_id).await.unwrap();

    for id in [a, b] {
        let details = service.get_reimbursement(id).await.unwrap().unwrap();
        assert!(!details.reimbursement.paid);
        assert_eq!(details.reimbursement.entry_id, None);
    }
}

#[tokio::test]
async fn delete_of_unknown_entry_is_not_found() {
    let (service, _tmp) = test_service().await;
    let err = service.delete_entry(EntryId::new()).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn entries_list_newest_first() {
    let (service, _tmp) = test_service().await;
    let project = seed_project(&service, 0).await;

    let a = file_claim(&service, &project, "A", 100, vec![]).await;
    let b = file_claim(&service, &project, "B", 200, vec![]).await;
    service.mark_paid(&[a]).await.unwrap();
    service.mark_paid(&[b]).await.unwrap();

    let entries = service.list_entries().await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].remarks.display(), "Reimbursement money for B");
    assert_eq!(entries[1].remarks.display(), "Reimbursement money for A");
}
