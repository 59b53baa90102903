//! Application service: every workflow runs in one transaction.

use chrono::Utc;
use sqlx::{Sqlite, Transaction};
use tracing::{info, warn};

use labfunds_core::{EntryId, ExpenseId, Paise, ProjectId, ReimbursementId};
use labfunds_finance::{
    assemble_payment_batch, release_from_entry, AccountEntry, EntryKind, EntryRelease,
    EntryRemarks, Expense, InstituteExpense, Project, Reimbursement, ReimbursementWithExpenses,
};

use crate::error::ServiceError;
use crate::store::Store;
use crate::{entries, expenses, projects, reimbursements};

/// Fields of a new reimbursement request.
#[derive(Debug, Clone)]
pub struct NewReimbursement {
    pub project_id: ProjectId,
    pub project_head: String,
    pub total_amount: Paise,
    pub title: String,
    pub description: String,
    pub reference_url: Option<String>,
    pub expense_ids: Vec<ExpenseId>,
}

/// Replacement fields for an edit, plus the expenses dropped from the claim.
#[derive(Debug, Clone)]
pub struct ReimbursementUpdate {
    pub project_id: ProjectId,
    pub project_head: String,
    pub total_amount: Paise,
    pub title: String,
    pub description: String,
    pub reference_url: Option<String>,
    pub expense_ids: Vec<ExpenseId>,
    pub removed_expense_ids: Vec<ExpenseId>,
}

/// Filter for project-scoped listings.
///
/// The head filter is ignored when `all` is set, mirroring the frontend
/// contract; the index filter applies whenever present.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub head: Option<String>,
    pub index: Option<u32>,
    pub all: bool,
}

impl ReportFilter {
    pub fn head_filter(&self) -> Option<&str> {
        if self.all { None } else { self.head.as_deref() }
    }
}

/// Read model: a reimbursement with its project and expenses resolved.
#[derive(Debug, Clone)]
pub struct ReimbursementDetails {
    pub reimbursement: Reimbursement,
    pub project: Project,
    pub expenses: Vec<Expense>,
}

/// Everything the project report (JSON or CSV) renders.
#[derive(Debug, Clone)]
pub struct ProjectReport {
    pub project: Project,
    pub reimbursements: Vec<ReimbursementWithExpenses>,
    pub institute_expenses: Vec<InstituteExpense>,
}

/// Application service over the [`Store`].
#[derive(Debug, Clone)]
pub struct FinanceService {
    store: Store,
}

impl FinanceService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Connect, migrate, and wrap in one step.
    pub async fn init(database_url: &str) -> Result<Self, ServiceError> {
        Ok(Self::new(Store::init(database_url).await?))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    async fn begin(&self) -> Result<Transaction<'_, Sqlite>, ServiceError> {
        Ok(self.store.pool().begin().await?)
    }

    // ------------------------------------------------------------------
    // Referenced stores (written through the service, no HTTP surface)
    // ------------------------------------------------------------------

    pub async fn add_project(&self, project: &Project) -> Result<(), ServiceError> {
        let mut conn = self.store.pool().acquire().await?;
        projects::insert(&mut conn, project).await
    }

    pub async fn get_project(&self, id: ProjectId) -> Result<Option<Project>, ServiceError> {
        let mut conn = self.store.pool().acquire().await?;
        projects::get(&mut conn, id).await
    }

    pub async fn add_expense(&self, expense: &Expense) -> Result<(), ServiceError> {
        let mut conn = self.store.pool().acquire().await?;
        expenses::insert(&mut conn, expense).await
    }

    pub async fn get_expense(&self, id: ExpenseId) -> Result<Option<Expense>, ServiceError> {
        let mut conn = self.store.pool().acquire().await?;
        expenses::get(&mut conn, id).await
    }

    pub async fn add_institute_expense(
        &self,
        expense: &InstituteExpense,
    ) -> Result<(), ServiceError> {
        let mut conn = self.store.pool().acquire().await?;
        expenses::insert_institute(&mut conn, expense).await
    }

    // ------------------------------------------------------------------
    // Reimbursement CRUD & queries
    // ------------------------------------------------------------------

    /// All reimbursements, unpaid first then newest first, expanded with
    /// project and expenses.
    pub async fn list_reimbursements(&self) -> Result<Vec<ReimbursementDetails>, ServiceError> {
        let mut conn = self.store.pool().acquire().await?;
        let all = reimbursements::list_all(&mut conn).await?;

        let mut details = Vec::with_capacity(all.len());
        for reimbursement in all {
            let project = projects::get(&mut conn, reimbursement.project_id)
                .await?
                .ok_or_else(|| {
                    ServiceError::corrupt(format!(
                        "reimbursement {} references missing project",
                        reimbursement.id
                    ))
                })?;
            let expenses = expenses::get_many(&mut conn, &reimbursement.expense_ids).await?;
            details.push(ReimbursementDetails {
                reimbursement,
                project,
                expenses,
            });
        }
        Ok(details)
    }

    /// One reimbursement expanded with project and expenses.
    pub async fn get_reimbursement(
        &self,
        id: ReimbursementId,
    ) -> Result<Option<ReimbursementDetails>, ServiceError> {
        let mut conn = self.store.pool().acquire().await?;
        let Some(reimbursement) = reimbursements::get(&mut conn, id).await? else {
            return Ok(None);
        };
        let Some(project) = projects::get(&mut conn, reimbursement.project_id).await? else {
            return Ok(None);
        };
        let expenses = expenses::get_many(&mut conn, &reimbursement.expense_ids).await?;
        Ok(Some(ReimbursementDetails {
            reimbursement,
            project,
            expenses,
        }))
    }

    /// Reimbursements and institute expenses of one project under a filter.
    pub async fn project_report(
        &self,
        project_id: ProjectId,
        filter: &ReportFilter,
    ) -> Result<ProjectReport, ServiceError> {
        let mut conn = self.store.pool().acquire().await?;
        let project = projects::get(&mut conn, project_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Project ID not found!"))?;

        let claims = reimbursements::list_for_project(&mut conn, project_id, filter).await?;
        let mut with_expenses = Vec::with_capacity(claims.len());
        for reimbursement in claims {
            let expenses = expenses::get_many(&mut conn, &reimbursement.expense_ids).await?;
            with_expenses.push(ReimbursementWithExpenses {
                reimbursement,
                expenses,
            });
        }

        let institute_expenses =
            expenses::list_institute_for_project(&mut conn, project_id, filter).await?;

        Ok(ProjectReport {
            project,
            reimbursements: with_expenses,
            institute_expenses,
        })
    }

    /// File a new reimbursement: the parent project must exist, the period
    /// index comes from the project's schedule, and the claimed expenses get
    /// their back-reference set, all in one transaction.
    pub async fn create_reimbursement(
        &self,
        new: NewReimbursement,
    ) -> Result<ReimbursementDetails, ServiceError> {
        let mut tx = self.begin().await?;

        let project = projects::get(&mut tx, new.project_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Project ID not found!"))?;

        let now = Utc::now();
        let reimbursement = Reimbursement {
            id: ReimbursementId::new(),
            project_id: new.project_id,
            expense_ids: new.expense_ids,
            project_head: new.project_head,
            title: new.title,
            description: new.description,
            total_amount: new.total_amount,
            reference_url: new.reference_url,
            paid: false,
            entry_id: None,
            year_or_installment: project.current_index(now),
            created_at: now,
        };

        reimbursements::insert(&mut tx, &reimbursement).await?;
        expenses::set_reimbursement(&mut tx, &reimbursement.expense_ids, Some(reimbursement.id))
            .await?;
        let expenses = expenses::get_many(&mut tx, &reimbursement.expense_ids).await?;

        tx.commit().await?;

        Ok(ReimbursementDetails {
            reimbursement,
            project,
            expenses,
        })
    }

    /// Replace mutable fields; expenses dropped from the claim get their
    /// back-reference cleared. Expenses newly listed are *not* re-pointed
    /// here, preserving the transient many-to-one the edit flow allows.
    pub async fn update_reimbursement(
        &self,
        id: ReimbursementId,
        update: ReimbursementUpdate,
    ) -> Result<(), ServiceError> {
        let mut tx = self.begin().await?;

        let mut existing = reimbursements::get(&mut tx, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Reimbursement not found"))?;

        expenses::set_reimbursement(&mut tx, &update.removed_expense_ids, None).await?;

        existing.project_id = update.project_id;
        existing.project_head = update.project_head;
        existing.title = update.title;
        existing.description = update.description;
        existing.total_amount = update.total_amount;
        existing.reference_url = update.reference_url;
        existing.expense_ids = update.expense_ids;
        reimbursements::update_fields(&mut tx, &existing).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Delete a reimbursement and clear the back-reference of any expense
    /// still pointing at it. Its ledger entry, if any, stays untouched.
    pub async fn delete_reimbursement(&self, id: ReimbursementId) -> Result<(), ServiceError> {
        let mut tx = self.begin().await?;

        if !reimbursements::delete(&mut tx, id).await? {
            return Err(ServiceError::not_found("Reimbursement not found"));
        }
        expenses::clear_reimbursement_refs(&mut tx, id).await?;

        tx.commit().await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reconciliation workflow
    // ------------------------------------------------------------------

    /// Mark a selection paid: one new credited ledger entry covering the
    /// previously unpaid subset, which is then batch-updated to point at it.
    ///
    /// Already-paid members of the selection are silently skipped. A
    /// selection with nothing left to pay reports not-found and performs no
    /// writes. There is no idempotency token: a second call over freshly
    /// unpaid ids is a distinct payment event with its own entry.
    pub async fn mark_paid(&self, ids: &[ReimbursementId]) -> Result<(), ServiceError> {
        let mut tx = self.begin().await?;

        let candidates = self.load_selection(&mut tx, ids).await?;
        let Some(batch) = assemble_payment_batch(&candidates) else {
            return Err(ServiceError::not_found(
                "No valid reimbursements found to be marked paid.",
            ));
        };

        let entry = AccountEntry {
            id: EntryId::new(),
            amount: batch.amount,
            kind: EntryKind::Current,
            credited: true,
            transferable: batch.transferable,
            remarks: EntryRemarks::ReimbursementCredits(batch.titles.clone()),
            transfer: None,
            created_at: Utc::now(),
        };
        entries::insert(&mut tx, &entry).await?;
        reimbursements::set_paid(&mut tx, &batch.reimbursement_ids, entry.id).await?;

        tx.commit().await?;

        info!(
            entry_id = %entry.id,
            amount = entry.amount,
            transferable = entry.transferable,
            reimbursements = batch.reimbursement_ids.len(),
            "ledger entry created for paid batch"
        );
        Ok(())
    }

    /// Mark a selection unpaid, backing each previously paid claim out of
    /// its ledger entry one at a time in lookup order, then batch-resetting
    /// every requested id to unpaid with no ledger reference.
    pub async fn mark_unpaid(&self, ids: &[ReimbursementId]) -> Result<(), ServiceError> {
        let mut tx = self.begin().await?;

        let candidates = self.load_selection(&mut tx, ids).await?;
        let eligible: Vec<&ReimbursementWithExpenses> = candidates
            .iter()
            .filter(|c| c.reimbursement.paid)
            .collect();

        if eligible.is_empty() {
            return Err(ServiceError::not_found(
                "No valid reimbursements found to be marked unpaid.",
            ));
        }

        for claim in eligible {
            // No ledger reference: nothing to back out.
            let Some(entry_id) = claim.reimbursement.entry_id else {
                continue;
            };
            // Fresh read; an earlier iteration may have updated or deleted it.
            let Some(entry) = entries::get(&mut tx, entry_id).await? else {
                continue;
            };

            if let Some(transfer_id) = entry.transfer {
                if !entries::delete(&mut tx, transfer_id).await? {
                    warn!(%transfer_id, "linked transfer record already absent");
                }
            }

            match release_from_entry(entry, claim) {
                EntryRelease::Updated(updated) => entries::update(&mut tx, &updated).await?,
                EntryRelease::Deleted => {
                    entries::delete(&mut tx, entry_id).await?;
                    info!(%entry_id, "ledger entry drained and deleted");
                }
            }
        }

        reimbursements::set_unpaid(&mut tx, ids).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn load_selection(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        ids: &[ReimbursementId],
    ) -> Result<Vec<ReimbursementWithExpenses>, ServiceError> {
        let selected = reimbursements::list_by_ids(tx, ids).await?;
        let mut loaded = Vec::with_capacity(selected.len());
        for reimbursement in selected {
            let expenses = expenses::get_many(tx, &reimbursement.expense_ids).await?;
            loaded.push(ReimbursementWithExpenses {
                reimbursement,
                expenses,
            });
        }
        Ok(loaded)
    }

    // ------------------------------------------------------------------
    // Account entries
    // ------------------------------------------------------------------

    /// All ledger entries, newest first.
    pub async fn list_entries(&self) -> Result<Vec<AccountEntry>, ServiceError> {
        let mut conn = self.store.pool().acquire().await?;
        entries::list_all(&mut conn).await
    }

    pub async fn get_entry(&self, id: EntryId) -> Result<Option<AccountEntry>, ServiceError> {
        let mut conn = self.store.pool().acquire().await?;
        entries::get(&mut conn, id).await
    }

    /// Move an entry's transferable sum out into a linked savings entry,
    /// zeroing the source's transferable.
    pub async fn transfer_out(&self, id: EntryId) -> Result<AccountEntry, ServiceError> {
        let mut tx = self.begin().await?;

        let mut source = entries::get(&mut tx, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Account entry not found"))?;

        if source.transfer.is_some() {
            return Err(ServiceError::validation(
                "Account entry already has a linked transfer",
            ));
        }
        if source.transferable <= 0 {
            return Err(ServiceError::validation(
                "Account entry has nothing transferable",
            ));
        }

        let moved = AccountEntry {
            id: EntryId::new(),
            amount: source.transferable,
            kind: EntryKind::Savings,
            credited: true,
            transferable: 0,
            remarks: EntryRemarks::Note(format!("Savings moved out of account entry {}", source.id)),
            transfer: None,
            created_at: Utc::now(),
        };
        entries::insert(&mut tx, &moved).await?;

        source.transfer = Some(moved.id);
        source.transferable = 0;
        entries::update(&mut tx, &source).await?;

        tx.commit().await?;

        info!(source = %source.id, transfer = %moved.id, amount = moved.amount, "savings transferred out");
        Ok(source)
    }

    /// Delete an entry. Any entry holding it as its transfer goes with it,
    /// and reimbursements referencing a deleted entry are reverted to unpaid
    /// so the paid/entry invariant cannot dangle.
    pub async fn delete_entry(&self, id: EntryId) -> Result<(), ServiceError> {
        let mut tx = self.begin().await?;

        if entries::get(&mut tx, id).await?.is_none() {
            return Err(ServiceError::not_found("Account entry not found"));
        }

        let holders = entries::holders_of_transfer(&mut tx, id).await?;
        let mut deleted = vec![id];
        entries::delete(&mut tx, id).await?;
        for holder in holders {
            entries::delete(&mut tx, holder.id).await?;
            deleted.push(holder.id);
        }

        reimbursements::revert_entry_refs(&mut tx, &deleted).await?;

        tx.commit().await?;

        info!(entries = deleted.len(), "account entries deleted");
        Ok(())
    }
}
