//! Reimbursement requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use labfunds_core::{EntryId, ExpenseId, Paise, ProjectId, ReimbursementId};

use crate::expense::Expense;

/// A request for money owed back to a claimant, tied to a project and a set
/// of expenses.
///
/// Invariant: `paid == true` implies `entry_id` is set (the ledger entry that
/// paid it); `paid == false` implies `entry_id` is `None`. The store enforces
/// this by flipping both fields together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reimbursement {
    pub id: ReimbursementId,
    pub project_id: ProjectId,
    /// Claimed expenses, in the order they were filed.
    pub expense_ids: Vec<ExpenseId>,
    pub project_head: String,
    pub title: String,
    pub description: String,
    pub total_amount: Paise,
    /// Pointer to the filed claim document, if any.
    pub reference_url: Option<String>,
    pub paid: bool,
    pub entry_id: Option<EntryId>,
    /// Period index within the project's funding schedule (0-based).
    pub year_or_installment: u32,
    pub created_at: DateTime<Utc>,
}

/// Read model: a reimbursement with its claimed expenses resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReimbursementWithExpenses {
    pub reimbursement: Reimbursement,
    pub expenses: Vec<Expense>,
}

impl ReimbursementWithExpenses {
    /// Sum of amounts of the Savings-settled expenses under this claim.
    pub fn savings_total(&self) -> Paise {
        self.expenses
            .iter()
            .filter(|e| e.is_savings_settled())
            .map(|e| e.amount)
            .sum()
    }
}
