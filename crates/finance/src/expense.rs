//! Expenses and their settlement classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use labfunds_core::{DomainError, ExpenseId, Paise, ProjectId, ReimbursementId};

/// Account class that fronted the money for an expense.
///
/// Only `Savings`-settled amounts count toward a ledger entry's transferable
/// total when the covering reimbursement is paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Settlement {
    Savings,
    Current,
}

impl Settlement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Settlement::Savings => "Savings",
            Settlement::Current => "Current",
        }
    }
}

impl core::str::FromStr for Settlement {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Savings" => Ok(Settlement::Savings),
            "Current" => Ok(Settlement::Current),
            other => Err(DomainError::validation(format!(
                "unknown settlement class: {other}"
            ))),
        }
    }
}

/// A lab expense, optionally claimed under a reimbursement.
///
/// Expenses are referenced, not owned, by reimbursements. The back-reference
/// may transiently disagree with a reimbursement's expense list while an edit
/// is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    pub amount: Paise,
    pub settled: Option<Settlement>,
    pub reimbursement_id: Option<ReimbursementId>,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn is_savings_settled(&self) -> bool {
        self.settled == Some(Settlement::Savings)
    }
}

/// Expense paid directly by the institute, reported alongside reimbursements
/// in the project export. Written through the store only; no HTTP CRUD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstituteExpense {
    pub id: ExpenseId,
    pub project_id: ProjectId,
    pub project_head: String,
    pub reason: String,
    pub amount: Paise,
    pub year_or_installment: u32,
    pub created_at: DateTime<Utc>,
}
