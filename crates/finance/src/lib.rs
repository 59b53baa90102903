//! `labfunds-finance` — pure finance domain.
//!
//! Projects, expenses, reimbursements, account entries, and the pure parts of
//! the paid/unpaid reconciliation workflow. No I/O: persistence lives in
//! `labfunds-store`, which drives these types inside its transactions.

pub mod entry;
pub mod expense;
pub mod project;
pub mod reconcile;
pub mod reimbursement;

pub use entry::{AccountEntry, EntryKind, EntryRemarks, REMARKS_PREFIX};
pub use expense::{Expense, InstituteExpense, Settlement};
pub use project::{Project, ProjectKind};
pub use reconcile::{assemble_payment_batch, release_from_entry, EntryRelease, PaymentBatch};
pub use reimbursement::{Reimbursement, ReimbursementWithExpenses};
