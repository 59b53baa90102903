//! Pure pieces of the paid/unpaid reconciliation workflow.
//!
//! The store drives these inside a single transaction per invocation:
//! [`assemble_payment_batch`] decides what one "mark paid" call credits, and
//! [`release_from_entry`] decides how one reimbursement's share is backed out
//! of its ledger entry on "mark unpaid".

use labfunds_core::{Paise, ReimbursementId};

use crate::entry::AccountEntry;
use crate::reimbursement::ReimbursementWithExpenses;

/// What a single "mark paid" call credits to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentBatch {
    /// Sum of `total_amount` over the previously unpaid selection.
    pub amount: Paise,
    /// Sum of Savings-settled expense amounts over the same selection.
    pub transferable: Paise,
    /// Titles in lookup order; becomes the entry's credits list.
    pub titles: Vec<String>,
    /// The previously unpaid reimbursements the batch covers, in lookup order.
    pub reimbursement_ids: Vec<ReimbursementId>,
}

/// Assemble the payment batch for a "mark paid" selection.
///
/// Already-paid candidates are silently skipped: excluded from both sums and
/// from the id list, never reported as an error. Returns `None` when nothing
/// in the selection was still unpaid, in which case the caller must perform
/// no writes.
pub fn assemble_payment_batch(
    candidates: &[ReimbursementWithExpenses],
) -> Option<PaymentBatch> {
    let unpaid: Vec<&ReimbursementWithExpenses> = candidates
        .iter()
        .filter(|c| !c.reimbursement.paid)
        .collect();

    if unpaid.is_empty() {
        return None;
    }

    let mut batch = PaymentBatch {
        amount: 0,
        transferable: 0,
        titles: Vec::with_capacity(unpaid.len()),
        reimbursement_ids: Vec::with_capacity(unpaid.len()),
    };

    for item in unpaid {
        batch.amount += item.reimbursement.total_amount;
        batch.transferable += item.savings_total();
        batch.titles.push(item.reimbursement.title.clone());
        batch.reimbursement_ids.push(item.reimbursement.id);
    }

    Some(batch)
}

/// Outcome of backing one reimbursement out of its ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryRelease {
    /// The entry still credits other reimbursements; persist this state.
    Updated(AccountEntry),
    /// The last title was removed; the entry must be deleted outright.
    Deleted,
}

/// Back one reimbursement's share out of `entry` (the "mark unpaid" core).
///
/// Subtracts the claim total from the entry amount and its Savings-settled
/// expense amounts from `transferable` (no clamping; negatives are carried
/// exactly as the legacy ledger did), then removes the first occurrence of
/// the claim's title from the credits list. A drained credits list means the
/// entry itself goes away.
pub fn release_from_entry(
    mut entry: AccountEntry,
    claim: &ReimbursementWithExpenses,
) -> EntryRelease {
    entry.amount -= claim.reimbursement.total_amount;
    entry.transferable -= claim.savings_total();
    entry.remarks.remove_first(&claim.reimbursement.title);

    if entry.remarks.is_drained() {
        EntryRelease::Deleted
    } else {
        EntryRelease::Updated(entry)
    }
}
