//! Account (ledger) entries and their structured remarks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use labfunds_core::{DomainError, EntryId, Paise};

/// Fixed prefix of the displayed remarks of a reimbursement-credit entry.
pub const REMARKS_PREFIX: &str = "Reimbursement money for ";

/// Account class an entry is booked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Current,
    Savings,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Current => "Current",
            EntryKind::Savings => "Savings",
        }
    }
}

impl core::str::FromStr for EntryKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Current" => Ok(EntryKind::Current),
            "Savings" => Ok(EntryKind::Savings),
            other => Err(DomainError::validation(format!(
                "unknown entry kind: {other}"
            ))),
        }
    }
}

/// Structured remarks on an account entry.
///
/// The legacy system stored the display string and re-parsed it on every
/// mutation; here the title list is the source of truth and the string is
/// derived on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EntryRemarks {
    /// Ordered titles of the reimbursements this entry paid out.
    ReimbursementCredits(Vec<String>),
    /// Free text (used by transfer records).
    Note(String),
}

impl EntryRemarks {
    /// Human-readable remarks string. A credits list always begins with
    /// [`REMARKS_PREFIX`]; an empty list renders as the bare prefix.
    pub fn display(&self) -> String {
        match self {
            EntryRemarks::ReimbursementCredits(titles) => {
                format!("{REMARKS_PREFIX}{}", titles.join(","))
            }
            EntryRemarks::Note(text) => text.clone(),
        }
    }

    /// Remove the first occurrence of `title` from a credits list.
    ///
    /// Returns `true` if a title was removed. Notes and lists without the
    /// title are left unchanged.
    pub fn remove_first(&mut self, title: &str) -> bool {
        match self {
            EntryRemarks::ReimbursementCredits(titles) => {
                match titles.iter().position(|t| t == title) {
                    Some(idx) => {
                        titles.remove(idx);
                        true
                    }
                    None => false,
                }
            }
            EntryRemarks::Note(_) => false,
        }
    }

    /// A credits entry whose title list has drained must be deleted rather
    /// than kept around with an empty list.
    pub fn is_drained(&self) -> bool {
        matches!(self, EntryRemarks::ReimbursementCredits(titles) if titles.is_empty())
    }
}

/// A record of money credited or debited against a lab account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEntry {
    pub id: EntryId,
    pub amount: Paise,
    pub kind: EntryKind,
    pub credited: bool,
    /// Sum of amounts of Savings-settled expenses covered by this entry.
    pub transferable: Paise,
    pub remarks: EntryRemarks,
    /// Linked entry representing money actually moved out, if any.
    pub transfer: Option<EntryId>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credits_display_carries_the_fixed_prefix() {
        let remarks =
            EntryRemarks::ReimbursementCredits(vec!["A".to_string(), "B".to_string()]);
        assert_eq!(remarks.display(), "Reimbursement money for A,B");
    }

    #[test]
    fn drained_credits_display_is_the_bare_prefix() {
        let remarks = EntryRemarks::ReimbursementCredits(vec![]);
        assert_eq!(remarks.display(), REMARKS_PREFIX);
        assert!(remarks.is_drained());
    }

    #[test]
    fn remove_first_takes_only_the_first_duplicate() {
        let mut remarks = EntryRemarks::ReimbursementCredits(vec![
            "travel".to_string(),
            "gpu".to_string(),
            "travel".to_string(),
        ]);
        assert!(remarks.remove_first("travel"));
        assert_eq!(remarks.display(), "Reimbursement money for gpu,travel");
    }

    #[test]
    fn remove_first_of_absent_title_is_a_no_op() {
        let mut remarks = EntryRemarks::ReimbursementCredits(vec!["gpu".to_string()]);
        assert!(!remarks.remove_first("travel"));
        assert_eq!(remarks.display(), "Reimbursement money for gpu");
    }

    #[test]
    fn note_displays_as_itself() {
        let remarks = EntryRemarks::Note("Savings moved out".to_string());
        assert_eq!(remarks.display(), "Savings moved out");
        assert!(!remarks.is_drained());
    }
}
