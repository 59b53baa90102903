//! `labfunds-core` — shared domain foundation.
//!
//! Strongly-typed identifiers, the currency unit, and the domain error model.
//! This crate is pure (no persistence or HTTP concerns).

pub mod error;
pub mod id;
pub mod money;

pub use error::{DomainError, DomainResult};
pub use id::{EntryId, ExpenseId, ProjectId, ReimbursementId};
pub use money::{display_rupees, Paise};
