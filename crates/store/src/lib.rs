//! `labfunds-store` — SQLite persistence and the application service.
//!
//! A [`Store`] owns the connection pool and the embedded schema migration.
//! Per-entity query modules operate on `&mut SqliteConnection` so they compose
//! under a transaction, and [`FinanceService`] runs every workflow inside one
//! transaction per invocation: either every step commits or none does.

pub mod entries;
pub mod error;
pub mod expenses;
pub mod projects;
pub mod reimbursements;
pub mod service;
pub mod store;

mod sql;

pub use error::ServiceError;
pub use service::{
    FinanceService, NewReimbursement, ProjectReport, ReimbursementDetails, ReimbursementUpdate,
    ReportFilter,
};
pub use store::Store;

/// SQL migration for the initial schema.
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");
