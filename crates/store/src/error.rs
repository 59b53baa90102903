//! Service-layer error taxonomy.

use thiserror::Error;

use labfunds_core::DomainError;

/// Errors surfaced by the application service.
///
/// The HTTP layer maps these centrally: `NotFound` to 404, `Validation` to
/// 400, everything else to 500 with the route's context sentence prepended.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    /// A persisted record failed to decode (bad UUID, JSON, or timestamp).
    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

impl ServiceError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::Corrupt(msg.into())
    }
}

// Domain parse failures only occur while decoding rows here, so they count
// as corruption rather than caller mistakes.
impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        ServiceError::Corrupt(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Corrupt(err.to_string())
    }
}
