//! Session token claims (transport-agnostic).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried by a staff session token.
///
/// Standard JWT registered claims with UNIX-second timestamps; `sub` is the
/// staff member's email as issued by the lab's identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: staff email.
    pub sub: String,

    /// Issued-at (UNIX seconds).
    pub iat: i64,

    /// Expiration (UNIX seconds).
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),
}
