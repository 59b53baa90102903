//! `labfunds-auth` — token model and HS256 codec, decoupled from HTTP.
//!
//! The identity-provider login flow lives outside this system; the backend
//! only issues and verifies its own session tokens.

pub mod claims;
pub mod codec;

pub use claims::{Claims, TokenError};
pub use codec::TokenCodec;
