//! Small shared SQL helpers.

use chrono::{DateTime, Utc};

use crate::error::ServiceError;

/// `?,?,...` placeholder list for an `IN (...)` clause.
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(",")
}

/// Parse an RFC 3339 timestamp column.
pub(crate) fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, ServiceError> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ServiceError::corrupt(format!("timestamp {text:?}: {e}")))
}
