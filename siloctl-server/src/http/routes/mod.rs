//! Route handlers organized by resource

use chrono::{DateTime, SecondsFormat, Utc};

pub mod health;
pub mod ingest;
pub mod silobags;
pub mod users;

/// Timestamp as it appears in response bodies: UTC, millisecond
/// precision, `Z` suffix (`2024-01-02T03:04:05.000Z`).
pub(crate) fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
