//! Shared helpers for command handlers.

use chrono::{DateTime, NaiveDate, Utc};

use moja_core::Role;

/// Parse a `--from` / `--to` value: full RFC 3339, or a bare date taken
/// as midnight UTC.
pub fn parse_time(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("expected RFC 3339 (2024-05-01T10:00:00Z) or YYYY-MM-DD, got '{raw}'"))
}

/// `admin, user`, or `-` for an empty set.
pub fn join_roles<'a>(roles: impl IntoIterator<Item = &'a Role>) -> String {
    let joined = roles
        .into_iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() { "-".into() } else { joined }
}

/// Format a timestamp for tables.
pub fn format_time(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}
