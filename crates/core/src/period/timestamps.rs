use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// A record that carries a raw creation timestamp.
pub trait Timestamped {
    fn created_at(&self) -> Option<&str>;

    /// Returns the creation date, or `None` if missing or unparseable.
    fn created_date(&self) -> Option<NaiveDate> {
        self.created_at().and_then(parse_timestamp)
    }
}

/// Parses a creation timestamp into a date.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS[.fff]`, `YYYY-MM-DD HH:MM:SS[.fff]`
/// and plain `YYYY-MM-DD`. Anything else yields `None`.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
