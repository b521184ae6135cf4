use chrono::{DateTime, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::ir::Primitive;

/// What to do with strings that look like ISO-8601 date-times.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateStrings {
    /// Keep them as `string`; the JSON value is still text at runtime.
    #[default]
    Plain,
    /// Emit the distinguished `Date` type (for callers that revive dates).
    Date,
}

static ISO_DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{3})?Z?$").unwrap()
});

pub fn classify(s: &str, policy: DateStrings) -> Primitive {
    match policy {
        DateStrings::Date if looks_like_date_time(s) => Primitive::Date,
        _ => Primitive::String,
    }
}

/// `2024-01-31T12:00:00Z`, `2024-01-31T12:00:00.123`, ... The shape must
/// match and the fields must form a real calendar date-time.
pub fn looks_like_date_time(s: &str) -> bool {
    if !ISO_DATE_TIME.is_match(s) {
        return false;
    }
    if s.ends_with('Z') {
        DateTime::parse_from_rfc3339(s).is_ok()
    } else {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
    }
}
