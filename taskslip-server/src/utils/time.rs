//! Timestamp parsing for form and JSON input

use chrono::{DateTime, NaiveDateTime};
use chrono_tz::Tz;

use crate::printing::ValidationError;

/// Layouts accepted for timestamps without an offset
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a user-supplied timestamp into display-local wall-clock time
///
/// RFC 3339 input is converted into `tz`. Input without an offset (the
/// browser's `datetime-local` value) is already local and kept as-is.
/// Blank input means "no timestamp".
pub fn parse_timestamp(input: &str, tz: Tz) -> Result<Option<NaiveDateTime>, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(Some(dt.with_timezone(&tz).naive_local()));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(Some)
        .ok_or_else(|| ValidationError::InvalidTimestamp(input.to_string()))
}
