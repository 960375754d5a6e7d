//! Release timestamps.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// Parses a release timestamp into a UTC date-time.
///
/// Accepts the index's own `YYYY-MM-DD HH:MM UTC` format (seconds and the
/// `UTC` suffix optional, naive values are taken as UTC) and RFC 3339.
///
/// ```rust
/// use sznjd_extract::parse_timestamp;
/// let published = parse_timestamp("2023-01-15 12:34 UTC").unwrap();
/// assert_eq!(published.unix_timestamp(), 1_673_786_040);
/// ```
pub fn parse_timestamp(date: &str) -> Result<OffsetDateTime> {
    let trimmed = date.trim();
    let naive = trimmed
        .strip_suffix("UTC")
        .or_else(|| trimmed.strip_suffix("utc"))
        .unwrap_or(trimmed)
        .trim_end();
    let minutes = format_description!("[year]-[month]-[day] [hour]:[minute]");
    let seconds = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    if let Ok(parsed) = PrimitiveDateTime::parse(naive, minutes) {
        return Ok(parsed.assume_utc());
    }
    if let Ok(parsed) = PrimitiveDateTime::parse(naive, seconds) {
        return Ok(parsed.assume_utc());
    }
    OffsetDateTime::parse(trimmed, &Rfc3339).or_raise(|| ErrorKind::ParseError {
        field: "date",
        value: date.to_string(),
    })
}

/// Renders a timestamp as RFC 3339, the representation used in release records.
pub fn format_timestamp(timestamp: OffsetDateTime) -> String {
    // Formatting a valid OffsetDateTime as RFC 3339 only fails for years
    // outside 0..=9999, which no release page carries.
    timestamp.format(&Rfc3339).unwrap_or_else(|_| timestamp.unix_timestamp().to_string())
}
