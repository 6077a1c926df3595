use crate::error::AppError;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

/// Today's calendar date in the server's local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Reduce an ISO-8601 date or datetime string to its calendar date.
///
/// Accepts `2024-03-01`, `2024-03-01T08:15:00`, `2024-03-01 08:15:00.123`
/// and RFC 3339 forms with an offset. For offset forms the date is taken as
/// written, not converted to another zone.
pub fn normalize_date(raw: &str) -> Result<NaiveDate, AppError> {
    let raw = raw.trim();

    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(d);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.date_naive());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(dt.date());
        }
    }

    Err(AppError::BadRequest(format!(
        "Invalid date '{raw}', expected YYYY-MM-DD"
    )))
}
