use std::sync::LazyLock;

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime};

use crate::error::{CoreError, Result};

static DURATION_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^(\d+)([dhms])$").expect("Invalid duration regex")
});

/// Parse a search date.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DDThh:mm:ss` (read as UTC) and
/// plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date_time(s: &str) -> Result<OffsetDateTime> {
    let s = s.trim();
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        return Ok(dt);
    }
    if let Ok(dt) = PrimitiveDateTime::parse(
        s,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ) {
        return Ok(dt.assume_utc());
    }
    Date::parse(s, format_description!("[year]-[month]-[day]"))
        .map(|d| d.midnight().assume_utc())
        .map_err(|e| CoreError::invalid_date_time(format!("'{s}': {e}")))
}

/// Turn an inclusive end date into an exclusive upper bound by advancing it
/// exactly one day, so the whole original end day is covered.
pub fn end_of_day_exclusive(end: OffsetDateTime) -> Result<OffsetDateTime> {
    end.checked_add(Duration::DAY)
        .ok_or_else(|| CoreError::DateOutOfRange(end.to_string()))
}

/// Parse a relative duration such as `20d`, `12h`, `30m` or `45s`.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let caps = DURATION_REGEX
        .captures(s.trim())
        .ok_or_else(|| CoreError::invalid_duration(s))?;
    let amount: i64 = caps[1]
        .parse()
        .map_err(|_| CoreError::invalid_duration(s))?;
    let unit_seconds: i64 = match &caps[2] {
        "d" => 86_400,
        "h" => 3_600,
        "m" => 60,
        _ => 1,
    };
    amount
        .checked_mul(unit_seconds)
        .map(Duration::seconds)
        .ok_or_else(|| CoreError::invalid_duration(s))
}
