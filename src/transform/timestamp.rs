//! Timestamp labels for chart axes.
//!
//! Labels use a fixed, locale-independent layout: `"%b %d, %H:%M"`, i.e.
//! English abbreviated month, 2-digit day, 24-hour clock (`00`..`23`) and
//! 2-digit minute, rendered in a caller-chosen zone. `1709182800000` in UTC
//! renders as `"Feb 29, 05:00"`.
//!
//! Accepted inputs:
//! - JSON numbers: epoch milliseconds (fraction truncated toward zero)
//! - RFC 3339 / ISO 8601 strings with an offset
//! - ISO date-times without an offset, read as wall-clock time in the target zone
//! - date-only `YYYY-MM-DD`, read as UTC midnight
//! - RFC 2822 strings
//!
//! Anything else renders as [`INVALID_DATE`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::Value;

/// Label emitted for unparseable timestamps.
pub const INVALID_DATE: &str = "Invalid Date";

/// strftime layout of every label.
pub const LABEL_FORMAT: &str = "%b %d, %H:%M";

/// Largest representable distance from the epoch, in milliseconds (±100M days).
const MAX_EPOCH_MS: f64 = 8.64e15;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"];

/// Zone a label is rendered in.
///
/// `Local` is resolved from the platform every time it is used; it is never
/// cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
    Named(Tz),
}

impl FromStr for Zone {
    type Err = String;

    /// Accepts `local`, `utc`/`UTC`/`Z`/`GMT`, `±HH:MM`/`±HHMM`/`±HH`, or an IANA name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.is_empty() || t.eq_ignore_ascii_case("local") {
            return Ok(Zone::Local);
        }
        if t.eq_ignore_ascii_case("utc") || t.eq_ignore_ascii_case("gmt") || t == "Z" {
            return Ok(Zone::Utc);
        }
        if t.starts_with('+') || t.starts_with('-') {
            return parse_offset(t).map(Zone::Fixed);
        }
        t.parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| format!("unknown time zone '{t}'"))
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Local => f.write_str("local"),
            Zone::Utc => f.write_str("UTC"),
            Zone::Fixed(offset) => write!(f, "{offset}"),
            Zone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

fn parse_offset(t: &str) -> Result<FixedOffset, String> {
    let invalid = || format!("invalid UTC offset '{t}' (expected ±HH:MM)");
    let sign = if t.starts_with('-') { -1 } else { 1 };
    let digits: String = t[1..].chars().filter(|c| *c != ':').collect();
    if !(digits.len() == 2 || digits.len() == 4) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = if digits.len() == 4 {
        digits[2..].parse().map_err(|_| invalid())?
    } else {
        0
    };
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Format a timestamp value as a chart label in `zone`.
pub fn format_timestamp(value: &Value, zone: &Zone) -> String {
    match parse_instant(value, zone) {
        Some(instant) => format_instant(instant, zone),
        None => INVALID_DATE.to_string(),
    }
}

/// [`format_timestamp`] in the platform's current zone.
pub fn format_timestamp_local(value: &Value) -> String {
    format_timestamp(value, &Zone::Local)
}

/// Render an instant with [`LABEL_FORMAT`] in `zone`.
pub fn format_instant(instant: DateTime<Utc>, zone: &Zone) -> String {
    match zone {
        Zone::Local => instant.with_timezone(&Local).format(LABEL_FORMAT).to_string(),
        Zone::Utc => instant.format(LABEL_FORMAT).to_string(),
        Zone::Fixed(offset) => instant.with_timezone(offset).format(LABEL_FORMAT).to_string(),
        Zone::Named(tz) => instant.with_timezone(tz).format(LABEL_FORMAT).to_string(),
    }
}

/// Resolve a timestamp value to an instant.
///
/// `zone` only matters for offset-less date-times, which are read as wall
/// time in that zone.
pub fn parse_instant(value: &Value, zone: &Zone) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => from_epoch_millis(n.as_f64()?),
        Value::String(s) => parse_date_string(s, zone),
        _ => None,
    }
}

fn from_epoch_millis(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() || ms.abs() > MAX_EPOCH_MS {
        return None;
    }
    DateTime::from_timestamp_millis(ms.trunc() as i64)
}

fn parse_date_string(raw: &str, zone: &Zone) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return localize(naive, zone);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    None
}

/// Read a wall-clock time in `zone`. Ambiguous (DST fold) times take the
/// earlier instant; non-existent (DST gap) times are invalid.
fn localize(naive: NaiveDateTime, zone: &Zone) -> Option<DateTime<Utc>> {
    match zone {
        Zone::Utc => Some(naive.and_utc()),
        Zone::Local => Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
        Zone::Fixed(offset) => offset
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
        Zone::Named(tz) => tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}
