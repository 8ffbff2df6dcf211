//! Record shaping: score coercion, timestamp labels, and record formatting.
//!
//! Everything here is pure and infallible. Malformed fields degrade to
//! sentinels (`None` for scores, `"Invalid Date"` for labels).

pub mod records;
pub mod score;
pub mod timestamp;

pub use records::{format_record, format_records, missing_counts};
pub use score::{coerce_score, parse_score, round_score};
pub use timestamp::{INVALID_DATE, Zone, format_instant, format_timestamp, format_timestamp_local, parse_instant};
