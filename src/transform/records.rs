//! Raw API records -> chart-ready records.

use tracing::debug;

use crate::domain::{Channels, FormattedRecord, RawRecord};
use crate::transform::score::coerce_score;
use crate::transform::timestamp::{Zone, format_timestamp};

/// Format a single record: label the timestamp and coerce every channel.
pub fn format_record(record: &RawRecord, zone: &Zone) -> FormattedRecord {
    FormattedRecord {
        timestamp: format_timestamp(&record.timestamp, zone),
        scores: record.scores.map(|_, v| coerce_score(v)),
    }
}

/// Format a whole series, preserving length and order.
///
/// Bad fields degrade to sentinels (`None`, `"Invalid Date"`) per record;
/// the series itself never fails.
pub fn format_records(records: &[RawRecord], zone: &Zone) -> Vec<FormattedRecord> {
    let out: Vec<FormattedRecord> = records.iter().map(|r| format_record(r, zone)).collect();

    let missing = missing_counts(&out);
    let missing_total: usize = missing.iter().map(|(_, n)| *n).sum();
    if missing_total > 0 {
        debug!(
            records = out.len(),
            missing_total,
            joy = missing.joy,
            love = missing.love,
            fear = missing.fear,
            anger = missing.anger,
            sadness = missing.sadness,
            surprise = missing.surprise,
            "formatted series has missing channel values"
        );
    }

    out
}

/// Number of missing (`None`) values per channel.
pub fn missing_counts(records: &[FormattedRecord]) -> Channels<usize> {
    let mut counts = Channels::<usize>::default();
    for record in records {
        for (channel, value) in record.scores.iter() {
            if value.is_none() {
                *counts.get_mut(channel) += 1;
            }
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SentimentChannel;
    use serde_json::json;

    fn raw(v: serde_json::Value) -> RawRecord {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn empty_in_empty_out() {
        assert!(format_records(&[], &Zone::Utc).is_empty());
    }

    #[test]
    fn mixed_numbers_and_strings_fixture() {
        let records = vec![
            raw(json!({
                "timestamp": 1709182800000u64,
                "joy": "0.5",
                "anger": "0.3",
                "sadness": "0.1",
                "surprise": "0.05",
                "love": "0.03",
                "fear": "0.02",
            })),
            raw(json!({
                "timestamp": 1704085199000u64,
                "joy": 0.5,
                "anger": "0.3",
                "sadness": 0.1,
                "surprise": 3,
                "love": "0.03",
                "fear": "0.02",
            })),
        ];

        let out = format_records(&records, &Zone::Utc);
        let expected = json!([
            {
                "timestamp": "Feb 29, 05:00",
                "joy": 0.5,
                "love": 0.03,
                "fear": 0.02,
                "anger": 0.3,
                "sadness": 0.1,
                "surprise": 0.05,
            },
            {
                "timestamp": "Jan 01, 04:59",
                "joy": 0.5,
                "love": 0.03,
                "fear": 0.02,
                "anger": 0.3,
                "sadness": 0.1,
                "surprise": 3.0,
            },
        ]);
        assert_eq!(serde_json::to_value(&out).unwrap(), expected);
    }

    #[test]
    fn bad_fields_degrade_without_dropping_the_record() {
        let records = vec![
            raw(json!({ "timestamp": "3z387434", "joy": "z", "love": 0.2, "updatedAt": 1 })),
            raw(json!({ "joy": 0.1 })),
        ];
        let out = format_records(&records, &Zone::Utc);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].timestamp, "Invalid Date");
        assert_eq!(out[0].scores.joy, None);
        assert_eq!(out[0].scores.love, Some(0.2));
        assert_eq!(out[0].scores.surprise, None);
        assert_eq!(out[1].timestamp, "Invalid Date");
        assert_eq!(out[1].scores.joy, Some(0.1));

        let missing = missing_counts(&out);
        assert_eq!(*missing.get(SentimentChannel::Joy), 1);
        assert_eq!(*missing.get(SentimentChannel::Love), 1);
        assert_eq!(*missing.get(SentimentChannel::Fear), 2);
    }

    #[test]
    fn output_depends_only_on_the_matching_input_record() {
        let a = raw(json!({ "timestamp": 1709182800000u64, "joy": 0.4 }));
        let b = raw(json!({ "timestamp": 1754509896000u64, "joy": "0.9" }));

        let alone = format_records(std::slice::from_ref(&a), &Zone::Utc);
        let together = format_records(&[b.clone(), a.clone(), b], &Zone::Utc);

        assert_eq!(together.len(), 3);
        assert_eq!(together[1], alone[0]);
        assert_eq!(together[0], together[2]);
    }
}
