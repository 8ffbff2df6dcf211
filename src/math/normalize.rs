//! Per-channel z-score normalization of a formatted series.
//!
//! For each channel independently:
//!
//! ```text
//! mean    = Σ v_i / n
//! std_dev = sqrt(Σ (v_i - mean)^2 / n)      (population, divisor n)
//! z_i     = (v_i - mean) / std_dev
//! ```
//!
//! over the present values `v_i` of that channel only. An empty channel uses
//! `mean = 0, std_dev = 1`; a constant channel uses `std_dev = 1`, so its
//! values all map to `0`. Missing values stay missing.

use crate::domain::{ChannelStatistics, Channels, FormattedRecord, NormalizedRecord, SentimentChannel};

/// Mean and population standard deviation of one channel across `records`.
pub fn channel_statistics(records: &[FormattedRecord], channel: SentimentChannel) -> ChannelStatistics {
    let values: Vec<f64> = records
        .iter()
        .filter_map(|r| *r.scores.get(channel))
        .filter(|v| v.is_finite())
        .collect();

    if values.is_empty() {
        return ChannelStatistics::EMPTY;
    }

    // A constant channel must map to exact zeros; summing can leave the mean a
    // few ulps off the value, which would blow up into z-scores of ±1.
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if min == max {
        return ChannelStatistics {
            mean: min,
            std_dev: 1.0,
            count: values.len(),
        };
    }

    // Work on values scaled into [-1, 1] so sums and squares can't overflow
    // for scores near f64::MAX.
    let scale = min.abs().max(max.abs());
    let n = values.len() as f64;
    let mean_scaled = values.iter().map(|v| v / scale).sum::<f64>() / n;
    let variance_scaled = values
        .iter()
        .map(|v| (v / scale - mean_scaled).powi(2))
        .sum::<f64>()
        / n;
    let mean = mean_scaled * scale;
    let std_dev = variance_scaled.sqrt() * scale;

    ChannelStatistics {
        mean,
        std_dev: if std_dev > 0.0 && std_dev.is_finite() { std_dev } else { 1.0 },
        count: values.len(),
    }
}

/// Statistics for every channel, computed once over the whole series.
pub fn series_statistics(records: &[FormattedRecord]) -> Channels<ChannelStatistics> {
    Channels::from_fn(|channel| channel_statistics(records, channel))
}

/// Z-score of a single value, or `None` if the value is missing.
pub fn z_score(value: Option<f64>, stats: &ChannelStatistics) -> Option<f64> {
    value.filter(|v| v.is_finite()).map(|v| {
        let deviation = v - stats.mean;
        if deviation.is_finite() {
            deviation / stats.std_dev
        } else {
            // The difference of two huge opposite-sign values overflows; the
            // quotients don't.
            v / stats.std_dev - stats.mean / stats.std_dev
        }
    })
}

/// Map every present channel value to its z-score within the series.
///
/// Returns a new series of the same length and order; timestamps are copied
/// unchanged and the input is left untouched.
pub fn normalize_series(records: &[FormattedRecord]) -> Vec<NormalizedRecord> {
    let stats = series_statistics(records);
    normalize_with(records, &stats)
}

/// Normalize against precomputed statistics.
pub fn normalize_with(records: &[FormattedRecord], stats: &Channels<ChannelStatistics>) -> Vec<NormalizedRecord> {
    records
        .iter()
        .map(|r| NormalizedRecord {
            timestamp: r.timestamp.clone(),
            scores: r.scores.map(|channel, v| z_score(*v, stats.get(channel))),
        })
        .collect()
}
