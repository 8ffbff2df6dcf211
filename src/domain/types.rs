//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - decoded straight from the sentiment API's JSON payloads
//! - passed through the formatting/normalization pipeline by value
//! - exported to JSON/CSV or rendered by the terminal front-ends

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One of the six emotion categories scored upstream.
///
/// The declaration order is the canonical order for iteration, table columns
/// and chart legends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SentimentChannel {
    Joy,
    Love,
    Fear,
    Anger,
    Sadness,
    Surprise,
}

impl SentimentChannel {
    pub const ALL: [SentimentChannel; 6] = [
        SentimentChannel::Joy,
        SentimentChannel::Love,
        SentimentChannel::Fear,
        SentimentChannel::Anger,
        SentimentChannel::Sadness,
        SentimentChannel::Surprise,
    ];

    /// Field name used by the API and by exported records.
    pub fn name(self) -> &'static str {
        match self {
            SentimentChannel::Joy => "joy",
            SentimentChannel::Love => "love",
            SentimentChannel::Fear => "fear",
            SentimentChannel::Anger => "anger",
            SentimentChannel::Sadness => "sadness",
            SentimentChannel::Surprise => "surprise",
        }
    }

    /// Single-character marker for ASCII plots.
    ///
    /// `surprise` uses `u` so it doesn't collide with `sadness`.
    pub fn glyph(self) -> char {
        match self {
            SentimentChannel::Joy => 'j',
            SentimentChannel::Love => 'l',
            SentimentChannel::Fear => 'f',
            SentimentChannel::Anger => 'a',
            SentimentChannel::Sadness => 's',
            SentimentChannel::Surprise => 'u',
        }
    }

    /// Fixed chart color (RGB) for this channel.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            SentimentChannel::Joy => (250, 204, 21),
            SentimentChannel::Love => (236, 72, 153),
            SentimentChannel::Fear => (139, 92, 246),
            SentimentChannel::Anger => (239, 68, 68),
            SentimentChannel::Sadness => (59, 130, 246),
            SentimentChannel::Surprise => (34, 197, 94),
        }
    }

    fn index(self) -> usize {
        match self {
            SentimentChannel::Joy => 0,
            SentimentChannel::Love => 1,
            SentimentChannel::Fear => 2,
            SentimentChannel::Anger => 3,
            SentimentChannel::Sadness => 4,
            SentimentChannel::Surprise => 5,
        }
    }

    /// Next channel in canonical order (wraps).
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous channel in canonical order (wraps).
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for SentimentChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SentimentChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown sentiment channel '{wanted}'"))
    }
}

/// One value per sentiment channel.
///
/// Serializes as six flat fields (`joy`, `love`, ...), so it can be
/// `#[serde(flatten)]`-ed into record types. Absent fields deserialize to
/// `T::default()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Channels<T> {
    pub joy: T,
    pub love: T,
    pub fear: T,
    pub anger: T,
    pub sadness: T,
    pub surprise: T,
}

impl<T> Channels<T> {
    pub fn from_fn(mut f: impl FnMut(SentimentChannel) -> T) -> Self {
        Self {
            joy: f(SentimentChannel::Joy),
            love: f(SentimentChannel::Love),
            fear: f(SentimentChannel::Fear),
            anger: f(SentimentChannel::Anger),
            sadness: f(SentimentChannel::Sadness),
            surprise: f(SentimentChannel::Surprise),
        }
    }

    pub fn get(&self, channel: SentimentChannel) -> &T {
        match channel {
            SentimentChannel::Joy => &self.joy,
            SentimentChannel::Love => &self.love,
            SentimentChannel::Fear => &self.fear,
            SentimentChannel::Anger => &self.anger,
            SentimentChannel::Sadness => &self.sadness,
            SentimentChannel::Surprise => &self.surprise,
        }
    }

    pub fn get_mut(&mut self, channel: SentimentChannel) -> &mut T {
        match channel {
            SentimentChannel::Joy => &mut self.joy,
            SentimentChannel::Love => &mut self.love,
            SentimentChannel::Fear => &mut self.fear,
            SentimentChannel::Anger => &mut self.anger,
            SentimentChannel::Sadness => &mut self.sadness,
            SentimentChannel::Surprise => &mut self.surprise,
        }
    }

    /// Iterate `(channel, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (SentimentChannel, &T)> + '_ {
        SentimentChannel::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(SentimentChannel, &T) -> U) -> Channels<U> {
        Channels::from_fn(|c| f(c, self.get(c)))
    }
}

/// A sentiment snapshot as delivered by the history endpoint.
///
/// Every field is untyped JSON: the API is loose about numbers vs numeric
/// strings, and bad values must degrade per-field instead of failing the
/// whole payload. Unknown fields (e.g. `updatedAt`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub timestamp: Value,
    #[serde(flatten)]
    pub scores: Channels<Value>,
}

/// A chart-ready record: formatted label plus one optional value per channel.
///
/// `None` means "no data" and is kept distinct from a measured `0.0` through
/// the whole pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRecord {
    pub timestamp: String,
    #[serde(flatten)]
    pub scores: Channels<Option<f64>>,
}

/// Output of the record formatter (scores rounded to 4 decimals).
pub type FormattedRecord = ChartRecord;

/// Output of the normalizer (scores are z-scores).
pub type NormalizedRecord = ChartRecord;

/// Per-channel summary statistics over a whole series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelStatistics {
    pub mean: f64,
    /// Population standard deviation (divisor `count`), never zero.
    pub std_dev: f64,
    /// Number of present values that contributed.
    pub count: usize,
}

impl ChannelStatistics {
    /// Fallback for a channel with no present values.
    pub const EMPTY: ChannelStatistics = ChannelStatistics {
        mean: 0.0,
        std_dev: 1.0,
        count: 0,
    };
}

impl Default for ChannelStatistics {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Payload of the "current sentiment" endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentSentiment {
    #[serde(flatten)]
    pub scores: Channels<Value>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Value,
    /// Posts that drove each channel's score.
    ///
    /// `null` lists, a `null` map, and entries that aren't post objects all
    /// decode as "no posts" instead of failing the snapshot.
    #[serde(rename = "_top_contributor", default, deserialize_with = "loose_contributors")]
    pub top_contributor: Channels<Vec<Post>>,
}

/// A Reddit post attributed to a channel.
///
/// Decoding never fails on a field: `null` or mistyped values fall back to
/// the field's default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    #[serde(deserialize_with = "loose_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub url: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub subreddit: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub text: Option<String>,
    #[serde(deserialize_with = "loose_score")]
    pub score: f64,
    #[serde(deserialize_with = "loose_count")]
    pub num_comments: Option<u64>,
    #[serde(deserialize_with = "loose_comments")]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    #[serde(deserialize_with = "loose_string")]
    pub body: Option<String>,
}

fn loose_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

fn loose_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn loose_score<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(loose_number(&Value::deserialize(d)?).unwrap_or_default())
}

fn loose_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    let count = loose_number(&Value::deserialize(d)?).filter(|v| *v >= 0.0);
    Ok(count.map(|v| v.trunc().min(u64::MAX as f64) as u64))
}

fn loose_comments<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Comment>, D::Error> {
    let Value::Array(items) = Value::deserialize(d)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(body) => Some(Comment { body: Some(body) }),
            other => serde_json::from_value(other).ok(),
        })
        .collect())
}

fn loose_posts(value: Option<&Value>) -> Vec<Post> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| item.is_object())
            .filter_map(|item| Post::deserialize(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

fn loose_contributors<'de, D: Deserializer<'de>>(d: D) -> Result<Channels<Vec<Post>>, D::Error> {
    let raw = Value::deserialize(d)?;
    Ok(Channels::from_fn(|channel| loose_posts(raw.get(channel.name()))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn channel_parsing_is_case_insensitive() {
        assert_eq!("Joy".parse::<SentimentChannel>().unwrap(), SentimentChannel::Joy);
        assert_eq!(" SURPRISE ".parse::<SentimentChannel>().unwrap(), SentimentChannel::Surprise);
        assert!("disgust".parse::<SentimentChannel>().is_err());
    }

    #[test]
    fn channel_cycling_wraps() {
        assert_eq!(SentimentChannel::Surprise.next(), SentimentChannel::Joy);
        assert_eq!(SentimentChannel::Joy.prev(), SentimentChannel::Surprise);
        assert_eq!(SentimentChannel::Love.next(), SentimentChannel::Fear);
    }

    #[test]
    fn raw_record_ignores_extra_fields_and_defaults_missing_to_null() {
        let raw: RawRecord = serde_json::from_value(json!({
            "timestamp": 1709182800000u64,
            "joy": "0.5",
            "anger": 0.3,
            "updatedAt": "2024-02-29T05:00:00Z",
        }))
        .unwrap();

        assert_eq!(raw.timestamp, json!(1709182800000u64));
        assert_eq!(raw.scores.joy, json!("0.5"));
        assert_eq!(raw.scores.anger, json!(0.3));
        assert_eq!(raw.scores.fear, Value::Null);
        assert_eq!(raw.scores.surprise, Value::Null);
    }

    #[test]
    fn chart_record_serializes_flat_with_nulls() {
        let rec = ChartRecord {
            timestamp: "Feb 29, 05:00".to_string(),
            scores: Channels::from_fn(|c| (c != SentimentChannel::Fear).then_some(0.5)),
        };
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(
            v,
            json!({
                "timestamp": "Feb 29, 05:00",
                "joy": 0.5,
                "love": 0.5,
                "fear": null,
                "anger": 0.5,
                "sadness": 0.5,
                "surprise": 0.5,
            })
        );
    }

    #[test]
    fn current_sentiment_tolerates_sparse_posts() {
        let current: CurrentSentiment = serde_json::from_value(json!({
            "joy": 0.4,
            "fear": "0.5",
            "updatedAt": "2025-08-06T19:51:36Z",
            "_top_contributor": {
                "joy": [{ "id": "abc", "score": 12 }, { "title": "untitled-less" }],
            },
        }))
        .unwrap();

        assert_eq!(current.scores.fear, json!("0.5"));
        assert_eq!(current.top_contributor.joy.len(), 2);
        assert_eq!(current.top_contributor.joy[0].score, 12.0);
        assert!(current.top_contributor.anger.is_empty());
    }

    #[test]
    fn null_and_mistyped_post_fields_fall_back_to_defaults() {
        let current: CurrentSentiment = serde_json::from_value(json!({
            "joy": 0.4,
            "_top_contributor": {
                "joy": [
                    { "id": "a", "score": null, "comments": null, "title": null },
                    { "id": 7, "score": "12", "num_comments": 12.0, "comments": ["nice", { "body": null }, 3] },
                    "not-a-post",
                ],
                "fear": null,
            },
        }))
        .unwrap();

        assert_eq!(current.scores.joy, json!(0.4));
        let joy = &current.top_contributor.joy;
        assert_eq!(joy.len(), 2);
        assert_eq!(joy[0].score, 0.0);
        assert_eq!(joy[0].title, None);
        assert!(joy[0].comments.is_empty());
        assert_eq!(joy[1].id.as_deref(), Some("7"));
        assert_eq!(joy[1].score, 12.0);
        assert_eq!(joy[1].num_comments, Some(12));
        assert_eq!(
            joy[1].comments,
            vec![Comment { body: Some("nice".into()) }, Comment { body: None }]
        );
        assert!(current.top_contributor.fear.is_empty());
    }

    #[test]
    fn null_contributor_map_keeps_the_scores() {
        let current: CurrentSentiment = serde_json::from_value(json!({
            "joy": 0.4,
            "fear": 0.1,
            "_top_contributor": null,
        }))
        .unwrap();

        assert_eq!(current.scores.fear, json!(0.1));
        assert!(current.top_contributor.iter().all(|(_, posts)| posts.is_empty()));
    }

    #[test]
    fn snapshot_survives_a_json_round_trip() {
        let mut current = CurrentSentiment::default();
        current.scores.joy = json!(0.25);
        current.top_contributor.love = vec![Post {
            title: Some("hello".into()),
            score: 3.0,
            num_comments: Some(1),
            ..Post::default()
        }];

        let back: CurrentSentiment = serde_json::from_value(serde_json::to_value(&current).unwrap()).unwrap();
        assert_eq!(back, current);
    }
}
