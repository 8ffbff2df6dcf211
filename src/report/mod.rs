//! Presentation helpers shared by the CLI and the TUI.
//!
//! - current breakdown slices (`breakdown`)
//! - top contributing posts per channel (`top_contributors`, `post_view`)
//! - small text helpers (`excerpt`, `format_count`, `updated_label`)
//!
//! Text layouts for terminal output live in `format`.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

use crate::domain::{Channels, CurrentSentiment, Post, SentimentChannel};
use crate::transform::{Zone, coerce_score, format_timestamp};

pub mod format;

pub use format::*;

/// Body text is cut after this many characters.
pub const POST_EXCERPT_CHARS: usize = 200;
/// Top comments are cut after this many characters.
pub const COMMENT_EXCERPT_CHARS: usize = 150;

/// One slice of the current-sentiment distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Slice {
    pub channel: SentimentChannel,
    pub value: f64,
    /// Fraction of the total across present channels (0 when the total isn't positive).
    pub share: f64,
}

impl Slice {
    /// Pie-style label, e.g. `"joy: 28.6%"`.
    pub fn label(&self) -> String {
        format!("{}: {:.1}%", self.channel, self.share * 100.0)
    }
}

/// Present channels sorted ascending by value, with their share of the total.
///
/// Channels whose score doesn't coerce are left out.
pub fn breakdown(scores: &Channels<Value>) -> Vec<Slice> {
    let present: Vec<(SentimentChannel, f64)> = scores
        .iter()
        .filter_map(|(channel, v)| coerce_score(v).map(|value| (channel, value)))
        .collect();

    let total: f64 = present.iter().map(|(_, v)| v).sum();
    let mut slices: Vec<Slice> = present
        .into_iter()
        .map(|(channel, value)| Slice {
            channel,
            value,
            share: if total > 0.0 { value / total } else { 0.0 },
        })
        .collect();

    slices.sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal));
    slices
}

/// `"N/A"` when the snapshot carries no update time, otherwise a timestamp label.
pub fn updated_label(updated_at: &Value, zone: &Zone) -> String {
    if updated_at.is_null() {
        "N/A".to_string()
    } else {
        format_timestamp(updated_at, zone)
    }
}

/// Posts behind a channel, highest score first. Ties keep API order.
pub fn top_contributors(current: &CurrentSentiment, channel: SentimentChannel) -> Vec<&Post> {
    let mut posts: Vec<&Post> = current.top_contributor.get(channel).iter().collect();
    posts.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    posts
}

/// A post reduced to the strings the front-ends print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    pub subreddit: String,
    pub title: String,
    pub url: Option<String>,
    pub excerpt: Option<String>,
    pub stats: String,
    pub top_comment: Option<String>,
}

pub fn post_view(post: &Post) -> PostView {
    let non_empty = |s: &Option<String>| s.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

    let comments = post
        .num_comments
        .map(|n| n.to_string())
        .unwrap_or_else(|| "-".to_string());

    PostView {
        subreddit: format!("r/{}", post.subreddit.as_deref().unwrap_or("?")),
        title: non_empty(&post.title).unwrap_or_else(|| "[No title]".to_string()),
        url: non_empty(&post.url),
        excerpt: non_empty(&post.text).map(|t| excerpt(&t, POST_EXCERPT_CHARS)),
        stats: format!("Score: {} | Comments: {comments}", format_count(post.score)),
        top_comment: post
            .comments
            .first()
            .and_then(|c| non_empty(&c.body))
            .map(|b| excerpt(&b, COMMENT_EXCERPT_CHARS)),
    }
}

/// Cut `text` to `max_chars` characters, appending `...` when it was longer.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Integer with `,` thousands separators, e.g. `12345.0` -> `"12,345"`.
pub fn format_count(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    // Counts past the i64 range print as the nearest bound.
    let rounded = value.round().clamp(i64::MIN as f64, i64::MAX as f64) as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Comment;
    use serde_json::json;

    fn scores(v: Value) -> Channels<Value> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn breakdown_sorts_ascending_and_skips_missing() {
        let slices = breakdown(&scores(json!({
            "joy": 0.4,
            "sadness": "0.4",
            "anger": 0.1,
            "fear": 0.5,
            "love": "n/a",
        })));

        let order: Vec<SentimentChannel> = slices.iter().map(|s| s.channel).collect();
        assert_eq!(
            order,
            vec![
                SentimentChannel::Anger,
                SentimentChannel::Joy,
                SentimentChannel::Sadness,
                SentimentChannel::Fear
            ]
        );
        let total_share: f64 = slices.iter().map(|s| s.share).sum();
        assert!((total_share - 1.0).abs() < 1e-12);
        assert_eq!(slices[3].label(), "fear: 35.7%");
    }

    #[test]
    fn breakdown_with_zero_total() {
        let slices = breakdown(&scores(json!({ "joy": 0, "fear": 0 })));
        assert_eq!(slices.len(), 2);
        assert!(slices.iter().all(|s| s.share == 0.0));
        assert!(breakdown(&Channels::default()).is_empty());
    }

    #[test]
    fn updated_label_variants() {
        assert_eq!(updated_label(&Value::Null, &Zone::Utc), "N/A");
        assert_eq!(updated_label(&json!(1709182800000u64), &Zone::Utc), "Feb 29, 05:00");
        assert_eq!(updated_label(&json!("garbage"), &Zone::Utc), "Invalid Date");
    }

    #[test]
    fn contributors_highest_score_first() {
        let mut current = CurrentSentiment::default();
        current.top_contributor.joy = vec![
            Post { id: Some("a".into()), score: 5.0, ..Post::default() },
            Post { id: Some("b".into()), score: 50.0, ..Post::default() },
            Post { id: Some("c".into()), score: 5.0, ..Post::default() },
        ];
        let ids: Vec<&str> = top_contributors(&current, SentimentChannel::Joy)
            .iter()
            .filter_map(|p| p.id.as_deref())
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert!(top_contributors(&current, SentimentChannel::Fear).is_empty());
    }

    #[test]
    fn post_view_fallbacks_and_truncation() {
        let post = Post {
            subreddit: Some("rust".into()),
            title: Some("  ".into()),
            text: Some("x".repeat(250)),
            score: 12345.0,
            num_comments: Some(7),
            comments: vec![Comment { body: Some("y".repeat(151)) }],
            ..Post::default()
        };
        let view = post_view(&post);
        assert_eq!(view.subreddit, "r/rust");
        assert_eq!(view.title, "[No title]");
        assert_eq!(view.excerpt.as_deref().map(str::len), Some(203));
        assert_eq!(view.stats, "Score: 12,345 | Comments: 7");
        assert!(view.top_comment.unwrap().ends_with("y..."));

        let bare = post_view(&Post::default());
        assert_eq!(bare.excerpt, None);
        assert_eq!(bare.top_comment, None);
        assert_eq!(bare.stats, "Score: 0 | Comments: -");
    }

    #[test]
    fn excerpt_is_char_safe() {
        assert_eq!(excerpt("héllo wörld", 5), "héllo...");
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("exact", 5), "exact");
    }

    #[test]
    fn count_separators() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(1000.0), "1,000");
        assert_eq!(format_count(1234567.0), "1,234,567");
        assert_eq!(format_count(-4321.0), "-4,321");
        assert_eq!(format_count(f64::NAN), "-");
        assert_eq!(format_count(1e20), "9,223,372,036,854,775,807");
        assert_eq!(format_count(-1e20), "-9,223,372,036,854,775,808");
    }
}
