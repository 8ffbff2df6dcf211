//! Formatted terminal output: current summary, contributors, history table.
//!
//! We keep formatting code in one place so:
//! - the shaping code stays clean and testable
//! - output changes are localized (golden tests below)

use crate::domain::{ChannelStatistics, Channels, ChartRecord, Post, SentimentChannel};
use crate::report::{Slice, post_view};
use crate::transform::Zone;

const BAR_WIDTH: usize = 30;
const LABEL_WIDTH: usize = 16;
const VALUE_WIDTH: usize = 10;

/// Format the current breakdown (ascending slices with share bars).
pub fn format_current_summary(slices: &[Slice], updated: &str, zone: &Zone) -> String {
    let mut out = String::new();

    out.push_str("=== Current Reddit Sentiment ===\n");
    out.push_str(&format!("Updated: {updated} ({zone})\n"));
    out.push_str("An overview of emotional tones from recent Reddit posts.\n\n");

    if slices.is_empty() {
        out.push_str("No sentiment scores available.\n");
        return out;
    }

    for slice in slices {
        let bar_len = (slice.share * BAR_WIDTH as f64).round().clamp(0.0, BAR_WIDTH as f64) as usize;
        out.push_str(
            format!(
                "  {:<9}{:>8.4}  {:>5.1}%  {}",
                slice.channel.name(),
                slice.value,
                slice.share * 100.0,
                "#".repeat(bar_len)
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format the top contributing posts for one channel.
pub fn format_contributors(channel: SentimentChannel, posts: &[&Post], limit: usize) -> String {
    let mut out = String::new();

    out.push_str(&format!("Top {channel} Contributors\n"));
    out.push_str(&format!("Discover posts driving the current {channel} sentiment.\n"));

    if posts.is_empty() {
        out.push_str("  (no posts)\n");
        return out;
    }

    for (idx, post) in posts.iter().take(limit).enumerate() {
        let view = post_view(post);
        out.push_str(&format!("{:>2}. [{}] {}\n", idx + 1, view.subreddit, view.title));
        if let Some(url) = &view.url {
            out.push_str(&format!("    {url}\n"));
        }
        if let Some(text) = &view.excerpt {
            out.push_str(&format!("    {text}\n"));
        }
        out.push_str(&format!("    {}\n", view.stats));
        if let Some(comment) = &view.top_comment {
            out.push_str(&format!("    Top Comment: {comment}\n"));
        }
    }

    out
}

/// Format a chart-ready series as a fixed-width table. Missing cells are blank.
pub fn format_history_table(records: &[ChartRecord], normalized: bool) -> String {
    let mut out = String::new();

    let kind = if normalized { "z-scores" } else { "raw scores" };
    out.push_str(&format!("=== Sentiment History ({kind}) | n={} ===\n", records.len()));

    if records.is_empty() {
        out.push_str("No history records.\n");
        return out;
    }

    let mut header = format!("{:<LABEL_WIDTH$}", "timestamp");
    let mut rule = "-".repeat(LABEL_WIDTH);
    for channel in SentimentChannel::ALL {
        header.push_str(&format!(" {:>VALUE_WIDTH$}", channel.name()));
        rule.push(' ');
        rule.push_str(&"-".repeat(VALUE_WIDTH));
    }
    out.push_str(header.trim_end());
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');

    for record in records {
        let mut row = format!("{:<LABEL_WIDTH$}", record.timestamp);
        for (_, value) in record.scores.iter() {
            match value {
                Some(v) => row.push_str(&format!(" {v:>VALUE_WIDTH$.4}")),
                None => row.push_str(&format!(" {:>VALUE_WIDTH$}", "")),
            }
        }
        out.push_str(row.trim_end());
        out.push('\n');
    }

    out
}

/// Format the per-channel statistics used for normalization.
pub fn format_statistics(stats: &Channels<ChannelStatistics>) -> String {
    let mut out = String::from("Normalization statistics (population):\n");
    for (channel, s) in stats.iter() {
        out.push_str(&format!(
            "  {:<9} mean={:.4} std={:.4} n={}\n",
            channel.name(),
            s.mean,
            s.std_dev,
            s.count
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Comment;

    fn sp(n: usize) -> String {
        " ".repeat(n)
    }

    #[test]
    fn current_summary_golden() {
        let slices = vec![
            Slice { channel: SentimentChannel::Joy, value: 0.25, share: 0.25 },
            Slice { channel: SentimentChannel::Fear, value: 0.75, share: 0.75 },
        ];
        let txt = format_current_summary(&slices, "Feb 29, 05:00", &Zone::Utc);
        let expected = format!(
            "=== Current Reddit Sentiment ===\n\
             Updated: Feb 29, 05:00 (UTC)\n\
             An overview of emotional tones from recent Reddit posts.\n\
             \n  joy{}0.2500{}25.0%  {}\n  fear{}0.7500{}75.0%  {}\n",
            sp(8),
            sp(3),
            "#".repeat(8),
            sp(7),
            sp(3),
            "#".repeat(23),
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn current_summary_empty() {
        let txt = format_current_summary(&[], "N/A", &Zone::Local);
        assert!(txt.contains("Updated: N/A (local)"));
        assert!(txt.ends_with("No sentiment scores available.\n"));
    }

    #[test]
    fn history_table_golden() {
        let mut scores = Channels::<Option<f64>>::default();
        scores.joy = Some(0.5);
        scores.fear = Some(0.02);
        let records = vec![ChartRecord {
            timestamp: "Feb 29, 05:00".to_string(),
            scores,
        }];

        let txt = format_history_table(&records, false);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "=== Sentiment History (raw scores) | n=1 ===");
        assert_eq!(
            lines[1],
            format!(
                "timestamp{}joy{}love{}fear{}anger{}sadness{}surprise",
                sp(15),
                sp(7),
                sp(7),
                sp(6),
                sp(4),
                sp(3)
            )
        );
        assert_eq!(lines[2], format!("{}{}", "-".repeat(16), format!(" {}", "-".repeat(10)).repeat(6)));
        assert_eq!(lines[3], format!("Feb 29, 05:00{}0.5000{}0.0200", sp(8), sp(16)));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn history_table_empty() {
        let txt = format_history_table(&[], true);
        assert_eq!(txt, "=== Sentiment History (z-scores) | n=0 ===\nNo history records.\n");
    }

    #[test]
    fn contributors_listing() {
        let post = Post {
            title: Some("Big news".into()),
            subreddit: Some("worldnews".into()),
            url: Some("https://reddit.com/x".into()),
            score: 1500.0,
            num_comments: Some(42),
            comments: vec![Comment { body: Some("wow".into()) }],
            ..Post::default()
        };
        let txt = format_contributors(SentimentChannel::Fear, &[&post], 5);
        let expected = concat!(
            "Top fear Contributors\n",
            "Discover posts driving the current fear sentiment.\n",
            " 1. [r/worldnews] Big news\n",
            "    https://reddit.com/x\n",
            "    Score: 1,500 | Comments: 42\n",
            "    Top Comment: wow\n",
        );
        assert_eq!(txt, expected);

        let none = format_contributors(SentimentChannel::Joy, &[], 5);
        assert!(none.ends_with("  (no posts)\n"));
    }

    #[test]
    fn statistics_listing() {
        let mut stats = Channels::<ChannelStatistics>::default();
        stats.joy = ChannelStatistics { mean: 0.45, std_dev: 0.05, count: 2 };
        let txt = format_statistics(&stats);
        assert!(txt.contains("  joy       mean=0.4500 std=0.0500 n=2\n"));
        assert!(txt.contains("  fear      mean=0.0000 std=1.0000 n=0\n"));
    }
}
