//! ASCII plotting of a sentiment history for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - one glyph per channel at each present value (`j l f a s u`)
//! - `.` segments between consecutive present values of a channel
//! - missing values break the line instead of dropping to zero

use crate::domain::{ChartRecord, SentimentChannel};

/// Render every channel of `records` on one grid, x = record index.
pub fn render_history_plot(records: &[ChartRecord], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let n = records.len();

    let (y_min, y_max) = y_range(records).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw segments first (so glyphs can overlay).
    for channel in SentimentChannel::ALL {
        let mut prev: Option<(usize, usize)> = None;
        for (i, record) in records.iter().enumerate() {
            match *record.scores.get(channel) {
                Some(v) if v.is_finite() => {
                    let cell = (map_x(i, n, width), map_y(v, y_min, y_max, height));
                    if let Some((x0, y0)) = prev {
                        draw_line(&mut grid, x0, y0, cell.0, cell.1, '.');
                    }
                    prev = Some(cell);
                }
                _ => prev = None,
            }
        }
    }

    for channel in SentimentChannel::ALL {
        for (i, record) in records.iter().enumerate() {
            if let Some(v) = record.scores.get(channel).filter(|v| v.is_finite()) {
                let x = map_x(i, n, width);
                let y = map_y(v, y_min, y_max, height);
                grid[y][x] = channel.glyph();
            }
        }
    }

    let legend: Vec<String> = SentimentChannel::ALL
        .iter()
        .map(|c| format!("{}={}", c.glyph(), c.name()))
        .collect();

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: n={n} | y=[{y_min:.2}, {y_max:.2}] | {}\n",
        legend.join(" ")
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    if let (Some(first), Some(last)) = (records.first(), records.last()) {
        out.push_str(&axis_labels(&first.timestamp, &last.timestamp, width));
        out.push('\n');
    }

    out
}

/// First label left-aligned, last label right-aligned, when both fit.
fn axis_labels(first: &str, last: &str, width: usize) -> String {
    let used = first.chars().count() + last.chars().count();
    if first == last || used + 1 > width {
        return first.to_string();
    }
    format!("{first}{}{last}", " ".repeat(width - used))
}

fn y_range(records: &[ChartRecord]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for record in records {
        for (_, v) in record.scores.iter() {
            if let Some(v) = v.filter(|v| v.is_finite()) {
                min_y = min_y.min(v);
                max_y = max_y.max(v);
            }
        }
    }

    if !(min_y.is_finite() && max_y.is_finite()) {
        None
    } else if max_y > min_y {
        Some((min_y, max_y))
    } else {
        Some((min_y - 0.5, max_y + 0.5))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    if n < 2 {
        return 0;
    }
    let u = i as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Channels;

    fn record(label: &str, joy: Option<f64>) -> ChartRecord {
        let mut scores = Channels::<Option<f64>>::default();
        scores.joy = joy;
        ChartRecord {
            timestamp: label.to_string(),
            scores,
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let records = vec![record("A", Some(0.0)), record("B", Some(1.0))];
        let txt = render_history_plot(&records, 10, 5);
        let expected = concat!(
            "Plot: n=2 | y=[-0.05, 1.05] | j=joy l=love f=fear a=anger s=sadness u=surprise\n",
            "        .j\n",
            "      ..  \n",
            "    ..    \n",
            "  ..      \n",
            "j.        \n",
            "A        B\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn gaps_are_not_bridged() {
        let records = vec![
            record("A", Some(0.0)),
            record("B", None),
            record("C", Some(1.0)),
        ];
        let txt = render_history_plot(&records, 11, 5);
        let grid: String = txt.lines().skip(1).take(5).collect();
        assert!(!grid.contains('.'), "missing value must break the line:\n{txt}");
        assert_eq!(grid.matches('j').count(), 2);
    }

    #[test]
    fn empty_series_renders_blank_grid() {
        let txt = render_history_plot(&[], 10, 5);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("Plot: n=0 | y=[-0.05, 1.05]"));
        assert!(lines[1..].iter().all(|l| l.trim().is_empty()));
    }
}
