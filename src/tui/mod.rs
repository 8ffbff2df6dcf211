//! Ratatui-based terminal UI.
//!
//! Three panels: the current breakdown (ascending shares, like the pie chart
//! of the web dashboard), the top contributing posts of the selected channel,
//! and the history chart (raw scores or z-scores).

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use tracing::warn;

use crate::app::pipeline::{CurrentOutput, HistoryOutput, load_current, load_history};
use crate::config::MeterConfig;
use crate::data::SentimentSource;
use crate::domain::{ChartRecord, SentimentChannel};
use crate::error::AppError;
use crate::report::{post_view, top_contributors};

mod plotters_chart;

use plotters_chart::{ChannelLines, HistoryChart};

const BAR_WIDTH: f64 = 24.0;

/// Start the TUI.
pub fn run(config: MeterConfig) -> Result<(), AppError> {
    let source = config.open_source()?;
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::upstream(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, source);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::upstream(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::upstream(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: MeterConfig,
    source: Box<dyn SentimentSource>,
    current: Option<CurrentOutput>,
    history: Option<HistoryOutput>,
    selected: SentimentChannel,
    normalized: bool,
    /// A fetch is queued; the next loop iteration draws the loading frame first.
    loading: bool,
    loading_tick: usize,
    status: String,
}

impl App {
    fn new(config: MeterConfig, source: Box<dyn SentimentSource>) -> Self {
        Self {
            config,
            source,
            current: None,
            history: None,
            selected: SentimentChannel::Joy,
            normalized: false,
            loading: true,
            loading_tick: 0,
            status: "Fetching sentiment data...".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::upstream(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if self.loading {
                self.refresh();
                needs_redraw = true;
                continue;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::upstream(format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::upstream(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected = self.selected.prev();
                self.status = format!("channel: {}", self.selected);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.selected = self.selected.next();
                self.status = format!("channel: {}", self.selected);
            }
            KeyCode::Char('n') => {
                self.normalized = !self.normalized;
                self.status = if self.normalized {
                    "view: z-scores".to_string()
                } else {
                    "view: raw scores".to_string()
                };
            }
            KeyCode::Char('r') => {
                self.loading = true;
                self.loading_tick = 0;
                self.status = "Fetching sentiment data...".to_string();
            }
            _ => {}
        }
        false
    }

    /// Fetch both payloads. A failed fetch keeps the previous data for that panel.
    fn refresh(&mut self) {
        let zone = self.config.zone;
        let mut problems = Vec::new();

        match load_current(self.source.as_ref(), &zone) {
            Ok(current) => self.current = Some(current),
            Err(err) => {
                warn!(error = %err, "current sentiment load failed");
                problems.push(err.to_string());
            }
        }
        match load_history(self.source.as_ref(), &zone) {
            Ok(history) => self.history = Some(history),
            Err(err) => {
                warn!(error = %err, "history load failed");
                problems.push(err.to_string());
            }
        }

        self.loading = false;
        self.status = if problems.is_empty() {
            format!("Loaded from {}", self.source.describe())
        } else {
            problems.join(" | ")
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        if self.loading {
            self.loading_tick = self.loading_tick.wrapping_add(1);
        }

        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let updated = self
            .current
            .as_ref()
            .map(|c| c.updated.clone())
            .unwrap_or_else(|| "N/A".to_string());
        let view = if self.normalized { "z-scores" } else { "raw scores" };

        let lines = vec![
            Line::from(vec![
                Span::styled("Reddit Meter", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Span::raw(" | Current Reddit Sentiment"),
            ]),
            Line::from(Span::styled(
                format!(
                    "Updated: {updated} | tz: {} | view: {view} | channel: {}",
                    self.config.zone, self.selected
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(45), Constraint::Min(0)])
            .split(area);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(rows[0]);

        self.draw_breakdown(frame, top[0]);
        self.draw_contributors(frame, top[1]);
        self.draw_chart(frame, rows[1]);
    }

    fn draw_breakdown(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Current Sentiment").borders(Borders::ALL);

        let Some(current) = self.current.as_ref().filter(|_| !self.loading) else {
            frame.render_widget(self.placeholder().block(block), area);
            return;
        };

        if current.slices.is_empty() {
            frame.render_widget(Paragraph::new("No sentiment scores available.").block(block), area);
            return;
        }

        let lines: Vec<Line> = current
            .slices
            .iter()
            .map(|slice| {
                let color = channel_color(slice.channel);
                let marker = if slice.channel == self.selected { "» " } else { "  " };
                let bar_len = (slice.share * BAR_WIDTH).round().max(0.0) as usize;
                let mut label_style = Style::default();
                if slice.channel == self.selected {
                    label_style = label_style.add_modifier(Modifier::BOLD);
                }
                Line::from(vec![
                    Span::raw(marker),
                    Span::styled(format!("{:<16}", slice.label()), label_style),
                    Span::styled("█".repeat(bar_len), Style::default().fg(color)),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
    }

    fn draw_contributors(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = format!("Top {} Contributors", self.selected);
        let block = Block::default().title(title).borders(Borders::ALL);

        let Some(current) = self.current.as_ref().filter(|_| !self.loading) else {
            frame.render_widget(self.placeholder().block(block), area);
            return;
        };

        let posts = top_contributors(&current.snapshot, self.selected);
        if posts.is_empty() {
            let msg = Paragraph::new(format!("No posts attributed to {}.", self.selected))
                .style(Style::default().fg(Color::Gray))
                .wrap(Wrap { trim: true });
            frame.render_widget(msg.block(block), area);
            return;
        }

        let items: Vec<ListItem> = posts
            .iter()
            .map(|post| {
                let view = post_view(post);
                let mut lines = vec![
                    Line::from(vec![
                        Span::styled(format!("{} ", view.subreddit), Style::default().fg(Color::Blue)),
                        Span::styled(view.title, Style::default().add_modifier(Modifier::BOLD)),
                    ]),
                ];
                if let Some(text) = view.excerpt {
                    lines.push(Line::from(Span::raw(text)));
                }
                lines.push(Line::from(Span::styled(view.stats, Style::default().fg(Color::Gray))));
                if let Some(comment) = view.top_comment {
                    lines.push(Line::from(Span::styled(
                        format!("Top Comment: {comment}"),
                        Style::default().add_modifier(Modifier::ITALIC),
                    )));
                }
                lines.push(Line::raw(""));
                ListItem::new(Text::from(lines))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut title = vec![Span::raw(" Sentiment History ")];
        for channel in SentimentChannel::ALL {
            title.push(Span::styled(format!("■ {channel} "), Style::default().fg(channel_color(channel))));
        }
        let block = Block::default().title(Line::from(title)).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(history) = self.history.as_ref().filter(|_| !self.loading) else {
            frame.render_widget(self.placeholder(), inner);
            return;
        };

        let series = chart_series(history.series(self.normalized), self.normalized);
        let widget = HistoryChart {
            lines: &series.lines,
            labels: &series.labels,
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
            y_label: if self.normalized { "z-score" } else { "score" },
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ channel  n z-scores  r refresh  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn placeholder(&self) -> Paragraph<'static> {
        let msg = if self.loading {
            loading_label(self.loading_tick)
        } else {
            "No data.".to_string()
        };
        Paragraph::new(msg).style(Style::default().fg(Color::Yellow))
    }
}

/// `Loading.`, `Loading..`, `Loading...`, repeating.
fn loading_label(tick: usize) -> String {
    format!("Loading{}", ".".repeat(tick % 3 + 1))
}

fn channel_color(channel: SentimentChannel) -> Color {
    let (r, g, b) = channel.rgb();
    Color::Rgb(r, g, b)
}

/// Plot-ready data for the history chart.
#[derive(Debug, Clone, PartialEq)]
struct ChartSeries {
    lines: Vec<ChannelLines>,
    labels: Vec<String>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Build chart series for Plotters: x = record index, one line set per channel.
fn chart_series(records: &[ChartRecord], normalized: bool) -> ChartSeries {
    let mut lines = Vec::with_capacity(SentimentChannel::ALL.len());
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);

    for channel in SentimentChannel::ALL {
        let mut segments: Vec<Vec<(f64, f64)>> = Vec::new();
        let mut current: Vec<(f64, f64)> = Vec::new();
        for (i, record) in records.iter().enumerate() {
            match (*record.scores.get(channel)).filter(|v| v.is_finite()) {
                Some(v) => {
                    y_min = y_min.min(v);
                    y_max = y_max.max(v);
                    current.push((i as f64, v));
                }
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        lines.push((channel, segments));
    }

    let x_bounds = if records.len() > 1 {
        [0.0, (records.len() - 1) as f64]
    } else {
        [0.0, 1.0]
    };

    let y_bounds = if normalized {
        if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
            [-1.0, 1.0]
        } else {
            let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
            [y_min - pad, y_max + pad]
        }
    } else {
        // Raw scores live on [0, 1]; widen only if the data escapes it.
        let lo = if y_min.is_finite() { y_min.min(0.0) } else { 0.0 };
        let hi = if y_max.is_finite() { y_max.max(1.0) } else { 1.0 };
        [lo, hi]
    };

    ChartSeries {
        lines,
        labels: records.iter().map(|r| r.timestamp.clone()).collect(),
        x_bounds,
        y_bounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;
    use crate::data::FileSource;
    use crate::domain::Channels;
    use crate::transform::Zone;

    fn app() -> App {
        let config = MeterConfig {
            source: SourceConfig::Files { history: None, current: None },
            zone: Zone::Utc,
            timeout: Duration::from_secs(1),
        };
        App::new(config, Box::new(FileSource::default()))
    }

    fn record(label: &str, joy: Option<f64>, fear: Option<f64>) -> ChartRecord {
        let mut scores = Channels::<Option<f64>>::default();
        scores.joy = joy;
        scores.fear = fear;
        ChartRecord {
            timestamp: label.to_string(),
            scores,
        }
    }

    #[test]
    fn loading_dots_cycle() {
        assert_eq!(loading_label(0), "Loading.");
        assert_eq!(loading_label(1), "Loading..");
        assert_eq!(loading_label(2), "Loading...");
        assert_eq!(loading_label(3), "Loading.");
    }

    #[test]
    fn keys_move_selection_and_toggle_view() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Right));
        assert_eq!(app.selected, SentimentChannel::Love);
        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.selected, SentimentChannel::Surprise);

        app.handle_key(KeyCode::Char('n'));
        assert!(app.normalized);
        assert_eq!(app.status, "view: z-scores");

        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn failed_refresh_reports_and_keeps_running() {
        let mut app = app();
        app.refresh();
        assert!(!app.loading);
        assert!(app.current.is_none());
        assert!(app.history.is_none());
        assert!(app.status.contains("No current-sentiment file given"));
        assert!(app.status.contains("No history file given"));

        app.handle_key(KeyCode::Char('r'));
        assert!(app.loading);
    }

    #[test]
    fn chart_series_splits_on_missing_values() {
        let records = vec![
            record("a", Some(0.2), None),
            record("b", None, Some(0.4)),
            record("c", Some(0.6), Some(0.5)),
            record("d", Some(0.8), None),
        ];
        let series = chart_series(&records, false);

        let joy = &series.lines[0];
        assert_eq!(joy.0, SentimentChannel::Joy);
        assert_eq!(joy.1, vec![vec![(0.0, 0.2)], vec![(2.0, 0.6), (3.0, 0.8)]]);

        let fear = series.lines.iter().find(|(c, _)| *c == SentimentChannel::Fear).unwrap();
        assert_eq!(fear.1, vec![vec![(1.0, 0.4), (2.0, 0.5)]]);

        assert!(series.lines.iter().filter(|(c, _)| *c == SentimentChannel::Love).all(|(_, s)| s.is_empty()));
        assert_eq!(series.x_bounds, [0.0, 3.0]);
        assert_eq!(series.y_bounds, [0.0, 1.0]);
        assert_eq!(series.labels, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn chart_bounds_for_z_scores_and_outliers() {
        let records = vec![record("a", Some(-1.0), None), record("b", Some(1.0), None)];
        let z = chart_series(&records, true);
        assert!((z.y_bounds[0] + 1.1).abs() < 1e-12);
        assert!((z.y_bounds[1] - 1.1).abs() < 1e-12);

        let raw = chart_series(&[record("a", Some(3.0), None)], false);
        assert_eq!(raw.y_bounds, [0.0, 3.0]);
        assert_eq!(raw.x_bounds, [0.0, 1.0]);

        let empty = chart_series(&[], true);
        assert_eq!(empty.y_bounds, [-1.0, 1.0]);
    }
}
