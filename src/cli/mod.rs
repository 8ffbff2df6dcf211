//! Command-line parsing for the sentiment dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the shaping/rendering code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{DEFAULT_HTTP_TIMEOUT_SECS, ENV_API_URL, ENV_HTTP_TIMEOUT, ENV_TZ};
use crate::domain::SentimentChannel;
use crate::transform::Zone;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "meter", version, about = "Reddit sentiment dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the current sentiment breakdown and its top contributing posts.
    Current(CurrentArgs),
    /// Print the sentiment history as a table, optionally normalized, plotted, or exported.
    History(HistoryArgs),
    /// Launch the interactive TUI.
    ///
    /// Shows the current breakdown, top contributors, and the history chart
    /// side by side, rendered with Ratatui.
    Tui(SourceArgs),
}

/// Where to read sentiment data from and how to label timestamps.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Base URL of the sentiment API.
    #[arg(long, env = ENV_API_URL)]
    pub api_url: Option<String>,

    /// Read history from a saved JSON array instead of the API.
    #[arg(long, value_name = "JSON")]
    pub history_file: Option<PathBuf>,

    /// Read the current snapshot from a saved JSON object instead of the API.
    #[arg(long, value_name = "JSON")]
    pub current_file: Option<PathBuf>,

    /// Time zone for labels: `local`, `UTC`, `+05:30`, or an IANA name.
    #[arg(long = "tz", env = ENV_TZ, default_value = "local")]
    pub zone: Zone,

    /// HTTP request timeout in seconds.
    #[arg(long, env = ENV_HTTP_TIMEOUT, default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

/// Options for `meter current`.
#[derive(Debug, Args, Clone)]
pub struct CurrentArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Channel whose top contributors are listed.
    #[arg(short = 'c', long, value_enum, default_value_t = SentimentChannel::Joy)]
    pub channel: SentimentChannel,

    /// How many contributing posts to list (0 hides the list).
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Print the raw snapshot plus derived breakdown as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Options for `meter history`.
#[derive(Debug, Args, Clone)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Show per-channel z-scores instead of raw scores.
    #[arg(short = 'z', long)]
    pub normalize: bool,

    /// Print per-channel mean / std-dev used for normalization.
    #[arg(long)]
    pub stats: bool,

    /// Render an ASCII plot below the table.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Print the chart-ready series as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Export the series to CSV (`.csv`) or JSON (any other extension).
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}
