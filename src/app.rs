//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs logging
//! - resolves the data source
//! - runs the load pipeline
//! - prints reports/plots and writes optional exports

use clap::Parser;

use crate::cli::{Command, CurrentArgs, HistoryArgs};
use crate::config::MeterConfig;
use crate::error::AppError;
use crate::logging::LogTarget;

pub mod pipeline;

/// Entry point for the `meter` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // We want `meter` and `meter --tz UTC` to behave like `meter tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Current(args) => {
            crate::logging::init(LogTarget::Stderr)?;
            handle_current(args)
        }
        Command::History(args) => {
            crate::logging::init(LogTarget::Stderr)?;
            handle_history(args)
        }
        Command::Tui(args) => {
            crate::logging::init(LogTarget::for_tui())?;
            let config = MeterConfig::from_args(&args)?;
            crate::tui::run(config)
        }
    }
}

fn handle_current(args: CurrentArgs) -> Result<(), AppError> {
    let config = MeterConfig::from_args(&args.source)?;
    let source = config.open_source()?;
    let run = pipeline::load_current(source.as_ref(), &config.zone)?;

    if args.json {
        let body = serde_json::to_string_pretty(&run)
            .map_err(|e| AppError::config(format!("Failed to encode JSON output: {e}")))?;
        println!("{body}");
        return Ok(());
    }

    println!(
        "{}",
        crate::report::format_current_summary(&run.slices, &run.updated, &config.zone)
    );

    if args.top > 0 {
        let posts = crate::report::top_contributors(&run.snapshot, args.channel);
        println!("{}", crate::report::format_contributors(args.channel, &posts, args.top));
    }

    Ok(())
}

fn handle_history(args: HistoryArgs) -> Result<(), AppError> {
    let config = MeterConfig::from_args(&args.source)?;
    let source = config.open_source()?;
    let run = pipeline::load_history(source.as_ref(), &config.zone)?;
    let series = run.series(args.normalize);

    if args.json {
        let body = serde_json::to_string_pretty(series)
            .map_err(|e| AppError::config(format!("Failed to encode JSON output: {e}")))?;
        println!("{body}");
    } else {
        println!("{}", crate::report::format_history_table(series, args.normalize));

        if args.stats {
            println!("{}", crate::report::format_statistics(&run.stats));
        }

        if args.plot {
            let plot = crate::plot::render_history_plot(series, args.width, args.height);
            println!("{plot}");
        }
    }

    // Optional export.
    if let Some(path) = &args.export {
        crate::io::export::write_series(path, series)?;
    }

    Ok(())
}

/// Rewrite argv so `meter` defaults to `meter tui`.
///
/// Rules:
/// - `meter`                        -> `meter tui`
/// - `meter --tz UTC ...`           -> `meter tui --tz UTC ...`
/// - `meter --help/--version/-h`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "current" | "history" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
