//! Command-line duplicate scan over a SQLite note store.
//!
//! # Responsibility
//! - Open a note store, run one scan and print ranked pairs.
//! - Keep output deterministic for scripting (`--json`).

use clap::Parser;
use notedup_core::db::open_db;
use notedup_core::{
    default_log_level, init_logging, DuplicatePair, DuplicateScanner, ScanOptions, ScanResult,
    SqliteNoteSource, Threshold, DEFAULT_PAGE_SIZE, DEFAULT_THRESHOLD_PERCENT,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "notedup", version, about = "Find near-duplicate notes")]
struct Cli {
    /// SQLite note store to scan.
    #[arg(long, env = "NOTEDUP_DB_PATH")]
    db: PathBuf,

    /// Minimum similarity in percent (0-100).
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD_PERCENT,
          value_parser = clap::value_parser!(u8).range(0..=100))]
    threshold: u8,

    /// Notes fetched per page.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE,
          value_parser = clap::value_parser!(u32).range(1..))]
    page_size: u32,

    /// Print the full scan result as JSON.
    #[arg(long)]
    json: bool,

    /// Absolute directory for rolling log files. Logging stays off when unset.
    #[arg(long, env = "NOTEDUP_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, default_value_t = default_log_level().to_string())]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    if let Some(log_dir) = cli.log_dir.as_ref() {
        init_logging(&cli.log_level, &log_dir.to_string_lossy())?;
    }

    let threshold = Threshold::from_percent(i64::from(cli.threshold)).map_err(|err| err.to_string())?;
    let conn = open_db(&cli.db).map_err(|err| format!("failed to open {}: {err}", cli.db.display()))?;
    let source = SqliteNoteSource::try_new(&conn).map_err(|err| err.to_string())?;
    let scanner = DuplicateScanner::new(ScanOptions {
        page_size: cli.page_size,
        ..ScanOptions::default()
    });

    let result = scanner
        .scan(&source, threshold)
        .map_err(|err| err.to_string())?;
    log::info!(
        "event=cli_scan module=cli status=ok pair_count={} note_count={}",
        result.len(),
        result.note_count
    );

    if cli.json {
        let encoded = serde_json::to_string_pretty(&result).map_err(|err| err.to_string())?;
        println!("{encoded}");
    } else {
        print_report(&result, cli.threshold);
    }
    Ok(())
}

fn print_report(result: &ScanResult, threshold_percent: u8) {
    println!(
        "{} ({} notes, {} comparisons)",
        result.summary(threshold_percent),
        result.note_count,
        result.comparisons
    );
    for pair in &result.duplicates {
        println!("{}", format_pair(pair));
    }
}

fn format_pair(pair: &DuplicatePair) -> String {
    format!(
        "{:>3}% [{}] {} ({}) <-> {} ({})",
        pair.similarity_percent,
        pair.band().as_str(),
        pair.note_a.title,
        pair.note_a.id,
        pair.note_b.title,
        pair.note_b.id
    )
}
