// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (RUST_LOG controls the level, default: info)
// 2. Parse command-line arguments using clap
// 3. Dispatch to the appropriate subcommand handler
// 4. Print the prices
// 5. Exit with proper code (0 = all prices, 1 = some missing, 2 = error)
//
// Rust concepts used:
// - async/await: Because we need to make many network requests
// - Result<T, E>: For error handling (T = success type, E = error type)
// - tokio::select!: Wait on several event sources at once (watch mode)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod catalog;  // src/catalog/ - asset ids and records
mod cli;      // src/cli.rs - command-line parsing
mod error;    // src/error.rs - error types
mod filter;   // src/filter.rs - local search
mod loader;   // src/loader/ - batched fetching with retries

use catalog::AssetRecord;
use clap::Parser;
use cli::{Cli, Commands, LoaderArgs};
use loader::{CoinCapSource, LoadReport, LoadState, Refresher};
use log::info;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, Interval};

use anyhow::Result;

#[tokio::main]
async fn main() {
    init_logger();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

// Returns:
//   Ok(0) = every coin fetched
//   Ok(1) = some coins still missing after all retry cycles
//   Err = nothing fetched, or bad arguments
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List { filter, json, loader } => handle_list(&loader, &filter, json).await,
        Commands::Watch { filter, interval, loader } => {
            handle_watch(&loader, filter, interval).await
        }
    }
}

// Handles the 'list' subcommand: one load, one print
async fn handle_list(args: &LoaderArgs, filter_term: &str, json: bool) -> Result<i32> {
    let catalog = args.catalog()?;
    let config = args.config()?;
    let source = CoinCapSource::new(&args.base_url, &config)?;

    info!("Fetching {} asset(s) from {}", catalog.len(), args.base_url);

    let report = loader::load(&source, &catalog, &config).await?;
    let complete = report.complete;
    let shown = LoadReport {
        records: filter::filter_records(&report.records, filter_term),
        ..report
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
    } else {
        print_table(&shown.records);
        if let Some(message) = &shown.message {
            println!("⚠️  {}", message);
        }
    }

    Ok(if complete { 0 } else { 1 })
}

// What the user typed in watch mode
#[derive(Debug, PartialEq)]
enum WatchCommand {
    Refresh,
    Filter(String),
    Quit,
    Unknown(String),
}

fn parse_watch_command(line: &str) -> WatchCommand {
    let line = line.trim();
    if let Some(term) = line.strip_prefix('/') {
        return WatchCommand::Filter(term.to_string());
    }
    match line {
        "" | "r" | "refresh" => WatchCommand::Refresh,
        "q" | "quit" | "exit" => WatchCommand::Quit,
        other => WatchCommand::Unknown(other.to_string()),
    }
}

// Handles the 'watch' subcommand
//
// Loads once on start, then reacts to:
//   - finished loads (render them)
//   - stdin commands (refresh / filter / quit)
//   - the optional refresh timer
//   - Ctrl-C
async fn handle_watch(
    args: &LoaderArgs,
    mut filter_term: String,
    interval: Option<u64>,
) -> Result<i32> {
    let catalog = args.catalog()?;
    let config = args.config()?;
    let source = CoinCapSource::new(&args.base_url, &config)?;

    let refresher = Refresher::new(source, catalog, config);
    let mut updates = refresher.subscribe();
    let mut ticker = interval.map(|secs| {
        let period = Duration::from_secs(secs.max(1));
        tokio::time::interval_at(Instant::now() + period, period)
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    println!("Enter = refresh, /TEXT = filter, q = quit");
    refresher.refresh();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                if state.loading {
                    println!("🔄 Refreshing...");
                } else {
                    render_state(&state, &filter_term);
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    // Piped or closed stdin: keep running on the timer only
                    None => {
                        stdin_open = false;
                        if ticker.is_none() {
                            break;
                        }
                    }
                    Some(line) => match parse_watch_command(&line) {
                        WatchCommand::Refresh => {
                            refresher.refresh();
                        }
                        WatchCommand::Filter(term) => {
                            filter_term = term;
                            render_state(&refresher.state(), &filter_term);
                        }
                        WatchCommand::Quit => break,
                        WatchCommand::Unknown(other) => {
                            println!("Unknown command '{}' (Enter, /TEXT or q)", other);
                        }
                    },
                }
            }
            _ = next_tick(&mut ticker) => {
                refresher.refresh();
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(0)
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

fn render_state(state: &LoadState, filter_term: &str) {
    if state.generation == 0 {
        return;
    }

    if state.loading && state.records.is_empty() {
        println!("🔄 Still loading...");
        return;
    }

    // Total failure: only the error
    if state.records.is_empty() {
        if let Some(error) = &state.error {
            println!("❌ {}", error);
            return;
        }
    }

    let shown = filter::filter_records(&state.records, filter_term);
    if !filter_term.trim().is_empty() {
        println!("🔍 {} of {} coin(s) match '{}'", shown.len(), state.records.len(), filter_term);
    }
    print_table(&shown);

    if let Some(message) = &state.error {
        println!("⚠️  {}", message);
    }
}

// Prints records as a human-readable table in the terminal
fn print_table(records: &[AssetRecord]) {
    println!("{:<24} {:<8} {:>18} {:>14}", "NAME", "SYMBOL", "PRICE (USD)", "UPDATED");
    println!("{}", "=".repeat(67));

    for record in records {
        println!(
            "{:<24} {:<8} {:>18} {:>14}",
            truncate(&record.name, 24),
            record.symbol.to_uppercase(),
            format_usd(record.price_usd),
            record.timestamp.format("%H:%M:%S UTC")
        );
    }

    println!();
    println!("📋 Total: {}", records.len());
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let head: String = text.chars().take(width - 3).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

// 64123.4567 -> "$64,123.46"
fn format_usd(price: f64) -> String {
    let fixed = format!("{:.2}", price.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if price < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}
