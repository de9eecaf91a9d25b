// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - list: fetch prices once and print them
// - watch: keep the price list on screen, refresh on demand or on a timer
//
// Both share the same loader options (LoaderArgs), pulled in with
// #[command(flatten)].
// =============================================================================

use crate::catalog::Catalog;
use crate::error::TrackerError;
use crate::loader::{LoaderConfig, DEFAULT_BASE_URL};
use clap::{Args, Parser, Subcommand};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "coin-watch",
    version = "0.1.0",
    about = "A CLI tool to track cryptocurrency prices from the CoinCap API",
    long_about = "coin-watch fetches prices for a fixed list of cryptocurrencies. \
                  Requests are sent in small batches and failed coins are retried, \
                  so the CoinCap rate limit is respected."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch prices once and print them
    ///
    /// Example: coin-watch list --filter bit
    List {
        /// Only show coins whose name or symbol contains this text
        #[arg(long, default_value = "")]
        filter: String,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        loader: LoaderArgs,
    },

    /// Show prices and refresh them interactively
    ///
    /// Press Enter (or type r) to refresh, type /TEXT to filter, q to quit.
    ///
    /// Example: coin-watch watch --interval 60
    Watch {
        /// Initial filter text
        #[arg(long, default_value = "")]
        filter: String,

        /// Refresh automatically every N seconds
        #[arg(long)]
        interval: Option<u64>,

        #[command(flatten)]
        loader: LoaderArgs,
    },
}

/// Options that control what is fetched and how politely.
#[derive(Args, Debug, Clone)]
pub struct LoaderArgs {
    /// Comma-separated CoinCap asset ids (default: a built-in top-20 list)
    #[arg(long, value_delimiter = ',')]
    pub assets: Vec<String>,

    /// Base URL of the CoinCap API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// How many coins are requested at the same time
    #[arg(long, default_value_t = 2)]
    pub batch_size: usize,

    /// How many retry cycles before giving up on missing coins
    #[arg(long, default_value_t = 10)]
    pub max_cycles: u32,

    /// Pause between batches, in milliseconds
    #[arg(long, default_value_t = 100)]
    pub batch_pause_ms: u64,

    /// Pause between retry cycles, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub cycle_pause_ms: u64,

    /// Pause after a 429 Too Many Requests answer, in milliseconds
    #[arg(long, default_value_t = 200)]
    pub rate_limit_pause_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,
}

impl LoaderArgs {
    pub fn catalog(&self) -> Result<Catalog, TrackerError> {
        if self.assets.is_empty() {
            Ok(Catalog::default_assets())
        } else {
            Catalog::new(&self.assets)
        }
    }

    pub fn config(&self) -> Result<LoaderConfig, TrackerError> {
        let config = LoaderConfig {
            batch_size: self.batch_size,
            max_cycles: self.max_cycles,
            batch_pause: Duration::from_millis(self.batch_pause_ms),
            cycle_pause: Duration::from_millis(self.cycle_pause_ms),
            rate_limit_pause: Duration::from_millis(self.rate_limit_pause_ms),
            request_timeout: Duration::from_secs(self.timeout_secs),
        };
        config.validate()?;
        Ok(config)
    }
}
