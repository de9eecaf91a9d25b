// src/loader/mod.rs
// =============================================================================
// This module contains the asset loader.
//
// Submodules:
// - config: batch size, pauses and retry budget
// - source: fetches one asset (CoinCap over HTTP, or a test double)
// - retry: the batched-fetch-with-retry loop
// - refresh: runs loads on background tasks, newest one wins
//
// Callers normally only need Refresher (interactive use) or load()
// (one-shot use) plus CoinCapSource.
// =============================================================================

mod config;
mod refresh;
mod retry;
mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{LoaderConfig, DEFAULT_BASE_URL};
pub use refresh::{LoadState, Refresher};
pub use retry::{load, LoadReport};
pub use source::{AssetSource, CoinCapSource};
