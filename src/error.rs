// src/error.rs
// =============================================================================
// Error types used across the tracker.
//
// Two families:
// - FetchError: one asset could not be fetched this time. These are "soft"
//   failures: the loader swallows them and retries the asset in a later cycle.
// - TrackerError: everything that can actually stop an operation (bad config,
//   bad catalog, no data at all after every retry cycle).
//
// Rust concepts:
// - thiserror: derive macro that writes the Display/Error impls for us
// - #[from]: generates a From impl so the ? operator converts automatically
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

/// Why a single asset fetch failed.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection failure, timeout, or the body could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered 429 Too Many Requests.
    #[error("rate limited by remote source")]
    RateLimited,

    /// Any other non-success status code.
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),

    /// The body was not a valid asset payload.
    #[error("could not parse asset payload: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

/// Errors that end a tracker operation.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Not a single catalog asset was fetched within the retry budget.
    #[error("Failed to fetch any cryptocurrency data (gave up after {cycles} retry cycles)")]
    NoData { cycles: u32 },

    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("could not build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("asset '{0}' appears more than once in the catalog")]
    DuplicateAsset(String),

    #[error("asset ids must not be blank")]
    BlankAssetId,

    #[error("invalid loader configuration: {0}")]
    InvalidConfig(String),
}
