// src/loader/retry.rs
// =============================================================================
// The batched-fetch-with-retry loop.
//
// How it works:
// 1. Start with an empty result map
// 2. Each cycle, work out which catalog ids are still missing
// 3. Split the missing ids into small batches (default: 2)
// 4. Fetch every id of a batch concurrently, store the successes, and pause
//    briefly before the next batch
// 5. After the cycle, pause a bit longer and go again, until either every id
//    is present or we have used up the retry budget
//
// Batches never overlap: batch N+1 starts only once batch N has been merged.
// That keeps at most `batch_size` requests in flight against the API.
//
// Rust concepts:
// - join_all: await several futures together (like Promise.all)
// - slice::chunks: split a slice into fixed-size pieces
// =============================================================================

use crate::catalog::{AssetId, AssetRecord, Catalog};
use crate::error::TrackerError;
use crate::loader::{AssetSource, LoaderConfig};
use futures::future::join_all;
use log::{debug, info};
use serde::Serialize;
use std::collections::HashMap;

/// What a finished load produced.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    /// Fetched records in catalog order.
    pub records: Vec<AssetRecord>,
    /// True when every catalog id was fetched.
    pub complete: bool,
    /// Number of retry cycles that ran.
    pub cycles: u32,
    /// Human-readable notice when the result is partial.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Fetches every id in `catalog` from `source`, retrying missing ones.
///
/// Returns `Err(TrackerError::NoData)` only if nothing at all could be
/// fetched from a non-empty catalog. A partial result is still `Ok`, with
/// `complete == false` and a message.
pub async fn load<S>(
    source: &S,
    catalog: &Catalog,
    config: &LoaderConfig,
) -> Result<LoadReport, TrackerError>
where
    S: AssetSource,
{
    config.validate()?;

    let mut results: HashMap<AssetId, AssetRecord> = HashMap::with_capacity(catalog.len());
    let mut cycles = 0u32;

    while cycles < config.max_cycles {
        let missing = missing_ids(catalog, &results);
        if missing.is_empty() {
            break;
        }

        debug!(
            "Retry cycle {}: {} of {} asset(s) missing",
            cycles + 1,
            missing.len(),
            catalog.len()
        );

        let batch_count = missing.len().div_ceil(config.batch_size);
        for (index, batch) in missing.chunks(config.batch_size).enumerate() {
            // Every request of the batch is created before any is awaited
            let outcomes = join_all(batch.iter().map(|id| source.fetch(id))).await;

            for (id, outcome) in batch.iter().zip(outcomes) {
                match outcome {
                    Ok(record) => {
                        results.insert(id.clone(), record);
                    }
                    Err(e) => debug!("{} will be retried: {}", id, e),
                }
            }

            if index + 1 < batch_count {
                tokio::time::sleep(config.batch_pause).await;
            }
        }

        cycles += 1;

        if results.len() < catalog.len() && cycles < config.max_cycles {
            tokio::time::sleep(config.cycle_pause).await;
        }
    }

    if results.is_empty() && !catalog.is_empty() {
        return Err(TrackerError::NoData { cycles });
    }

    // Hand off in catalog order
    let records: Vec<AssetRecord> = catalog
        .ids()
        .iter()
        .filter_map(|id| results.remove(id))
        .collect();

    let complete = records.len() == catalog.len();
    let message = if complete {
        None
    } else {
        Some(format!(
            "Could not fetch all cryptocurrencies after {} retry cycles",
            cycles
        ))
    };

    info!(
        "Loaded {}/{} asset(s) in {} cycle(s)",
        records.len(),
        catalog.len(),
        cycles
    );

    Ok(LoadReport {
        records,
        complete,
        cycles,
        message,
    })
}

/// Catalog ids not yet in `results`, in catalog order.
fn missing_ids(catalog: &Catalog, results: &HashMap<AssetId, AssetRecord>) -> Vec<AssetId> {
    catalog
        .ids()
        .iter()
        .filter(|id| !results.contains_key(*id))
        .cloned()
        .collect()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why join_all and not buffer_unordered?
//    - buffer_unordered(N) starts the next request as soon as one finishes,
//      so requests from "different batches" would overlap
//    - join_all waits for the whole batch, which is exactly the pacing the
//      API needs
//
// 2. Why a HashMap for the results?
//    - Lookups by id are O(1) when computing the missing ids
//    - Order is restored at the end by walking the catalog
//
// 3. What is div_ceil?
//    - Integer division rounding up: 5 items in batches of 2 = 3 batches
// -----------------------------------------------------------------------------
