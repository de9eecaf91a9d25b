// src/loader/refresh.rs
// =============================================================================
// Refresher: the "refresh" button.
//
// Each call to refresh() starts a brand-new load on its own tokio task. The
// latest settled result is published through a watch channel, so any number
// of observers can render it.
//
// A new refresh supersedes the previous one:
// - the previous task is aborted
// - every load carries a generation number, and a result is only published
//   if its generation is still the newest (abort is not instantaneous, a
//   finishing task can race past it)
//
// Rust concepts:
// - Arc: shared ownership between the Refresher and its spawned tasks
// - tokio::sync::watch: single-value channel, receivers see the latest value
// - JoinHandle::abort: cancel a spawned task
// =============================================================================

use crate::catalog::{AssetRecord, Catalog};
use crate::error::TrackerError;
use crate::loader::{load, AssetSource, LoadReport, LoaderConfig};
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// What observers see. Mirrors the price list, the loading spinner and the
/// error banner of a UI.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadState {
    /// Generation of the load this state belongs to (0 = nothing started).
    pub generation: u64,
    pub loading: bool,
    pub records: Vec<AssetRecord>,
    pub complete: bool,
    /// Fatal error, or the notice attached to a partial result.
    pub error: Option<String>,
}

impl LoadState {
    fn settled(generation: u64, outcome: Result<LoadReport, TrackerError>) -> Self {
        match outcome {
            Ok(report) => LoadState {
                generation,
                loading: false,
                records: report.records,
                complete: report.complete,
                error: report.message,
            },
            // Nothing to show, only the error
            Err(e) => LoadState {
                generation,
                loading: false,
                records: Vec::new(),
                complete: false,
                error: Some(e.to_string()),
            },
        }
    }
}

pub struct Refresher<S> {
    source: Arc<S>,
    catalog: Arc<Catalog>,
    config: LoaderConfig,
    generation: Arc<AtomicU64>,
    state: Arc<watch::Sender<LoadState>>,
    current: Mutex<Option<JoinHandle<()>>>,
}

impl<S> Refresher<S>
where
    S: AssetSource + Send + Sync + 'static,
{
    pub fn new(source: S, catalog: Catalog, config: LoaderConfig) -> Self {
        let (state, _) = watch::channel(LoadState::default());
        Refresher {
            source: Arc::new(source),
            catalog: Arc::new(catalog),
            config,
            generation: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
            current: Mutex::new(None),
        }
    }

    /// Starts a new load, superseding any load still in flight.
    ///
    /// Returns the generation token of the new load. Must be called from
    /// inside a tokio runtime.
    pub fn refresh(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // Keep the last records on screen while the new load runs
        self.state.send_modify(|state| {
            state.generation = generation;
            state.loading = true;
        });

        let source = Arc::clone(&self.source);
        let catalog = Arc::clone(&self.catalog);
        let config = self.config.clone();
        let latest = Arc::clone(&self.generation);
        let state = Arc::clone(&self.state);

        let handle = tokio::spawn(async move {
            let outcome = load(source.as_ref(), &catalog, &config).await;
            publish(&state, &latest, generation, outcome);
        });

        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = current.replace(handle) {
            debug!("Aborting superseded load before generation {}", generation);
            previous.abort();
        }

        generation
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> LoadState {
        self.state.borrow().clone()
    }
}

impl<S> Drop for Refresher<S> {
    fn drop(&mut self) {
        let current = self.current.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = current.take() {
            handle.abort();
        }
    }
}

/// Publishes `outcome` unless a newer load has been started since.
///
/// Returns whether the state was updated.
fn publish(
    state: &watch::Sender<LoadState>,
    latest: &AtomicU64,
    generation: u64,
    outcome: Result<LoadReport, TrackerError>,
) -> bool {
    state.send_if_modified(|current| {
        if latest.load(Ordering::SeqCst) != generation {
            debug!("Discarding stale result of generation {}", generation);
            return false;
        }
        *current = LoadState::settled(generation, outcome);
        true
    })
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why both abort() and a generation check?
//    - abort() only takes effect at the task's next .await
//    - a task that already finished its last fetch can still reach publish()
//
// 2. What is send_if_modified?
//    - Runs a closure on the current value under the channel's lock
//    - Receivers are only notified if the closure returns true
// -----------------------------------------------------------------------------
