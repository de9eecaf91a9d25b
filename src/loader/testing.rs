// src/loader/testing.rs
// Scripted in-memory AssetSource used by the loader and refresher tests.

use crate::catalog::{AssetId, AssetRecord};
use crate::error::FetchError;
use crate::loader::AssetSource;
use chrono::DateTime;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// A record for `id` with a predictable name, symbol and price.
pub fn record(id: &str) -> AssetRecord {
    AssetRecord {
        id: AssetId::new(id),
        name: id.to_string(),
        symbol: id.to_uppercase(),
        price_usd: 1.0,
        timestamp: DateTime::from_timestamp_millis(0).unwrap(),
    }
}

/// Succeeds for every id unless told otherwise.
#[derive(Default)]
pub struct ScriptedSource {
    always_fail: HashSet<String>,
    fail_times: Mutex<HashMap<String, u32>>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    stall: AtomicBool,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// These ids fail on every call.
    pub fn always_fail<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.always_fail.extend(ids.into_iter().map(Into::into));
        self
    }

    /// `id` fails its first `times` calls, then succeeds.
    pub fn fail_times(self, id: &str, times: u32) -> Self {
        self.fail_times.lock().unwrap().insert(id.to_string(), times);
        self
    }

    /// While set, every call hangs forever after being recorded.
    pub fn set_stall(&self, stall: bool) {
        self.stall.store(stall, Ordering::SeqCst);
    }

    pub fn call_order(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, id: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == id).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn should_fail(&self, id: &str) -> bool {
        if self.always_fail.contains(id) {
            return true;
        }
        let mut fail_times = self.fail_times.lock().unwrap();
        match fail_times.get_mut(id) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }
}

impl AssetSource for ScriptedSource {
    async fn fetch(&self, id: &AssetId) -> Result<AssetRecord, FetchError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls.lock().unwrap().push(id.to_string());

        if self.stall.load(Ordering::SeqCst) {
            futures::future::pending::<()>().await;
        }

        // Give the other members of the batch a chance to start
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.should_fail(id.as_str()) {
            Err(FetchError::RateLimited)
        } else {
            Ok(record(id.as_str()))
        }
    }
}
