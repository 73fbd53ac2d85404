//! Stats emission — per-request timing samples and counters
//!
//! When a sink is configured, the logging handler emits exactly one timing
//! sample (keyed by the request's stat tag) and one counter increment
//! (keyed by `<tag>.<status>`) per request. Sinks are shared across
//! concurrent requests and responsible for their own thread safety.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

/// Metrics backend capability
///
/// Both operations are fire-and-forget: the logging handler never inspects
/// a return value, so implementations swallow their own failures.
pub trait StatsSink: Send + Sync {
    /// Record a timing sample for `key`
    fn timing(&self, key: &str, duration: Duration);

    /// Increase the counter `key` by `delta`
    fn incr_by(&self, key: &str, delta: u64);
}

/// Point-in-time view of a [`MemoryStats`] sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Timing samples per key, in microseconds
    pub timings_us: HashMap<String, Vec<u64>>,
    /// Counter values per key
    pub counters: HashMap<String, u64>,
}

/// In-process stats sink — accumulates samples in memory
///
/// Useful for tests and for embedded deployments without an external
/// metrics backend.
pub struct MemoryStats {
    timings_us: RwLock<HashMap<String, Vec<u64>>>,
    counters: RwLock<HashMap<String, u64>>,
}

impl MemoryStats {
    /// Create an empty sink
    pub fn new() -> Self {
        Self {
            timings_us: RwLock::new(HashMap::new()),
            counters: RwLock::new(HashMap::new()),
        }
    }

    /// Current value of the counter `key`, 0 if never incremented
    pub fn counter(&self, key: &str) -> u64 {
        self.counters
            .read()
            .unwrap()
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    /// Number of timing samples recorded for `key`
    pub fn timing_count(&self, key: &str) -> usize {
        self.timings_us
            .read()
            .unwrap()
            .get(key)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Take a snapshot of all accumulated samples
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            timings_us: self.timings_us.read().unwrap().clone(),
            counters: self.counters.read().unwrap().clone(),
        }
    }
}

impl Default for MemoryStats {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsSink for MemoryStats {
    fn timing(&self, key: &str, duration: Duration) {
        let mut map = self.timings_us.write().unwrap();
        map.entry(key.to_string())
            .or_default()
            .push(duration.as_micros() as u64);
    }

    fn incr_by(&self, key: &str, delta: u64) {
        let mut map = self.counters.write().unwrap();
        *map.entry(key.to_string()).or_insert(0) += delta;
    }
}
