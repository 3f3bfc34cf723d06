//! Per-run telemetry surfaced to the operator (spec.md §4.5/§8): wall time,
//! time spent inside the executor, and per-kind cache statistics.

use std::time::Duration;

use crate::cache::{CacheKind, CacheStats, RecencyCache};

#[derive(Debug, Clone, PartialEq)]
pub struct Telemetry {
    pub packets_seen: u64,
    /// The pre-pass packet count, when one was taken (spec.md §6 `--no-count`
    /// skips it; live captures never have one).
    pub total: Option<u64>,
    pub total_elapsed: Duration,
    pub executor_elapsed: Duration,
    pub cache_stats: Vec<(CacheKind, CacheStats)>,
}

impl Telemetry {
    #[must_use]
    pub fn collect(
        packets_seen: u64,
        total: Option<u64>,
        total_elapsed: Duration,
        executor_elapsed: Duration,
        cache: &RecencyCache,
    ) -> Self {
        Self {
            packets_seen,
            total,
            total_elapsed,
            executor_elapsed,
            cache_stats: cache.all_stats().collect(),
        }
    }

    /// Fraction of wall time spent inside the executor, for the `--debug-time`
    /// summary line (spec.md §6).
    #[must_use]
    pub fn executor_fraction(&self) -> f64 {
        if self.total_elapsed.is_zero() {
            0.0
        } else {
            self.executor_elapsed.as_secs_f64() / self.total_elapsed.as_secs_f64()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn executor_fraction_is_zero_when_no_time_elapsed() {
        let cache = RecencyCache::new(50);
        let telemetry = Telemetry::collect(0, None, Duration::ZERO, Duration::ZERO, &cache);
        assert_eq!(telemetry.executor_fraction(), 0.0);
    }

    #[test]
    fn executor_fraction_computes_ratio() {
        let cache = RecencyCache::new(50);
        let telemetry = Telemetry::collect(
            10,
            Some(10),
            Duration::from_millis(100),
            Duration::from_millis(25),
            &cache,
        );
        assert!((telemetry.executor_fraction() - 0.25).abs() < 1e-9);
    }
}
