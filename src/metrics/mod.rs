//! Basic metrics instrumentation for tracking performance.
//!
//! Provides counters and duration tracking for upstream requests, cache
//! accesses and contract calls.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics collector for tracking gateway performance.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Total number of upstream HTTP requests made
    upstream_requests_total: Arc<AtomicU64>,

    /// Total number of failed upstream HTTP requests
    upstream_errors_total: Arc<AtomicU64>,

    /// Total duration of all upstream requests in milliseconds
    upstream_duration_total_ms: Arc<AtomicU64>,

    /// Read-through lookups answered from the cache
    cache_hits_total: Arc<AtomicU64>,

    /// Read-through lookups that went upstream
    cache_misses_total: Arc<AtomicU64>,

    /// Contract calls issued
    chain_calls_total: Arc<AtomicU64>,

    /// Contract calls that failed
    chain_errors_total: Arc<AtomicU64>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            upstream_requests_total: Arc::new(AtomicU64::new(0)),
            upstream_errors_total: Arc::new(AtomicU64::new(0)),
            upstream_duration_total_ms: Arc::new(AtomicU64::new(0)),
            cache_hits_total: Arc::new(AtomicU64::new(0)),
            cache_misses_total: Arc::new(AtomicU64::new(0)),
            chain_calls_total: Arc::new(AtomicU64::new(0)),
            chain_errors_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record an upstream request with duration.
    pub fn record_upstream_request(&self, duration: Duration) {
        self.upstream_requests_total.fetch_add(1, Ordering::Relaxed);
        self.upstream_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record an upstream error.
    pub fn record_upstream_error(&self) {
        self.upstream_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cache access.
    pub fn record_cache_access(&self, hit: bool) {
        if hit {
            self.cache_hits_total.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cache_misses_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a contract call and whether it succeeded.
    pub fn record_chain_call(&self, success: bool) {
        self.chain_calls_total.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.chain_errors_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn upstream_requests_total(&self) -> u64 {
        self.upstream_requests_total.load(Ordering::Relaxed)
    }

    pub fn upstream_errors_total(&self) -> u64 {
        self.upstream_errors_total.load(Ordering::Relaxed)
    }

    pub fn upstream_duration_total_ms(&self) -> u64 {
        self.upstream_duration_total_ms.load(Ordering::Relaxed)
    }

    /// Get average upstream request duration in milliseconds.
    pub fn upstream_duration_avg_ms(&self) -> f64 {
        let total = self.upstream_duration_total_ms.load(Ordering::Relaxed);
        let count = self.upstream_requests_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    pub fn cache_hits_total(&self) -> u64 {
        self.cache_hits_total.load(Ordering::Relaxed)
    }

    pub fn cache_misses_total(&self) -> u64 {
        self.cache_misses_total.load(Ordering::Relaxed)
    }

    /// Get the cache hit rate (0.0 to 1.0).
    pub fn cache_hit_rate(&self) -> f64 {
        let hits = self.cache_hits_total() as f64;
        let total = (self.cache_hits_total() + self.cache_misses_total()) as f64;
        if total == 0.0 {
            0.0
        } else {
            hits / total
        }
    }

    pub fn chain_calls_total(&self) -> u64 {
        self.chain_calls_total.load(Ordering::Relaxed)
    }

    pub fn chain_errors_total(&self) -> u64 {
        self.chain_errors_total.load(Ordering::Relaxed)
    }

    /// Get a summary of all metrics.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            upstream_requests_total: self.upstream_requests_total(),
            upstream_errors_total: self.upstream_errors_total(),
            upstream_duration_total_ms: self.upstream_duration_total_ms(),
            upstream_duration_avg_ms: self.upstream_duration_avg_ms(),
            cache_hits_total: self.cache_hits_total(),
            cache_misses_total: self.cache_misses_total(),
            cache_hit_rate: self.cache_hit_rate(),
            chain_calls_total: self.chain_calls_total(),
            chain_errors_total: self.chain_errors_total(),
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub upstream_requests_total: u64,
    pub upstream_errors_total: u64,
    pub upstream_duration_total_ms: u64,
    pub upstream_duration_avg_ms: f64,
    pub cache_hits_total: u64,
    pub cache_misses_total: u64,
    pub cache_hit_rate: f64,
    pub chain_calls_total: u64,
    pub chain_errors_total: u64,
}

/// Helper for timing upstream requests.
pub struct UpstreamTimer {
    start: Instant,
    metrics: Metrics,
}

impl UpstreamTimer {
    /// Start timing an upstream request.
    pub fn new(metrics: Metrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    /// Complete the timing and record the duration.
    pub fn complete(self) {
        let duration = self.start.elapsed();
        self.metrics.record_upstream_request(duration);
    }

    /// Complete the timing and record as an error.
    pub fn complete_with_error(self) {
        let duration = self.start.elapsed();
        self.metrics.record_upstream_request(duration);
        self.metrics.record_upstream_error();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert_eq!(metrics.upstream_requests_total(), 0);
        assert_eq!(metrics.upstream_errors_total(), 0);
        assert_eq!(metrics.cache_hit_rate(), 0.0);
    }

    #[test]
    fn test_average_duration() {
        let metrics = Metrics::new();
        metrics.record_upstream_request(Duration::from_millis(100));
        metrics.record_upstream_request(Duration::from_millis(200));
        assert_eq!(metrics.upstream_requests_total(), 2);
        assert_eq!(metrics.upstream_duration_total_ms(), 300);
        assert_eq!(metrics.upstream_duration_avg_ms(), 150.0);
    }

    #[test]
    fn test_cache_hit_rate() {
        let metrics = Metrics::new();
        metrics.record_cache_access(true);
        metrics.record_cache_access(true);
        metrics.record_cache_access(true);
        metrics.record_cache_access(false);
        assert_eq!(metrics.cache_hits_total(), 3);
        assert_eq!(metrics.cache_misses_total(), 1);
        assert_eq!(metrics.cache_hit_rate(), 0.75);
    }

    #[test]
    fn test_chain_calls() {
        let metrics = Metrics::new();
        metrics.record_chain_call(true);
        metrics.record_chain_call(false);
        let summary = metrics.summary();
        assert_eq!(summary.chain_calls_total, 2);
        assert_eq!(summary.chain_errors_total, 1);
    }

    #[test]
    fn test_upstream_timer_with_error() {
        let metrics = Metrics::new();
        let timer = UpstreamTimer::new(metrics.clone());
        timer.complete_with_error();

        assert_eq!(metrics.upstream_requests_total(), 1);
        assert_eq!(metrics.upstream_errors_total(), 1);
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let metrics = Metrics::new();
        metrics.record_cache_access(false);
        let json = serde_json::to_value(metrics.summary()).unwrap();
        assert_eq!(json["cacheMissesTotal"], 1);
        assert!(json.get("upstreamRequestsTotal").is_some());
    }

    #[test]
    fn test_concurrent_access() {
        let metrics = Metrics::new();
        let metrics1 = metrics.clone();
        let metrics2 = metrics.clone();

        let handle1 = thread::spawn(move || {
            for _ in 0..100 {
                metrics1.record_upstream_request(Duration::from_millis(1));
            }
        });

        let handle2 = thread::spawn(move || {
            for _ in 0..100 {
                metrics2.record_upstream_request(Duration::from_millis(1));
            }
        });

        handle1.join().unwrap();
        handle2.join().unwrap();

        assert_eq!(metrics.upstream_requests_total(), 200);
    }
}
