//! Request counters and latency statistics for the predictor.

use crate::types::prediction::IncomeBracket;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for prediction requests
pub struct PredictorMetrics {
    /// Single-record predictions served
    pub single_predictions: AtomicU64,
    /// Batch uploads scored
    pub batch_requests: AtomicU64,
    /// Rows scored across all batches
    pub batch_rows: AtomicU64,
    /// Requests that ended in an error
    pub failures: AtomicU64,
    above_50k: AtomicU64,
    at_most_50k: AtomicU64,
    /// Request latencies (in microseconds)
    latencies: RwLock<Vec<u64>>,
    start_time: Instant,
}

impl PredictorMetrics {
    pub fn new() -> Self {
        Self {
            single_predictions: AtomicU64::new(0),
            batch_requests: AtomicU64::new(0),
            batch_rows: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            above_50k: AtomicU64::new(0),
            at_most_50k: AtomicU64::new(0),
            latencies: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    /// Record a single-record prediction
    pub fn record_single(&self, elapsed: Duration, label: i64) {
        self.single_predictions.fetch_add(1, Ordering::Relaxed);
        self.count_label(label);
        self.record_latency(elapsed);
    }

    /// Record a scored batch
    pub fn record_batch(&self, elapsed: Duration, labels: &[i64]) {
        self.batch_requests.fetch_add(1, Ordering::Relaxed);
        self.batch_rows.fetch_add(labels.len() as u64, Ordering::Relaxed);
        for &label in labels {
            self.count_label(label);
        }
        self.record_latency(elapsed);
    }

    /// Record a failed request
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    fn count_label(&self, label: i64) {
        match IncomeBracket::from_label(label) {
            IncomeBracket::Above50K => self.above_50k.fetch_add(1, Ordering::Relaxed),
            IncomeBracket::AtMost50K => self.at_most_50k.fetch_add(1, Ordering::Relaxed),
        };
    }

    fn record_latency(&self, elapsed: Duration) {
        if let Ok(mut times) = self.latencies.write() {
            times.push(elapsed.as_micros() as u64);
            // Keep only last 10000 for memory efficiency
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }
    }

    /// Get latency statistics
    pub fn latency_stats(&self) -> LatencyStats {
        let sorted = match self.latencies.read() {
            Ok(times) if !times.is_empty() => {
                let mut sorted = times.clone();
                sorted.sort_unstable();
                sorted
            }
            _ => return LatencyStats::default(),
        };

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();
        let pick = |q: f64| sorted[((count as f64 * q) as usize).min(count - 1)];

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: pick(0.95),
            p99_us: pick(0.99),
            max_us: sorted[count - 1],
        }
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            single_predictions: self.single_predictions.load(Ordering::Relaxed),
            batch_requests: self.batch_requests.load(Ordering::Relaxed),
            batch_rows: self.batch_rows.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            above_50k: self.above_50k.load(Ordering::Relaxed),
            at_most_50k: self.at_most_50k.load(Ordering::Relaxed),
            latency: self.latency_stats(),
        }
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let s = self.snapshot();
        let labelled = s.above_50k + s.at_most_50k;
        let above_pct = if labelled > 0 {
            (s.above_50k as f64 / labelled as f64) * 100.0
        } else {
            0.0
        };

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║              SALARY PREDICTOR - METRICS SUMMARY              ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Single Predictions: {:>8}  │  Uptime: {:>8} s          ║",
            s.single_predictions, s.uptime_secs
        );
        info!(
            "║ Batches: {:>6} ({:>8} rows)  │  Failures: {:>6}          ║",
            s.batch_requests, s.batch_rows, s.failures
        );
        info!(
            "║ >50K: {:>8}  ≤50K: {:>8}  (>50K share {:>5.1}%)        ║",
            s.above_50k, s.at_most_50k, above_pct
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Latency (μs): mean={:>6} p50={:>6} p95={:>6} p99={:>6}   ║",
            s.latency.mean_us, s.latency.p50_us, s.latency.p95_us, s.latency.p99_us
        );
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for PredictorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Request latency statistics
#[derive(Debug, Default, Clone, Serialize)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub single_predictions: u64,
    pub batch_requests: u64,
    pub batch_rows: u64,
    pub failures: u64,
    pub above_50k: u64,
    pub at_most_50k: u64,
    pub latency: LatencyStats,
}
