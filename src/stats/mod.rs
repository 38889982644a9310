//! Per-size statistics over measurement samples
//!
//! Latency figures are computed from OK samples only: timeout samples carry
//! the timeout duration as their rtt, which measures the timeout and not the
//! channel, and mismatch samples measured a corrupted exchange.

use crate::models::{ResultSet, Sample};
use serde::{Deserialize, Serialize};

/// Reduced statistics for one payload size bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeStatistics {
    /// Payload size in bytes
    pub size: usize,
    /// Total attempts recorded for this size
    pub attempts: usize,
    /// Attempts that produced a usable rtt
    pub ok_count: usize,
    /// Attempts that timed out
    pub timeout_count: usize,
    /// Attempts whose echoed payload was corrupted
    pub mismatch_count: usize,
    /// Success rate in percent
    pub success_rate: f64,
    /// Minimum rtt in microseconds; `None` when no attempt succeeded
    pub min_us: Option<f64>,
    /// Maximum rtt in microseconds
    pub max_us: Option<f64>,
    /// Mean rtt in microseconds
    pub mean_us: Option<f64>,
    /// Sample standard deviation in microseconds
    pub stddev_us: Option<f64>,
    /// Median rtt in microseconds
    pub p50_us: Option<f64>,
    /// 95th percentile rtt in microseconds
    pub p95_us: Option<f64>,
    /// 99th percentile rtt in microseconds
    pub p99_us: Option<f64>,
}

impl SizeStatistics {
    /// Reduce the samples of one size bucket. All samples must share `size`.
    pub fn from_samples(size: usize, samples: &[&Sample]) -> Self {
        let attempts = samples.len();
        let timeout_count = samples
            .iter()
            .filter(|s| s.outcome == crate::types::Outcome::Timeout)
            .count();
        let mismatch_count = samples
            .iter()
            .filter(|s| s.outcome == crate::types::Outcome::PayloadMismatch)
            .count();

        let mut rtts: Vec<f64> = samples
            .iter()
            .filter(|s| s.outcome.is_ok())
            .map(|s| s.rtt_us())
            .collect();
        rtts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let ok_count = rtts.len();
        let success_rate = if attempts > 0 {
            (ok_count as f64 / attempts as f64) * 100.0
        } else {
            0.0
        };

        let (min_us, max_us, mean_us, stddev_us, p50_us, p95_us, p99_us) = if rtts.is_empty() {
            (None, None, None, None, None, None, None)
        } else {
            let sum: f64 = rtts.iter().sum();
            let mean = sum / ok_count as f64;
            let stddev = if ok_count > 1 {
                let variance = rtts.iter().map(|r| (r - mean).powi(2)).sum::<f64>()
                    / (ok_count - 1) as f64;
                Some(variance.sqrt())
            } else {
                Some(0.0)
            };
            (
                Some(rtts[0]),
                Some(rtts[ok_count - 1]),
                Some(mean),
                stddev,
                Some(percentile(&rtts, 50.0)),
                Some(percentile(&rtts, 95.0)),
                Some(percentile(&rtts, 99.0)),
            )
        };

        Self {
            size,
            attempts,
            ok_count,
            timeout_count,
            mismatch_count,
            success_rate,
            min_us,
            max_us,
            mean_us,
            stddev_us,
            p50_us,
            p95_us,
            p99_us,
        }
    }
}

/// Nearest-rank percentile over an ascending-sorted slice.
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let rank = ((pct / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

/// Reduce a sealed result set to per-size statistics, preserving the order
/// in which sizes first appear in the sample stream (the sweep order).
pub fn analyze_result_set(set: &ResultSet) -> Vec<SizeStatistics> {
    let mut order: Vec<usize> = Vec::new();
    for sample in &set.samples {
        if !order.contains(&sample.size) {
            order.push(sample.size);
        }
    }

    order
        .into_iter()
        .map(|size| {
            let bucket: Vec<&Sample> = set.samples_for_size(size).collect();
            SizeStatistics::from_samples(size, &bucket)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Outcome;
    use std::time::Duration;

    fn sample_us(size: usize, iteration: u32, us: u64, outcome: Outcome) -> Sample {
        Sample {
            size,
            iteration,
            rtt: Duration::from_micros(us),
            outcome,
        }
    }

    #[test]
    fn test_basic_reduction() {
        let samples = vec![
            sample_us(64, 1, 100, Outcome::Ok),
            sample_us(64, 2, 200, Outcome::Ok),
            sample_us(64, 3, 300, Outcome::Ok),
            sample_us(64, 4, 400, Outcome::Ok),
        ];
        let refs: Vec<&Sample> = samples.iter().collect();
        let stats = SizeStatistics::from_samples(64, &refs);

        assert_eq!(stats.attempts, 4);
        assert_eq!(stats.ok_count, 4);
        assert_eq!(stats.min_us, Some(100.0));
        assert_eq!(stats.max_us, Some(400.0));
        assert_eq!(stats.mean_us, Some(250.0));
        assert!((stats.success_rate - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_timeout_rtt_excluded_from_latency() {
        // The timeout sample carries a 5 s rtt that must not leak into stats
        let samples = vec![
            sample_us(128, 1, 150, Outcome::Ok),
            sample_us(128, 2, 5_000_000, Outcome::Timeout),
        ];
        let refs: Vec<&Sample> = samples.iter().collect();
        let stats = SizeStatistics::from_samples(128, &refs);

        assert_eq!(stats.attempts, 2);
        assert_eq!(stats.ok_count, 1);
        assert_eq!(stats.timeout_count, 1);
        assert_eq!(stats.max_us, Some(150.0));
        assert!((stats.success_rate - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_failures_yield_no_latency_figures() {
        let samples = vec![
            sample_us(256, 1, 5_000_000, Outcome::Timeout),
            sample_us(256, 2, 90, Outcome::PayloadMismatch),
        ];
        let refs: Vec<&Sample> = samples.iter().collect();
        let stats = SizeStatistics::from_samples(256, &refs);

        assert_eq!(stats.ok_count, 0);
        assert_eq!(stats.mismatch_count, 1);
        assert_eq!(stats.min_us, None);
        assert_eq!(stats.mean_us, None);
        assert_eq!(stats.p99_us, None);
        assert_eq!(stats.success_rate, 0.0);
    }

    #[test]
    fn test_percentiles() {
        let sorted: Vec<f64> = (1..=100).map(|i| i as f64).collect();
        assert_eq!(percentile(&sorted, 50.0), 50.0);
        assert_eq!(percentile(&sorted, 95.0), 95.0);
        assert_eq!(percentile(&sorted, 99.0), 99.0);
        assert_eq!(percentile(&[42.0], 99.0), 42.0);
    }

    #[test]
    fn test_analyze_preserves_sweep_order() {
        let mut set = ResultSet::new("client_001");
        // Sweep visited 128 before 64
        set.push(sample_us(128, 1, 100, Outcome::Ok));
        set.push(sample_us(128, 2, 110, Outcome::Ok));
        set.push(sample_us(64, 1, 90, Outcome::Ok));
        set.seal();

        let stats = analyze_result_set(&set);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].size, 128);
        assert_eq!(stats[1].size, 64);
        assert_eq!(stats[0].attempts, 2);
    }

    #[test]
    fn test_analyze_empty_result_set() {
        let mut set = ResultSet::new("client_001");
        set.seal();
        assert!(analyze_result_set(&set).is_empty());
    }
}
