//! Request/response messages and recorded samples

use crate::types::Outcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A correlated request carried over the message channel.
///
/// The `id` is unique within one probe's correlation-id space for the
/// lifetime of a run; the payload length matches the size under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: i32,
    pub payload: Vec<u8>,
}

/// The echoed reply: same id, same payload, byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub id: i32,
    pub payload: Vec<u8>,
}

/// One completed RTT attempt. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Payload size under test, in bytes
    pub size: usize,
    /// 1-based sequence number within this size bucket
    pub iteration: u32,
    /// Elapsed round-trip time; for timeouts this holds the timeout duration
    /// itself and must be excluded from latency statistics
    pub rtt: Duration,
    /// Attempt outcome
    pub outcome: Outcome,
}

impl Sample {
    /// RTT in microseconds, the unit used by the CSV record format.
    pub fn rtt_us(&self) -> f64 {
        self.rtt.as_secs_f64() * 1e6
    }
}

/// All measurement-phase samples produced by one client's sweep.
///
/// Created when the sweep starts, sealed when the last size bucket finishes.
/// Warmup attempts never appear here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSet {
    /// Identifier of the client that produced these samples
    pub client_id: String,
    /// Measurement samples in sweep order
    pub samples: Vec<Sample>,
    /// When the sweep started
    pub started_at: DateTime<Utc>,
    /// When the sweep sealed; `None` while still in progress
    pub completed_at: Option<DateTime<Utc>>,
}

impl ResultSet {
    /// Start an empty, unsealed result set for the given client.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            samples: Vec::new(),
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Append one measurement sample.
    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    /// Seal the result set; no further samples are appended after this.
    pub fn seal(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    pub fn is_sealed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Samples recorded for one payload size, in iteration order.
    pub fn samples_for_size(&self, size: usize) -> impl Iterator<Item = &Sample> {
        self.samples.iter().filter(move |s| s.size == size)
    }

    /// Number of successful attempts across all sizes.
    pub fn success_count(&self) -> usize {
        self.samples.iter().filter(|s| s.outcome.is_ok()).count()
    }

    /// Number of timed-out attempts across all sizes.
    pub fn timeout_count(&self) -> usize {
        self.samples
            .iter()
            .filter(|s| s.outcome == Outcome::Timeout)
            .count()
    }

    /// Number of payload-mismatch attempts across all sizes.
    pub fn mismatch_count(&self) -> usize {
        self.samples
            .iter()
            .filter(|s| s.outcome == Outcome::PayloadMismatch)
            .count()
    }
}
