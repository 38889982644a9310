//! Type definitions and payload helpers

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Outcome of a single RTT attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// A matching response arrived in time with an intact payload
    Ok,
    /// No matching response arrived within the configured timeout
    Timeout,
    /// A matching response arrived but its payload differed from the request
    PayloadMismatch,
}

impl Outcome {
    /// Short tag used in the optional CSV status column
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Ok => "ok",
            Outcome::Timeout => "timeout",
            Outcome::PayloadMismatch => "mismatch",
        }
    }

    /// Whether this attempt produced a usable latency measurement
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok)
    }
}

/// Build a payload of the given size with the canonical `i % 256` byte pattern.
pub fn create_payload(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

/// Byte-for-byte comparison of a sent payload against the echoed one.
pub fn validate_payload(original: &[u8], received: &[u8]) -> bool {
    original == received
}
