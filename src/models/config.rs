//! Sweep and fleet configuration

use crate::defaults;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for one client's payload-size sweep.
///
/// Sizes are processed in the given order; each size runs `warmup_count`
/// discarded attempts followed by `measurement_count` recorded attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Client identifier, used for result tagging and file naming
    pub client_id: String,
    /// Ordered payload sizes in bytes (by convention powers of two)
    pub payload_sizes: Vec<usize>,
    /// Attempts per size whose samples are discarded
    pub warmup_count: u32,
    /// Attempts per size whose samples are recorded
    pub measurement_count: u32,
    /// Per-attempt response timeout in milliseconds
    pub timeout_ms: u64,
    /// Pause between warmup and measurement phases, in milliseconds
    pub settle_pause_ms: u64,
    /// Record TIMEOUT/PAYLOAD_MISMATCH rows in the CSV with a status column
    pub record_failures: bool,
    /// Enable per-size progress output
    pub verbose: bool,
    /// Enable debug output
    pub debug: bool,
    /// Enable colored terminal output
    pub enable_color: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            client_id: defaults::DEFAULT_CLIENT_ID.to_string(),
            payload_sizes: defaults::default_payload_sizes(),
            warmup_count: defaults::DEFAULT_WARMUP_COUNT,
            measurement_count: defaults::DEFAULT_MEASUREMENT_COUNT,
            timeout_ms: defaults::DEFAULT_TIMEOUT.as_millis() as u64,
            settle_pause_ms: defaults::DEFAULT_SETTLE_PAUSE.as_millis() as u64,
            record_failures: false,
            verbose: false,
            debug: false,
            enable_color: defaults::DEFAULT_ENABLE_COLOR,
        }
    }
}

impl SweepConfig {
    /// Per-attempt timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Warmup-to-measurement settle pause as a `Duration`.
    pub fn settle_pause(&self) -> Duration {
        Duration::from_millis(self.settle_pause_ms)
    }

    /// Total attempts one sweep will issue, warmup included.
    pub fn total_attempts(&self) -> u64 {
        self.payload_sizes.len() as u64 * (self.warmup_count as u64 + self.measurement_count as u64)
    }

    /// Validate the configuration before any sweep starts.
    ///
    /// An empty size list is rejected here, at the configuration surface;
    /// the sweep controller itself treats an empty list as an immediately
    /// sealed, empty result set so programmatic callers may run one.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.is_empty() {
            return Err(AppError::config("client id must not be empty"));
        }
        if self.payload_sizes.is_empty() {
            return Err(AppError::config("payload size list must not be empty"));
        }
        if self.timeout_ms == 0 {
            return Err(AppError::config("timeout must be greater than zero"));
        }
        Ok(())
    }

    /// Copy of this config rebound to a different client id.
    pub fn for_client(&self, client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            ..self.clone()
        }
    }
}

/// Configuration for a concurrent fleet of sweep clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetConfig {
    /// Number of clients to run
    pub num_clients: usize,
    /// Maximum number of sweeps active at any instant
    pub max_concurrent: usize,
}

impl FleetConfig {
    pub fn new(num_clients: usize, max_concurrent: usize) -> Self {
        Self {
            num_clients,
            max_concurrent,
        }
    }

    /// Validate fleet bounds before spawning anything.
    pub fn validate(&self) -> Result<()> {
        if self.num_clients == 0 {
            return Err(AppError::config("number of clients must be greater than zero"));
        }
        if self.max_concurrent == 0 {
            return Err(AppError::config("max concurrent clients must be greater than zero"));
        }
        Ok(())
    }

    /// Client id for the given 0-based ordinal (`client_001`, `client_002`, ...).
    pub fn client_id(ordinal: usize) -> String {
        format!("client_{:03}", ordinal + 1)
    }
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            num_clients: 1,
            max_concurrent: num_cpus::get(),
        }
    }
}
