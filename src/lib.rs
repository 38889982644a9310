//! RTT Bench
//!
//! Measures end-to-end round-trip time of correlated request/reply exchanges
//! carried over a publish/subscribe message channel, sweeping a configurable
//! list of payload sizes for one or many concurrent clients, and reduces the
//! raw samples to per-size statistics and CSV result files.

pub mod app;
pub mod channel;
pub mod cli;
pub mod config;
pub mod error;
pub mod fleet;
pub mod logging;
pub mod models;
pub mod output;
pub mod probe;
pub mod responder;
pub mod stats;
pub mod sweep;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Request, Response, ResultSet, Sample, SweepConfig};
pub use probe::RttProbe;
pub use responder::{echo, EchoResponder};
pub use stats::{analyze_result_set, SizeStatistics};
pub use sweep::SweepController;
pub use types::Outcome;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_WARMUP_COUNT: u32 = 50;
    pub const DEFAULT_MEASUREMENT_COUNT: u32 = 1000;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);
    /// Pause between the warmup and measurement phases of each size bucket.
    pub const DEFAULT_SETTLE_PAUSE: Duration = Duration::from_secs(1);
    /// Largest exponent in the default power-of-two size sweep (2^0..=2^17).
    pub const DEFAULT_SIZE_EXPONENT_MAX: u32 = 17;
    pub const DEFAULT_CLIENT_ID: &str = "client1";
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Payload sizes used when no explicit list is configured.
    pub fn default_payload_sizes() -> Vec<usize> {
        (0..=DEFAULT_SIZE_EXPONENT_MAX).map(|e| 1usize << e).collect()
    }
}
