//! Data models for the RTT benchmark

pub mod config;
pub mod sample;

// Re-export main model types
pub use config::{FleetConfig, SweepConfig};
pub use sample::{Request, Response, ResultSet, Sample};
