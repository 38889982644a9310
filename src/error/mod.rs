//! Error handling for the RTT benchmark
//!
//! Attempt-level failures (timeouts, payload mismatches) are *data* — they are
//! recorded in the sample stream, never raised. The error types here cover the
//! failures that do propagate: invalid configuration, channel endpoint setup,
//! transport breakage and I/O on the result sink.

use thiserror::Error;

/// Custom error types for the RTT benchmark
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (rejected before any sweep starts)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Channel endpoint could not be established for a client
    #[error("Channel setup error: {0}")]
    ChannelSetup(String),

    /// The message channel broke mid-sweep (send/receive path gone)
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O errors (result files, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (size lists, durations, env overrides)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Sweep execution errors
    #[error("Sweep execution error: {0}")]
    SweepExecution(String),

    /// Statistics calculation errors
    #[error("Statistics error: {0}")]
    Statistics(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new channel setup error
    pub fn channel_setup<S: Into<String>>(message: S) -> Self {
        Self::ChannelSetup(message.into())
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new sweep execution error
    pub fn sweep_execution<S: Into<String>>(message: S) -> Self {
        Self::SweepExecution(message.into())
    }

    /// Create a new statistics error
    pub fn statistics<S: Into<String>>(message: S) -> Self {
        Self::Statistics(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::ChannelSetup(_) => "CHANNEL",
            Self::Transport(_) => "TRANSPORT",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::SweepExecution(_) => "SWEEP",
            Self::Statistics(_) => "STATS",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Check if error is recoverable at the fleet level (other clients continue)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::ChannelSetup(_) | Self::Transport(_) | Self::SweepExecution(_) => true,
            Self::Config(_) | Self::Parse(_) => false,
            Self::Io(_) | Self::Statistics(_) | Self::Internal(_) => false,
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Parse(_) => 1,
            Self::ChannelSetup(_) | Self::Transport(_) => 2,
            Self::SweepExecution(_) => 3,
            Self::Io(_) => 4,
            Self::Statistics(_) | Self::Internal(_) => 5,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error.to_string())
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
