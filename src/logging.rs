//! Leveled console logging for the benchmark components
//!
//! Each component (sweep controller, fleet coordinator, echo responder) holds
//! its own [`Logger`] tagged with a component name, gated by verbosity flags
//! from the configuration.

use crate::error::{AppError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Debug => "\x1b[36m", // Cyan
            LogLevel::Info => "\x1b[32m",  // Green
            LogLevel::Warn => "\x1b[33m",  // Yellow
            LogLevel::Error => "\x1b[31m", // Red
        }
    }

    /// Reset ANSI color code
    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Console logger bound to one component name
#[derive(Debug, Clone)]
pub struct Logger {
    component: String,
    level: LogLevel,
    color: bool,
}

impl Logger {
    /// Create a logger with an explicit minimum level.
    pub fn new(component: impl Into<String>, level: LogLevel, color: bool) -> Self {
        Self {
            component: component.into(),
            level,
            color,
        }
    }

    /// Derive the level from the usual verbose/debug configuration flags.
    pub fn from_flags(component: impl Into<String>, verbose: bool, debug: bool, color: bool) -> Self {
        let level = if debug {
            LogLevel::Debug
        } else if verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };
        Self::new(component, level, color)
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    fn log(&self, level: LogLevel, message: &str) {
        if level < self.level {
            return;
        }
        let timestamp = Utc::now().format("%H:%M:%S%.3f");
        let line = if self.color {
            format!(
                "[{}] {}{}{} {}: {}",
                timestamp,
                level.color_code(),
                level.as_str(),
                LogLevel::reset_code(),
                self.component,
                message
            )
        } else {
            format!("[{}] {} {}: {}", timestamp, level.as_str(), self.component, message)
        };
        if level >= LogLevel::Warn {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message.as_ref());
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warn, message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message.as_ref());
    }
}
