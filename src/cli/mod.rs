//! Command-line interface

use crate::defaults;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Long version string carrying the build metadata embedded by `build.rs`.
fn long_version() -> String {
    match option_env!("GIT_COMMIT") {
        Some(commit) => format!(
            "{} ({}, built {})",
            env!("CARGO_PKG_VERSION"),
            commit,
            env!("BUILD_TIME")
        ),
        None => format!("{} (built {})", env!("CARGO_PKG_VERSION"), env!("BUILD_TIME")),
    }
}

/// RTT benchmark over a publish/subscribe message channel
#[derive(Parser, Debug, Clone)]
#[command(name = "rttb")]
#[command(version, long_version = long_version(), about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run one client's payload-size sweep
    Sweep(SweepArgs),
    /// Run N concurrent clients with bounded concurrency
    Fleet(FleetArgs),
}

/// Options shared by sweep and fleet runs
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Comma-separated payload sizes in bytes (default: powers of two, 1 to 131072)
    #[arg(long)]
    pub sizes: Option<String>,

    /// Warmup attempts per size, discarded (default: 50)
    #[arg(long)]
    pub warmup: Option<u32>,

    /// Measured attempts per size (default: 1000)
    #[arg(short, long)]
    pub count: Option<u32>,

    /// Per-attempt response timeout in milliseconds (default: 5000)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Pause between warmup and measurement phases, in milliseconds (default: 1000)
    #[arg(long)]
    pub settle_pause: Option<u64>,

    /// Directory for CSV result files
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Disable CSV result files
    #[arg(long)]
    pub no_csv: bool,

    /// Also record timeout/mismatch rows, adding a status column
    #[arg(long)]
    pub record_failures: bool,

    /// Print per-size statistics as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Enable verbose progress output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SweepArgs {
    /// Client identifier used for result tagging and file naming
    #[arg(long, default_value = defaults::DEFAULT_CLIENT_ID)]
    pub client_id: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug, Clone)]
pub struct FleetArgs {
    /// Number of clients to run
    pub num_clients: usize,

    /// Maximum concurrent clients (default: number of CPUs)
    #[arg(long)]
    pub max_workers: Option<usize>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        let common = match &self.command {
            Command::Sweep(args) => &args.common,
            Command::Fleet(args) => &args.common,
        };

        if common.color && common.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }
        if common.timeout == Some(0) {
            return Err("Timeout must be greater than zero".to_string());
        }

        if let Command::Fleet(args) = &self.command {
            if args.num_clients == 0 {
                return Err("Number of clients must be greater than zero".to_string());
            }
            if args.max_workers == Some(0) {
                return Err("Max workers must be greater than zero".to_string());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_sweep_defaults() {
        let cli = parse(&["rttb", "sweep"]);
        match &cli.command {
            Command::Sweep(args) => {
                assert_eq!(args.client_id, "client1");
                // Counts and timeout stay unset here; the loader applies the
                // built-in defaults so env vars keep their precedence slot.
                assert!(args.common.warmup.is_none());
                assert!(args.common.count.is_none());
                assert!(args.common.timeout.is_none());
                assert!(args.common.sizes.is_none());
            }
            _ => panic!("expected sweep subcommand"),
        }
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_long_version_carries_build_metadata() {
        let version = long_version();
        assert!(version.starts_with(env!("CARGO_PKG_VERSION")));
        assert!(version.contains("built"));
    }

    #[test]
    fn test_fleet_args() {
        let cli = parse(&["rttb", "fleet", "5", "--max-workers", "2", "--sizes", "64,128"]);
        match &cli.command {
            Command::Fleet(args) => {
                assert_eq!(args.num_clients, 5);
                assert_eq!(args.max_workers, Some(2));
                assert_eq!(args.common.sizes.as_deref(), Some("64,128"));
            }
            _ => panic!("expected fleet subcommand"),
        }
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_color_conflict_rejected() {
        let cli = parse(&["rttb", "sweep", "--color", "--no-color"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let cli = parse(&["rttb", "sweep", "--timeout", "0"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_zero_clients_rejected() {
        let cli = parse(&["rttb", "fleet", "0"]);
        assert!(cli.validate().is_err());
    }
}
