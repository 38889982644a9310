//! RTT Bench - Main CLI Application
//!
//! Measures round-trip time of correlated request/reply exchanges over a
//! publish/subscribe message channel across a sweep of payload sizes, for
//! one client or a concurrent fleet.

use clap::Parser;
use rtt_bench::{
    app::App,
    cli::Cli,
    error::{AppError, Result},
};
use std::process;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    let cli = Cli::parse();

    if let Err(e) = run_application(cli).await {
        eprintln!("Error: {}", e);
        print_error_suggestions(&e);
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    let app = App::new(cli)?;
    app.run().await
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) | AppError::Parse(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Payload sizes are a comma-separated byte list, e.g. --sizes 64,1024");
            eprintln!("  - Timeout is in milliseconds and must be greater than zero");
            eprintln!("  - Environment overrides use RTT_* variables (see README)");
        }
        AppError::ChannelSetup(_) | AppError::Transport(_) => {
            eprintln!();
            eprintln!("Channel troubleshooting:");
            eprintln!("  - The message channel went away mid-run");
            eprintln!("  - Check that the responder side is still running");
        }
        AppError::SweepExecution(_) => {
            eprintln!();
            eprintln!("Execution troubleshooting:");
            eprintln!("  - Increase the timeout with --timeout");
            eprintln!("  - Reduce the client count or --max-workers");
            eprintln!("  - Re-run with --verbose for per-size progress");
        }
        AppError::Io(_) => {
            eprintln!();
            eprintln!("  - Check that --output-dir exists and is writable");
        }
        _ => {}
    }
}

#[test]
fn verify_version_constants() {
    assert!(!rtt_bench::VERSION.is_empty());
    assert_eq!(rtt_bench::PKG_NAME, "rtt-bench");
}
