//! Application orchestration: wires the bus, responder, sweeps and reporting
//!
//! The bundled binary runs its clients against the in-process echo responder
//! over [`LocalBus`]; a real middleware deployment implements the channel
//! endpoint traits instead and reuses everything above them.

use crate::channel::{EndpointProvider, LocalBus};
use crate::cli::{Cli, Command, FleetArgs, SweepArgs};
use crate::config::{load_fleet_config, load_sweep_config};
use crate::error::{AppError, Result};
use crate::fleet::FleetCoordinator;
use crate::models::ResultSet;
use crate::output::{format_fleet_report, format_size_table, CsvWriter, SampleSink};
use crate::probe::RttProbe;
use crate::responder::EchoResponder;
use crate::stats::analyze_result_set;
use crate::sweep::SweepController;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    /// Create a new application instance with CLI configuration
    pub fn new(cli: Cli) -> Result<Self> {
        cli.validate().map_err(AppError::config)?;
        Ok(Self { cli })
    }

    /// Run the application
    pub async fn run(self) -> Result<()> {
        match self.cli.command {
            Command::Sweep(args) => run_sweep(args).await,
            Command::Fleet(args) => run_fleet(args).await,
        }
    }
}

/// Spawn the echo responder on the bus; returns its stop handle and task.
fn spawn_responder(
    bus: &LocalBus,
    verbose: bool,
    debug: bool,
    color: bool,
) -> Result<(watch::Sender<bool>, JoinHandle<Result<u64>>)> {
    let responder = EchoResponder::new(bus.responder_endpoint()?, verbose, debug, color);
    let (stop_tx, stop_rx) = watch::channel(false);
    Ok((stop_tx, tokio::spawn(responder.serve(stop_rx))))
}

fn print_statistics(set: &ResultSet, json: bool, color: bool) -> Result<()> {
    let stats = analyze_result_set(set);
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else if !stats.is_empty() {
        println!("{}", format_size_table(&stats, color));
    }
    Ok(())
}

async fn run_sweep(args: SweepArgs) -> Result<()> {
    let config = load_sweep_config(&args.common, &args.client_id)?;
    let color = config.enable_color;

    let bus = LocalBus::default();
    let (responder_stop, responder_task) =
        spawn_responder(&bus, config.verbose, config.debug, color)?;

    let endpoint = bus.client_endpoint(&config.client_id)?;
    let probe = RttProbe::new(endpoint);
    let (sweep_stop, sweep_stop_rx) = watch::channel(false);
    let mut controller = SweepController::with_shutdown(config.clone(), probe, sweep_stop_rx);

    let mut csv_path = None;
    if !args.common.no_csv {
        let writer = CsvWriter::create(&args.common.output_dir, &config.client_id, config.record_failures)?;
        csv_path = Some(writer.path().to_path_buf());
        let sink: Box<dyn SampleSink> = Box::new(writer);
        controller = controller.with_sink(sink);
    }

    let mut sweep_task = tokio::spawn(controller.run());
    let result_set = tokio::select! {
        result = &mut sweep_task => join_flatten(result)?,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("interrupt received, finishing current attempt...");
            let _ = sweep_stop.send(true);
            join_flatten(sweep_task.await)?
        }
    };

    let _ = responder_stop.send(true);
    let _ = responder_task.await;

    print_statistics(&result_set, args.common.json, color)?;
    println!(
        "sweep complete: {} samples, {} ok, {} timeouts, {} mismatches",
        result_set.samples.len(),
        result_set.success_count(),
        result_set.timeout_count(),
        result_set.mismatch_count()
    );
    if let Some(path) = csv_path {
        println!("results saved to: {}", path.display());
    }
    Ok(())
}

async fn run_fleet(args: FleetArgs) -> Result<()> {
    let fleet_config = load_fleet_config(&args)?;
    let sweep_template = load_sweep_config(&args.common, "fleet")?;
    let color = sweep_template.enable_color;
    let json = args.common.json;

    let bus = Arc::new(LocalBus::default());
    let (responder_stop, responder_task) =
        spawn_responder(&bus, sweep_template.verbose, sweep_template.debug, color)?;

    let mut coordinator = FleetCoordinator::new(fleet_config, sweep_template.clone());
    if !args.common.no_csv {
        coordinator = coordinator.with_output_dir(args.common.output_dir.clone());
    }
    let coordinator = Arc::new(coordinator);

    let started = Instant::now();
    let mut fleet_task = {
        let coordinator = coordinator.clone();
        let bus = bus.clone();
        tokio::spawn(async move { coordinator.run(bus).await })
    };
    let reports = tokio::select! {
        result = &mut fleet_task => join_flatten(result)?,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("interrupt received, stopping fleet after current attempts...");
            coordinator.shutdown();
            join_flatten(fleet_task.await)?
        }
    };

    let _ = responder_stop.send(true);
    let _ = responder_task.await;

    if sweep_template.verbose || json {
        for report in &reports {
            if let Ok(set) = &report.result {
                println!("--- {} ---", report.client_id);
                print_statistics(set, json, color)?;
            }
        }
    }
    print!("{}", format_fleet_report(&reports, started.elapsed(), color));

    let failed = reports.iter().filter(|r| !r.is_success()).count();
    if failed > 0 {
        return Err(AppError::sweep_execution(format!(
            "{} of {} clients failed",
            failed,
            reports.len()
        )));
    }
    Ok(())
}

fn join_flatten<T>(result: std::result::Result<Result<T>, tokio::task::JoinError>) -> Result<T> {
    result.map_err(|e| AppError::internal(format!("task panicked: {}", e)))?
}
