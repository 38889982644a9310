//! Client fleet coordinator: N concurrent sweeps, bounded concurrency
//!
//! Each client is a self-contained unit of work (its own endpoint, its own
//! correlation-id region, its own result file), so the fleet is a bounded
//! worker pool over independent tasks: a semaphore of `max_concurrent`
//! permits gates how many sweeps run at once, and finished sweeps hand their
//! permit to the next pending client. One client failing never aborts its
//! siblings; the failure travels in that client's report.

use crate::channel::EndpointProvider;
use crate::error::{AppError, Result};
use crate::logging::Logger;
use crate::models::{FleetConfig, ResultSet, SweepConfig};
use crate::output::CsvWriter;
use crate::probe::RttProbe;
use crate::sweep::SweepController;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch, Semaphore};

/// Correlation-id regions are spaced this far apart, one region per client
/// ordinal, so ids never collide across concurrently sweeping probes.
pub const ID_SPACE_STRIDE: i32 = 1 << 24;

/// Outcome of one client's sweep, failed or not.
#[derive(Debug)]
pub struct ClientReport {
    pub client_id: String,
    /// Wall-clock time the client spent, queueing excluded
    pub elapsed: Duration,
    /// Result file path, when CSV output was enabled and the file was created
    pub csv_path: Option<PathBuf>,
    /// Sealed result set, or the error that took this client down
    pub result: Result<ResultSet>,
}

impl ClientReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs a fleet of sweep clients against one endpoint provider.
pub struct FleetCoordinator {
    fleet: FleetConfig,
    sweep_template: SweepConfig,
    output_dir: Option<PathBuf>,
    shutdown_tx: watch::Sender<bool>,
    logger: Logger,
}

impl FleetCoordinator {
    pub fn new(fleet: FleetConfig, sweep_template: SweepConfig) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        let logger = Logger::from_flags(
            "fleet",
            sweep_template.verbose,
            sweep_template.debug,
            sweep_template.enable_color,
        );
        Self {
            fleet,
            sweep_template,
            output_dir: None,
            shutdown_tx,
            logger,
        }
    }

    /// Write one CSV result file per client into `dir`.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Request cooperative shutdown: every in-flight sweep finishes its
    /// current attempt, seals its partial result set and stops.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Run all configured clients to completion and return one report per
    /// client, ordered by client id.
    pub async fn run<P>(&self, provider: Arc<P>) -> Result<Vec<ClientReport>>
    where
        P: EndpointProvider + 'static,
        P::Endpoint: Send,
    {
        self.fleet.validate()?;
        self.sweep_template.validate()?;

        self.logger.info(format!(
            "starting {} clients, {} concurrent at most",
            self.fleet.num_clients, self.fleet.max_concurrent
        ));

        let semaphore = Arc::new(Semaphore::new(self.fleet.max_concurrent));
        let (report_tx, mut report_rx) = mpsc::channel(self.fleet.num_clients);

        let mut tasks = Vec::with_capacity(self.fleet.num_clients);
        for ordinal in 0..self.fleet.num_clients {
            let provider = provider.clone();
            let template = self.sweep_template.clone();
            let output_dir = self.output_dir.clone();
            let semaphore = semaphore.clone();
            let shutdown = self.shutdown_tx.subscribe();
            let report_tx = report_tx.clone();

            let task = tokio::spawn(async move {
                let permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| AppError::internal("fleet semaphore closed"));
                let client_id = FleetConfig::client_id(ordinal);
                let started = Instant::now();

                let report = match permit {
                    Ok(_permit) => {
                        let (result, csv_path) = run_one_client(
                            provider.as_ref(),
                            &template,
                            ordinal,
                            &client_id,
                            output_dir.as_deref(),
                            shutdown,
                        )
                        .await;
                        ClientReport {
                            client_id,
                            elapsed: started.elapsed(),
                            csv_path,
                            result,
                        }
                    }
                    Err(e) => ClientReport {
                        client_id,
                        elapsed: started.elapsed(),
                        csv_path: None,
                        result: Err(e),
                    },
                };
                let _ = report_tx.send(report).await;
            });
            tasks.push(task);
        }
        drop(report_tx);

        let mut reports = Vec::with_capacity(self.fleet.num_clients);
        while let Some(report) = report_rx.recv().await {
            match &report.result {
                Ok(set) => self.logger.info(format!(
                    "{} finished: {} samples in {:.2}s",
                    report.client_id,
                    set.samples.len(),
                    report.elapsed.as_secs_f64()
                )),
                Err(e) => self.logger.error(format!(
                    "{} failed after {:.2}s: {}",
                    report.client_id,
                    report.elapsed.as_secs_f64(),
                    e
                )),
            }
            reports.push(report);
        }
        let _ = join_all(tasks).await;

        reports.sort_by(|a, b| a.client_id.cmp(&b.client_id));
        Ok(reports)
    }
}

/// One client's full lifecycle: endpoint setup, probe, sweep, result file.
async fn run_one_client<P>(
    provider: &P,
    template: &SweepConfig,
    ordinal: usize,
    client_id: &str,
    output_dir: Option<&Path>,
    shutdown: watch::Receiver<bool>,
) -> (Result<ResultSet>, Option<PathBuf>)
where
    P: EndpointProvider,
{
    let endpoint = match provider.client_endpoint(client_id) {
        Ok(endpoint) => endpoint,
        Err(e) => return (Err(e), None),
    };

    let first_id = (ordinal as i32).wrapping_mul(ID_SPACE_STRIDE).wrapping_add(1);
    let probe = RttProbe::with_first_id(endpoint, first_id);
    let config = template.for_client(client_id);
    let mut controller = SweepController::with_shutdown(config, probe, shutdown);

    let mut csv_path = None;
    if let Some(dir) = output_dir {
        let writer = match CsvWriter::create(dir, client_id, template.record_failures) {
            Ok(writer) => writer,
            Err(e) => return (Err(e), None),
        };
        csv_path = Some(writer.path().to_path_buf());
        controller = controller.with_sink(Box::new(writer));
    }

    (controller.run().await, csv_path)
}
