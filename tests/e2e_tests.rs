//! End-to-end tests over the in-process bus
//!
//! These run the full stack — echo responder, probes, sweep controllers and
//! fleet coordinator — against `LocalBus`, checking the observable shape of
//! the results rather than absolute latency values.

use rtt_bench::channel::{EndpointProvider, LocalBus};
use rtt_bench::fleet::FleetCoordinator;
use rtt_bench::models::{FleetConfig, ResultSet, SweepConfig};
use rtt_bench::probe::RttProbe;
use rtt_bench::responder::EchoResponder;
use rtt_bench::stats::analyze_result_set;
use rtt_bench::sweep::SweepController;
use rtt_bench::types::Outcome;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

fn fast_sweep(sizes: Vec<usize>, warmup: u32, measurement: u32) -> SweepConfig {
    SweepConfig {
        payload_sizes: sizes,
        warmup_count: warmup,
        measurement_count: measurement,
        timeout_ms: 5000,
        settle_pause_ms: 0,
        ..Default::default()
    }
}

fn spawn_responder(bus: &LocalBus) -> (watch::Sender<bool>, JoinHandle<rtt_bench::Result<u64>>) {
    let responder = EchoResponder::new(bus.responder_endpoint().unwrap(), false, false, false);
    let (tx, rx) = watch::channel(false);
    (tx, tokio::spawn(responder.serve(rx)))
}

async fn run_single_sweep(bus: &LocalBus, config: SweepConfig) -> ResultSet {
    let endpoint = bus.client_endpoint(&config.client_id).unwrap();
    let probe = RttProbe::new(endpoint);
    SweepController::new(config, probe).run().await.unwrap()
}

#[tokio::test]
async fn zero_loss_sweep_yields_all_ok_samples() {
    let bus = LocalBus::default();
    let (stop, serve) = spawn_responder(&bus);

    // Scaled-down rendition of the reference scenario: size 64, lossless
    // channel, every sample OK with rtt strictly below the timeout.
    let set = run_single_sweep(&bus, fast_sweep(vec![64], 10, 100)).await;

    assert!(set.is_sealed());
    assert_eq!(set.samples.len(), 100);
    assert_eq!(set.success_count(), 100);
    for sample in &set.samples {
        assert_eq!(sample.size, 64);
        assert_eq!(sample.outcome, Outcome::Ok);
        assert!(sample.rtt < Duration::from_millis(5000));
    }

    stop.send(true).unwrap();
    serve.await.unwrap().unwrap();
}

#[tokio::test]
async fn sweep_covers_every_size_with_exact_counts() {
    let bus = LocalBus::default();
    let (stop, serve) = spawn_responder(&bus);

    let sizes = vec![1, 16, 256, 4096];
    let set = run_single_sweep(&bus, fast_sweep(sizes.clone(), 2, 25)).await;

    assert_eq!(set.samples.len(), sizes.len() * 25);
    for size in sizes {
        let bucket: Vec<_> = set.samples_for_size(size).collect();
        assert_eq!(bucket.len(), 25);
        let iterations: Vec<u32> = bucket.iter().map(|s| s.iteration).collect();
        assert_eq!(iterations, (1..=25).collect::<Vec<u32>>());
    }

    let stats = analyze_result_set(&set);
    assert_eq!(stats.len(), 4);
    assert!(stats.iter().all(|s| s.ok_count == 25));
    assert!(stats.iter().all(|s| s.min_us.is_some()));

    stop.send(true).unwrap();
    serve.await.unwrap().unwrap();
}

#[tokio::test]
async fn concurrent_fleet_clients_do_not_interfere() {
    let bus = LocalBus::default();
    let (stop, serve) = spawn_responder(&bus);
    let provider = Arc::new(bus);

    // Every client sees every response on the bus and must discard foreign
    // correlation ids; all sweeps still complete fully OK.
    let coordinator = FleetCoordinator::new(
        FleetConfig::new(4, 4),
        fast_sweep(vec![32, 512], 2, 20),
    );
    let reports = coordinator.run(provider).await.unwrap();

    assert_eq!(reports.len(), 4);
    for report in &reports {
        let set = report.result.as_ref().unwrap();
        assert_eq!(set.samples.len(), 40);
        assert_eq!(set.success_count(), 40);
        assert_eq!(set.client_id, report.client_id);
    }

    stop.send(true).unwrap();
    serve.await.unwrap().unwrap();
}

#[tokio::test]
async fn repeated_runs_have_identical_shape() {
    let bus = LocalBus::default();
    let (stop, serve) = spawn_responder(&bus);

    let config = fast_sweep(vec![8, 64], 1, 15);
    let first = run_single_sweep(&bus, config.clone()).await;
    let second = run_single_sweep(&bus, config).await;

    // Same size/iteration structure both times; rtt values may differ.
    let shape = |set: &ResultSet| -> Vec<(usize, u32)> {
        set.samples.iter().map(|s| (s.size, s.iteration)).collect()
    };
    assert_eq!(shape(&first), shape(&second));
    assert_eq!(first.success_count(), second.success_count());

    stop.send(true).unwrap();
    serve.await.unwrap().unwrap();
}

#[tokio::test]
async fn fleet_csv_files_land_per_client() {
    let dir = tempfile::TempDir::new().unwrap();
    let bus = LocalBus::default();
    let (stop, serve) = spawn_responder(&bus);
    let provider = Arc::new(bus);

    let coordinator = FleetCoordinator::new(FleetConfig::new(3, 2), fast_sweep(vec![16], 1, 10))
        .with_output_dir(dir.path());
    let reports = coordinator.run(provider).await.unwrap();

    assert_eq!(reports.len(), 3);
    for report in &reports {
        let path = report.csv_path.as_ref().unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("size,iteration,rtt_us"));
        // Header plus one row per OK measurement
        assert_eq!(lines.count(), 10);
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(&format!("rtt_{}_", report.client_id)));
    }

    stop.send(true).unwrap();
    serve.await.unwrap().unwrap();
}
