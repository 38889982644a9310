//! Sweep controller: one client's traversal of the payload-size list
//!
//! For each configured size the controller runs the warmup phase (samples
//! discarded, they exist only to prime discovery and connections) and then
//! the measurement phase (every sample recorded, tagged with its 1-based
//! iteration). Attempts are strictly sequential: RTT measurement requires a
//! single outstanding request per probe.

use crate::channel::ClientEndpoint;
use crate::error::{AppError, Result};
use crate::logging::Logger;
use crate::models::{ResultSet, SweepConfig};
use crate::output::{NullSink, SampleSink};
use crate::probe::RttProbe;
use crate::stats::SizeStatistics;
use tokio::sync::watch;

/// Drives one probe through the full configured sweep.
pub struct SweepController<E: ClientEndpoint> {
    config: SweepConfig,
    probe: RttProbe<E>,
    sink: Box<dyn SampleSink>,
    shutdown: watch::Receiver<bool>,
    logger: Logger,
}

impl<E: ClientEndpoint> SweepController<E> {
    /// Controller without external shutdown wiring or a sample sink.
    pub fn new(config: SweepConfig, probe: RttProbe<E>) -> Self {
        let (_tx, rx) = watch::channel(false);
        Self::with_shutdown(config, probe, rx)
    }

    /// Controller observing a cooperative shutdown signal. A raised signal is
    /// honored between attempts; the in-flight attempt always completes.
    pub fn with_shutdown(
        config: SweepConfig,
        probe: RttProbe<E>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let logger = Logger::from_flags(
            format!("sweep[{}]", config.client_id),
            config.verbose,
            config.debug,
            config.enable_color,
        );
        Self {
            config,
            probe,
            sink: Box::new(NullSink),
            shutdown,
            logger,
        }
    }

    /// Stream measurement samples into `sink` as they are recorded, in
    /// addition to collecting them in the returned result set.
    pub fn with_sink(mut self, sink: Box<dyn SampleSink>) -> Self {
        self.sink = sink;
        self
    }

    fn stop_requested(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Run the sweep to completion and return the sealed result set.
    ///
    /// An empty size list yields an empty, immediately sealed result set. If
    /// shutdown is requested mid-sweep the set is sealed with whatever was
    /// measured up to the current attempt.
    pub async fn run(mut self) -> Result<ResultSet> {
        if self.config.timeout_ms == 0 {
            return Err(AppError::config("timeout must be greater than zero"));
        }

        let timeout = self.config.timeout();
        let mut result_set = ResultSet::new(self.config.client_id.clone());

        self.logger.info(format!(
            "starting sweep: {} sizes, warmup {}, measurement {}, timeout {}ms",
            self.config.payload_sizes.len(),
            self.config.warmup_count,
            self.config.measurement_count,
            self.config.timeout_ms
        ));

        'sizes: for &size in &self.config.payload_sizes {
            // Warmup phase: attempts run, samples vanish.
            self.logger
                .debug(format!("warmup: {} packets of {} bytes", self.config.warmup_count, size));
            for w in 1..=self.config.warmup_count {
                if self.stop_requested() {
                    break 'sizes;
                }
                let _ = self.probe.attempt(size, w, timeout).await?;
            }

            if self.config.warmup_count > 0 && !self.config.settle_pause().is_zero() {
                tokio::time::sleep(self.config.settle_pause()).await;
            }

            // Measurement phase.
            self.logger.info(format!(
                "measuring: {} packets of {} bytes",
                self.config.measurement_count, size
            ));
            let mut ok_in_bucket = 0u32;
            for iteration in 1..=self.config.measurement_count {
                if self.stop_requested() {
                    break 'sizes;
                }
                let sample = self.probe.attempt(size, iteration, timeout).await?;
                if sample.outcome.is_ok() {
                    ok_in_bucket += 1;
                } else {
                    self.logger.debug(format!(
                        "iteration {} of size {}: {}",
                        iteration,
                        size,
                        sample.outcome.as_str()
                    ));
                }
                self.sink.record(&sample)?;
                result_set.push(sample);

                if iteration % 100 == 0 {
                    let rate = (ok_in_bucket as f64 / iteration as f64) * 100.0;
                    self.logger.info(format!(
                        "  progress: {}/{} (success rate {:.1}%)",
                        iteration, self.config.measurement_count, rate
                    ));
                }
            }

            if self.config.verbose && self.config.measurement_count > 0 {
                let bucket: Vec<_> = result_set.samples_for_size(size).collect();
                let stats = SizeStatistics::from_samples(size, &bucket);
                if let (Some(min), Some(mean), Some(max)) = (stats.min_us, stats.mean_us, stats.max_us) {
                    self.logger.info(format!(
                        "size {} done: min {:.2} us, mean {:.2} us, max {:.2} us",
                        size, min, mean, max
                    ));
                } else {
                    self.logger.warn(format!("size {}: no successful measurement", size));
                }
            }
        }

        if self.stop_requested() {
            self.logger.warn("shutdown requested, sealing partial result set");
        }

        self.sink.flush()?;
        result_set.seal();
        self.logger.info(format!(
            "sweep complete: {} samples, {} timeouts, {} mismatches",
            result_set.samples.len(),
            result_set.timeout_count(),
            result_set.mismatch_count()
        ));
        Ok(result_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::tests::{ReplyScript, ScriptedEndpoint};
    use crate::types::Outcome;

    fn test_config(sizes: Vec<usize>, warmup: u32, measurement: u32) -> SweepConfig {
        SweepConfig {
            client_id: "client_001".to_string(),
            payload_sizes: sizes,
            warmup_count: warmup,
            measurement_count: measurement,
            timeout_ms: 5000,
            settle_pause_ms: 0,
            ..Default::default()
        }
    }

    fn echo_probe(count: usize) -> RttProbe<ScriptedEndpoint> {
        RttProbe::new(ScriptedEndpoint::new(vec![ReplyScript::Echo; count]))
    }

    #[tokio::test]
    async fn test_exact_sample_counts_per_size() {
        let config = test_config(vec![16, 32], 3, 10);
        let controller = SweepController::new(config, echo_probe(2 * (3 + 10)));

        let set = controller.run().await.unwrap();
        assert!(set.is_sealed());
        assert_eq!(set.samples.len(), 20);
        assert_eq!(set.samples_for_size(16).count(), 10);
        assert_eq!(set.samples_for_size(32).count(), 10);
    }

    #[tokio::test]
    async fn test_warmup_samples_never_recorded() {
        let config = test_config(vec![64], 50, 5);
        let controller = SweepController::new(config, echo_probe(55));

        let set = controller.run().await.unwrap();
        // measurement_count, never measurement_count + warmup_count
        assert_eq!(set.samples.len(), 5);
        let iterations: Vec<u32> = set.samples.iter().map(|s| s.iteration).collect();
        assert_eq!(iterations, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_response_recorded_as_timeout_at_its_iteration() {
        // Scenario: the channel drops every response for iteration 5 of 10
        let mut script = vec![ReplyScript::Echo; 4];
        script.push(ReplyScript::Drop);
        script.extend(vec![ReplyScript::Echo; 5]);
        let probe = RttProbe::new(ScriptedEndpoint::new(script));

        let config = test_config(vec![128], 0, 10);
        let set = SweepController::new(config, probe).run().await.unwrap();

        assert_eq!(set.samples.len(), 10);
        assert_eq!(set.success_count(), 9);
        assert_eq!(set.timeout_count(), 1);
        let timed_out: Vec<u32> = set
            .samples
            .iter()
            .filter(|s| s.outcome == Outcome::Timeout)
            .map(|s| s.iteration)
            .collect();
        assert_eq!(timed_out, vec![5]);
    }

    #[tokio::test]
    async fn test_empty_size_list_yields_empty_sealed_set() {
        let config = test_config(vec![], 50, 1000);
        let set = SweepController::new(config, echo_probe(0)).run().await.unwrap();
        assert!(set.is_sealed());
        assert!(set.samples.is_empty());
    }

    #[tokio::test]
    async fn test_zero_measurement_count_is_permitted() {
        let config = test_config(vec![8], 2, 0);
        let set = SweepController::new(config, echo_probe(2)).run().await.unwrap();
        assert!(set.is_sealed());
        assert!(set.samples.is_empty());
    }

    #[tokio::test]
    async fn test_zero_timeout_rejected_before_sweep() {
        let mut config = test_config(vec![8], 0, 1);
        config.timeout_ms = 0;
        let result = SweepController::new(config, echo_probe(1)).run().await;
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_shutdown_honored_before_first_attempt() {
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let config = test_config(vec![16], 5, 100);
        let controller = SweepController::with_shutdown(config, echo_probe(105), rx);
        let set = controller.run().await.unwrap();
        assert!(set.is_sealed());
        assert!(set.samples.is_empty());
    }

    #[tokio::test]
    async fn test_sink_receives_measurement_samples_only() {
        use crate::output::SampleSink;
        use std::sync::{Arc, Mutex};

        // Shared sink so the test can observe what the controller streamed
        struct SharedSink(Arc<Mutex<Vec<crate::models::Sample>>>);
        impl SampleSink for SharedSink {
            fn record(&mut self, sample: &crate::models::Sample) -> crate::error::Result<()> {
                self.0.lock().unwrap().push(sample.clone());
                Ok(())
            }
        }

        let rows = Arc::new(Mutex::new(Vec::new()));
        let config = test_config(vec![32], 4, 6);
        let controller = SweepController::new(config, echo_probe(10))
            .with_sink(Box::new(SharedSink(rows.clone())));

        let set = controller.run().await.unwrap();
        assert_eq!(set.samples.len(), 6);

        let streamed = rows.lock().unwrap();
        assert_eq!(streamed.len(), 6);
        assert!(streamed.iter().all(|s| s.size == 32));
    }
}
