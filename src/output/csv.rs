//! CSV result files
//!
//! One file per client, named `rtt_{client}_{timestamp}_{micros}_{uuid8}.csv`
//! so concurrent clients never collide. The record format is
//! `size,iteration,rtt_us` with `rtt_us` as floating-point microseconds.
//! By default only OK rows are written; with `record_failures` every row is
//! written and a fourth `status` column (`ok`/`timeout`/`mismatch`) is added.
//! Each row is flushed as it is recorded, so a run interrupted mid-sweep
//! keeps everything measured so far.

use crate::error::{AppError, Result};
use crate::models::Sample;
use crate::output::SampleSink;
use chrono::Local;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Per-client CSV sample writer.
pub struct CsvWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    record_failures: bool,
    rows_written: u64,
}

impl CsvWriter {
    /// Create the result file for one client inside `dir` and write the header.
    pub fn create(dir: &Path, client_id: &str, record_failures: bool) -> Result<Self> {
        let path = dir.join(result_filename(client_id));
        let file = File::create(&path)
            .map_err(|e| AppError::io(format!("cannot create {}: {}", path.display(), e)))?;
        let mut writer = BufWriter::new(file);

        if record_failures {
            writeln!(writer, "size,iteration,rtt_us,status")?;
        } else {
            writeln!(writer, "size,iteration,rtt_us")?;
        }
        writer.flush()?;

        Ok(Self {
            path,
            writer,
            record_failures,
            rows_written: 0,
        })
    }

    /// Path of the result file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of data rows written so far (header excluded).
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

impl SampleSink for CsvWriter {
    fn record(&mut self, sample: &Sample) -> Result<()> {
        if !sample.outcome.is_ok() && !self.record_failures {
            return Ok(());
        }
        if self.record_failures {
            writeln!(
                self.writer,
                "{},{},{:.3},{}",
                sample.size,
                sample.iteration,
                sample.rtt_us(),
                sample.outcome.as_str()
            )?;
        } else {
            writeln!(
                self.writer,
                "{},{},{:.3}",
                sample.size,
                sample.iteration,
                sample.rtt_us()
            )?;
        }
        self.writer.flush()?;
        self.rows_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Collision-free result filename: local timestamp down to microseconds plus
/// a short uuid suffix, so concurrently started clients never clash.
fn result_filename(client_id: &str) -> String {
    let now = Local::now();
    let unique = Uuid::new_v4().simple().to_string();
    format!(
        "rtt_{}_{}_{:06}_{}.csv",
        client_id,
        now.format("%Y%m%d_%H%M%S"),
        now.timestamp_subsec_micros(),
        &unique[..8]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Outcome;
    use std::time::Duration;
    use tempfile::TempDir;

    fn sample(size: usize, iteration: u32, outcome: Outcome) -> Sample {
        Sample {
            size,
            iteration,
            rtt: Duration::from_micros(1234),
            outcome,
        }
    }

    #[test]
    fn test_filename_shape() {
        let name = result_filename("client_001");
        assert!(name.starts_with("rtt_client_001_"));
        assert!(name.ends_with(".csv"));
    }

    #[test]
    fn test_filenames_unique_for_same_client() {
        assert_ne!(result_filename("c1"), result_filename("c1"));
    }

    #[test]
    fn test_ok_rows_only_by_default() {
        let dir = TempDir::new().unwrap();
        let mut writer = CsvWriter::create(dir.path(), "client_001", false).unwrap();

        writer.record(&sample(64, 1, Outcome::Ok)).unwrap();
        writer.record(&sample(64, 2, Outcome::Timeout)).unwrap();
        writer.record(&sample(64, 3, Outcome::PayloadMismatch)).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.rows_written(), 1);

        let content = std::fs::read_to_string(writer.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "size,iteration,rtt_us");
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("64,1,1234.000"));
    }

    #[test]
    fn test_failure_rows_with_status_column() {
        let dir = TempDir::new().unwrap();
        let mut writer = CsvWriter::create(dir.path(), "client_001", true).unwrap();

        writer.record(&sample(128, 1, Outcome::Ok)).unwrap();
        writer.record(&sample(128, 2, Outcome::Timeout)).unwrap();
        assert_eq!(writer.rows_written(), 2);

        let content = std::fs::read_to_string(writer.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "size,iteration,rtt_us,status");
        assert!(lines[1].ends_with(",ok"));
        assert!(lines[2].ends_with(",timeout"));
    }

    #[test]
    fn test_create_in_missing_dir_is_io_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let result = CsvWriter::create(&missing, "client_001", false);
        assert!(matches!(result, Err(crate::error::AppError::Io(_))));
    }
}
