//! Result persistence and terminal reporting

pub mod csv;
pub mod summary;

pub use csv::CsvWriter;
pub use summary::{format_fleet_report, format_size_table};

use crate::error::Result;
use crate::models::Sample;

/// Destination for measurement-phase samples, fed one row at a time as the
/// sweep progresses. Warmup samples are never offered to a sink.
pub trait SampleSink: Send {
    /// Record one sample. The sink decides whether non-OK outcomes are
    /// persisted or skipped.
    fn record(&mut self, sample: &Sample) -> Result<()>;

    /// Flush any buffered rows to the underlying medium.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Sink that discards everything; used when CSV output is disabled.
#[derive(Debug, Default)]
pub struct NullSink;

impl SampleSink for NullSink {
    fn record(&mut self, _sample: &Sample) -> Result<()> {
        Ok(())
    }
}
