//! Result rows and the sinks that persist them
//!
//! Wire format: one row per case, six tab-separated fields, no header:
//!
//! ```text
//! keyTypeLabel  workloadLabel  implementationName  datasetSize  elapsedNanoseconds  memoryDeltaBytes
//! ```
//!
//! Every row is flushed as soon as it is written so that a crash mid-run
//! loses at most the case that was executing.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;
use shootout_core::{Error, Result};

/// Outcome of one benchmark case. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchmarkResult {
    /// Key type label (`largeString`, `smallString`, `int64`)
    pub key_label: String,
    /// Workload label
    pub workload_label: String,
    /// Container implementation name
    pub implementation: String,
    /// Number of keys in the population key set
    pub dataset_size: usize,
    /// Wall time of the measured operation
    pub elapsed_nanos: u64,
    /// Heap usage after minus heap usage before; may be negative
    pub memory_delta_bytes: i64,
}

/// Destination for result rows
pub trait ResultSink {
    /// Write one row and make it durable before returning.
    fn emit(&mut self, result: &BenchmarkResult) -> Result<()>;
}

/// Tab-separated sink over any writer
pub struct TsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> TsvSink<W> {
    /// Wrap `inner`; rows are written without a header.
    pub fn new(inner: W) -> Self {
        let writer = WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(inner);
        Self { writer }
    }

    /// Flush and return the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| Error::Sink(e.to_string()))
    }
}

impl TsvSink<File> {
    /// Create (or truncate) `path` and write rows to it.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> ResultSink for TsvSink<W> {
    fn emit(&mut self, result: &BenchmarkResult) -> Result<()> {
        self.writer
            .serialize(result)
            .map_err(|e| Error::Sink(e.to_string()))?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Sink that keeps rows in memory
#[derive(Debug, Default)]
pub struct VecSink {
    /// Rows in emission order
    pub rows: Vec<BenchmarkResult>,
}

impl VecSink {
    /// An empty sink
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultSink for VecSink {
    fn emit(&mut self, result: &BenchmarkResult) -> Result<()> {
        self.rows.push(result.clone());
        Ok(())
    }
}
