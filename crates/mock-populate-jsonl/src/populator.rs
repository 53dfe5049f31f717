//! JSONL populator for mock records.

use crate::error::JsonlPopulatorError;
use mock_core::{FieldSpec, Provider};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default buffer size for JSONL writing.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Metrics from a populate operation.
#[derive(Debug, Clone, Default)]
pub struct PopulateMetrics {
    /// Number of rows written.
    pub rows_written: u64,
    /// Total time taken.
    pub total_duration: Duration,
    /// Time spent generating data.
    pub generation_duration: Duration,
    /// Time spent writing data.
    pub write_duration: Duration,
    /// Bytes written by this operation.
    pub bytes_written: u64,
}

impl PopulateMetrics {
    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.rows_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Calculate bytes per second.
    pub fn bytes_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.bytes_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Writes records produced by a field tree, one JSON document per line.
#[derive(Debug)]
pub struct JsonlPopulator {
    models: FieldSpec,
    provider: Provider,
}

impl JsonlPopulator {
    /// Create a new JSONL populator.
    ///
    /// # Arguments
    ///
    /// * `models` - Field tree each record is mocked from
    /// * `provider` - Random source; seed it for reproducible files
    pub fn new(models: FieldSpec, provider: Provider) -> Self {
        Self { models, provider }
    }

    pub fn models(&self) -> &FieldSpec {
        &self.models
    }

    /// Hand the field tree and provider back, with temporal clocks where the
    /// last record left them.
    pub fn into_parts(self) -> (FieldSpec, Provider) {
        (self.models, self.provider)
    }

    /// Generate a JSONL file with the specified number of rows, replacing any
    /// existing content.
    pub fn populate<P: AsRef<Path>>(
        &mut self,
        output_path: P,
        count: u64,
    ) -> Result<PopulateMetrics, JsonlPopulatorError> {
        let output_path = output_path.as_ref();
        info!(
            "Generating JSONL file '{}' with {} rows",
            output_path.display(),
            count
        );

        let file = File::create(output_path)?;
        let metrics = self.write_to(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file), count)?;

        info!(
            "JSONL generation complete: {} rows, {} bytes in {:?} ({:.2} rows/sec)",
            metrics.rows_written,
            metrics.bytes_written,
            metrics.total_duration,
            metrics.rows_per_second()
        );
        Ok(metrics)
    }

    /// Append rows to an existing JSONL file, creating it if needed.
    ///
    /// Temporal fields continue from where the previous call left their clocks.
    pub fn populate_append<P: AsRef<Path>>(
        &mut self,
        output_path: P,
        count: u64,
    ) -> Result<PopulateMetrics, JsonlPopulatorError> {
        let output_path = output_path.as_ref();
        info!(
            "Appending {} rows to JSONL file '{}'",
            count,
            output_path.display()
        );

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(output_path)?;
        let metrics = self.write_to(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file), count)?;

        info!(
            "JSONL append complete: {} rows, {} bytes in {:?} ({:.2} rows/sec)",
            metrics.rows_written,
            metrics.bytes_written,
            metrics.total_duration,
            metrics.rows_per_second()
        );
        Ok(metrics)
    }

    /// Write `count` rows to any writer and flush it.
    pub fn write_to<W: Write>(
        &mut self,
        mut writer: W,
        count: u64,
    ) -> Result<PopulateMetrics, JsonlPopulatorError> {
        let start_time = Instant::now();
        let mut metrics = PopulateMetrics::default();
        let mut line = Vec::new();

        for _ in 0..count {
            let gen_start = Instant::now();
            let record = self.models.mock(&mut self.provider)?;
            metrics.generation_duration += gen_start.elapsed();

            let write_start = Instant::now();
            line.clear();
            serde_json::to_writer(&mut line, &record)?;
            line.push(b'\n');
            writer.write_all(&line)?;
            metrics.write_duration += write_start.elapsed();

            metrics.rows_written += 1;
            metrics.bytes_written += line.len() as u64;

            if metrics.rows_written % 10000 == 0 {
                debug!("Written {} rows", metrics.rows_written);
            }
        }

        writer.flush()?;
        metrics.total_duration = start_time.elapsed();
        Ok(metrics)
    }
}
