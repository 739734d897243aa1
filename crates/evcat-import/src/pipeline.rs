// Import Pipeline
//
// Streams a CSV file row by row, normalizes each row, and hands fixed-size
// batches to a [`VehicleSink`]. Reading is paced by loading: the next record
// is not pulled from the file until the previous batch has been stored, so
// memory stays bounded by the batch size regardless of file size.

use futures::StreamExt;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::loader::{BatchStats, VehicleSink};
use crate::mapper::{map_row, NewVehicle};
use crate::{ImportError, Result};

/// Rows per store round-trip unless overridden.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Totals for one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub processed: usize,
    pub inserted: usize,
    pub skipped: usize,
}

impl ImportStats {
    fn absorb(&mut self, outcome: BatchStats, rows: usize) {
        self.processed += rows;
        self.inserted += outcome.inserted;
        self.skipped += outcome.skipped;
    }
}

/// CSV-to-sink pump. Generic over the sink so tests run without a store.
pub struct ImportPipeline<S> {
    sink: S,
    batch_size: usize,
}

impl<S: VehicleSink> ImportPipeline<S> {
    pub fn new(sink: S) -> Self {
        Self::with_batch_size(sink, DEFAULT_BATCH_SIZE)
    }

    pub fn with_batch_size(sink: S, batch_size: usize) -> Self {
        Self {
            sink,
            batch_size: batch_size.max(1),
        }
    }

    /// Run a full import of `path`. Fails fast when the file is missing;
    /// any read or store error aborts the run.
    pub async fn run(&self, path: &Path) -> Result<ImportStats> {
        if tokio::fs::metadata(path).await.is_err() {
            return Err(ImportError::SourceNotFound(path.to_path_buf()));
        }

        info!("Starting CSV import from {}", path.display());

        let file = tokio::fs::File::open(path).await?;
        let mut reader = csv_async::AsyncReaderBuilder::new()
            .has_headers(true)
            .create_reader(file);
        let headers = reader.headers().await?.clone();

        let mut stats = ImportStats::default();
        let mut buffer: Vec<NewVehicle> = Vec::with_capacity(self.batch_size);

        let mut records = reader.records();
        while let Some(record) = records.next().await {
            let record = record?;

            let raw: HashMap<String, String> = headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| (header.to_string(), value.to_string()))
                .collect();
            buffer.push(map_row(&raw));

            // Awaiting the sink here pauses the CSV stream until the batch
            // is stored.
            if buffer.len() >= self.batch_size {
                let batch: Vec<NewVehicle> = buffer.drain(..self.batch_size).collect();
                let outcome = self.sink.load_batch(&batch).await?;
                stats.absorb(outcome, batch.len());
                info!("Processed {} rows so far", stats.processed);
            }
        }

        if !buffer.is_empty() {
            let outcome = self.sink.load_batch(&buffer).await?;
            stats.absorb(outcome, buffer.len());
        }

        info!(
            "Import finished: {} rows processed, {} inserted, {} skipped",
            stats.processed, stats.inserted, stats.skipped
        );

        Ok(stats)
    }
}
