//! EVCat Import Library
//!
//! CSV ingestion for the EVCat catalog:
//!
//! - [`mapper`]: normalization of raw string-keyed rows into typed records
//! - [`loader`]: batched, dedup-aware loading into PostgreSQL
//! - [`pipeline`]: the streaming pipeline tying the two together
//!
//! # Example
//!
//! ```no_run
//! use evcat_import::{BulkLoader, ImportPipeline};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = sqlx::PgPool::connect(&std::env::var("DATABASE_URL")?).await?;
//!     let pipeline = ImportPipeline::new(BulkLoader::new(pool));
//!     let stats = pipeline.run(Path::new("./data/electric_cars.csv")).await?;
//!     println!("{} rows inserted", stats.inserted);
//!     Ok(())
//! }
//! ```

pub mod loader;
pub mod mapper;
pub mod pipeline;

// Re-export main types
pub use loader::{ensure_table, BatchStats, BulkLoader, NaturalKey, VehicleSink};
pub use mapper::{map_row, NewVehicle};
pub use pipeline::{ImportPipeline, ImportStats, DEFAULT_BATCH_SIZE};

use std::path::PathBuf;

/// Result type for import operations
pub type Result<T> = std::result::Result<T, ImportError>;

/// Error types for CSV ingestion
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("CSV source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("CSV read error: {0}")]
    Csv(#[from] csv_async::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
