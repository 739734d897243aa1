//! EVCat Import - CSV catalog importer

use anyhow::{Context, Result};
use clap::Parser;
use evcat_common::logging::{init_logging, LogConfig, LogLevel};
use evcat_import::{ensure_table, BulkLoader, ImportPipeline, DEFAULT_BATCH_SIZE};
use sqlx::postgres::PgPoolOptions;
use std::path::PathBuf;
use tracing::info;

const DEFAULT_CSV_PATH: &str = "./data/electric_cars.csv";

#[derive(Parser, Debug)]
#[command(name = "evcat-import")]
#[command(author, version, about = "Import the electric vehicle CSV catalog into PostgreSQL")]
struct Cli {
    /// CSV file to import
    #[arg(short, long, env = "CSV_PATH", default_value = DEFAULT_CSV_PATH)]
    file: PathBuf,

    /// Rows per store round-trip
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("evcat-import".to_string())
        .build();

    // Merge with environment variables (they take precedence)
    let log_config = LogConfig::from_env_with(&log_config).unwrap_or(log_config);

    init_logging(&log_config)?;

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL environment variable must be set")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    ensure_table(&pool)
        .await
        .context("Failed to prepare the vehicles table")?;

    let pipeline = ImportPipeline::with_batch_size(BulkLoader::new(pool), cli.batch_size);
    let stats = pipeline.run(&cli.file).await?;

    info!(
        "Import complete: {} processed, {} inserted, {} skipped",
        stats.processed, stats.inserted, stats.skipped
    );

    Ok(())
}
