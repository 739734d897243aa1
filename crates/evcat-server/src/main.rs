//! EVCat Server - Main entry point

use anyhow::Result;
use evcat_common::logging::{init_logging, LogConfig};
use evcat_server::{api, config::Config};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with configuration from environment
    let log_config = LogConfig::builder()
        .log_file_prefix("evcat-server".to_string())
        .filter_directives("evcat_server=debug,tower_http=debug,axum=trace,sqlx=info".to_string())
        .build();

    // Merge with environment variables (they take precedence)
    let log_config = LogConfig::from_env_with(&log_config).unwrap_or(log_config);

    init_logging(&log_config)?;

    info!("Starting EVCat Server");

    // Load configuration
    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    api::serve(config).await
}
