//! EVCat Server Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! HTTP server for browsing the electric vehicle catalog.
//!
//! # Overview
//!
//! The server exposes a small REST API over a single PostgreSQL table:
//!
//! - **Listing**: paginated, filtered, sorted vehicle listing
//! - **Item access**: fetch and delete single vehicles by id
//! - **Dynamic filtering**: a safe, allow-listed filter-to-SQL builder
//! - **Configuration**: environment-based configuration management
//! - **Middleware**: CORS, request tracing, and response compression
//!
//! # Architecture
//!
//! Features follow a CQRS layout: read operations live under `queries/`,
//! write operations under `commands/`, each as a self-contained handler
//! with its own request, response, and error types. Route modules adapt
//! those handlers to HTTP.
//!
//! The only non-trivial machinery is [`db::filter`], which turns
//! user-supplied filter descriptions into parameterized SQL. Column names
//! are resolved against a fixed allow-list and values always travel as
//! bind parameters.
//!
//! # Example
//!
//! ```no_run
//! use evcat_server::{api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     api::serve(config).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod features;
pub mod middleware;
