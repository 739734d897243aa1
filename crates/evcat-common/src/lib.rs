//! EVCat Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared building blocks for the EVCat workspace members:
//!
//! - **Schema**: catalog column names and kinds, plus the allow-list every
//!   dynamic column reference must resolve through
//! - **Logging**: tracing-based logging setup shared by the server and the
//!   importer

pub mod logging;
pub mod schema;

// Re-export commonly used types
pub use schema::{column, Column, ColumnKind};
