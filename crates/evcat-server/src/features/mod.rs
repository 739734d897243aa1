//! Feature modules implementing the EVCat API
//!
//! Feature slices follow the CQRS (Command Query Responsibility Segregation)
//! pattern: each feature is a vertical slice with its own commands, queries,
//! and routes.
//!
//! # Features
//!
//! - **vehicles**: The electric vehicle catalog (listing, item access, deletion)
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations
//! - `queries/` - Read operations
//! - `routes.rs` - HTTP route definitions
//! - `types.rs` - Shared types (if needed)

pub mod shared;
pub mod vehicles;

use axum::Router;
use sqlx::PgPool;

/// Creates the main API router with all feature routes mounted
///
/// Each feature is mounted under its own path prefix:
/// - `/vehicles` - Vehicle catalog operations
pub fn router(pool: PgPool) -> Router<()> {
    Router::new().nest("/vehicles", vehicles::vehicles_routes().with_state(pool))
}
