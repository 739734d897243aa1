//! Shared utilities for feature modules
//!
//! # Contents
//!
//! - **pagination**: Common pagination parameters and clamping rules

pub mod pagination;

// Re-export commonly used types
pub use pagination::PaginationParams;
