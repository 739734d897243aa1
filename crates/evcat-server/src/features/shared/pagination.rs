//! Shared pagination utilities
//!
//! Provides the page/pageSize request parameters used by list queries.
//! Out-of-range values are clamped rather than rejected, so a listing
//! request never fails on pagination alone.

use serde::{Deserialize, Serialize};

/// Items per page when the client sends none.
pub const DEFAULT_PAGE_SIZE: i64 = 25;

/// Upper bound on items per page; larger requests are clamped to this.
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Common pagination request parameters
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PaginationParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    /// Items per page. Defaults to 25, clamped to 1-1000.
    #[serde(rename = "pageSize", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
}

impl PaginationParams {
    /// Create new pagination parameters
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self { page, page_size }
    }

    /// Get the page number (1-indexed); zero and negative values floor to 1
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Get items per page, defaulting to 25 and clamped to 1-1000
    pub fn page_size(&self) -> i64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Calculate the offset for SQL OFFSET clause
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.page_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_params_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), 25);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_pagination_params_custom() {
        let params = PaginationParams::new(Some(3), Some(50));
        assert_eq!(params.page(), 3);
        assert_eq!(params.page_size(), 50);
        assert_eq!(params.offset(), 100);
    }

    #[test]
    fn test_page_floors_at_one() {
        assert_eq!(PaginationParams::new(Some(0), None).page(), 1);
        assert_eq!(PaginationParams::new(Some(-7), None).page(), 1);
    }

    #[test]
    fn test_page_size_clamps_silently() {
        assert_eq!(PaginationParams::new(None, Some(2000)).page_size(), 1000);
        assert_eq!(PaginationParams::new(None, Some(0)).page_size(), 1);
        assert_eq!(PaginationParams::new(None, Some(-1)).page_size(), 1);
        assert_eq!(PaginationParams::new(None, Some(1000)).page_size(), 1000);
    }
}
