use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::filter::{FilterError, VehicleFilter};
use crate::features::shared::pagination::PaginationParams;
use crate::features::vehicles::types::Vehicle;
use evcat_common::schema::{self, Column, TABLE};

/// Sort column when the client names none.
const DEFAULT_SORT_FIELD: &str = "Brand";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListVehiclesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(rename = "pageSize", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
    /// Case-insensitive containment over Brand or Model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// JSON-encoded array of `{column, op, value}` objects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,
    #[serde(rename = "sortField", skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    /// `desc` for descending; anything else sorts ascending.
    #[serde(rename = "sortOrder", skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListVehiclesResponse {
    pub data: Vec<Vehicle>,
    pub total: i64,
    pub page: i64,
    #[serde(rename = "pageSize")]
    pub page_size: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum ListVehiclesError {
    #[error(transparent)]
    InvalidFilter(#[from] FilterError),
    #[error("Invalid sort field: {0}")]
    InvalidSortField(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ListVehiclesQuery {
    fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.page_size)
    }

    /// Resolve the sort column through the allow-list. A missing or empty
    /// `sortField` falls back to the default; an unknown name is an error.
    fn sort_column(&self) -> Result<&'static Column, ListVehiclesError> {
        let name = match self.sort_field.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => DEFAULT_SORT_FIELD,
        };
        schema::column(name)
            .ok_or_else(|| ListVehiclesError::InvalidSortField(name.to_string()))
    }

    fn sort_direction(&self) -> &'static str {
        if self.sort_order.as_deref() == Some("desc") {
            "DESC"
        } else {
            "ASC"
        }
    }
}

/// Count matching rows, then fetch one page of them.
///
/// Both statements share the same predicate; only the page query carries
/// ORDER BY, LIMIT and OFFSET. `total` counts every match, not the page.
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListVehiclesQuery,
) -> Result<ListVehiclesResponse, ListVehiclesError> {
    let filter = VehicleFilter::parse(query.search.as_deref(), query.filters.as_deref())?;
    let sort = query.sort_column()?;
    let order = query.sort_direction();
    let pagination = query.pagination();

    let mut count_query: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT COUNT(*) FROM {TABLE}"));
    filter.apply(&mut count_query);
    let total: i64 = count_query.build_query_scalar().fetch_one(&pool).await?;

    let mut page_query: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM {}", schema::select_list(), TABLE));
    filter.apply(&mut page_query);
    page_query.push(format!(" ORDER BY {} {}", sort.quoted(), order));
    page_query.push(" LIMIT ");
    page_query.push_bind(pagination.page_size());
    page_query.push(" OFFSET ");
    page_query.push_bind(pagination.offset());

    let data = page_query
        .build_query_as::<Vehicle>()
        .fetch_all(&pool)
        .await?;

    Ok(ListVehiclesResponse {
        data,
        total,
        page: pagination.page(),
        page_size: pagination.page_size(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_defaults_to_brand_ascending() {
        let query = ListVehiclesQuery::default();
        assert_eq!(query.sort_column().unwrap().name, "Brand");
        assert_eq!(query.sort_direction(), "ASC");
    }

    #[test]
    fn test_empty_sort_field_falls_back_to_default() {
        let query = ListVehiclesQuery {
            sort_field: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(query.sort_column().unwrap().name, "Brand");
    }

    #[test]
    fn test_sort_direction_matches_desc_exactly() {
        let desc = ListVehiclesQuery {
            sort_order: Some("desc".to_string()),
            ..Default::default()
        };
        assert_eq!(desc.sort_direction(), "DESC");

        // Anything that is not exactly "desc" sorts ascending.
        for other in ["DESC", "Desc", "ascending", "descending"] {
            let query = ListVehiclesQuery {
                sort_order: Some(other.to_string()),
                ..Default::default()
            };
            assert_eq!(query.sort_direction(), "ASC");
        }
    }

    #[test]
    fn test_sort_field_goes_through_the_allow_list() {
        let query = ListVehiclesQuery {
            sort_field: Some("PriceEuro".to_string()),
            ..Default::default()
        };
        assert_eq!(query.sort_column().unwrap().name, "PriceEuro");

        let query = ListVehiclesQuery {
            sort_field: Some("Brand; DROP TABLE vehicles".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            query.sort_column(),
            Err(ListVehiclesError::InvalidSortField(name)) if name == "Brand; DROP TABLE vehicles"
        ));
    }

    #[test]
    fn test_pagination_is_clamped_not_rejected() {
        let query = ListVehiclesQuery {
            page: Some(0),
            page_size: Some(2000),
            ..Default::default()
        };
        let pagination = query.pagination();
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.page_size(), 1000);
    }

    #[test]
    fn test_query_params_use_wire_names() {
        let query: ListVehiclesQuery = serde_json::from_value(serde_json::json!({
            "page": 2,
            "pageSize": 50,
            "sortField": "Range_Km",
            "sortOrder": "desc"
        }))
        .unwrap();

        assert_eq!(query.page, Some(2));
        assert_eq!(query.page_size, Some(50));
        assert_eq!(query.sort_field.as_deref(), Some("Range_Km"));
        assert_eq!(query.sort_direction(), "DESC");
    }
}
