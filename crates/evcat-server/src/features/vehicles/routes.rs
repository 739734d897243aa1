//! Vehicle API routes
//!
//! Wires the catalog queries and commands to Axum HTTP handlers.
//!
//! # Route Structure
//!
//! - `GET /api/v1/vehicles` - List vehicles with search, filters, sort and pagination
//! - `GET /api/v1/vehicles/:id` - Get a single vehicle by id
//! - `DELETE /api/v1/vehicles/:id` - Delete a vehicle by id

use crate::api::response::ErrorResponse;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use sqlx::PgPool;

use super::{
    commands::{DeleteVehicleCommand, DeleteVehicleError},
    queries::{GetVehicleError, GetVehicleQuery, ListVehiclesError, ListVehiclesQuery},
};

// ============================================================================
// Router Configuration
// ============================================================================

/// Creates the vehicles router with all routes configured
pub fn vehicles_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(list_vehicles))
        .route("/:id", get(get_vehicle))
        .route("/:id", delete(delete_vehicle))
}

/// Path ids must be positive integers; anything else is rejected before any
/// query runs, so `/vehicles/12abc` never reaches the database.
fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id >= 1)
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Delete a vehicle by id
///
/// # Endpoint
///
/// `DELETE /api/v1/vehicles/:id`
///
/// # Response
///
/// - `200 OK` - `{"success": true}`
/// - `400 Bad Request` - Id is not a positive integer
/// - `404 Not Found` - No vehicle with that id
/// - `500 Internal Server Error` - Database error
#[tracing::instrument(skip(pool), fields(id = %id))]
async fn delete_vehicle(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<Response, VehicleApiError> {
    let command = DeleteVehicleCommand {
        id: parse_id(&id).ok_or(DeleteVehicleError::InvalidId)?,
    };

    let response = super::commands::delete::handle(pool, command).await?;

    Ok((StatusCode::OK, Json(response)).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// Get a single vehicle by id
///
/// # Endpoint
///
/// `GET /api/v1/vehicles/:id`
///
/// # Response
///
/// - `200 OK` - The record, nulls included
/// - `400 Bad Request` - Id is not a positive integer
/// - `404 Not Found` - No vehicle with that id
/// - `500 Internal Server Error` - Database error
#[tracing::instrument(skip(pool), fields(id = %id))]
async fn get_vehicle(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<Response, VehicleApiError> {
    let query = GetVehicleQuery {
        id: parse_id(&id).ok_or(GetVehicleError::InvalidId)?,
    };

    let vehicle = super::queries::get::handle(pool, query).await?;

    Ok((StatusCode::OK, Json(vehicle)).into_response())
}

/// List vehicles with search, filters, sort and pagination
///
/// # Endpoint
///
/// `GET /api/v1/vehicles?page=1&pageSize=25&search=bmw&filters=[...]&sortField=Brand&sortOrder=asc`
///
/// # Query Parameters
///
/// - `page` - Page number (default: 1)
/// - `pageSize` - Items per page (default: 25, clamped to 1-1000)
/// - `search` - Case-insensitive match on Brand or Model
/// - `filters` - JSON array of `{column, op, value}` objects, combined with AND
/// - `sortField` - Any listed column (default: Brand)
/// - `sortOrder` - `desc` for descending, ascending otherwise
///
/// # Response
///
/// - `200 OK` - `{"data": [...], "total": n, "page": p, "pageSize": s}`
/// - `400 Bad Request` - Invalid filter column/operator/shape or sort field
/// - `500 Internal Server Error` - Database error
#[tracing::instrument(
    skip(pool, query),
    fields(page = ?query.page, page_size = ?query.page_size, search = ?query.search)
)]
async fn list_vehicles(
    State(pool): State<PgPool>,
    Query(query): Query<ListVehiclesQuery>,
) -> Result<Response, VehicleApiError> {
    let response = super::queries::list::handle(pool, query).await?;

    tracing::debug!(
        count = response.data.len(),
        total = response.total,
        "Vehicles listed via API"
    );

    Ok((StatusCode::OK, Json(response)).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Unified error type for vehicle API endpoints
#[derive(Debug)]
enum VehicleApiError {
    ListError(ListVehiclesError),
    GetError(GetVehicleError),
    DeleteError(DeleteVehicleError),
}

impl From<ListVehiclesError> for VehicleApiError {
    fn from(err: ListVehiclesError) -> Self {
        Self::ListError(err)
    }
}

impl From<GetVehicleError> for VehicleApiError {
    fn from(err: GetVehicleError) -> Self {
        Self::GetError(err)
    }
}

impl From<DeleteVehicleError> for VehicleApiError {
    fn from(err: DeleteVehicleError) -> Self {
        Self::DeleteError(err)
    }
}

impl IntoResponse for VehicleApiError {
    fn into_response(self) -> Response {
        match self {
            // List errors
            VehicleApiError::ListError(ListVehiclesError::InvalidFilter(_))
            | VehicleApiError::ListError(ListVehiclesError::InvalidSortField(_)) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            VehicleApiError::ListError(ListVehiclesError::Database(_)) => {
                tracing::error!("Database error during vehicle listing: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },

            // Get errors
            VehicleApiError::GetError(GetVehicleError::InvalidId) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            VehicleApiError::GetError(GetVehicleError::NotFound) => {
                let error = ErrorResponse::new("NOT_FOUND", self.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            VehicleApiError::GetError(GetVehicleError::Database(_)) => {
                tracing::error!("Database error during vehicle retrieval: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },

            // Delete errors
            VehicleApiError::DeleteError(DeleteVehicleError::InvalidId) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            VehicleApiError::DeleteError(DeleteVehicleError::NotFound) => {
                let error = ErrorResponse::new("NOT_FOUND", self.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            VehicleApiError::DeleteError(DeleteVehicleError::Database(_)) => {
                tracing::error!("Database error during vehicle deletion: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
        }
    }
}

impl std::fmt::Display for VehicleApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ListError(e) => write!(f, "{}", e),
            Self::GetError(e) => write!(f, "{}", e),
            Self::DeleteError(e) => write!(f, "{}", e),
        }
    }
}
