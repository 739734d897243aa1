use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::vehicles::types::Vehicle;
use evcat_common::schema::{self, TABLE};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetVehicleQuery {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum GetVehicleError {
    #[error("Invalid id")]
    InvalidId,
    #[error("Not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl GetVehicleQuery {
    pub fn validate(&self) -> Result<(), GetVehicleError> {
        if self.id < 1 {
            return Err(GetVehicleError::InvalidId);
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetVehicleQuery) -> Result<Vehicle, GetVehicleError> {
    query.validate()?;

    let sql = format!(
        "SELECT {} FROM {} WHERE \"id\" = $1",
        schema::select_list(),
        TABLE
    );

    sqlx::query_as::<_, Vehicle>(&sql)
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(GetVehicleError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_accepts_positive_ids() {
        assert!(GetVehicleQuery { id: 1 }.validate().is_ok());
        assert!(GetVehicleQuery { id: 42 }.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_non_positive_ids() {
        assert!(matches!(
            GetVehicleQuery { id: 0 }.validate(),
            Err(GetVehicleError::InvalidId)
        ));
        assert!(matches!(
            GetVehicleQuery { id: -3 }.validate(),
            Err(GetVehicleError::InvalidId)
        ));
    }
}
