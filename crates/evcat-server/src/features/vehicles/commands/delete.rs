use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use evcat_common::schema::TABLE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteVehicleCommand {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteVehicleResponse {
    pub success: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteVehicleError {
    #[error("Invalid id")]
    InvalidId,
    #[error("Not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl DeleteVehicleCommand {
    pub fn validate(&self) -> Result<(), DeleteVehicleError> {
        if self.id < 1 {
            return Err(DeleteVehicleError::InvalidId);
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    command: DeleteVehicleCommand,
) -> Result<DeleteVehicleResponse, DeleteVehicleError> {
    command.validate()?;

    let sql = format!("DELETE FROM {} WHERE \"id\" = $1", TABLE);

    let result = sqlx::query(&sql).bind(command.id).execute(&pool).await?;

    if result.rows_affected() == 0 {
        return Err(DeleteVehicleError::NotFound);
    }

    tracing::info!(id = command.id, "Vehicle deleted");

    Ok(DeleteVehicleResponse { success: true })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_accepts_positive_ids() {
        assert!(DeleteVehicleCommand { id: 7 }.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_non_positive_ids() {
        assert!(matches!(
            DeleteVehicleCommand { id: 0 }.validate(),
            Err(DeleteVehicleError::InvalidId)
        ));
        assert!(matches!(
            DeleteVehicleCommand { id: -1 }.validate(),
            Err(DeleteVehicleError::InvalidId)
        ));
    }
}
