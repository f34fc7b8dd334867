use sqlx::PgPool;
use uuid::Uuid;

use crate::models::bus::BusDetails;
use crate::utils::errors::AppError;

pub struct BusRepository {
    pool: PgPool,
}

impl BusRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Perfil de bus del usuario (1:1); None si no es operador
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<BusDetails>, AppError> {
        sqlx::query_as::<_, BusDetails>("SELECT * FROM bus_details WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error finding bus details: {}", e)))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<BusDetails>, AppError> {
        sqlx::query_as::<_, BusDetails>("SELECT * FROM bus_details WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error finding bus details: {}", e)))
    }
}
