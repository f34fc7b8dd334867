use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::repositories::route_repository::RouteWithBus;
use crate::utils::errors::AppError;

pub struct FavoriteRepository {
    pool: PgPool,
}

impl FavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Alterna el marcador (user, route). Devuelve true si quedó marcada.
    pub async fn toggle(&self, user_id: Uuid, route_id: Uuid) -> Result<bool, AppError> {
        let deleted = sqlx::query("DELETE FROM favorite_routes WHERE user_id = $1 AND route_id = $2")
            .bind(user_id)
            .bind(route_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error removing favorite: {}", e)))?;

        if deleted.rows_affected() > 0 {
            return Ok(false);
        }

        let inserted = sqlx::query(
            "INSERT INTO favorite_routes (id, user_id, route_id, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(route_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(_) => Ok(true),
            // Carrera entre dos toggles concurrentes: el par unique ya existe
            Err(e) if is_unique_violation(&e) => Ok(true),
            Err(e) => Err(AppError::DatabaseError(format!("Error adding favorite: {}", e))),
        }
    }

    /// Rutas marcadas como favoritas por el usuario
    pub async fn routes_for_user(&self, user_id: Uuid) -> Result<Vec<RouteWithBus>, AppError> {
        sqlx::query_as::<_, RouteWithBus>(
            r#"
            SELECT r.id, r.bus_id, r.start_location, r.end_location, r.via, r.status,
                   r.status_changed_at, r.created_at, b.bus_name, b.is_booking_open
            FROM favorite_routes f
            JOIN routes r ON r.id = f.route_id
            JOIN bus_details b ON b.id = r.bus_id
            WHERE f.user_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error listing favorites: {}", e)))
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}
