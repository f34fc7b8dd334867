use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::location::{merge_location, Location, LocationInput};
use crate::utils::errors::AppError;
use crate::utils::validation::escape_like;

pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Sugerencias de ubicaciones por subcadena, máximo 10
    pub async fn suggestions(&self, query: &str) -> Result<Vec<String>, AppError> {
        let pattern = format!("%{}%", escape_like(query));

        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM locations WHERE name ILIKE $1 ORDER BY name LIMIT 10",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error fetching suggestions: {}", e)))?;

        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// Get-or-create por nombre exacto, con fusión de geodatos entrantes.
    /// Corre dentro de la transacción del caller para que la publicación
    /// sea todo-o-nada.
    pub async fn get_or_create(
        conn: &mut PgConnection,
        input: &LocationInput,
    ) -> Result<Location, AppError> {
        let existing = sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE name = $1")
            .bind(&input.name)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error finding location: {}", e)))?;

        if let Some(mut location) = existing {
            if merge_location(&mut location, input) {
                sqlx::query(
                    "UPDATE locations SET latitude = $2, longitude = $3, district = $4, state = $5 WHERE id = $1",
                )
                .bind(location.id)
                .bind(location.latitude)
                .bind(location.longitude)
                .bind(&location.district)
                .bind(&location.state)
                .execute(&mut *conn)
                .await
                .map_err(|e| AppError::DatabaseError(format!("Error enriching location: {}", e)))?;
            }
            return Ok(location);
        }

        let location = sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (id, name, latitude, longitude, district, state, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(&input.district)
        .bind(&input.state)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error creating location: {}", e)))?;

        Ok(location)
    }
}
