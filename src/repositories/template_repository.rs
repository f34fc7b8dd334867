use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::route::{RouteTemplate, TemplateStop};
use crate::utils::errors::AppError;

/// Fila de plantilla entre dos extremos, con su dirección relativa a la
/// consulta: is_forward=false significa que la plantilla está guardada en
/// el sentido opuesto al pedido.
#[derive(Debug, sqlx::FromRow)]
pub struct TemplateViaRow {
    pub id: Uuid,
    pub via: Option<String>,
    pub is_forward: bool,
}

pub struct TemplateRepository {
    pool: PgPool,
}

impl TemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Primera plantilla que coincide con (start, end, via), sin distinguir
    /// mayúsculas. No hay unicidad en la base: gana la más antigua.
    pub async fn find_matching(
        conn: &mut PgConnection,
        start: &str,
        end: &str,
        via: Option<&str>,
    ) -> Result<Option<RouteTemplate>, AppError> {
        sqlx::query_as::<_, RouteTemplate>(
            r#"
            SELECT t.id, t.start_location_id, t.end_location_id, t.via, t.created_at
            FROM route_templates t
            JOIN locations s ON s.id = t.start_location_id
            JOIN locations e ON e.id = t.end_location_id
            WHERE LOWER(s.name) = LOWER($1)
              AND LOWER(e.name) = LOWER($2)
              AND ((t.via IS NULL AND $3::text IS NULL) OR LOWER(t.via) = LOWER($3::text))
            ORDER BY t.created_at
            LIMIT 1
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(via)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error finding template: {}", e)))
    }

    /// Paradas de una plantilla en orden de viaje
    pub async fn stops_ordered(
        conn: &mut PgConnection,
        template_id: Uuid,
    ) -> Result<Vec<TemplateStop>, AppError> {
        sqlx::query_as::<_, TemplateStop>(
            "SELECT * FROM template_stops WHERE template_id = $1 ORDER BY stop_number",
        )
        .bind(template_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error fetching template stops: {}", e)))
    }

    /// Crear una plantilla nueva (camino recién aprendido)
    pub async fn create(
        conn: &mut PgConnection,
        start_location_id: Uuid,
        end_location_id: Uuid,
        via: Option<&str>,
    ) -> Result<RouteTemplate, AppError> {
        sqlx::query_as::<_, RouteTemplate>(
            r#"
            INSERT INTO route_templates (id, start_location_id, end_location_id, via, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(start_location_id)
        .bind(end_location_id)
        .bind(via)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error creating template: {}", e)))
    }

    pub async fn add_stop(
        conn: &mut PgConnection,
        template_id: Uuid,
        location_id: Uuid,
        stop_number: i32,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO template_stops (id, template_id, location_id, stop_number) VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(template_id)
        .bind(location_id)
        .bind(stop_number)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error creating template stop: {}", e)))?;

        Ok(())
    }

    /// Plantillas entre dos extremos en ambas direcciones, en una sola
    /// consulta, con la dirección de cada una respecto del pedido
    pub async fn vias_between(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<TemplateViaRow>, AppError> {
        sqlx::query_as::<_, TemplateViaRow>(
            r#"
            SELECT t.id, t.via, (LOWER(s.name) = LOWER($1)) AS is_forward
            FROM route_templates t
            JOIN locations s ON s.id = t.start_location_id
            JOIN locations e ON e.id = t.end_location_id
            WHERE (LOWER(s.name) = LOWER($1) AND LOWER(e.name) = LOWER($2))
               OR (LOWER(s.name) = LOWER($2) AND LOWER(e.name) = LOWER($1))
            ORDER BY t.created_at
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error fetching template vias: {}", e)))
    }

    /// Nombres de las paradas de una plantilla, en orden de viaje
    pub async fn stop_names(&self, template_id: Uuid) -> Result<Vec<String>, AppError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT l.name
            FROM template_stops ts
            JOIN locations l ON l.id = ts.location_id
            WHERE ts.template_id = $1
            ORDER BY ts.stop_number
            "#,
        )
        .bind(template_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error fetching template stop names: {}", e)))?;

        Ok(rows.into_iter().map(|r| r.0).collect())
    }
}
