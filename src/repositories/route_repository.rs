use chrono::{NaiveTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::models::location::LocationInput;
use crate::models::route::{Route, Trip};
use crate::repositories::location_repository::LocationRepository;
use crate::repositories::template_repository::TemplateRepository;
use crate::services::stop_resolution_service::{
    copy_stops_forward, copy_stops_reversed, resolve_template_match, PlannedStop, TemplateMatch,
};
use crate::utils::errors::AppError;
use crate::utils::validation::escape_like;

/// Ruta junto con los datos del bus dueño que la serialización necesita
#[derive(Debug, sqlx::FromRow)]
pub struct RouteWithBus {
    #[sqlx(flatten)]
    pub route: Route,
    pub bus_name: String,
    pub is_booking_open: bool,
}

/// Datos ya validados para publicar una ruta
#[derive(Debug)]
pub struct PublishRoute {
    pub bus_id: Uuid,
    pub start: LocationInput,
    pub end: LocationInput,
    pub via: Option<String>,
    pub trips: Vec<(NaiveTime, NaiveTime)>,
    pub explicit_stops: Vec<LocationInput>,
}

pub struct RouteRepository {
    pool: PgPool,
}

impl RouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Publica una ruta como unidad atómica: Route + Trips + RouteStops +
    /// mutación de plantillas se confirman juntos o no se confirma nada.
    /// La resolución de paradas corre dentro de la misma transacción, así
    /// un lector concurrente nunca ve una ruta con horarios pero sin
    /// paradas resueltas.
    pub async fn publish(&self, data: PublishRoute) -> Result<Route, AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error starting transaction: {}", e)))?;

        info!(
            "Creando ruta: {} -> {} (via: {:?})",
            data.start.name, data.end.name, data.via
        );

        // Asegurar que los extremos existen como Location (para la búsqueda)
        let start_loc = LocationRepository::get_or_create(&mut tx, &data.start).await?;
        let end_loc = LocationRepository::get_or_create(&mut tx, &data.end).await?;

        let route = sqlx::query_as::<_, Route>(
            r#"
            INSERT INTO routes (id, bus_id, start_location, end_location, via, status, status_changed_at, created_at)
            VALUES ($1, $2, $3, $4, $5, 'active', $6, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.bus_id)
        .bind(&data.start.name)
        .bind(&data.end.name)
        .bind(&data.via)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error creating route: {}", e)))?;

        for (start_time, end_time) in &data.trips {
            sqlx::query("INSERT INTO trips (id, route_id, start_time, end_time) VALUES ($1, $2, $3, $4)")
                .bind(Uuid::new_v4())
                .bind(route.id)
                .bind(start_time)
                .bind(end_time)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::DatabaseError(format!("Error creating trip: {}", e)))?;
        }

        // Resolución de paradas: directa -> inversa -> aprender.
        // Solo se consulta la inversa cuando la directa no existe.
        let via = data.via.as_deref();
        let direct =
            TemplateRepository::find_matching(&mut tx, &data.start.name, &data.end.name, via).await?;
        let reverse = if direct.is_some() {
            None
        } else {
            TemplateRepository::find_matching(&mut tx, &data.end.name, &data.start.name, via).await?
        };

        match resolve_template_match(direct, reverse) {
            TemplateMatch::Direct(template) => {
                info!("Plantilla directa {} encontrada, copiando paradas", template.id);
                let stops = TemplateRepository::stops_ordered(&mut tx, template.id).await?;
                Self::insert_route_stops(&mut tx, route.id, &copy_stops_forward(&stops)).await?;
            }
            TemplateMatch::Reverse(template) => {
                info!(
                    "Plantilla inversa {} encontrada, copiando paradas invertidas",
                    template.id
                );
                let stops = TemplateRepository::stops_ordered(&mut tx, template.id).await?;
                Self::insert_route_stops(&mut tx, route.id, &copy_stops_reversed(&stops)).await?;
            }
            TemplateMatch::Learn => {
                info!(
                    "Sin plantilla en ninguna dirección, aprendiendo camino nuevo: {} -> {}",
                    data.start.name, data.end.name
                );
                let template =
                    TemplateRepository::create(&mut tx, start_loc.id, end_loc.id, via).await?;

                for (index, stop_input) in data.explicit_stops.iter().enumerate() {
                    let stop_number = index as i32 + 1;
                    let location = LocationRepository::get_or_create(&mut tx, stop_input).await?;

                    sqlx::query(
                        "INSERT INTO route_stops (id, route_id, location_id, stop_number) VALUES ($1, $2, $3, $4)",
                    )
                    .bind(Uuid::new_v4())
                    .bind(route.id)
                    .bind(location.id)
                    .bind(stop_number)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| AppError::DatabaseError(format!("Error creating route stop: {}", e)))?;

                    TemplateRepository::add_stop(&mut tx, template.id, location.id, stop_number)
                        .await?;
                }

                info!(
                    "Plantilla {} creada con {} paradas",
                    template.id,
                    data.explicit_stops.len()
                );
            }
        }

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error committing route: {}", e)))?;

        Ok(route)
    }

    async fn insert_route_stops(
        conn: &mut PgConnection,
        route_id: Uuid,
        planned: &[PlannedStop],
    ) -> Result<(), AppError> {
        for stop in planned {
            sqlx::query(
                "INSERT INTO route_stops (id, route_id, location_id, stop_number) VALUES ($1, $2, $3, $4)",
            )
            .bind(Uuid::new_v4())
            .bind(route_id)
            .bind(stop.location_id)
            .bind(stop.stop_number)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error creating route stop: {}", e)))?;
        }
        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Route>, AppError> {
        sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error finding route: {}", e)))
    }

    pub async fn find_by_bus(&self, bus_id: Uuid) -> Result<Vec<RouteWithBus>, AppError> {
        sqlx::query_as::<_, RouteWithBus>(
            r#"
            SELECT r.id, r.bus_id, r.start_location, r.end_location, r.via, r.status,
                   r.status_changed_at, r.created_at, b.bus_name, b.is_booking_open
            FROM routes r
            JOIN bus_details b ON b.id = r.bus_id
            WHERE r.bus_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(bus_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error listing routes: {}", e)))
    }

    /// Rutas candidatas: el origen coincide con el inicio o con alguna
    /// parada, y el destino con el final o con alguna parada (intersección
    /// de ambos conjuntos, cada ruta una sola vez). El chequeo de orden se
    /// hace después en memoria. Orden estable para resultados deterministas.
    pub async fn search_candidates(
        &self,
        from_query: &str,
        to_query: &str,
    ) -> Result<Vec<RouteWithBus>, AppError> {
        let from_pattern = format!("%{}%", escape_like(from_query));
        let to_pattern = format!("%{}%", escape_like(to_query));

        sqlx::query_as::<_, RouteWithBus>(
            r#"
            SELECT r.id, r.bus_id, r.start_location, r.end_location, r.via, r.status,
                   r.status_changed_at, r.created_at, b.bus_name, b.is_booking_open
            FROM routes r
            JOIN bus_details b ON b.id = r.bus_id
            WHERE r.id IN (
                SELECT r2.id
                FROM routes r2
                LEFT JOIN route_stops rs ON rs.route_id = r2.id
                LEFT JOIN locations l ON l.id = rs.location_id
                WHERE r2.start_location ILIKE $1 OR l.name ILIKE $1
            )
            AND r.id IN (
                SELECT r3.id
                FROM routes r3
                LEFT JOIN route_stops rs2 ON rs2.route_id = r3.id
                LEFT JOIN locations l2 ON l2.id = rs2.location_id
                WHERE r3.end_location ILIKE $2 OR l2.name ILIKE $2
            )
            ORDER BY r.created_at, r.id
            "#,
        )
        .bind(from_pattern)
        .bind(to_pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error searching routes: {}", e)))
    }

    /// Paradas de una ruta como (stop_number, nombre), en orden de viaje
    pub async fn stops_with_names(&self, route_id: Uuid) -> Result<Vec<(i32, String)>, AppError> {
        sqlx::query_as(
            r#"
            SELECT rs.stop_number, l.name
            FROM route_stops rs
            JOIN locations l ON l.id = rs.location_id
            WHERE rs.route_id = $1
            ORDER BY rs.stop_number
            "#,
        )
        .bind(route_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error fetching route stops: {}", e)))
    }

    pub async fn trips_for(&self, route_id: Uuid) -> Result<Vec<Trip>, AppError> {
        sqlx::query_as::<_, Trip>(
            "SELECT * FROM trips WHERE route_id = $1 ORDER BY start_time",
        )
        .bind(route_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error fetching trips: {}", e)))
    }

    /// Borra una ruta del operador; el cascade elimina paradas y horarios
    pub async fn delete_owned(&self, route_id: Uuid, bus_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM routes WHERE id = $1 AND bus_id = $2")
            .bind(route_id)
            .bind(bus_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error deleting route: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn update_status(
        &self,
        route_id: Uuid,
        bus_id: Uuid,
        status: &str,
    ) -> Result<Option<Route>, AppError> {
        sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes
            SET status = $3, status_changed_at = $4
            WHERE id = $1 AND bus_id = $2
            RETURNING *
            "#,
        )
        .bind(route_id)
        .bind(bus_id)
        .bind(status)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error updating route status: {}", e)))
    }

    /// Persiste la reversión closed_today -> active al leer pasada la fecha.
    /// Condicionada al estado actual para que una segunda lectura el mismo
    /// día no escriba de nuevo.
    pub async fn persist_status_rollover(&self, route_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE routes SET status = 'active', status_changed_at = $2 WHERE id = $1 AND status = 'closed_today'",
        )
        .bind(route_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error resetting route status: {}", e)))?;

        Ok(())
    }
}
