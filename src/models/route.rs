//! Modelo de Route
//!
//! Este módulo contiene los structs Route, RouteStop, Trip y las plantillas
//! de paradas aprendidas. Mapean exactamente al schema PostgreSQL.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Route principal - una ruta publicada por un operador (bus)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Route {
    pub id: Uuid,
    pub bus_id: Uuid,
    pub start_location: String,
    pub end_location: String,
    pub via: Option<String>,
    pub status: String,
    pub status_changed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Parada intermedia de una ruta publicada, en orden de viaje.
/// Los extremos de la ruta NO se representan como paradas.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RouteStop {
    pub id: Uuid,
    pub route_id: Uuid,
    pub location_id: Uuid,
    pub stop_number: i32,
}

/// Horario programado de salida/llegada; una ruta puede tener varios
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: Uuid,
    pub route_id: Uuid,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
}

/// Secuencia canónica de paradas aprendida entre dos extremos para un via
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RouteTemplate {
    pub id: Uuid,
    pub start_location_id: Uuid,
    pub end_location_id: Uuid,
    pub via: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Parada de una plantilla, reutilizable por muchas rutas
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TemplateStop {
    pub id: Uuid,
    pub template_id: Uuid,
    pub location_id: Uuid,
    pub stop_number: i32,
}

/// Marcador de ruta favorita de un usuario
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FavoriteRoute {
    pub id: Uuid,
    pub user_id: Uuid,
    pub route_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Regla de reinicio al cambiar de día: closed_today vuelve a active
/// cuando la fecha local del cambio de estado quedó atrás.
pub fn rollover_due(status: &str, changed_on: NaiveDate, today: NaiveDate) -> bool {
    status == "closed_today" && changed_on < today
}

impl Route {
    /// Fecha local (calendario) en que cambió el estado por última vez
    pub fn status_changed_local_date(&self) -> NaiveDate {
        self.status_changed_at.with_timezone(&Local).date_naive()
    }

    /// true si al leer esta ruta corresponde revertir closed_today a active
    pub fn needs_status_rollover(&self) -> bool {
        rollover_due(
            &self.status,
            self.status_changed_local_date(),
            Local::now().date_naive(),
        )
    }

    /// Estado mostrado después de aplicar la regla de reinicio diario.
    /// La persistencia de la reversión la hace el repositorio.
    pub fn effective_status(&self) -> &str {
        if self.needs_status_rollover() {
            "active"
        } else {
            &self.status
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rollover_due_only_after_day_boundary() {
        // Cerrada ayer -> hoy vuelve a activa
        assert!(rollover_due("closed_today", date(2025, 3, 1), date(2025, 3, 2)));
        // Cerrada hoy -> sigue cerrada
        assert!(!rollover_due("closed_today", date(2025, 3, 2), date(2025, 3, 2)));
    }

    #[test]
    fn test_rollover_ignores_other_statuses() {
        assert!(!rollover_due("active", date(2025, 3, 1), date(2025, 3, 2)));
        assert!(!rollover_due("closed_permanently", date(2025, 3, 1), date(2025, 3, 2)));
    }
}
