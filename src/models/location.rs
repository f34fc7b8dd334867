//! Modelo de Location
//!
//! Waypoints con nombre, deduplicados por nombre. Las rutas, paradas y
//! plantillas referencian estas filas; nunca se borran mientras estén
//! referenciadas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Location principal - mapea a la tabla locations
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Datos entrantes para crear o enriquecer una Location
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationInput {
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub district: Option<String>,
    pub state: Option<String>,
}

impl LocationInput {
    pub fn from_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// true si trae algún dato de geolocalización para fusionar
    pub fn has_geodata(&self) -> bool {
        self.latitude.is_some()
            || self.longitude.is_some()
            || self.district.is_some()
            || self.state.is_some()
    }
}

/// Fusión determinista: el campo entrante no-nulo reemplaza al existente,
/// de lo contrario se conserva el valor guardado. Devuelve true si algo cambió.
pub fn merge_location(existing: &mut Location, incoming: &LocationInput) -> bool {
    let mut changed = false;

    if let Some(lat) = incoming.latitude {
        if existing.latitude != Some(lat) {
            existing.latitude = Some(lat);
            changed = true;
        }
    }
    if let Some(lng) = incoming.longitude {
        if existing.longitude != Some(lng) {
            existing.longitude = Some(lng);
            changed = true;
        }
    }
    if let Some(district) = &incoming.district {
        if existing.district.as_deref() != Some(district.as_str()) {
            existing.district = Some(district.clone());
            changed = true;
        }
    }
    if let Some(state) = &incoming.state {
        if existing.state.as_deref() != Some(state.as_str()) {
            existing.state = Some(state.clone());
            changed = true;
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(name: &str) -> Location {
        Location {
            id: Uuid::new_v4(),
            name: name.to_string(),
            latitude: Some(9.93),
            longitude: Some(76.26),
            district: Some("Ernakulam".to_string()),
            state: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_merge_takes_incoming_non_null() {
        let mut existing = location("Kochi");
        let incoming = LocationInput {
            name: "Kochi".to_string(),
            latitude: Some(9.97),
            longitude: None,
            district: None,
            state: Some("Kerala".to_string()),
        };

        assert!(merge_location(&mut existing, &incoming));
        assert_eq!(existing.latitude, Some(9.97));
        assert_eq!(existing.longitude, Some(76.26));
        assert_eq!(existing.district.as_deref(), Some("Ernakulam"));
        assert_eq!(existing.state.as_deref(), Some("Kerala"));
    }

    #[test]
    fn test_merge_without_changes_reports_false() {
        let mut existing = location("Kochi");
        let incoming = LocationInput::from_name("Kochi");

        assert!(!merge_location(&mut existing, &incoming));
        assert_eq!(existing.latitude, Some(9.93));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut existing = location("Kochi");
        let incoming = LocationInput {
            name: "Kochi".to_string(),
            latitude: Some(10.0),
            longitude: Some(76.0),
            district: Some("Thrissur".to_string()),
            state: Some("Kerala".to_string()),
        };

        assert!(merge_location(&mut existing, &incoming));
        // Segunda aplicación con los mismos datos no cambia nada
        assert!(!merge_location(&mut existing, &incoming));
    }
}
