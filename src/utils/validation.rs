//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::NaiveTime;

use crate::utils::errors::AppError;

/// Estados válidos de una ruta
pub const ROUTE_STATUSES: [&str; 3] = ["active", "closed_today", "closed_permanently"];

/// Validar y convertir string a tiempo (acepta HH:MM:SS y HH:MM)
pub fn validate_time(value: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| AppError::ValidationError(format!("Invalid time '{}', expected HH:MM", value)))
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::ValidationError(format!("{} is required", field)));
    }
    Ok(())
}

/// Validar que el estado de ruta sea uno de los permitidos
pub fn validate_route_status(value: &str) -> Result<(), AppError> {
    if ROUTE_STATUSES.contains(&value) {
        Ok(())
    } else {
        Err(AppError::ValidationError(format!(
            "Invalid status '{}', expected one of: {}",
            value,
            ROUTE_STATUSES.join(", ")
        )))
    }
}

/// Escapar comodines de LIKE/ILIKE para búsquedas por subcadena
pub fn escape_like(value: &str) -> String {
    value.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_time_formats() {
        assert_eq!(validate_time("08:30").unwrap(), NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert_eq!(validate_time("08:30:15").unwrap(), NaiveTime::from_hms_opt(8, 30, 15).unwrap());
        assert!(validate_time("25:00").is_err());
        assert!(validate_time("mediodía").is_err());
    }

    #[test]
    fn test_validate_route_status() {
        assert!(validate_route_status("active").is_ok());
        assert!(validate_route_status("closed_today").is_ok());
        assert!(validate_route_status("closed_permanently").is_ok());
        assert!(validate_route_status("open").is_err());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100% Kochi_Road"), "100\\% Kochi\\_Road");
        assert_eq!(escape_like("plain"), "plain");
    }
}
