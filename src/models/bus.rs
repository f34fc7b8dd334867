//! Modelo de BusDetails
//!
//! Perfil/billetera del operador de bus. Las filas las crea el servicio de
//! cuentas (colaborador externo); este core las lee y acredita ganancias.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BusDetails {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bus_name: String,
    pub reg_number: String,
    pub bus_type: String,
    pub upi_id: Option<String>,
    pub total_earnings: Decimal,
    pub is_booking_open: bool,
    pub created_at: DateTime<Utc>,
}
