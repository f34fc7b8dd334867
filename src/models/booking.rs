//! Modelo de Booking (ticket)
//!
//! Un ticket emitido tras verificar el pago. Inmutable salvo el flip
//! is_verified false -> true, que ocurre exactamente una vez.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub ticket_id: String,
    pub user_id: Option<Uuid>,
    pub bus_id: Uuid,
    pub route_id: Uuid,
    pub from_loc: String,
    pub to_loc: String,
    pub price: Decimal,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}
