use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::booking::Booking;
use crate::services::ticket_service::{generate_ticket_id, MAX_TICKET_ID_ATTEMPTS};
use crate::utils::errors::AppError;

/// Ticket junto con el nombre del bus para listados
#[derive(Debug, sqlx::FromRow)]
pub struct BookingWithBus {
    #[sqlx(flatten)]
    pub booking: Booking,
    pub bus_name: String,
}

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crea el ticket con un id único. El chequeo previo de existencia es
    /// solo una optimización: la guardia autoritativa contra carreras es la
    /// restricción unique de ticket_id, por eso un insert que choca con
    /// ella regenera y reintenta dentro del mismo límite de intentos.
    pub async fn create_with_unique_ticket(
        &self,
        user_id: Option<Uuid>,
        bus_id: Uuid,
        route_id: Uuid,
        from_loc: &str,
        to_loc: &str,
        price: Decimal,
    ) -> Result<Booking, AppError> {
        for _attempt in 0..MAX_TICKET_ID_ATTEMPTS {
            let ticket_id = generate_ticket_id(&mut rand::thread_rng());

            let exists: (bool,) =
                sqlx::query_as("SELECT EXISTS(SELECT 1 FROM bookings WHERE ticket_id = $1)")
                    .bind(&ticket_id)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| {
                        AppError::DatabaseError(format!("Error checking ticket id: {}", e))
                    })?;

            if exists.0 {
                continue;
            }

            let inserted = sqlx::query_as::<_, Booking>(
                r#"
                INSERT INTO bookings (id, ticket_id, user_id, bus_id, route_id, from_loc, to_loc, price, is_verified, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, $9)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(&ticket_id)
            .bind(user_id)
            .bind(bus_id)
            .bind(route_id)
            .bind(from_loc)
            .bind(to_loc)
            .bind(price)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await;

            match inserted {
                Ok(booking) => return Ok(booking),
                Err(e) if is_unique_violation(&e) => continue,
                Err(e) => {
                    return Err(AppError::DatabaseError(format!("Error creating booking: {}", e)))
                }
            }
        }

        Err(AppError::Internal(
            "Could not allocate a unique ticket id".to_string(),
        ))
    }

    pub async fn find_by_ticket(&self, ticket_id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE ticket_id = $1")
            .bind(ticket_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error finding booking: {}", e)))
    }

    /// Marca el ticket como usado y acredita la billetera del operador en
    /// una sola transacción. El flip false -> true es un UPDATE condicional
    /// (solo el primer verificador gana) y el abono es aritmética en el
    /// storage, no read-modify-write de un valor cacheado, así dos
    /// verificaciones concurrentes del mismo bus no pierden actualizaciones.
    pub async fn verify_and_credit(
        &self,
        ticket_id: &str,
        bus_id: Uuid,
    ) -> Result<Decimal, AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error starting transaction: {}", e)))?;

        let flipped = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET is_verified = TRUE WHERE ticket_id = $1 AND is_verified = FALSE RETURNING *",
        )
        .bind(ticket_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error verifying ticket: {}", e)))?;

        let booking = flipped.ok_or_else(|| AppError::Conflict("Ticket already used.".to_string()))?;

        sqlx::query("UPDATE bus_details SET total_earnings = total_earnings + $2 WHERE id = $1")
            .bind(bus_id)
            .bind(booking.price)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error crediting earnings: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error committing verification: {}", e)))?;

        Ok(booking.price)
    }

    /// Tickets del usuario, el más reciente primero
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<BookingWithBus>, AppError> {
        sqlx::query_as::<_, BookingWithBus>(
            r#"
            SELECT bk.id, bk.ticket_id, bk.user_id, bk.bus_id, bk.route_id, bk.from_loc,
                   bk.to_loc, bk.price, bk.is_verified, bk.created_at, b.bus_name
            FROM bookings bk
            JOIN bus_details b ON b.id = bk.bus_id
            WHERE bk.user_id = $1
            ORDER BY bk.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error listing tickets: {}", e)))
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}
