use sqlx::PgPool;
use uuid::Uuid;

use crate::clients::PaymentGateway;
use crate::dto::booking_dto::{
    InitiatePaymentRequest, InitiatePaymentResponse, TicketIssuedResponse, TicketResponse,
    VerifyPaymentRequest, VerifyTicketResponse,
};
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::bus_repository::BusRepository;
use crate::repositories::route_repository::RouteRepository;
use crate::utils::errors::AppError;

pub struct BookingController {
    bookings: BookingRepository,
    routes: RouteRepository,
    buses: BusRepository,
}

impl BookingController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            bookings: BookingRepository::new(pool.clone()),
            routes: RouteRepository::new(pool.clone()),
            buses: BusRepository::new(pool),
        }
    }

    /// Paso 1 del flujo de pago: crear la orden en el gateway.
    /// El monto se convierte a unidades menores antes de la llamada.
    pub async fn initiate_payment(
        &self,
        gateway: &dyn PaymentGateway,
        key_id: &str,
        request: InitiatePaymentRequest,
    ) -> Result<InitiatePaymentResponse, AppError> {
        let amount = match request.amount {
            Some(amount) if amount > 0 => amount,
            _ => return Err(AppError::ValidationError("Amount is required".to_string())),
        };

        let order = gateway.create_order(amount * 100, "INR").await?;

        Ok(InitiatePaymentResponse {
            order_id: order.order_id,
            amount: order.amount,
            key: key_id.to_string(),
        })
    }

    /// Paso 2: verificar el pago y emitir el ticket atado al bus dueño de
    /// la ruta. La verificación va antes de cualquier escritura.
    pub async fn verify_and_issue(
        &self,
        gateway: &dyn PaymentGateway,
        user_id: Uuid,
        request: VerifyPaymentRequest,
    ) -> Result<TicketIssuedResponse, AppError> {
        gateway
            .verify_payment(
                &request.razorpay_order_id,
                &request.razorpay_payment_id,
                &request.razorpay_signature,
            )
            .await?;

        let route = self
            .routes
            .find_by_id(request.route_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Route not found".to_string()))?;

        let booking = self
            .bookings
            .create_with_unique_ticket(
                Some(user_id),
                route.bus_id,
                route.id,
                &request.from,
                &request.to,
                request.price,
            )
            .await?;

        let bus = self
            .buses
            .find_by_id(route.bus_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Bus details not found".to_string()))?;

        Ok(TicketIssuedResponse {
            ticket_id: booking.ticket_id,
            bus_name: bus.bus_name,
            from: booking.from_loc,
            to: booking.to_loc,
            date: booking.created_at.format("%Y-%m-%d %H:%M").to_string(),
        })
    }

    /// Verificación del operador: el ticket debe pertenecer a su bus y no
    /// haber sido usado. El abono a la billetera es atómico en el storage.
    pub async fn verify_ticket(
        &self,
        user_id: Uuid,
        ticket_id: &str,
    ) -> Result<VerifyTicketResponse, AppError> {
        let operator_bus = self
            .buses
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::Forbidden("Not a bus operator".to_string()))?;

        let ticket = self
            .bookings
            .find_by_ticket(ticket_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;

        if ticket.bus_id != operator_bus.id {
            return Err(AppError::Forbidden(
                "Invalid Bus! Ticket belongs to another operator.".to_string(),
            ));
        }

        if ticket.is_verified {
            return Err(AppError::Conflict("Ticket already used.".to_string()));
        }

        // El UPDATE condicional decide la carrera entre dos verificadores
        let price = self
            .bookings
            .verify_and_credit(&ticket.ticket_id, operator_bus.id)
            .await?;

        Ok(VerifyTicketResponse {
            message: "Verified!".to_string(),
            transfer_msg: format!("₹{} added to wallet.", price),
        })
    }

    pub async fn my_tickets(&self, user_id: Uuid) -> Result<Vec<TicketResponse>, AppError> {
        let bookings = self.bookings.list_by_user(user_id).await?;

        Ok(bookings
            .into_iter()
            .map(|row| TicketResponse {
                ticket_id: row.booking.ticket_id,
                bus_name: row.bus_name,
                from_loc: row.booking.from_loc,
                to_loc: row.booking.to_loc,
                price: row.booking.price.to_string(),
                date: row.booking.created_at.format("%Y-%m-%d %H:%M").to_string(),
                is_verified: row.booking.is_verified,
            })
            .collect())
    }
}
