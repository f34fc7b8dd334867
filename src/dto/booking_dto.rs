use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Request para iniciar un pago
#[derive(Debug, Deserialize)]
pub struct InitiatePaymentRequest {
    pub amount: Option<i64>,
}

// Response con la orden creada en el gateway
#[derive(Debug, Serialize)]
pub struct InitiatePaymentResponse {
    pub order_id: String,
    pub amount: i64,
    pub key: String,
}

// Request de verificación de pago y emisión de ticket
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    pub route_id: Uuid,
    pub from: String,
    pub to: String,
    pub price: Decimal,
}

// Response del ticket recién emitido
#[derive(Debug, Serialize)]
pub struct TicketIssuedResponse {
    pub ticket_id: String,
    pub bus_name: String,
    pub from: String,
    pub to: String,
    pub date: String,
}

// Request de verificación de ticket por el operador
#[derive(Debug, Deserialize)]
pub struct VerifyTicketRequest {
    pub ticket_id: String,
}

// Response de verificación con el abono a la billetera
#[derive(Debug, Serialize)]
pub struct VerifyTicketResponse {
    pub message: String,
    pub transfer_msg: String,
}

// Ticket del usuario en listados
#[derive(Debug, Serialize)]
pub struct TicketResponse {
    pub ticket_id: String,
    pub bus_name: String,
    pub from_loc: String,
    pub to_loc: String,
    pub price: String,
    pub date: String,
    pub is_verified: bool,
}
