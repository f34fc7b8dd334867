use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{
    InitiatePaymentRequest, InitiatePaymentResponse, TicketIssuedResponse, TicketResponse,
    VerifyPaymentRequest, VerifyTicketRequest, VerifyTicketResponse,
};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/initiate", post(initiate_payment))
        .route("/verify-payment", post(verify_payment))
        .route("/verify-ticket", post(verify_ticket))
        .route("/my-tickets", get(my_tickets))
}

async fn initiate_payment(
    State(state): State<AppState>,
    Json(request): Json<InitiatePaymentRequest>,
) -> Result<Json<InitiatePaymentResponse>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller
        .initiate_payment(&*state.payment, &state.config.razorpay_key_id, request)
        .await?;
    Ok(Json(response))
}

async fn verify_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<(StatusCode, Json<TicketIssuedResponse>), AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller
        .verify_and_issue(&*state.payment, auth.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn verify_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<VerifyTicketRequest>,
) -> Result<Json<VerifyTicketResponse>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.verify_ticket(auth.user_id, &request.ticket_id).await?;
    Ok(Json(response))
}

async fn my_tickets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<TicketResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.my_tickets(auth.user_id).await?;
    Ok(Json(response))
}
