mod clients;
mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use clients::RazorpayClient;
use config::environment::EnvironmentConfig;
use database::DatabaseConnection;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚌 Bus Routing - Coordinación de rutas y tickets");
    info!("================================================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();

    // Cliente del gateway de pagos
    let payment = Arc::new(RazorpayClient::new(
        config.razorpay_key_id.clone(),
        config.razorpay_key_secret.clone(),
        config.razorpay_base_url.clone(),
    ));

    let cors = if config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(config.cors_origins.clone())
    };

    let app_state = AppState::new(pool, config.clone(), payment);

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/route", routes::route_routes::create_route_router())
        .nest("/api/booking", routes::booking_routes::create_booking_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🚌 Endpoints - Route:");
    info!("   POST /api/route/add - Publicar ruta");
    info!("   GET  /api/route/get - Rutas del operador");
    info!("   GET  /api/route/search - Buscar itinerarios");
    info!("   GET  /api/route/suggestions - Sugerencias de ubicaciones");
    info!("   GET  /api/route/template-vias - Vias conocidas entre extremos");
    info!("   DELETE /api/route/delete/:id - Borrar ruta");
    info!("   POST /api/route/toggle-status - Cambiar estado de ruta");
    info!("   POST /api/route/toggle-favorite - Marcar/desmarcar favorita");
    info!("   GET  /api/route/my-favorites - Rutas favoritas");
    info!("🎫 Endpoints - Booking:");
    info!("   POST /api/booking/initiate - Iniciar pago");
    info!("   POST /api/booking/verify-payment - Verificar pago y emitir ticket");
    info!("   POST /api/booking/verify-ticket - Verificar ticket (operador)");
    info!("   GET  /api/booking/my-tickets - Tickets del usuario");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Endpoint de health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "bus-routing",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
