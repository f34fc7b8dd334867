//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use sqlx::PgPool;

use crate::clients::PaymentGateway;
use crate::config::environment::EnvironmentConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub payment: Arc<dyn PaymentGateway>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, payment: Arc<dyn PaymentGateway>) -> Self {
        Self {
            pool,
            config,
            payment,
        }
    }
}
