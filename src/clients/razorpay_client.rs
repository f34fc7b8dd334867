//! Cliente del gateway de pagos (Razorpay)
//!
//! La creación de órdenes y la verificación de pagos viven en el proveedor
//! externo; este core las invoca a través de una interfaz fija. Los
//! timeouts y reintentos son responsabilidad del proveedor.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;

use crate::utils::errors::{AppError, AppResult};

/// Orden creada en el gateway
#[derive(Debug, Clone)]
pub struct PaymentOrder {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
}

/// Interfaz fija hacia el proveedor de pagos
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Crear una orden de cobro. El monto llega ya en unidades menores.
    async fn create_order(&self, amount_minor: i64, currency: &str) -> AppResult<PaymentOrder>;

    /// Verificar que un pago pertenece a la orden y fue capturado.
    /// Falla con PaymentVerificationFailed si la prueba no coincide.
    async fn verify_payment(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> AppResult<()>;
}

pub struct RazorpayClient {
    client: reqwest::Client,
    key_id: String,
    key_secret: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RazorpayOrderResponse {
    id: String,
    amount: i64,
    currency: String,
}

#[derive(Debug, Deserialize)]
struct RazorpayPaymentResponse {
    order_id: Option<String>,
    status: String,
}

impl RazorpayClient {
    pub fn new(key_id: String, key_secret: String, base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            key_id,
            key_secret,
            base_url,
        }
    }

    fn auth_header(&self) -> String {
        let credentials = BASE64.encode(format!("{}:{}", self.key_id, self.key_secret));
        format!("Basic {}", credentials)
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(&self, amount_minor: i64, currency: &str) -> AppResult<PaymentOrder> {
        let url = format!("{}/v1/orders", self.base_url);
        log::info!("💳 Creando orden de pago por {} {}", amount_minor, currency);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&json!({
                "amount": amount_minor,
                "currency": currency,
                "payment_capture": 1
            }))
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Error calling payment gateway: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("❌ Gateway rechazó la orden ({}): {}", status, body);
            return Err(AppError::ExternalApi(format!(
                "Payment gateway returned status {}",
                status
            )));
        }

        let order: RazorpayOrderResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Invalid order response: {}", e)))?;

        log::info!("✅ Orden creada: {}", order.id);

        Ok(PaymentOrder {
            order_id: order.id,
            amount: order.amount,
            currency: order.currency,
        })
    }

    async fn verify_payment(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> AppResult<()> {
        if order_id.is_empty() || payment_id.is_empty() || signature.is_empty() {
            return Err(AppError::PaymentVerificationFailed(
                "Payment Verification Failed".to_string(),
            ));
        }

        let url = format!("{}/v1/payments/{}", self.base_url, payment_id);
        log::info!("💳 Verificando pago {} contra orden {}", payment_id, order_id);

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Error calling payment gateway: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::PaymentVerificationFailed(
                "Payment Verification Failed".to_string(),
            ));
        }

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ExternalApi(format!(
                "Payment gateway returned status {}",
                status
            )));
        }

        let payment: RazorpayPaymentResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Invalid payment response: {}", e)))?;

        if payment.order_id.as_deref() != Some(order_id) {
            log::warn!("⚠️ El pago {} no pertenece a la orden {}", payment_id, order_id);
            return Err(AppError::PaymentVerificationFailed(
                "Payment Verification Failed".to_string(),
            ));
        }

        if payment.status != "captured" && payment.status != "authorized" {
            return Err(AppError::PaymentVerificationFailed(
                "Payment Verification Failed".to_string(),
            ));
        }

        log::info!("✅ Pago {} verificado", payment_id);
        Ok(())
    }
}
