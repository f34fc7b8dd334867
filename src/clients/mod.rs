//! Clients - HTTP Clients for External APIs
//!
//! Este módulo contiene los clientes HTTP para servicios externos.

pub mod razorpay_client;

pub use razorpay_client::{PaymentGateway, PaymentOrder, RazorpayClient};
