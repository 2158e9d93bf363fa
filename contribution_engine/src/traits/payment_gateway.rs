use thiserror::Error;

use crate::traits::{GatewayOrder, GatewayPayment, NewGatewayOrder};

/// The external payment processor.
///
/// Implementations are expected to apply a bounded timeout to every call and to report timeouts as
/// [`GatewayError::Upstream`]. Calls are never retried, since order creation is not idempotent.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    /// The public key id that checkout clients need alongside an order id.
    fn key_id(&self) -> String;

    /// Checks the signature the gateway attached to a checkout callback.
    ///
    /// Returns `Ok(false)` for a forged or mangled signature. `Err` is reserved for the case where the check cannot be
    /// performed at all, e.g. because the gateway secret is not configured.
    fn verify_callback_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<bool, GatewayError>;

    async fn create_order(&self, order: NewGatewayOrder) -> Result<GatewayOrder, GatewayError>;

    async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, GatewayError>;

    async fn fetch_payment(&self, payment_id: &str) -> Result<GatewayPayment, GatewayError>;
}

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Payment gateway is not configured. {0}")]
    Configuration(String),
    #[error("Payment gateway request failed. {0}")]
    Upstream(String),
    #[error("Payment gateway returned an invalid response. {0}")]
    InvalidResponse(String),
}
