//! Wires the Razorpay REST client into the engine's [`PaymentGateway`] contract.
use contribution_engine::{
    db_types::Paisa,
    helpers::verify_payment_signature,
    GatewayError,
    GatewayOrder,
    GatewayPayment,
    NewGatewayOrder,
    PaymentGateway,
};
use log::*;
use razorpay_tools::{NewRazorpayOrder, RazorpayApi, RazorpayApiError, RazorpayOrder, RazorpayPayment};

const NOT_CONFIGURED: &str = "Razorpay credentials not configured";

#[derive(Clone)]
pub struct RazorpayGateway {
    api: RazorpayApi,
}

impl RazorpayGateway {
    pub fn new(api: RazorpayApi) -> Self {
        Self { api }
    }
}

impl PaymentGateway for RazorpayGateway {
    fn key_id(&self) -> String {
        self.api.key_id().to_string()
    }

    fn verify_callback_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<bool, GatewayError> {
        let secret = &self.api.config().key_secret;
        if secret.is_empty() {
            return Err(GatewayError::Configuration(NOT_CONFIGURED.to_string()));
        }
        Ok(verify_payment_signature(order_id, payment_id, signature, secret.reveal()))
    }

    async fn create_order(&self, order: NewGatewayOrder) -> Result<GatewayOrder, GatewayError> {
        let request = NewRazorpayOrder::new(order.amount.value(), &order.currency)
            .with_receipt(order.receipt)
            .with_notes(order.notes);
        let order = self.api.create_order(&request).await.map_err(gateway_error)?;
        Ok(gateway_order(order))
    }

    async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, GatewayError> {
        let order = self.api.fetch_order(order_id).await.map_err(gateway_error)?;
        Ok(gateway_order(order))
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<GatewayPayment, GatewayError> {
        let payment = self.api.fetch_payment(payment_id).await.map_err(gateway_error)?;
        Ok(gateway_payment(payment))
    }
}

fn gateway_error(e: RazorpayApiError) -> GatewayError {
    debug!("💳️ Razorpay call failed. {e}");
    match e {
        RazorpayApiError::MissingCredentials => GatewayError::Configuration(NOT_CONFIGURED.to_string()),
        RazorpayApiError::Initialization(s) => GatewayError::Configuration(s),
        RazorpayApiError::JsonError(s) => GatewayError::InvalidResponse(s),
        e @ (RazorpayApiError::RequestFailed(_) | RazorpayApiError::Timeout | RazorpayApiError::QueryError { .. }) => {
            GatewayError::Upstream(e.to_string())
        },
    }
}

fn gateway_order(order: RazorpayOrder) -> GatewayOrder {
    GatewayOrder {
        id: order.id,
        amount: Paisa::from(order.amount),
        currency: order.currency,
        status: order.status,
        receipt: order.receipt,
        notes: order.notes,
        extra: order.extra,
    }
}

fn gateway_payment(payment: RazorpayPayment) -> GatewayPayment {
    let raw = serde_json::to_value(&payment).unwrap_or_default();
    GatewayPayment {
        id: payment.id,
        order_id: payment.order_id,
        amount: payment.amount.map(Paisa::from),
        currency: payment.currency,
        status: payment.status,
        method: payment.method,
        bank: payment.bank,
        vpa: payment.vpa,
        captured: payment.captured,
        raw,
    }
}
