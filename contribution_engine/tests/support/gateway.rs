use contribution_engine::{
    db_types::Paisa,
    helpers::{compute_payment_signature, verify_payment_signature},
    GatewayError,
    GatewayOrder,
    GatewayPayment,
    NewGatewayOrder,
    PaymentGateway,
};
use mockall::mock;
use serde_json::{json, Map};

pub const KEY_ID: &str = "rzp_test_key";
pub const KEY_SECRET: &str = "rzp_test_secret";

mock! {
    pub Gateway {}
    impl PaymentGateway for Gateway {
        fn key_id(&self) -> String;
        fn verify_callback_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> Result<bool, GatewayError>;
        async fn create_order(&self, order: NewGatewayOrder) -> Result<GatewayOrder, GatewayError>;
        async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, GatewayError>;
        async fn fetch_payment(&self, payment_id: &str) -> Result<GatewayPayment, GatewayError>;
    }
}

/// A mock gateway that checks callback signatures with the test secret. Fetch and create expectations are left to
/// the caller.
pub fn signing_gateway() -> MockGateway {
    let mut gateway = MockGateway::new();
    gateway.expect_key_id().returning(|| KEY_ID.to_string());
    gateway
        .expect_verify_callback_signature()
        .returning(|order, payment, signature| Ok(verify_payment_signature(order, payment, signature, KEY_SECRET)));
    gateway
}

pub fn sign(order_id: &str, payment_id: &str) -> String {
    compute_payment_signature(order_id, payment_id, KEY_SECRET)
}

pub fn gateway_order(id: &str, amount: i64) -> GatewayOrder {
    GatewayOrder {
        id: id.to_string(),
        amount: Paisa::from(amount),
        currency: "INR".to_string(),
        status: "created".to_string(),
        receipt: Some("rcpt_1".to_string()),
        notes: json!({}),
        extra: Map::new(),
    }
}

pub fn gateway_payment(id: &str, order_id: &str, amount: Option<i64>) -> GatewayPayment {
    GatewayPayment {
        id: id.to_string(),
        order_id: Some(order_id.to_string()),
        amount: amount.map(Paisa::from),
        currency: Some("INR".to_string()),
        status: Some("captured".to_string()),
        method: Some("upi".to_string()),
        bank: None,
        vpa: Some("ravi@okbank".to_string()),
        captured: Some(true),
        raw: json!({ "id": id, "order_id": order_id, "amount": amount, "status": "captured" }),
    }
}
