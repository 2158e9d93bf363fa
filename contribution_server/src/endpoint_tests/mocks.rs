use contribution_engine::{GatewayError, GatewayOrder, GatewayPayment, NewGatewayOrder, PaymentGateway};
use mockall::mock;

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
