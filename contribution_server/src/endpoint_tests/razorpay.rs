use actix_web::http::StatusCode;
use contribution_engine::{db_types::Paisa, GatewayOrder};
use razorpay_tools::{RazorpayApi, RazorpayConfig};
use serde_json::{json, Map};

use super::{
    helpers::{gateway_with_payment, post, send, sign, tear_down, test_db, token_for, ADMIN, KEY_ID, OTHER_STUDENT, STUDENT},
    mocks::MockGateway,
};
use crate::integrations::razorpay::RazorpayGateway;

#[actix_web::test]
async fn create_order() {
    let db = test_db().await;
    let mut gateway = MockGateway::new();
    gateway.expect_key_id().returning(|| KEY_ID.to_string());
    gateway.expect_create_order().withf(|o| o.amount == Paisa::from(150_000) && o.currency == "INR").times(1).returning(
        |o| {
            Ok(GatewayOrder {
                id: "order_fake_1".to_string(),
                amount: o.amount,
                currency: o.currency,
                status: "created".to_string(),
                receipt: o.receipt,
                notes: json!({}),
                extra: Map::new(),
            })
        },
    );
    let req = post(&token_for(STUDENT), "/api/razorpay/create-order", json!({"amount": 150000}));
    let (status, body) = send(&db, gateway, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "order_fake_1", "amount": 150000, "currency": "INR", "key_id": KEY_ID}));
    tear_down(db).await;
}

#[actix_web::test]
async fn create_order_rejects_bad_amounts() {
    let db = test_db().await;
    let token = token_for(STUDENT);
    for amount in [json!(0), json!(-100), json!("0")] {
        let mut gateway = MockGateway::new();
        gateway.expect_create_order().never();
        let req = post(&token, "/api/razorpay/create-order", json!({ "amount": amount }));
        let (status, body) = send(&db, gateway, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }
    let req = post(&token, "/api/razorpay/create-order", json!({ "amount": "a lot" }));
    let (status, _) = send(&db, MockGateway::new(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    tear_down(db).await;
}

#[actix_web::test]
async fn missing_gateway_credentials() {
    let db = test_db().await;
    let gateway = RazorpayGateway::new(RazorpayApi::new(RazorpayConfig::default()).unwrap());
    let req = post(&token_for(STUDENT), "/api/razorpay/create-order", json!({"amount": 50000}));
    let (status, body) = send(&db, gateway.clone(), req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"success": false, "error": "Razorpay credentials not configured"}));

    let callback = json!({
        "razorpay_order_id": "order_1",
        "razorpay_payment_id": "pay_1",
        "razorpay_signature": sign("order_1", "pay_1"),
    });
    let req = post(&token_for(STUDENT), "/api/razorpay/verify-and-capture", callback);
    let (status, body) = send(&db, gateway, req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Razorpay credentials not configured");
    tear_down(db).await;
}

#[actix_web::test]
async fn forged_callback() {
    let db = test_db().await;
    let mut gateway = MockGateway::new();
    gateway.expect_verify_callback_signature().returning(|_, _, _| Ok(false));
    gateway.expect_fetch_order().never();
    gateway.expect_fetch_payment().never();
    let callback = json!({
        "razorpay_order_id": "order_1",
        "razorpay_payment_id": "pay_1",
        "razorpay_signature": "0".repeat(64),
    });
    let (status, body) = send(&db, gateway, post(&token_for(STUDENT), "/api/razorpay/verify-and-capture", callback)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"success": false, "error": "Invalid payment signature"}));
    tear_down(db).await;
}

#[actix_web::test]
async fn verify_and_capture() {
    let db = test_db().await;
    let callback = json!({
        "razorpay_order_id": "order_1",
        "razorpay_payment_id": "pay_1",
        "razorpay_signature": sign("order_1", "pay_1"),
        "metadata": { "notes": "Farewell gift fund", "amount": 1 }
    });
    let req = post(&token_for(STUDENT), "/api/razorpay/verify-and-capture", callback);
    let (status, body) = send(&db, gateway_with_payment(50_000), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["saved"]["amount"], "500.00");
    assert_eq!(body["saved"]["method"], "online");
    assert_eq!(body["saved"]["status"], "completed");
    assert_eq!(body["saved"]["payment_gateway_id"], "pay_1");
    assert_eq!(body["saved"]["notes"], "Farewell gift fund");
    assert_eq!(body["saved"]["user_id"], STUDENT);
    let id = body["saved"]["id"].as_i64().unwrap();

    let replay = json!({
        "razorpay_order_id": "order_1",
        "razorpay_payment_id": "pay_1",
        "razorpay_signature": sign("order_1", "pay_1"),
    });
    let req = post(&token_for(STUDENT), "/api/razorpay/verify-and-capture", replay);
    let (status, body) = send(&db, gateway_with_payment(50_000), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], format!("Payment pay_1 has already been recorded as transaction {id}"));
    tear_down(db).await;
}

#[actix_web::test]
async fn verify_and_capture_for_someone_else() {
    let db = test_db().await;
    let callback = json!({
        "razorpay_order_id": "order_1",
        "razorpay_payment_id": "pay_1",
        "razorpay_signature": sign("order_1", "pay_1"),
        "selected_user": OTHER_STUDENT,
    });
    let req = post(&token_for(STUDENT), "/api/razorpay/verify-and-capture", callback.clone());
    let (status, _) = send(&db, gateway_with_payment(10_000), req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = post(&token_for(ADMIN), "/api/razorpay/verify-and-capture", callback);
    let (status, body) = send(&db, gateway_with_payment(10_000), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["saved"]["user_id"], OTHER_STUDENT);
    assert_eq!(body["saved"]["logged_by_admin_id"], ADMIN);
    tear_down(db).await;
}
