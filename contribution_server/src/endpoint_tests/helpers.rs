use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use chrono::Duration;
use contribution_engine::{
    db_types::{Paisa, UserId},
    helpers::{compute_payment_signature, verify_payment_signature},
    ContributionApi,
    GatewayOrder,
    GatewayPayment,
    LedgerDatabase,
    PaymentGateway,
    SqliteDatabase,
};
use log::{debug, error};
use serde_json::{json, Map, Value};
use sqlx::{migrate::MigrateDatabase, Sqlite};

use super::mocks::MockGateway;
use crate::{
    auth::{TokenIssuer, TokenVerifier},
    config::AuthConfig,
    routes::health,
    server::{api_scope, json_config},
};

pub const ADMIN: &str = "admin-asha";
pub const STUDENT: &str = "student-ravi";
pub const OTHER_STUDENT: &str = "student-meera";
pub const OUTSIDER: &str = "outsider-joe";
pub const KEY_ID: &str = "rzp_test_key";
pub const KEY_SECRET: &str = "rzp_test_secret";

// DO NOT re-use this secret anywhere.
pub fn auth_config() -> AuthConfig {
    AuthConfig::new("endpoint-tests-only-secret-0123456789abcdef")
}

pub fn token_for(user: &str) -> String {
    TokenIssuer::new(&auth_config()).issue_token(&UserId::from(user)).expect("Failed to sign token")
}

pub fn expired_token_for(user: &str) -> String {
    let mut config = auth_config();
    config.token_lifetime = Duration::hours(-1);
    TokenIssuer::new(&config).issue_token(&UserId::from(user)).expect("Failed to sign token")
}

/// A fresh, migrated database with one farewell group: an admin and two students. [`OUTSIDER`] belongs to no group.
pub async fn test_db() -> SqliteDatabase {
    let _ = env_logger::try_init();
    let url = format!("sqlite://{}/fwl_endpoint_test_{}.db", std::env::temp_dir().display(), rand::random::<u64>());
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database");
    db.migrate().await.expect("Error running migrations");
    let pool = db.pool();
    let farewell: i64 = sqlx::query_scalar("INSERT INTO farewells (name) VALUES ('Batch of 2024') RETURNING id")
        .fetch_one(pool)
        .await
        .expect("Error creating farewell");
    for (id, name, role) in
        [(ADMIN, "Asha Iyer", "main_admin"), (STUDENT, "Ravi Kumar", "student"), (OTHER_STUDENT, "Meera Nair", "student")]
    {
        sqlx::query("INSERT INTO profiles (id, full_name) VALUES ($1, $2)")
            .bind(id)
            .bind(name)
            .execute(pool)
            .await
            .expect("Error creating profile");
        sqlx::query("INSERT INTO farewell_participants (farewell_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(farewell)
            .bind(id)
            .bind(role)
            .execute(pool)
            .await
            .expect("Error adding participant");
    }
    db
}

pub async fn tear_down(mut db: SqliteDatabase) {
    let url = db.url().to_string();
    db.close().await;
    if let Err(e) = Sqlite::drop_database(&url).await {
        error!("Failed to drop database {url}: {e}");
    }
}

/// Sends one request through an app wired exactly like the production one, except for the gateway.
pub async fn send<G: PaymentGateway + 'static>(db: &SqliteDatabase, gateway: G, req: TestRequest) -> (StatusCode, Value) {
    let app = App::new()
        .app_data(web::Data::new(ContributionApi::new(db.clone(), gateway)))
        .app_data(web::Data::new(TokenVerifier::new(&auth_config())))
        .app_data(json_config())
        .service(health)
        .service(api_scope::<SqliteDatabase, G>());
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, body)
}

pub fn post(token: &str, path: &str, body: Value) -> TestRequest {
    TestRequest::post().uri(path).insert_header(("Authorization", format!("Bearer {token}"))).set_json(body)
}

pub fn get(token: &str, path: &str) -> TestRequest {
    TestRequest::get().uri(path).insert_header(("Authorization", format!("Bearer {token}")))
}

pub fn sign(order_id: &str, payment_id: &str) -> String {
    compute_payment_signature(order_id, payment_id, KEY_SECRET)
}

/// A mock gateway that checks signatures with the test secret and knows about `order_1` and `pay_1`.
pub fn gateway_with_payment(amount: i64) -> MockGateway {
    let mut gateway = MockGateway::new();
    gateway.expect_key_id().returning(|| KEY_ID.to_string());
    gateway
        .expect_verify_callback_signature()
        .returning(|order, payment, signature| Ok(verify_payment_signature(order, payment, signature, KEY_SECRET)));
    gateway.expect_fetch_order().returning(move |id| {
        Ok(GatewayOrder {
            id: id.to_string(),
            amount: Paisa::from(amount),
            currency: "INR".to_string(),
            status: "paid".to_string(),
            receipt: None,
            notes: json!([]),
            extra: Map::new(),
        })
    });
    gateway.expect_fetch_payment().returning(move |id| {
        Ok(GatewayPayment {
            id: id.to_string(),
            order_id: Some("order_1".to_string()),
            amount: Some(Paisa::from(amount)),
            currency: Some("INR".to_string()),
            status: Some("captured".to_string()),
            method: Some("card".to_string()),
            bank: None,
            vpa: None,
            captured: Some(true),
            raw: json!({ "id": id, "amount": amount }),
        })
    });
    gateway
}
