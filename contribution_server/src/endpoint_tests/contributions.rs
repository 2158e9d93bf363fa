use actix_web::{http::StatusCode, test::TestRequest};
use serde_json::json;

use super::{
    helpers::{expired_token_for, get, post, send, tear_down, test_db, token_for, ADMIN, OTHER_STUDENT, OUTSIDER, STUDENT},
    mocks::MockGateway,
};
use crate::{
    auth::TokenIssuer,
    config::AuthConfig,
};

#[actix_web::test]
async fn health_needs_no_token() {
    let db = test_db().await;
    let (status, _) = send(&db, MockGateway::new(), TestRequest::get().uri("/health")).await;
    assert_eq!(status, StatusCode::OK);
    tear_down(db).await;
}

#[actix_web::test]
async fn api_routes_need_a_token() {
    let db = test_db().await;
    let req = TestRequest::get().uri("/api/contributions/history");
    let (status, body) = send(&db, MockGateway::new(), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"success": false, "error": "Missing authorization header"}));

    let req = TestRequest::get().uri("/api/contributions/history").insert_header(("Authorization", "Token abc"));
    let (status, _) = send(&db, MockGateway::new(), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&db, MockGateway::new(), get(&expired_token_for(STUDENT), "/api/contributions/history")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Access token has expired");

    let forged = TokenIssuer::new(&AuthConfig::new("somebody-elses-secret-0123456789abcdef"))
        .issue_token(&STUDENT.into())
        .unwrap();
    let (status, body) = send(&db, MockGateway::new(), get(&forged, "/api/contributions/history")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let req = post("", "/api/contributions/add", json!({"user_id": STUDENT, "amount": 100}));
    let (status, _) = send(&db, MockGateway::new(), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    tear_down(db).await;
}

#[actix_web::test]
async fn add_cash_contribution() {
    let db = test_db().await;
    let token = token_for(STUDENT);
    let req = post(&token, "/api/contributions/add", json!({"user_id": STUDENT, "amount": "300", "type": "cash"}));
    let (status, body) = send(&db, MockGateway::new(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["method"], "cash");
    assert_eq!(body["data"]["amount"], "300.00");
    assert_eq!(body["data"]["currency"], "INR");
    tear_down(db).await;
}

#[actix_web::test]
async fn contribution_errors() {
    let db = test_db().await;
    let token = token_for(STUDENT);
    let req = post(&token, "/api/contributions/add", json!({"user_id": OUTSIDER, "amount": 100}));
    let (status, body) = send(&db, MockGateway::new(), req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "error": "User not in any group"}));

    let req = post(&token, "/api/contributions/add", json!({"user_id": STUDENT, "amount": 0}));
    let (status, body) = send(&db, MockGateway::new(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Amount must be greater than zero");

    let req = post(&token, "/api/contributions/add", json!({"amount": 100}));
    let (status, body) = send(&db, MockGateway::new(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let req = post(&token, "/api/contributions/add", json!({"user_id": STUDENT, "amount": 100, "type": "cheque"}));
    let (status, body) = send(&db, MockGateway::new(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid payment method: cheque");

    let body = json!({"user_id": STUDENT, "amount": 100, "logged_by_admin_id": ADMIN});
    let (status, _) = send(&db, MockGateway::new(), post(&token, "/api/contributions/add", body)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    tear_down(db).await;
}

#[actix_web::test]
async fn offline_payment_review() {
    let db = test_db().await;
    let student = token_for(STUDENT);
    let admin = token_for(ADMIN);
    let body = json!({"user_id": STUDENT, "amount": 450, "type": "cash", "notes": "Paid at the canteen"});
    let (status, body) = send(&db, MockGateway::new(), post(&student, "/api/contributions/offline-payment", body)).await;
    assert_eq!(status, StatusCode::OK);
    // The offline-payment route always records the `offline` method, so the entry waits for review
    assert_eq!(body["data"]["method"], "offline");
    assert_eq!(body["data"]["status"], "pending");
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&db, MockGateway::new(), get(&admin, "/api/contributions/pending")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], id);
    assert_eq!(body["data"][0]["user_full_name"], "Ravi Kumar");
    let (status, _) = send(&db, MockGateway::new(), get(&student, "/api/contributions/pending")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let approve = json!({"transaction_id": id.to_string()});
    let (status, body) = send(&db, MockGateway::new(), post(&student, "/api/contributions/approve", approve.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Only admins can approve offline payments");

    let (status, body) = send(&db, MockGateway::new(), post(&admin, "/api/contributions/approve", approve.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"transaction_id": id, "status": "completed", "approved_by": ADMIN}));

    let (status, body) = send(&db, MockGateway::new(), post(&admin, "/api/contributions/approve", approve)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("already resolved"));

    let path = format!("/api/contributions/{id}/audit");
    let (status, body) = send(&db, MockGateway::new(), get(&admin, &path)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["action"], "approved_offline");
    assert_eq!(body["data"][0]["performed_by"], ADMIN);
    let (status, _) = send(&db, MockGateway::new(), get(&student, &path)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    tear_down(db).await;
}

#[actix_web::test]
async fn reject_offline_payment() {
    let db = test_db().await;
    let admin = token_for(ADMIN);
    let body = json!({"user_id": OTHER_STUDENT, "amount": 120});
    let (_, body) = send(&db, MockGateway::new(), post(&token_for(OTHER_STUDENT), "/api/contributions/add", body)).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let reject = json!({"transaction_id": id, "reason": "Not received"});
    let (status, body) = send(&db, MockGateway::new(), post(&admin, "/api/contributions/reject", reject)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["transaction"]["status"], "failed");
    assert_eq!(body["notifications"], "persisted");

    let (status, body) = send(&db, MockGateway::new(), get(&admin, &format!("/api/contributions/{id}/audit"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["metadata"], json!({"reason": "Not received"}));

    let missing = json!({"transaction_id": 0});
    let (status, _) = send(&db, MockGateway::new(), post(&admin, "/api/contributions/reject", missing)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let unknown = json!({"transaction_id": 4040});
    let (status, _) = send(&db, MockGateway::new(), post(&admin, "/api/contributions/reject", unknown)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    tear_down(db).await;
}

#[actix_web::test]
async fn contribution_history() {
    let db = test_db().await;
    let student = token_for(STUDENT);
    for (amount, kind) in [(200, "cash"), (300, "upi"), (50, "other")] {
        let body = json!({"user_id": STUDENT, "amount": amount, "type": kind});
        let (status, _) = send(&db, MockGateway::new(), post(&student, "/api/contributions/add", body)).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = send(&db, MockGateway::new(), get(&student, "/api/contributions/history")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user_id"], STUDENT);
    assert_eq!(body["data"]["total_completed"], "500.00");
    assert_eq!(body["data"]["transactions"].as_array().unwrap().len(), 3);

    let path = format!("/api/contributions/history?user_id={STUDENT}");
    let (status, _) = send(&db, MockGateway::new(), get(&token_for(OTHER_STUDENT), &path)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = send(&db, MockGateway::new(), get(&token_for(ADMIN), &path)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_completed"], "500.00");
    tear_down(db).await;
}
