//! Integration tests for the public Payments HTTP API.
//!
//! The user service is replaced by a fixed set of known ids that can be
//! switched off to simulate an outage.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use payment_hex::{PaymentService, inbound::HttpServer};
use platform_repo::MemoryRepo;
use platform_types::{
    LookupError, NewPayment, Payment, PaymentId, PaymentRepository, RemoteUser, RepoError, UserId,
    UserLookup,
};
use serde_json::{Value, json};
use tower::ServiceExt;

struct KnownUsers {
    ids: Vec<u32>,
    down: AtomicBool,
}

#[async_trait]
impl UserLookup for KnownUsers {
    async fn lookup_by_id(&self, id: UserId) -> Result<RemoteUser, LookupError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(LookupError::Unavailable("connection refused".into()));
        }
        if !self.ids.contains(&id.get()) {
            return Err(LookupError::NotFound(format!("user {}", id)));
        }
        Ok(RemoteUser {
            id,
            username: "alice".into(),
            email: "a@x.com".into(),
            created_at: "2024-01-01T00:00:00+00:00".into(),
            updated_at: "2024-01-01T00:00:00+00:00".into(),
        })
    }

    async fn lookup_by_email(&self, email: &str) -> Result<RemoteUser, LookupError> {
        Err(LookupError::NotFound(email.to_string()))
    }
}

struct BrokenStore;

#[async_trait]
impl PaymentRepository for BrokenStore {
    async fn create_payment(&self, _payment: NewPayment) -> Result<Payment, RepoError> {
        Err(RepoError::Database("disk I/O error".into()))
    }

    async fn get_payment(&self, _id: PaymentId) -> Result<Option<Payment>, RepoError> {
        Err(RepoError::Database("disk I/O error".into()))
    }

    async fn list_payments_for_user(&self, _user_id: UserId) -> Result<Vec<Payment>, RepoError> {
        Err(RepoError::Database("disk I/O error".into()))
    }

    async fn list_payments(&self) -> Result<Vec<Payment>, RepoError> {
        Err(RepoError::Database("disk I/O error".into()))
    }
}

fn app_with(users: Arc<KnownUsers>) -> Router {
    HttpServer::new(PaymentService::new(MemoryRepo::new(), users)).router()
}

fn users(ids: &[u32]) -> Arc<KnownUsers> {
    Arc::new(KnownUsers {
        ids: ids.to_vec(),
        down: AtomicBool::new(false),
    })
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn create_payment(app: &Router, body: Value) -> (StatusCode, Value) {
    send(app, json_request(Method::POST, "/payments", body)).await
}

#[tokio::test]
async fn test_health() {
    let app = app_with(users(&[]));

    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_create_payment_returns_201_pending() {
    let app = app_with(users(&[1]));

    let (status, body) = create_payment(
        &app,
        json!({"user_id": 1, "amount": 42.50, "currency": "USD", "description": "Test"}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user_id"], 1);
    assert_eq!(body["amount"], 42.5);
    assert_eq!(body["currency"], "USD");
    assert_eq!(body["description"], "Test");
    assert_eq!(body["status"], "pending");
    assert!(body["id"].as_u64().is_some());
}

#[tokio::test]
async fn test_create_payment_unknown_user_is_400() {
    let app = app_with(users(&[1]));

    let (status, body) =
        create_payment(&app, json!({"user_id": 999999, "amount": 10.0, "currency": "USD"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "user not found");

    let (_, all) = send(&app, get("/payments")).await;
    assert_eq!(all.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_payment_user_service_down_is_400() {
    let users = users(&[1]);
    let app = app_with(users.clone());
    users.down.store(true, Ordering::SeqCst);

    let (status, body) =
        create_payment(&app, json!({"user_id": 1, "amount": 10.0, "currency": "USD"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "user not found");
}

#[tokio::test]
async fn test_create_payment_validation() {
    let app = app_with(users(&[1]));

    let (status, _) =
        create_payment(&app, json!({"user_id": 1, "amount": 0, "currency": "USD"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        create_payment(&app, json!({"user_id": 1, "amount": -3.5, "currency": "USD"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = create_payment(&app, json!({"user_id": 1, "amount": 10.0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = create_payment(&app, json!({"amount": 10.0, "currency": "USD"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let app = app_with(users(&[1]));
    let request = Request::builder()
        .method(Method::POST)
        .uri("/payments")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_get_payment() {
    let app = app_with(users(&[1]));
    let (_, created) =
        create_payment(&app, json!({"user_id": 1, "amount": 5.0, "currency": "EUR"})).await;
    let id = created["id"].as_u64().unwrap();

    let (status, body) = send(&app, get(&format!("/payments/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);

    let (status, _) = send(&app, get("/payments/424242")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get("/payments/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid payment ID");
}

#[tokio::test]
async fn test_get_payment_survives_user_service_outage() {
    let users = users(&[1]);
    let app = app_with(users.clone());
    let (_, created) =
        create_payment(&app, json!({"user_id": 1, "amount": 5.0, "currency": "USD"})).await;
    users.down.store(true, Ordering::SeqCst);

    let (status, body) = send(&app, get(&format!("/payments/{}", created["id"]))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], created["id"]);
}

#[tokio::test]
async fn test_list_user_payments() {
    let app = app_with(users(&[1, 2]));
    let (_, mine) =
        create_payment(&app, json!({"user_id": 1, "amount": 5.0, "currency": "USD"})).await;
    create_payment(&app, json!({"user_id": 2, "amount": 7.0, "currency": "USD"})).await;

    let (status, body) = send(&app, get("/payments/user/1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([mine]));
}

#[tokio::test]
async fn test_list_user_payments_unknown_or_unreachable_is_404() {
    let users = users(&[1]);
    let app = app_with(users.clone());
    create_payment(&app, json!({"user_id": 1, "amount": 5.0, "currency": "USD"})).await;

    let (status, _) = send(&app, get("/payments/user/999999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    users.down.store(true, Ordering::SeqCst);
    let (status, _) = send(&app, get("/payments/user/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get("/payments/user/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid user ID");
}

#[tokio::test]
async fn test_list_payments() {
    let app = app_with(users(&[1]));
    for amount in [1.0, 2.0, 3.0] {
        create_payment(&app, json!({"user_id": 1, "amount": amount, "currency": "USD"})).await;
    }

    let (status, body) = send(&app, get("/payments")).await;

    assert_eq!(status, StatusCode::OK);
    let amounts: Vec<f64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["amount"].as_f64().unwrap())
        .collect();
    assert_eq!(amounts, vec![1.0, 2.0, 3.0]);
}

#[tokio::test]
async fn test_store_failure_is_500() {
    let app = HttpServer::new(PaymentService::new(BrokenStore, users(&[1]))).router();

    let (status, body) = send(&app, get("/payments")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 500);

    let (status, _) = send(&app, get("/payments/1")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) =
        create_payment(&app, json!({"user_id": 1, "amount": 10.0, "currency": "USD"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
