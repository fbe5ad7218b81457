//! Integration tests for the user lookup RPC surface.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use platform_repo::MemoryRepo;
use platform_types::{
    CreateUserRequest,
    rpc::{GET_USER_BY_EMAIL_PATH, GET_USER_PATH, HEALTH_PATH},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use user_hex::{
    UserService,
    inbound::{AppState, HttpServer, RpcServer},
};

async fn setup() -> (Router, Router) {
    let service = UserService::new(MemoryRepo::new());
    service
        .create_user(CreateUserRequest {
            username: "alice".into(),
            email: "a@x.com".into(),
            password: "secret".into(),
        })
        .await
        .unwrap();

    let state = Arc::new(AppState { service });
    let http = HttpServer::from_state(state.clone()).router();
    let rpc = RpcServer::from_state(state).router();
    (http, rpc)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_lookup_by_id() {
    let (_, rpc) = setup().await;

    let (status, body) = call(&rpc, Method::POST, GET_USER_PATH, Some(json!({"id": 1}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "a@x.com");
    assert!(body["created_at"].is_string());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_lookup_by_email() {
    let (_, rpc) = setup().await;

    let (status, body) = call(
        &rpc,
        Method::POST,
        GET_USER_BY_EMAIL_PATH,
        Some(json!({"email": "a@x.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn test_lookup_missing_user_is_not_found() {
    let (_, rpc) = setup().await;

    let (status, body) = call(&rpc, Method::POST, GET_USER_PATH, Some(json!({"id": 999999}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, body) = call(
        &rpc,
        Method::POST,
        GET_USER_BY_EMAIL_PATH,
        Some(json!({"email": "nobody@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_request_is_invalid_argument() {
    let (_, rpc) = setup().await;

    let (status, body) = call(&rpc, Method::POST, GET_USER_PATH, Some(json!({"id": "x"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_deleted_user_is_not_found_remotely() {
    let (http, rpc) = setup().await;

    let (status, _) = call(&http, Method::DELETE, "/users/1", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&rpc, Method::POST, GET_USER_PATH, Some(json!({"id": 1}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rpc_exposes_no_mutations() {
    let (_, rpc) = setup().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/users")
        .header("Content-Type", "application/json")
        .body(Body::from(
            json!({"username": "eve", "email": "e@x.com", "password": "p"}).to_string(),
        ))
        .unwrap();
    let response = rpc.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let (status, body) = call(&rpc, Method::GET, HEALTH_PATH, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "serving");
}
