//! Remote lookups against a live RPC listener on an ephemeral port.

use std::sync::Arc;

use platform_repo::MemoryRepo;
use platform_types::{CreateUserRequest, LookupError, UserId, UserLookup};
use user_client::RemoteUserClient;
use user_hex::{
    UserService,
    inbound::{AppState, RpcServer},
};

/// Starts the RPC surface and returns its address plus the shared state.
async fn start_user_rpc() -> (String, Arc<AppState<MemoryRepo>>) {
    let state = Arc::new(AppState {
        service: UserService::new(MemoryRepo::new()),
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let server = RpcServer::from_state(state.clone());
    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });

    (addr, state)
}

/// An address nothing is listening on.
async fn dead_addr() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);
    addr
}

async fn create_alice(state: &AppState<MemoryRepo>) -> UserId {
    state
        .service
        .create_user(CreateUserRequest {
            username: "alice".into(),
            email: "a@x.com".into(),
            password: "secret".into(),
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_lookup_by_id_and_email() {
    let (addr, state) = start_user_rpc().await;
    let id = create_alice(&state).await;
    let client = RemoteUserClient::connect(addr).await.unwrap();

    let by_id = client.lookup_by_id(id).await.unwrap();
    assert_eq!(by_id.id, id);
    assert_eq!(by_id.username, "alice");
    assert_eq!(by_id.email, "a@x.com");
    assert!(!by_id.created_at.is_empty());

    let by_email = client.lookup_by_email("a@x.com").await.unwrap();
    assert_eq!(by_email.id, id);
}

#[tokio::test]
async fn test_missing_user_is_not_found() {
    let (addr, _state) = start_user_rpc().await;
    let client = RemoteUserClient::connect(addr).await.unwrap();

    let by_id = client.lookup_by_id(UserId::new(999999)).await;
    assert!(matches!(by_id, Err(LookupError::NotFound(_))));

    let by_email = client.lookup_by_email("nobody@x.com").await;
    assert!(matches!(by_email, Err(LookupError::NotFound(_))));
}

#[tokio::test]
async fn test_deleted_user_is_not_found() {
    let (addr, state) = start_user_rpc().await;
    let id = create_alice(&state).await;
    let client = RemoteUserClient::connect(addr).await.unwrap();

    state.service.delete_user(id).await.unwrap();

    assert!(matches!(
        client.lookup_by_id(id).await,
        Err(LookupError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_scheme_prefixed_address_is_accepted() {
    let (addr, state) = start_user_rpc().await;
    let id = create_alice(&state).await;
    let client = RemoteUserClient::connect(format!("http://{}", addr))
        .await
        .unwrap();

    assert!(client.lookup_by_id(id).await.is_ok());
}

#[tokio::test]
async fn test_unreachable_service_is_unavailable() {
    let client = RemoteUserClient::new(dead_addr().await);

    let result = client.lookup_by_id(UserId::new(1)).await;

    assert!(matches!(result, Err(LookupError::Unavailable(_))));
}

#[tokio::test]
async fn test_connect_fails_without_retry() {
    let result = RemoteUserClient::connect(dead_addr().await).await;

    assert!(result.is_err());
}
