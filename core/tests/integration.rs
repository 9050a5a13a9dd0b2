//! Full client lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every operation
//! over real HTTP through the default reqwest transport.

use ironclad_client::{
    CancellationToken, Client, ClientError, ClientManager, GrantType, IroncladClient, Page,
    ReqwestTransport,
};

/// Bypasses any proxy configured in the environment.
fn connect(authority: &str) -> IroncladClient {
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    IroncladClient::with_transport(authority, ReqwestTransport::from_client(http))
}

async fn start_server() -> IroncladClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { mock_server::run(listener).await });
    connect(&format!("http://{addr}"))
}

/// Answers every connection with `status_line` and `body`, bypassing any
/// HTTP framework so the reason phrase is exactly what was written.
async fn start_raw_responder(status_line: &'static str, body: &'static str) -> IroncladClient {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let (mut socket, _) = listener.accept().await.unwrap();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let response = format!(
                    "{status_line}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    connect(&format!("http://{addr}"))
}

fn no_cancel() -> CancellationToken {
    CancellationToken::new()
}

#[tokio::test]
async fn crud_lifecycle() {
    let client = start_server().await;

    // Step 1: list is empty.
    let set = client.get_client_summaries(Page::default(), &no_cancel()).await.unwrap();
    assert!(set.is_empty(), "expected empty list");
    assert_eq!(set.total_size, 0);

    // Step 2: register.
    let registered = Client {
        name: Some("First app".to_string()),
        allowed_grant_types: Some(vec![GrantType::AuthorizationCode]),
        redirect_uris: Some(vec!["https://app1.example/callback".to_string()]),
        ..Client::new("app1")
    };
    client.register_client(&registered, &no_cancel()).await.unwrap();

    // Step 3: get returns what was registered.
    let fetched = client.get_client("app1", &no_cancel()).await.unwrap();
    assert_eq!(fetched.id, "app1");
    assert_eq!(fetched, registered);

    // Step 4: modify replaces the client.
    let modified = Client {
        name: Some("Renamed app".to_string()),
        enabled: Some(false),
        redirect_uris: None,
        ..fetched
    };
    client.modify_client(&modified, &no_cancel()).await.unwrap();
    let fetched = client.get_client("app1", &no_cancel()).await.unwrap();
    assert_eq!(fetched.id, "app1");
    assert_eq!(fetched.name.as_deref(), Some("Renamed app"));
    assert_eq!(fetched.enabled, Some(false));
    assert!(fetched.redirect_uris.is_none());

    // Step 5: list has one item.
    let set = client.get_client_summaries(Page::new(0, 10), &no_cancel()).await.unwrap();
    assert_eq!(set.total_size, 1);
    assert_eq!(set.items[0].id, "app1");

    // Step 6: unregister.
    client.unregister_client(&fetched, &no_cancel()).await.unwrap();

    // Step 7: get after unregister is not found.
    let err = client.get_client("app1", &no_cancel()).await.unwrap_err();
    assert!(err.is_not_found(), "expected not found, got {err:?}");

    // Step 8: unregister again is not found.
    let err = client.unregister_client(&fetched, &no_cancel()).await.unwrap_err();
    assert!(err.is_not_found());

    client.close();
    client.close();
}

#[tokio::test]
async fn list_keeps_server_order_and_total() {
    let client = start_server().await;
    for id in ["beta", "alpha"] {
        client.register_client(&Client::new(id), &no_cancel()).await.unwrap();
    }

    let set = client.get_client_summaries(Page::new(0, 10), &no_cancel()).await.unwrap();
    assert_eq!(set.total_size, 2);
    assert!(set.len() <= 10);
    let ids: Vec<_> = set.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["alpha", "beta"]);

    let second = client.get_client_summaries(Page::new(1, 1), &no_cancel()).await.unwrap();
    assert_eq!(second.start, 1);
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].id, "beta");
}

#[tokio::test]
async fn modify_unknown_client_is_not_found() {
    let client = start_server().await;

    let err = client
        .modify_client(&Client::new("ghost"), &no_cancel())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    match err {
        ClientError::Request { body, .. } => assert_eq!(body.as_deref(), Some("client not found")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn register_without_id_is_rejected_by_server() {
    let client = start_server().await;

    let err = client
        .register_client(&Client::default(), &no_cancel())
        .await
        .unwrap_err();
    match err {
        ClientError::Request { status, reason, body, .. } => {
            assert_eq!(status, 400);
            assert_eq!(reason, "Bad Request");
            assert!(body.is_none(), "register does not capture the body");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_register_is_a_request_failure() {
    let client = start_server().await;
    client.register_client(&Client::new("app1"), &no_cancel()).await.unwrap();

    let err = client
        .register_client(&Client::new("app1"), &no_cancel())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(409));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = connect(&format!("http://{addr}"));
    let err = client.get_client("app1", &no_cancel()).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport { .. }), "got {err:?}");
}

#[tokio::test]
async fn concurrent_operations_share_one_client() {
    let client = std::sync::Arc::new(start_server().await);

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let client = std::sync::Arc::clone(&client);
            tokio::spawn(async move {
                client
                    .register_client(&Client::new(format!("app{i}")), &CancellationToken::new())
                    .await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let set = client.get_client_summaries(Page::default(), &no_cancel()).await.unwrap();
    assert_eq!(set.total_size, 8);
}

#[tokio::test]
async fn custom_reason_phrase_is_kept() {
    let client = start_raw_responder("HTTP/1.1 400 Client Validation Failed", "id required").await;

    let err = client
        .modify_client(&Client::new("app1"), &no_cancel())
        .await
        .unwrap_err();
    match &err {
        ClientError::Request { status, reason, body, .. } => {
            assert_eq!(*status, 400);
            assert_eq!(reason, "Client Validation Failed");
            assert_eq!(body.as_deref(), Some("id required"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().ends_with(": Client Validation Failed / id required"));
}

#[tokio::test]
async fn nonstandard_status_keeps_its_phrase() {
    let client = start_raw_responder("HTTP/1.1 499 Client Closed Request", "").await;

    let err = client.get_client("app1", &no_cancel()).await.unwrap_err();
    assert_eq!(err.status(), Some(499));
    assert!(err.to_string().ends_with(": Client Closed Request"), "got {err}");
}

#[tokio::test]
async fn missing_phrase_falls_back_to_status_code() {
    let client = start_raw_responder("HTTP/1.1 499 ", "").await;

    let err = client.get_client("app1", &no_cancel()).await.unwrap_err();
    match err {
        ClientError::Request { reason, .. } => assert_eq!(reason, "499"),
        other => panic!("unexpected error: {other:?}"),
    }
}
