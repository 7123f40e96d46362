//! TCP transport tests: one listener, several independent client sessions.

#![cfg(feature = "tcp")]

use std::sync::Arc;

use serde_json::json;
use tokio::net::TcpListener;
use tokio_test::{assert_err, assert_ok};

use holiday_mcp_server::client::{ClientDriver, ClientError, ServerDescriptor, SessionState};
use holiday_mcp_server::core::transport::tcp::TcpTransport;
use holiday_mcp_server::core::{Config, McpServer};
use holiday_mcp_server::domains::generation::FakeBackend;

/// Serve on an ephemeral local port and return its address.
async fn spawn_tcp_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind");
    let address = listener.local_addr().expect("no local addr").to_string();

    let server = McpServer::with_backend(Config::default(), Arc::new(FakeBackend::new()))
        .expect("failed to build server");
    tokio::spawn(TcpTransport::serve(listener, server));

    address
}

#[tokio::test]
async fn test_sessions_over_tcp_are_independent() {
    let address = spawn_tcp_server().await;
    let driver = ClientDriver::new();
    let descriptor = ServerDescriptor::tcp(&address);

    let mut first = assert_ok!(driver.connect(&descriptor).await);
    let mut second = assert_ok!(driver.connect(&descriptor).await);
    assert_eq!(first.server_name(), Some("holidays"));
    assert_eq!(second.server_name(), Some("holidays"));

    let sum = assert_ok!(first.call("add", json!({"a": 5, "b": 3})).await);
    assert_eq!(sum.text(), "8");

    let product = assert_ok!(second.call("multiply", json!({"a": 4, "b": 6})).await);
    assert_eq!(product.text(), "24");

    for session in [&mut first, &mut second] {
        let err = assert_err!(session.call("nope", json!({})).await);
        assert!(matches!(err, ClientError::ToolNotFound(ref name) if name == "nope"));
        assert_eq!(session.state(), SessionState::Ready);
    }

    // closing one session leaves the other connection serving
    assert_ok!(first.close().await);
    let sum = assert_ok!(second.call("add", json!({"a": 1, "b": 2})).await);
    assert_eq!(sum.text(), "3");
    assert_ok!(second.close().await);
}

#[tokio::test]
async fn test_tcp_connect_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();
    drop(listener);

    let err = assert_err!(
        ClientDriver::new()
            .connect(&ServerDescriptor::tcp(address))
            .await
    );
    assert!(matches!(err, ClientError::Connect(_)));
}
