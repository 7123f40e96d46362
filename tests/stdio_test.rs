//! Drives the compiled server binary over stdio through the client driver.

use std::path::PathBuf;

use serde_json::json;
use tempfile::TempDir;

use holiday_mcp_server::client::{ClientDriver, ClientError, ServerDescriptor, Session};

fn server_exe() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_holiday_mcp_server"))
}

async fn spawn_server(output_dir: &TempDir) -> Session {
    let descriptor = ServerDescriptor::process(server_exe().display().to_string())
        .env("MCP_OUTPUT_DIR", output_dir.path().display().to_string())
        .env("MCP_LOG_LEVEL", "warn")
        // No key and an unroutable endpoint: generation must fail without network.
        .env("GOOGLE_API_KEY", "")
        .env("MCP_GENAI_BASE_URL", "http://127.0.0.1:9");

    ClientDriver::new()
        .connect(&descriptor)
        .await
        .expect("failed to start server")
}

#[tokio::test]
async fn test_stdio_demo_flow() {
    let output_dir = TempDir::new().unwrap();
    let mut session = spawn_server(&output_dir).await;

    let names: Vec<String> = session
        .list_tools()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name.to_string())
        .collect();
    assert!(names.contains(&"add".to_string()));
    assert!(names.contains(&"generate_final_photo".to_string()));

    let sum = session.call("add", json!({"a": 5, "b": 3})).await.unwrap();
    assert_eq!(sum.text(), "8");

    let product = session.call("multiply", json!({"a": 4, "b": 6})).await.unwrap();
    assert_eq!(product.text(), "24");

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_stdio_missing_api_key_is_tool_failure() {
    let output_dir = TempDir::new().unwrap();
    let mut session = spawn_server(&output_dir).await;

    let err = session
        .call("generate_sweater_pattern", json!({}))
        .await
        .unwrap_err();
    match err {
        ClientError::ToolExecutionFailure { message, .. } => {
            assert!(message.contains("GOOGLE_API_KEY"));
        }
        other => panic!("unexpected {other:?}"),
    }

    let sum = session.call("add", json!({"a": 1, "b": 2})).await.unwrap();
    assert_eq!(sum.text(), "3");
    session.close().await.unwrap();
}
