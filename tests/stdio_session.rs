//! Drives a full server session over an in-memory byte pipe, the same way a
//! client would over stdio: newline-delimited JSON-RPC in, responses out.

use std::sync::Arc;

use async_trait::async_trait;
use mcp_commons::{
    BaseUseCase, ByteTransport, McpServerBuilder, UseCaseError, UseCaseResult,
};
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, ReadHalf, WriteHalf};

struct EchoUseCase;

#[async_trait]
impl BaseUseCase for EchoUseCase {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echo the message argument back"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {"message": {"type": "string"}},
            "required": ["message"]
        })
    }

    async fn execute(&self, params: Value) -> Result<UseCaseResult, UseCaseError> {
        match params.get("message").and_then(Value::as_str) {
            Some(message) => Ok(UseCaseResult::ok(json!(message))),
            None => Ok(UseCaseResult::fail("missing 'message' argument")),
        }
    }
}

struct Session {
    writer: WriteHalf<tokio::io::DuplexStream>,
    lines: tokio::io::Lines<BufReader<ReadHalf<tokio::io::DuplexStream>>>,
}

impl Session {
    async fn send(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
        self.writer.flush().await.unwrap();
    }

    async fn recv(&mut self) -> Value {
        let line = self.lines.next_line().await.unwrap().expect("server hung up");
        serde_json::from_str(&line).unwrap()
    }
}

fn start_server() -> (Session, tokio::task::JoinHandle<()>) {
    let app = McpServerBuilder::new("session-test")
        .with_version("3.0.0")
        .with_instructions("test fixture server")
        .with_use_case(Arc::new(EchoUseCase))
        .build()
        .unwrap();

    let (client_io, server_io) = tokio::io::duplex(1 << 16);
    let (server_read, server_write) = tokio::io::split(server_io);

    let handle = tokio::spawn(async move {
        app.run_with_transport(ByteTransport::new(server_read, server_write))
            .await
            .unwrap();
    });

    let (client_read, client_write) = tokio::io::split(client_io);
    let session = Session {
        writer: client_write,
        lines: BufReader::new(client_read).lines(),
    };
    (session, handle)
}

#[tokio::test]
async fn test_full_session() {
    let (mut session, handle) = start_server();

    // initialize
    session
        .send(r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#)
        .await;
    let resp = session.recv().await;
    assert_eq!(resp["id"], json!(1));
    assert_eq!(resp["result"]["protocolVersion"], json!("2024-11-05"));
    assert_eq!(resp["result"]["serverInfo"]["name"], json!("session-test"));
    assert_eq!(resp["result"]["serverInfo"]["version"], json!("3.0.0"));

    // notifications get no reply; the next response must belong to tools/list
    session
        .send(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .await;
    session
        .send(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
        .await;
    let resp = session.recv().await;
    assert_eq!(resp["id"], json!(2));
    assert_eq!(resp["result"]["tools"][0]["name"], json!("echo"));

    // tools/call through the adapter
    session
        .send(
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"echo","arguments":{"message":"hello"}}}"#,
        )
        .await;
    let resp = session.recv().await;
    assert_eq!(resp["id"], json!(3));
    assert_eq!(resp["result"]["content"][0]["text"], json!("hello"));
    assert!(resp["result"].get("isError").is_none());

    // a failing use case comes back as an isError result, not a protocol error
    session
        .send(
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"echo","arguments":{}}}"#,
        )
        .await;
    let resp = session.recv().await;
    assert_eq!(resp["id"], json!(4));
    assert_eq!(resp["result"]["isError"], json!(true));

    // unknown method
    session
        .send(r#"{"jsonrpc":"2.0","id":5,"method":"resources/list"}"#)
        .await;
    let resp = session.recv().await;
    assert_eq!(resp["id"], json!(5));
    assert_eq!(resp["error"]["code"], json!(-32601));

    // malformed input produces a parse error with no id
    session.send("this is not json").await;
    let resp = session.recv().await;
    assert_eq!(resp["error"]["code"], json!(-32700));
    assert!(resp.get("id").is_none());

    // hanging up ends the run loop cleanly
    drop(session);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_unknown_tool_is_a_protocol_error() {
    let (mut session, handle) = start_server();

    session
        .send(
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"missing"}}"#,
        )
        .await;
    let resp = session.recv().await;
    assert_eq!(resp["error"]["code"], json!(-32602));

    drop(session);
    handle.await.unwrap();
}
