mod builder;
mod logging;

pub use builder::{McpApp, McpServerBuilder, create_mcp_app, print_mcp_help, run_mcp_server};
pub use logging::setup_logging;
use tower_service::Service;

use crate::{
    error::{BoxError, McpCommonsError, Result},
    protocol::{
        constants::{INTERNAL_ERROR, INVALID_REQUEST, PARSE_ERROR},
        error::ErrorData,
        message::{JsonRpcError, JsonRpcMessage, JsonRpcRequest, JsonRpcResponse},
    },
    transport::traits::ServerTransport,
};

/// Reads requests off a transport, dispatches them through a JSON-RPC
/// service and writes the responses back, until the client hangs up.
pub struct Server<S> {
    service: S,
}

impl<S> Server<S>
where
    S: Service<JsonRpcRequest, Response = JsonRpcResponse> + Send,
    S::Error: Into<BoxError>,
    S::Future: Send,
{
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub async fn run(self, mut transport: impl ServerTransport) -> Result<()> {
        let mut service = self.service;

        tracing::info!("Server started");
        while let Some(msg_result) = transport.read_message().await {
            let _span = tracing::span!(tracing::Level::INFO, "message_processing");
            let _enter = _span.enter();

            match msg_result {
                Ok(msg) => {
                    Self::handle_message(&mut service, &mut transport, msg).await?;
                }
                Err(e) => {
                    Self::handle_error(&mut transport, e).await?;
                }
            }
        }
        tracing::info!("Server transport closed, exiting run loop");

        Ok(())
    }

    async fn handle_message(
        service: &mut S,
        transport: &mut impl ServerTransport,
        msg: JsonRpcMessage,
    ) -> Result<()> {
        match msg {
            JsonRpcMessage::Request(request) => {
                let response = Self::process_request(service, request).await;
                Self::send_response(transport, response).await?;
            }
            // Notifications need no reply; stray responses and errors from
            // the peer are ignored.
            JsonRpcMessage::Response(_)
            | JsonRpcMessage::Notification(_)
            | JsonRpcMessage::Nil
            | JsonRpcMessage::Error(_) => {}
        }
        Ok(())
    }

    async fn process_request(service: &mut S, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id;

        tracing::debug!(
            request_id = ?id,
            method = %request.method,
            "Received request"
        );

        match service.call(request).await {
            Ok(resp) => resp,
            Err(e) => {
                let error_msg = e.into().to_string();
                tracing::error!(error = %error_msg, "Request processing failed");
                JsonRpcResponse::with_error(id, ErrorData::new(INTERNAL_ERROR, error_msg))
            }
        }
    }

    async fn send_response(
        transport: &mut impl ServerTransport,
        response: JsonRpcResponse,
    ) -> Result<()> {
        tracing::debug!(response_id = ?response.id, "Sending response");

        transport
            .write_message(JsonRpcMessage::Response(response))
            .await
    }

    async fn handle_error(
        transport: &mut impl ServerTransport,
        e: McpCommonsError,
    ) -> Result<()> {
        let error = match e {
            McpCommonsError::Json(_)
            | McpCommonsError::InvalidMessage(_)
            | McpCommonsError::Utf8(_) => ErrorData::new(PARSE_ERROR, e.to_string()),
            McpCommonsError::Protocol(_) => ErrorData::new(INVALID_REQUEST, e.to_string()),
            _ => ErrorData::new(INTERNAL_ERROR, e.to_string()),
        };

        let error_response = JsonRpcMessage::Error(JsonRpcError {
            jsonrpc: crate::protocol::constants::JSONRPC_EXPECTED_VERSION.to_string(),
            id: None,
            error,
        });

        transport.write_message(error_response).await
    }
}
