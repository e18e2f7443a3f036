use async_trait::async_trait;
use serde_json::{Value, json};

use crate::{
    error::{McpCommonsError, Result},
    protocol::{
        constants::{INVALID_PARAMS, PROTOCOL_VERSION},
        error::ErrorData,
        message::{JsonRpcRequest, JsonRpcResponse},
        result::{CallToolResult, EmptyResult, Implementation, InitializeResult, ListToolsResult},
    },
    router::traits::Router,
};

/// Builds JSON-RPC responses out of the [`Router`] primitives. Blanket
/// implemented, routers only supply the trait above.
#[async_trait]
pub trait RouterExt: Router {
    fn create_response(&self, id: Option<u64>) -> JsonRpcResponse {
        JsonRpcResponse::new_empty(id)
    }

    async fn handle_initialize(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse> {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: self.capabilities(),
            server_info: Implementation {
                name: self.name(),
                version: self.version(),
            },
            instructions: Some(self.instructions()),
        };
        Ok(JsonRpcResponse::with_result(
            req.id,
            serde_json::to_value(result)?,
        ))
    }

    async fn handle_tools_list(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse> {
        let result = ListToolsResult {
            tools: self.list_tools(),
            next_cursor: None,
        };
        Ok(JsonRpcResponse::with_result(
            req.id,
            serde_json::to_value(result)?,
        ))
    }

    async fn handle_tools_call(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse> {
        let id = req.id;
        let params = match req.params {
            Some(params) => params,
            None => {
                return Ok(JsonRpcResponse::with_error(
                    id,
                    ErrorData::new(INVALID_PARAMS, "Missing params for tools/call"),
                ));
            }
        };

        let name = match params.get("name").and_then(Value::as_str) {
            Some(name) => name.to_string(),
            None => {
                return Ok(JsonRpcResponse::with_error(
                    id,
                    ErrorData::new(INVALID_PARAMS, "Missing tool name"),
                ));
            }
        };
        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        // Unknown tools are a protocol-level error. Tool execution failures
        // travel back inside the result with isError set.
        let result = match self.call_tool(&name, arguments).await {
            Ok(content) => CallToolResult {
                content,
                is_error: None,
            },
            Err(McpCommonsError::ToolNotFound(name)) => {
                return Ok(JsonRpcResponse::with_error(
                    id,
                    ErrorData::new(INVALID_PARAMS, format!("Unknown tool '{name}'")),
                ));
            }
            Err(e) => CallToolResult {
                content: vec![crate::content::Content::text(e.to_string())],
                is_error: Some(true),
            },
        };

        Ok(JsonRpcResponse::with_result(
            id,
            serde_json::to_value(result)?,
        ))
    }

    async fn handle_ping(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse> {
        Ok(JsonRpcResponse::with_result(
            req.id,
            serde_json::to_value(EmptyResult {})?,
        ))
    }
}

#[async_trait]
impl<T: Router + ?Sized> RouterExt for T {}
