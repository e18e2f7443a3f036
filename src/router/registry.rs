use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    config::McpConfig,
    content::Content,
    error::Result,
    protocol::capabilities::{CapabilitiesBuilder, ServerCapabilities},
    registry::ToolRegistry,
    router::traits::Router,
    tool::Tool,
};

/// A [`Router`] that serves whatever a [`ToolRegistry`] holds, with identity
/// and instructions taken from the server config.
#[derive(Clone)]
pub struct RegistryRouter {
    name: String,
    version: String,
    instructions: String,
    registry: Arc<ToolRegistry>,
}

impl RegistryRouter {
    pub fn new(config: &McpConfig, registry: Arc<ToolRegistry>) -> Self {
        Self {
            name: config.server_name.clone(),
            version: config.server_version.clone(),
            instructions: config.instructions.clone().unwrap_or_default(),
            registry,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}

#[async_trait]
impl Router for RegistryRouter {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn version(&self) -> String {
        self.version.clone()
    }

    fn instructions(&self) -> String {
        self.instructions.clone()
    }

    fn capabilities(&self) -> ServerCapabilities {
        CapabilitiesBuilder::new().with_tools(false).build()
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.registry.list_tools()
    }

    async fn call_tool(&self, tool_name: &str, arguments: Value) -> Result<Vec<Content>> {
        self.registry.call(tool_name, arguments).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        registry::{ToolConfig, bulk_register_tools},
        router::ext::RouterExt,
        tool::tool_handler,
    };

    fn test_router() -> RegistryRouter {
        let mut registry = ToolRegistry::new();
        bulk_register_tools(
            &mut registry,
            vec![ToolConfig::new(
                "shout",
                "Uppercases the text argument",
                json!({"type": "object", "properties": {"text": {"type": "string"}}}),
                tool_handler(|arguments| async move {
                    let text = arguments
                        .get("text")
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    Ok(vec![Content::text(text.to_uppercase())])
                }),
            )],
        )
        .unwrap();

        let mut config = McpConfig::new("test-server");
        config.instructions = Some("A test server".to_string());
        RegistryRouter::new(&config, Arc::new(registry))
    }

    #[tokio::test]
    async fn test_initialize_reports_identity() {
        let router = test_router();
        let req = crate::protocol::message::JsonRpcRequest::new(Some(1), "initialize", None);
        let resp = router.handle_initialize(req).await.unwrap();

        let result = resp.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], json!("test-server"));
        assert_eq!(result["instructions"], json!("A test server"));
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_tools_list_and_call() {
        let router = test_router();

        let req = crate::protocol::message::JsonRpcRequest::new(Some(2), "tools/list", None);
        let resp = router.handle_tools_list(req).await.unwrap();
        let tools = resp.result.unwrap();
        assert_eq!(tools["tools"][0]["name"], json!("shout"));

        let req = crate::protocol::message::JsonRpcRequest::new(
            Some(3),
            "tools/call",
            Some(json!({"name": "shout", "arguments": {"text": "quiet"}})),
        );
        let resp = router.handle_tools_call(req).await.unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["content"][0]["text"], json!("QUIET"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_invalid_params() {
        let router = test_router();
        let req = crate::protocol::message::JsonRpcRequest::new(
            Some(4),
            "tools/call",
            Some(json!({"name": "nope"})),
        );
        let resp = router.handle_tools_call(req).await.unwrap();
        let error = resp.error.unwrap();
        assert_eq!(error.code, crate::protocol::constants::INVALID_PARAMS);
    }
}
