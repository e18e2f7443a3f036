use async_trait::async_trait;
use serde_json::Value;

use crate::{
    content::Content, error::Result, protocol::capabilities::ServerCapabilities, tool::Tool,
};

/// The server-side behavior behind the JSON-RPC surface. This crate only
/// routes tool traffic, so the trait is tool-shaped.
#[async_trait]
pub trait Router: Send + Sync {
    fn name(&self) -> String;

    fn version(&self) -> String {
        crate::VERSION.to_string()
    }

    fn instructions(&self) -> String;

    fn capabilities(&self) -> ServerCapabilities;

    fn list_tools(&self) -> Vec<Tool>;

    async fn call_tool(&self, tool_name: &str, arguments: Value) -> Result<Vec<Content>>;
}
