use std::{fmt, sync::Arc};

use crate::{
    base::BaseUseCase,
    config::{McpConfig, create_config},
    error::Result,
    registry::{
        ToolConfig, ToolRegistry, bulk_register_tools, bulk_register_with_adapter_pattern,
        log_registration_summary,
    },
    router::{registry::RegistryRouter, service::RouterService},
    server::Server,
    transport::{byte::ByteTransport, traits::ServerTransport},
};

/// Fluent assembly of an MCP server: identity, config and tools in, a
/// runnable [`McpApp`] out.
pub struct McpServerBuilder {
    config: McpConfig,
    tools: Vec<ToolConfig>,
    use_cases: Vec<Arc<dyn BaseUseCase>>,
}

impl McpServerBuilder {
    pub fn new(server_name: impl Into<String>) -> Self {
        Self {
            config: McpConfig::new(server_name),
            tools: Vec::new(),
            use_cases: Vec::new(),
        }
    }

    /// Like [`new`](Self::new) but layers `MCP_*` environment overrides on top.
    pub fn from_env(server_name: &str) -> Result<Self> {
        Ok(Self {
            config: create_config(server_name)?,
            tools: Vec::new(),
            use_cases: Vec::new(),
        })
    }

    pub fn with_config(mut self, config: McpConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.config.server_version = version.into();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.config.instructions = Some(instructions.into());
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.log_level = level.into();
        self
    }

    pub fn with_tool(mut self, tool: ToolConfig) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn with_tools(mut self, tools: impl IntoIterator<Item = ToolConfig>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn with_use_case(mut self, use_case: Arc<dyn BaseUseCase>) -> Self {
        self.use_cases.push(use_case);
        self
    }

    /// Registers everything collected so far and produces the app.
    /// Registration is all-or-nothing, an invalid batch fails the build.
    pub fn build(self) -> Result<McpApp> {
        let mut registry = ToolRegistry::new();

        if !self.tools.is_empty() {
            let summary = bulk_register_tools(&mut registry, self.tools)?;
            log_registration_summary(&summary);
        }
        if !self.use_cases.is_empty() {
            let summary = bulk_register_with_adapter_pattern(&mut registry, self.use_cases)?;
            log_registration_summary(&summary);
        }

        Ok(create_mcp_app(self.config, registry))
    }
}

/// An assembled MCP server, ready to run on a transport.
pub struct McpApp {
    config: McpConfig,
    registry: Arc<ToolRegistry>,
}

impl fmt::Debug for McpApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("McpApp")
            .field("config", &self.config)
            .field("tools", &self.registry.tool_names())
            .finish_non_exhaustive()
    }
}

impl McpApp {
    pub fn config(&self) -> &McpConfig {
        &self.config
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Serves the app over stdin/stdout until the client closes the stream.
    pub async fn run_stdio(self) -> Result<()> {
        let transport = ByteTransport::new(tokio::io::stdin(), tokio::io::stdout());
        self.run_with_transport(transport).await
    }

    /// Serves the app over an arbitrary transport. Used directly by tests
    /// and by embedders bringing their own framing.
    pub async fn run_with_transport(self, transport: impl ServerTransport) -> Result<()> {
        let router = RegistryRouter::new(&self.config, self.registry.clone());
        let server = Server::new(RouterService(router));
        server.run(transport).await
    }

    pub fn print_help(&self) {
        print_mcp_help(&self.config, &self.registry);
    }
}

pub fn create_mcp_app(config: McpConfig, registry: ToolRegistry) -> McpApp {
    McpApp {
        config,
        registry: Arc::new(registry),
    }
}

/// Convenience entry point: log the startup line and serve `app` on stdio.
pub async fn run_mcp_server(app: McpApp) -> Result<()> {
    tracing::info!(
        server = %app.config().server_name,
        version = %app.config().server_version,
        tools = app.registry().len(),
        "starting MCP server on stdio"
    );
    app.run_stdio().await
}

/// Prints a human-oriented description of the server and its tools.
pub fn print_mcp_help(config: &McpConfig, registry: &ToolRegistry) {
    println!("{} v{}", config.server_name, config.server_version);
    if let Some(instructions) = &config.instructions {
        println!("{instructions}");
    }
    println!();
    println!("The server speaks MCP over stdio: newline-delimited JSON-RPC");
    println!("requests on stdin, responses on stdout, logs on stderr.");
    println!();
    println!("Environment:");
    println!("  MCP_SERVER_NAME      override the server name");
    println!("  MCP_SERVER_VERSION   override the advertised version");
    println!("  MCP_INSTRUCTIONS     override the initialize instructions");
    println!("  MCP_LOG_LEVEL        log filter (default: {})", config.log_level);
    println!("  MCP_LOG_FORMAT       compact, pretty or json");
    println!();
    if registry.is_empty() {
        println!("No tools registered.");
    } else {
        println!("Tools:");
        for tool in registry.list_tools() {
            println!("  {}: {}", tool.name, tool.description);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{content::Content, registry::BulkRegistrationError, tool::tool_handler};

    fn ping_tool(name: &str) -> ToolConfig {
        ToolConfig::new(
            name,
            "replies with pong",
            json!({"type": "object", "properties": {}}),
            tool_handler(|_| async { Ok(vec![Content::text("pong")]) }),
        )
    }

    #[test]
    fn test_builder_collects_tools() {
        let app = McpServerBuilder::new("demo")
            .with_version("2.1.0")
            .with_instructions("demo server")
            .with_tool(ping_tool("ping"))
            .with_tools([ping_tool("ping2")])
            .build()
            .unwrap();

        assert_eq!(app.config().server_name, "demo");
        assert_eq!(app.config().server_version, "2.1.0");
        assert_eq!(app.registry().len(), 2);
    }

    #[test]
    fn test_app_debug_names_tools_without_handlers() {
        let app = McpServerBuilder::new("demo")
            .with_tool(ping_tool("ping"))
            .build()
            .unwrap();

        let rendered = format!("{app:?}");
        assert!(rendered.contains("McpApp"));
        assert!(rendered.contains("ping"));
    }

    #[test]
    fn test_builder_rejects_duplicate_tools() {
        let err = McpServerBuilder::new("demo")
            .with_tool(ping_tool("ping"))
            .with_tool(ping_tool("ping"))
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            crate::error::McpCommonsError::Registration(BulkRegistrationError::DuplicateName(_))
        ));
    }
}
