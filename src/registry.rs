use std::{collections::HashMap, fmt, sync::Arc};

use serde_json::Value;
use thiserror::Error as ThisError;

use crate::{
    adapter::create_mcp_adapter,
    base::BaseUseCase,
    content::Content,
    error::McpCommonsError,
    tool::{Tool, ToolHandler},
};

#[derive(ThisError, Debug)]
pub enum BulkRegistrationError {
    #[error("tool name must not be empty")]
    EmptyName,

    #[error("duplicate tool name in batch: {0}")]
    DuplicateName(String),

    #[error("tool '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("input schema for tool '{0}' must be a JSON object")]
    InvalidSchema(String),
}

/// Declarative description of one tool: its advertised metadata plus the
/// handler invoked on `tools/call`.
#[derive(Clone)]
pub struct ToolConfig {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub handler: ToolHandler,
}

impl ToolConfig {
    pub fn new<N, D>(name: N, description: D, input_schema: Value, handler: ToolHandler) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            handler,
        }
    }

    fn as_tool(&self) -> Tool {
        Tool::new(
            self.name.clone(),
            self.description.clone(),
            self.input_schema.clone(),
        )
    }
}

impl fmt::Debug for ToolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolConfig")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Name-keyed collection of registered tools, preserving registration order
/// for `tools/list`.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolConfig>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, config: ToolConfig) -> Result<(), BulkRegistrationError> {
        if config.name.is_empty() {
            return Err(BulkRegistrationError::EmptyName);
        }
        if self.tools.contains_key(&config.name) {
            return Err(BulkRegistrationError::AlreadyRegistered(config.name));
        }
        self.order.push(config.name.clone());
        self.tools.insert(config.name.clone(), config);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    pub fn list_tools(&self) -> Vec<Tool> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(ToolConfig::as_tool)
            .collect()
    }

    pub async fn call(&self, name: &str, arguments: Value) -> Result<Vec<Content>, McpCommonsError> {
        let config = self
            .tools
            .get(name)
            .ok_or_else(|| McpCommonsError::ToolNotFound(name.to_string()))?;
        (config.handler)(arguments).await
    }
}

/// What a bulk registration actually did.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationSummary {
    /// Names registered by this call, in registration order.
    pub registered: Vec<String>,
    /// Total tools in the registry afterwards.
    pub total: usize,
}

impl RegistrationSummary {
    pub fn count(&self) -> usize {
        self.registered.len()
    }
}

/// Validates a batch of tool configs without touching any registry: names
/// must be non-empty and unique within the batch, schemas must be objects.
pub fn validate_tools_config(configs: &[ToolConfig]) -> Result<(), BulkRegistrationError> {
    let mut seen = HashMap::new();
    for config in configs {
        if config.name.is_empty() {
            return Err(BulkRegistrationError::EmptyName);
        }
        if !config.input_schema.is_object() {
            return Err(BulkRegistrationError::InvalidSchema(config.name.clone()));
        }
        if seen.insert(config.name.clone(), ()).is_some() {
            return Err(BulkRegistrationError::DuplicateName(config.name.clone()));
        }
    }
    Ok(())
}

/// Registers the given configs one by one. Callers wanting validation and
/// all-or-nothing behavior should use [`bulk_register_tools`] instead.
pub fn register_tools(
    registry: &mut ToolRegistry,
    configs: Vec<ToolConfig>,
) -> Result<Vec<String>, BulkRegistrationError> {
    let mut registered = Vec::with_capacity(configs.len());
    for config in configs {
        let name = config.name.clone();
        registry.register(config)?;
        registered.push(name);
    }
    Ok(registered)
}

/// Validates the whole batch, then registers it. If anything in the batch is
/// invalid or collides with an existing tool, nothing is registered.
pub fn bulk_register_tools(
    registry: &mut ToolRegistry,
    configs: Vec<ToolConfig>,
) -> Result<RegistrationSummary, BulkRegistrationError> {
    validate_tools_config(&configs)?;
    for config in &configs {
        if registry.contains(&config.name) {
            return Err(BulkRegistrationError::AlreadyRegistered(config.name.clone()));
        }
    }

    let registered = register_tools(registry, configs)?;
    Ok(RegistrationSummary {
        registered,
        total: registry.len(),
    })
}

/// Wraps each use case in an MCP adapter and registers it under the use
/// case's own name, description and schema.
pub fn bulk_register_with_adapter_pattern(
    registry: &mut ToolRegistry,
    use_cases: Vec<Arc<dyn BaseUseCase>>,
) -> Result<RegistrationSummary, BulkRegistrationError> {
    let configs = use_cases
        .into_iter()
        .map(|use_case| {
            let adapter = create_mcp_adapter(use_case.clone());
            ToolConfig::new(
                use_case.name(),
                use_case.description(),
                use_case.input_schema(),
                adapter.into_handler(),
            )
        })
        .collect();
    bulk_register_tools(registry, configs)
}

/// Registers tools given as `(name, description, schema, handler)` tuples.
pub fn bulk_register_tuple_format(
    registry: &mut ToolRegistry,
    tuples: Vec<(String, String, Value, ToolHandler)>,
) -> Result<RegistrationSummary, BulkRegistrationError> {
    let configs = tuples
        .into_iter()
        .map(|(name, description, schema, handler)| {
            ToolConfig::new(name, description, schema, handler)
        })
        .collect();
    bulk_register_tools(registry, configs)
}

pub fn log_registration_summary(summary: &RegistrationSummary) {
    tracing::info!(
        registered = summary.count(),
        total = summary.total,
        "tool registration complete"
    );
    for name in &summary.registered {
        tracing::debug!(tool = %name, "registered tool");
    }
}
