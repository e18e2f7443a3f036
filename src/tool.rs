use std::{future::Future, sync::Arc};

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{content::Content, error::Result};

/// A tool as advertised to clients via `tools/list`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub name: String,
    pub description: String,
    /// JSON schema describing the tool arguments.
    pub input_schema: Value,
}

impl Tool {
    pub fn new<N, D>(name: N, description: D, input_schema: Value) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Boxed async function invoked when a registered tool is called.
pub type ToolHandler = Arc<dyn Fn(Value) -> BoxFuture<'static, Result<Vec<Content>>> + Send + Sync>;

/// Wraps an async function into a [`ToolHandler`].
pub fn tool_handler<F, Fut>(f: F) -> ToolHandler
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<Content>>> + Send + 'static,
{
    Arc::new(move |arguments| Box::pin(f(arguments)))
}
