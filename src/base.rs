use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum UseCaseError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("execution failed: {0}")]
    Execution(String),

    #[error("serde_json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outcome of a use-case execution, before it is adapted to the protocol
/// content types. A success carries data, a failure carries an error message.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UseCaseResult {
    pub success: bool,
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl UseCaseResult {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data,
            error: None,
            metadata: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Value::Null,
            error: Some(message.into()),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }
}

/// A named unit of business logic that can be exposed as an MCP tool.
///
/// Implementations supply their own tool metadata so they can be registered
/// without a separate configuration entry, see
/// [`bulk_register_with_adapter_pattern`](crate::registry::bulk_register_with_adapter_pattern).
#[async_trait]
pub trait BaseUseCase: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema for the tool arguments. Defaults to an empty object schema.
    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(&self, params: Value) -> Result<UseCaseResult, UseCaseError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_ok_result() {
        let result = UseCaseResult::ok(json!({"answer": 42}));
        assert!(result.success);
        assert!(result.error.is_none());
        assert_eq!(result.data, json!({"answer": 42}));
    }

    #[test]
    fn test_fail_result() {
        let result = UseCaseResult::fail("boom");
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("boom"));
        assert_eq!(result.data, Value::Null);
    }

    #[test]
    fn test_metadata_accumulates() {
        let result = UseCaseResult::ok(Value::Null)
            .with_metadata("elapsed_ms", json!(12))
            .with_metadata("source", json!("cache"));
        let metadata = result.metadata.unwrap();
        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata["source"], json!("cache"));
    }

    #[test]
    fn test_result_serialization_skips_empty_fields() {
        let value = serde_json::to_value(UseCaseResult::ok(json!("done"))).unwrap();
        assert_eq!(value, json!({"success": true, "data": "done"}));
    }
}
