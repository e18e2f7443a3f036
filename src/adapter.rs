use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error as ThisError;

use crate::{
    base::{BaseUseCase, UseCaseResult},
    content::Content,
    error::McpCommonsError,
    tool::ToolHandler,
};

#[derive(ThisError, Debug)]
pub enum AdapterError {
    #[error("use case '{name}' failed: {message}")]
    UseCaseFailed { name: String, message: String },

    #[error("invalid use case result: {0}")]
    InvalidResult(String),
}

/// Per-adapter invocation counters. Shared behind an `Arc`, so callers can
/// keep reading statistics after the adapter has been turned into a handler.
#[derive(Debug, Default)]
pub struct AdapterStats {
    invocations: AtomicU64,
    failures: AtomicU64,
    total_elapsed_micros: AtomicU64,
    last_invocation: Mutex<Option<DateTime<Utc>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdapterStatsSnapshot {
    pub invocations: u64,
    pub failures: u64,
    pub total_elapsed_micros: u64,
    pub last_invocation: Option<DateTime<Utc>>,
}

impl AdapterStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, elapsed: Duration, failed: bool) {
        self.invocations.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
        self.total_elapsed_micros
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
        if let Ok(mut last) = self.last_invocation.lock() {
            *last = Some(Utc::now());
        }
    }

    pub fn snapshot(&self) -> AdapterStatsSnapshot {
        AdapterStatsSnapshot {
            invocations: self.invocations.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            total_elapsed_micros: self.total_elapsed_micros.load(Ordering::Relaxed),
            last_invocation: self.last_invocation.lock().ok().and_then(|l| *l),
        }
    }
}

/// Checks that a [`UseCaseResult`] is internally consistent before it is
/// turned into protocol content: a success must not carry an error message
/// and a failure must carry one.
pub fn validate_use_case_result(result: &UseCaseResult) -> Result<(), AdapterError> {
    if result.success && result.error.is_some() {
        return Err(AdapterError::InvalidResult(
            "success result carries an error message".into(),
        ));
    }
    if !result.success && result.error.is_none() {
        return Err(AdapterError::InvalidResult(
            "failure result carries no error message".into(),
        ));
    }
    Ok(())
}

/// Bridges a [`BaseUseCase`] to the MCP tool-call surface: executes the use
/// case, validates its result, converts it to [`Content`] and records stats.
pub struct McpAdapter {
    use_case: Arc<dyn BaseUseCase>,
    stats: Arc<AdapterStats>,
}

pub fn create_mcp_adapter(use_case: Arc<dyn BaseUseCase>) -> McpAdapter {
    McpAdapter::new(use_case)
}

impl McpAdapter {
    pub fn new(use_case: Arc<dyn BaseUseCase>) -> Self {
        Self {
            use_case,
            stats: Arc::new(AdapterStats::new()),
        }
    }

    pub fn name(&self) -> &str {
        self.use_case.name()
    }

    pub fn stats(&self) -> Arc<AdapterStats> {
        self.stats.clone()
    }

    pub async fn call(&self, arguments: Value) -> Result<Vec<Content>, McpCommonsError> {
        let start = Instant::now();
        let outcome = self.use_case.execute(arguments).await;

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                self.stats.record(start.elapsed(), true);
                tracing::warn!(use_case = %self.use_case.name(), error = %e, "use case errored");
                return Err(e.into());
            }
        };

        if let Err(e) = validate_use_case_result(&result) {
            self.stats.record(start.elapsed(), true);
            return Err(e.into());
        }

        if !result.success {
            self.stats.record(start.elapsed(), true);
            let message = result.error.unwrap_or_default();
            tracing::debug!(use_case = %self.use_case.name(), %message, "use case reported failure");
            return Err(AdapterError::UseCaseFailed {
                name: self.use_case.name().to_string(),
                message,
            }
            .into());
        }

        // Every exit path records exactly once, including this one.
        let content = match Content::json(&result.data) {
            Ok(content) => content,
            Err(e) => {
                self.stats.record(start.elapsed(), true);
                return Err(e.into());
            }
        };
        self.stats.record(start.elapsed(), false);
        Ok(vec![content])
    }

    /// Consumes the adapter and returns a [`ToolHandler`] suitable for
    /// registration. The stats handle stays valid, grab it first if needed.
    pub fn into_handler(self) -> ToolHandler {
        let adapter = Arc::new(self);
        Arc::new(move |arguments| {
            let adapter = adapter.clone();
            Box::pin(async move { adapter.call(arguments).await })
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::{base::UseCaseError, error::McpCommonsError};

    struct EchoUseCase;

    #[async_trait]
    impl BaseUseCase for EchoUseCase {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the message argument back"
        }

        async fn execute(&self, params: Value) -> Result<UseCaseResult, UseCaseError> {
            match params.get("message").and_then(Value::as_str) {
                Some(message) => Ok(UseCaseResult::ok(json!(message))),
                None => Ok(UseCaseResult::fail("missing 'message' argument")),
            }
        }
    }

    #[test]
    fn test_validate_rejects_inconsistent_results() {
        let mut result = UseCaseResult::ok(Value::Null);
        result.error = Some("should not be here".into());
        assert!(validate_use_case_result(&result).is_err());

        let mut result = UseCaseResult::fail("x");
        result.error = None;
        assert!(validate_use_case_result(&result).is_err());

        assert!(validate_use_case_result(&UseCaseResult::ok(Value::Null)).is_ok());
        assert!(validate_use_case_result(&UseCaseResult::fail("x")).is_ok());
    }

    #[tokio::test]
    async fn test_adapter_success_produces_text_content() {
        let adapter = create_mcp_adapter(Arc::new(EchoUseCase));
        let content = adapter.call(json!({"message": "hi"})).await.unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0].as_text(), Some("hi"));
    }

    #[tokio::test]
    async fn test_adapter_failure_surfaces_as_error() {
        let adapter = create_mcp_adapter(Arc::new(EchoUseCase));
        let err = adapter.call(json!({})).await.unwrap_err();
        match err {
            McpCommonsError::Adapter(AdapterError::UseCaseFailed { name, message }) => {
                assert_eq!(name, "echo");
                assert!(message.contains("message"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_adapter_stats_track_invocations() {
        let adapter = create_mcp_adapter(Arc::new(EchoUseCase));
        let stats = adapter.stats();

        adapter.call(json!({"message": "one"})).await.unwrap();
        adapter.call(json!({})).await.unwrap_err();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.invocations, 2);
        assert_eq!(snapshot.failures, 1);
        assert!(snapshot.last_invocation.is_some());
    }

    #[tokio::test]
    async fn test_into_handler_keeps_stats_alive() {
        let adapter = create_mcp_adapter(Arc::new(EchoUseCase));
        let stats = adapter.stats();
        let handler = adapter.into_handler();

        handler(json!({"message": "still here"})).await.unwrap();
        assert_eq!(stats.snapshot().invocations, 1);
    }
}
