use std::io;

use thiserror::Error as ThisError;

use crate::{
    adapter::AdapterError, base::UseCaseError, config::ConfigurationError,
    registry::BulkRegistrationError,
};

/// Top level error for the commons crate. Domain errors from the adapter,
/// registry, use-case and config layers all convert into it.
#[derive(ThisError, Debug)]
pub enum McpCommonsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("serde_json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid UTF-8 sequence: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid message format: {0}")]
    InvalidMessage(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("unknown tool: {0}")]
    ToolNotFound(String),

    #[error("system error: {0}")]
    System(String),

    #[error(transparent)]
    UseCase(#[from] UseCaseError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error(transparent)]
    Registration(#[from] BulkRegistrationError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

pub type Result<T> = core::result::Result<T, McpCommonsError>;

pub type BoxError = Box<dyn std::error::Error + Sync + Send>;
