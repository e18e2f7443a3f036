use std::{
    collections::HashMap,
    env,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use tracing_subscriber::EnvFilter;

#[derive(ThisError, Debug)]
pub enum ConfigurationError {
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("failed to load env file {path}: {source}")]
    Dotenv {
        path: PathBuf,
        source: dotenvy::Error,
    },
}

const ENV_SERVER_NAME: &str = "MCP_SERVER_NAME";
const ENV_SERVER_VERSION: &str = "MCP_SERVER_VERSION";
const ENV_INSTRUCTIONS: &str = "MCP_INSTRUCTIONS";
const ENV_LOG_LEVEL: &str = "MCP_LOG_LEVEL";
const ENV_LOG_FORMAT: &str = "MCP_LOG_FORMAT";
const ENV_PREFIX: &str = "MCP_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigurationError::InvalidValue {
                key: ENV_LOG_FORMAT.to_string(),
                message: format!(
                    "unknown log format '{other}', expected compact, pretty or json"
                ),
            }),
        }
    }
}

/// Runtime configuration for an MCP server built on this crate.
///
/// Unrecognized `MCP_`-prefixed environment variables are collected into
/// `extra` so servers can define their own settings without another layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpConfig {
    pub server_name: String,
    pub server_version: String,
    pub instructions: Option<String>,
    pub log_level: String,
    pub log_format: LogFormat,
    pub extra: HashMap<String, String>,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            server_name: "mcp-server".to_string(),
            server_version: crate::VERSION.to_string(),
            instructions: None,
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            extra: HashMap::new(),
        }
    }
}

impl McpConfig {
    pub fn new(server_name: impl Into<String>) -> Self {
        Self {
            server_name: server_name.into(),
            ..Default::default()
        }
    }

    /// Looks up an extra setting collected from the environment. Keys are
    /// stored lowercased without the `MCP_` prefix.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(String::as_str)
    }
}

/// Builds a config for `server_name` from defaults plus `MCP_*` environment
/// overrides. The log level and format are validated here so bad settings
/// fail at startup rather than at the first log line.
pub fn create_config(server_name: &str) -> Result<McpConfig, ConfigurationError> {
    let mut config = McpConfig::new(server_name);

    for (key, value) in env::vars() {
        match key.as_str() {
            ENV_SERVER_NAME => config.server_name = value,
            ENV_SERVER_VERSION => config.server_version = value,
            ENV_INSTRUCTIONS => config.instructions = Some(value),
            ENV_LOG_LEVEL => {
                EnvFilter::try_new(&value).map_err(|e| ConfigurationError::InvalidValue {
                    key: ENV_LOG_LEVEL.to_string(),
                    message: e.to_string(),
                })?;
                config.log_level = value;
            }
            ENV_LOG_FORMAT => config.log_format = value.parse()?,
            other if other.starts_with(ENV_PREFIX) => {
                let setting = other[ENV_PREFIX.len()..].to_ascii_lowercase();
                config.extra.insert(setting, value);
            }
            _ => {}
        }
    }

    Ok(config)
}

/// Loads environment variables from a dotenv file.
///
/// With an explicit path the file must load, otherwise this is an error.
/// Without one the default `.env` search is used and a missing file simply
/// returns `false`.
pub fn load_dotenv_file(path: Option<&Path>) -> Result<bool, ConfigurationError> {
    match path {
        Some(path) => match dotenvy::from_path(path) {
            Ok(()) => Ok(true),
            Err(source) => Err(ConfigurationError::Dotenv {
                path: path.to_path_buf(),
                source,
            }),
        },
        None => match dotenvy::dotenv() {
            Ok(_) => Ok(true),
            Err(e) if e.not_found() => Ok(false),
            Err(source) => Err(ConfigurationError::Dotenv {
                path: PathBuf::from(".env"),
                source,
            }),
        },
    }
}
