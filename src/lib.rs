//! Shared infrastructure for MCP servers.
//!
//! This crate provides reusable components for building MCP (Model Context
//! Protocol) servers, eliminating boilerplate and ensuring consistency
//! across server implementations: a use-case abstraction with an adapter to
//! the tool-call surface, bulk tool registration, a stdio server runtime and
//! configuration loading.

pub mod adapter;
pub mod base;
pub mod config;
pub mod content;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod router;
pub mod server;
pub mod tool;
pub mod transport;

// Core adapter functionality
pub use adapter::{
    AdapterError, AdapterStats, AdapterStatsSnapshot, McpAdapter, create_mcp_adapter,
    validate_use_case_result,
};
// Base classes
pub use base::{BaseUseCase, UseCaseError, UseCaseResult};
// Configuration management
pub use config::{ConfigurationError, LogFormat, McpConfig, create_config, load_dotenv_file};
pub use content::Content;
// Errors
pub use error::{BoxError, McpCommonsError, Result};
// Bulk registration functionality
pub use registry::{
    BulkRegistrationError, RegistrationSummary, ToolConfig, ToolRegistry, bulk_register_tools,
    bulk_register_tuple_format, bulk_register_with_adapter_pattern, log_registration_summary,
    register_tools, validate_tools_config,
};
pub use router::{RegistryRouter, Router, RouterExt, RouterService};
// Server utilities
pub use server::{
    McpApp, McpServerBuilder, Server, create_mcp_app, print_mcp_help, run_mcp_server,
    setup_logging,
};
pub use tool::{Tool, ToolHandler, tool_handler};
pub use transport::{ByteTransport, ServerTransport};

/// Crate version, advertised as the default server version during initialize.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
