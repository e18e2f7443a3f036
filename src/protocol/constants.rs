/// Field name carrying the JSON-RPC version in every message.
pub const JSONRPC_VERSION_FIELD: &str = "jsonrpc";

/// The only JSON-RPC version this crate speaks.
pub const JSONRPC_EXPECTED_VERSION: &str = "2.0";

/// MCP protocol revision advertised during initialize.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;
