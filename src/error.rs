//! Error types for the MCP server.
//!
//! A small closed hierarchy: validation failures never reach the backend,
//! backend 401/403 responses become [`McpError::Auth`], every other backend
//! or transport failure becomes [`McpError::Api`], and anything foreign is
//! wrapped as [`McpError::Internal`] instead of being re-thrown raw.

use serde_json::{Map, Value as JsonValue};

/// MCP server errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum McpError {
    /// Malformed or missing tool arguments. Caller's fault; produced before
    /// any network call is made.
    #[error("{0}")]
    Validation(String),

    /// Unknown tool requested.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The backend rejected the request with 401 or 403.
    #[error("{message}")]
    Auth {
        /// HTTP status code (401 or 403)
        status: u16,
        /// Message extracted from the backend response body
        message: String,
        /// Raw decoded response plus method/endpoint context
        details: Option<JsonValue>,
    },

    /// Any other backend HTTP error, or a transport failure reaching it.
    #[error("{message}")]
    Api {
        /// HTTP status code, absent for transport-level failures
        status: Option<u16>,
        /// Message extracted from the backend response body
        message: String,
        /// Raw decoded response plus method/endpoint context
        details: Option<JsonValue>,
    },

    /// JSON-RPC protocol error.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// I/O error on the stdio transport.
    #[error("I/O error: {0}")]
    Io(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for McpError {
    fn from(err: std::io::Error) -> Self {
        McpError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for McpError {
    fn from(err: serde_json::Error) -> Self {
        McpError::Protocol(format!("JSON error: {}", err))
    }
}

/// JSON-RPC error codes.
pub mod rpc_codes {
    /// Parse error - Invalid JSON was received.
    pub const PARSE_ERROR: i32 = -32700;
    /// Invalid Request - The JSON sent is not a valid Request object.
    pub const INVALID_REQUEST: i32 = -32600;
    /// Method not found - The method does not exist / is not available.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid params - Invalid method parameter(s).
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal error - Internal JSON-RPC error.
    pub const INTERNAL_ERROR: i32 = -32603;
}

impl McpError {
    /// The `type` tag carried by the serialized error shape.
    pub fn type_tag(&self) -> &'static str {
        match self {
            McpError::Validation(_) | McpError::UnknownTool(_) => "validation_error",
            McpError::Auth { .. } => "auth_error",
            McpError::Api { .. } => "api_error",
            McpError::Protocol(_) | McpError::Io(_) | McpError::Internal(_) => "internal_error",
        }
    }

    /// HTTP status code associated with the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            McpError::Auth { status, .. } => Some(*status),
            McpError::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Convert to JSON-RPC error code.
    pub fn rpc_code(&self) -> i32 {
        match self {
            McpError::UnknownTool(_) => rpc_codes::METHOD_NOT_FOUND,
            McpError::Validation(_) => rpc_codes::INVALID_PARAMS,
            McpError::Protocol(_) => rpc_codes::INVALID_REQUEST,
            _ => rpc_codes::INTERNAL_ERROR,
        }
    }

    /// Serialize to the structured error shape surfaced at the tool-call
    /// boundary: `{type, message, statusCode?, details?}`.
    pub fn serialize(&self) -> JsonValue {
        let mut obj = Map::new();
        obj.insert(
            "type".to_string(),
            JsonValue::String(self.type_tag().to_string()),
        );
        obj.insert("message".to_string(), JsonValue::String(self.to_string()));
        if let Some(status) = self.status_code() {
            obj.insert("statusCode".to_string(), JsonValue::Number(status.into()));
        }
        if let McpError::Auth { details: Some(d), .. } | McpError::Api { details: Some(d), .. } =
            self
        {
            obj.insert("details".to_string(), d.clone());
        }
        JsonValue::Object(obj)
    }
}

/// Result type for MCP operations.
pub type Result<T> = std::result::Result<T, McpError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_error_serializes_without_status() {
        let err = McpError::Validation("Missing required parameter: collection".to_string());
        let json = err.serialize();
        assert_eq!(json["type"], "validation_error");
        assert_eq!(json["message"], "Missing required parameter: collection");
        assert!(json.get("statusCode").is_none());
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_auth_error_carries_status_and_details() {
        let err = McpError::Auth {
            status: 401,
            message: "The request requires valid authorization token.".to_string(),
            details: Some(json!({"method": "GET", "endpoint": "/api/collections"})),
        };
        let json = err.serialize();
        assert_eq!(json["type"], "auth_error");
        assert_eq!(json["statusCode"], 401);
        assert_eq!(json["details"]["endpoint"], "/api/collections");
    }

    #[test]
    fn test_api_error_without_status() {
        let err = McpError::Api {
            status: None,
            message: "Request failed: connection refused".to_string(),
            details: None,
        };
        let json = err.serialize();
        assert_eq!(json["type"], "api_error");
        assert!(json.get("statusCode").is_none());
    }

    #[test]
    fn test_unknown_tool_is_validation_kind() {
        let err = McpError::UnknownTool("drop_database".to_string());
        assert_eq!(err.type_tag(), "validation_error");
        assert_eq!(err.rpc_code(), rpc_codes::METHOD_NOT_FOUND);
        assert_eq!(err.to_string(), "Unknown tool: drop_database");
    }

    #[test]
    fn test_rpc_code_mapping() {
        assert_eq!(
            McpError::Validation("x".into()).rpc_code(),
            rpc_codes::INVALID_PARAMS
        );
        assert_eq!(
            McpError::Protocol("x".into()).rpc_code(),
            rpc_codes::INVALID_REQUEST
        );
        assert_eq!(
            McpError::Internal("x".into()).rpc_code(),
            rpc_codes::INTERNAL_ERROR
        );
    }
}
