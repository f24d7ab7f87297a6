//! Tool registry and category definitions.
//!
//! Provides the infrastructure for registering and dispatching MCP tools.
//! The registry is a closed set: every name advertised in the catalog must
//! have a handler, checked once at construction rather than per call.

pub mod auth;
pub mod collections;
pub mod meta;
pub mod records;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::api::PocketBaseApi;
use crate::error::{McpError, Result};

/// A tool definition for the MCP tools/list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    /// Tool name (e.g., "list_records")
    pub name: String,
    /// Tool description
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonValue,
}

impl ToolDef {
    /// Create a new tool definition.
    pub fn new(name: &str, description: &str, input_schema: JsonValue) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

/// Registry of all available tools.
pub struct ToolRegistry {
    tools: Vec<ToolDef>,
}

impl ToolRegistry {
    /// Create a new registry with all tools registered.
    ///
    /// Panics if the advertised catalog and the registered handlers ever
    /// drift apart; that is a programming error caught at startup.
    pub fn new() -> Self {
        let mut tools = Vec::new();
        tools.extend(meta::tools());
        tools.extend(auth::tools());
        tools.extend(collections::tools());
        tools.extend(records::tools());

        let handled: HashSet<&str> = meta::NAMES
            .iter()
            .chain(auth::NAMES)
            .chain(collections::NAMES)
            .chain(records::NAMES)
            .copied()
            .collect();
        for tool in &tools {
            assert!(
                handled.contains(tool.name.as_str()),
                "tool '{}' is advertised but has no handler",
                tool.name
            );
        }
        assert_eq!(
            handled.len(),
            tools.len(),
            "a handler is registered for an unadvertised tool"
        );

        Self { tools }
    }

    /// Get all tool definitions.
    pub fn tools(&self) -> &[ToolDef] {
        &self.tools
    }

    /// Dispatch a tool call to the appropriate handler.
    ///
    /// Unknown names fail with a validation-kind error naming the tool;
    /// known names run validator + facade call and return the result as-is.
    pub async fn dispatch(
        &self,
        api: &mut PocketBaseApi,
        name: &str,
        args: &Map<String, JsonValue>,
    ) -> Result<JsonValue> {
        if meta::NAMES.contains(&name) {
            meta::dispatch(api, name, args).await
        } else if auth::NAMES.contains(&name) {
            auth::dispatch(api, name, args).await
        } else if collections::NAMES.contains(&name) {
            collections::dispatch(api, name, args).await
        } else if records::NAMES.contains(&name) {
            records::dispatch(api, name, args).await
        } else {
            Err(McpError::UnknownTool(name.to_string()))
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper macro for creating JSON Schema for tool input parameters.
#[macro_export]
macro_rules! schema {
    // Object with required and optional properties
    (object {
        required: { $($req_name:literal : $req_type:tt),* $(,)? },
        optional: { $($opt_name:literal : $opt_type:tt),* $(,)? }
    }) => {{
        let mut required = Vec::new();
        $(required.push($req_name);)*

        let mut props = serde_json::Map::new();
        $(props.insert($req_name.to_string(), schema!(@type $req_type));)*
        $(props.insert($opt_name.to_string(), schema!(@type $opt_type));)*

        serde_json::json!({
            "type": "object",
            "properties": props,
            "required": required
        })
    }};

    // Object with only required properties
    (object {
        required: { $($req_name:literal : $req_type:tt),* $(,)? }
    }) => {{
        let mut required = Vec::new();
        $(required.push($req_name);)*

        let mut props = serde_json::Map::new();
        $(props.insert($req_name.to_string(), schema!(@type $req_type));)*

        serde_json::json!({
            "type": "object",
            "properties": props,
            "required": required
        })
    }};

    // Object with only optional properties
    (object {
        optional: { $($opt_name:literal : $opt_type:tt),* $(,)? }
    }) => {{
        let mut props = serde_json::Map::new();
        $(props.insert($opt_name.to_string(), schema!(@type $opt_type));)*

        serde_json::json!({
            "type": "object",
            "properties": props,
            "required": []
        })
    }};

    // Empty object (no parameters)
    (object {}) => {{
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }};

    // Type mappings
    (@type string) => { serde_json::json!({"type": "string"}) };
    (@type nullable_string) => { serde_json::json!({"type": ["string", "null"]}) };
    (@type number) => { serde_json::json!({"type": "number"}) };
    (@type integer) => { serde_json::json!({"type": "integer"}) };
    (@type boolean) => { serde_json::json!({"type": "boolean"}) };
    (@type object) => { serde_json::json!({"type": "object"}) };
    (@type any) => { serde_json::json!({}) };
    (@type array_string) => { serde_json::json!({"type": "array", "items": {"type": "string"}}) };
    (@type array_object) => { serde_json::json!({"type": "array", "items": {"type": "object"}}) };
}
