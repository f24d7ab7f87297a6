//! Meta tools: health check and static reference payloads.
//!
//! Tools: health, get_field_schema_reference, get_rules_reference

use serde_json::{Map, Value as JsonValue};

use crate::api::PocketBaseApi;
use crate::error::{McpError, Result};
use crate::reference;
use crate::schema;
use crate::tools::ToolDef;

/// Tool names handled by this module.
pub const NAMES: &[&str] = &["health", "get_field_schema_reference", "get_rules_reference"];

/// Get all meta tool definitions.
pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            "health",
            "Check PocketBase server health status.",
            schema!(object {}),
        ),
        ToolDef::new(
            "get_field_schema_reference",
            "Get PocketBase collection field schema reference. Call this before \
             create_collection to see correct field syntax for all field types.",
            schema!(object {}),
        ),
        ToolDef::new(
            "get_rules_reference",
            "Get API rules syntax reference. Call this BEFORE update_collection_rules \
             to understand filter syntax, operators, modifiers, and macros.",
            schema!(object {}),
        ),
    ]
}

/// Dispatch a meta tool call.
pub async fn dispatch(
    api: &mut PocketBaseApi,
    name: &str,
    _args: &Map<String, JsonValue>,
) -> Result<JsonValue> {
    match name {
        "health" => api.health().await,
        "get_field_schema_reference" => Ok(reference::field_schema_reference()),
        "get_rules_reference" => Ok(reference::rules_reference()),
        _ => Err(McpError::UnknownTool(name.to_string())),
    }
}
