//! Collection management tools.
//!
//! Tools: list_collections, view_collection, create_collection,
//!        update_collection, delete_collection, update_collection_rules

use serde_json::{Map, Value as JsonValue};

use crate::api::PocketBaseApi;
use crate::error::{McpError, Result};
use crate::schema;
use crate::tools::ToolDef;
use crate::validate;

/// Tool names handled by this module.
pub const NAMES: &[&str] = &[
    "list_collections",
    "view_collection",
    "create_collection",
    "update_collection",
    "delete_collection",
    "update_collection_rules",
];

/// Get all collection tool definitions.
pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            "list_collections",
            "List all collections as compact summaries (id, name, type, field count, \
             system flag). Use view_collection for the full schema of one collection.",
            schema!(object {}),
        ),
        ToolDef::new(
            "view_collection",
            "View a collection by name or ID, including its full field schema, rules \
             and indexes.",
            schema!(object {
                required: { "collection": string }
            }),
        ),
        ToolDef::new(
            "create_collection",
            "Create a new collection. Call get_field_schema_reference first to see \
             correct field syntax. type defaults to base. Rules use null for \
             admin-only, \"\" for public, or a filter expression.",
            schema!(object {
                required: { "name": string, "fields": array_object },
                optional: {
                    "type": string,
                    "listRule": nullable_string,
                    "viewRule": nullable_string,
                    "createRule": nullable_string,
                    "updateRule": nullable_string,
                    "deleteRule": nullable_string,
                    "indexes": array_string
                }
            }),
        ),
        ToolDef::new(
            "update_collection",
            "Update an existing collection. Pass update properties under data, or \
             directly at top-level besides collection. For schema changes, send \
             fields as the full fields array (existing fields + your changes), not \
             just the new field.",
            schema!(object {
                required: { "collection": string },
                optional: {
                    "data": object,
                    "fields": array_object,
                    "indexes": array_string,
                    "listRule": nullable_string,
                    "viewRule": nullable_string,
                    "createRule": nullable_string,
                    "updateRule": nullable_string,
                    "deleteRule": nullable_string
                }
            }),
        ),
        ToolDef::new(
            "delete_collection",
            "Delete a collection and all of its records.",
            schema!(object {
                required: { "collection": string }
            }),
        ),
        ToolDef::new(
            "update_collection_rules",
            "Update collection API rules (access control). Call get_rules_reference \
             first for syntax. Only the rule keys you pass are changed; use null for \
             admin-only, \"\" for public, or a filter expression.",
            schema!(object {
                required: { "collection": string },
                optional: {
                    "listRule": nullable_string,
                    "viewRule": nullable_string,
                    "createRule": nullable_string,
                    "updateRule": nullable_string,
                    "deleteRule": nullable_string
                }
            }),
        ),
    ]
}

/// Dispatch a collection tool call.
pub async fn dispatch(
    api: &mut PocketBaseApi,
    name: &str,
    args: &Map<String, JsonValue>,
) -> Result<JsonValue> {
    match name {
        "list_collections" => api.list_collections().await,
        "view_collection" => {
            let collection = validate::parse_collection_name(args)?;
            api.view_collection(&collection).await
        }
        "create_collection" => {
            let parsed = validate::parse_create_collection_args(args)?;
            api.create_collection(&parsed).await
        }
        "update_collection" => {
            let parsed = validate::parse_update_collection_args(args)?;
            api.update_collection(&parsed.collection, &parsed.data).await
        }
        "delete_collection" => {
            let collection = validate::parse_collection_name(args)?;
            api.delete_collection(&collection).await
        }
        "update_collection_rules" => {
            let parsed = validate::parse_update_rules_args(args)?;
            api.update_collection_rules(&parsed).await
        }
        _ => Err(McpError::UnknownTool(name.to_string())),
    }
}
