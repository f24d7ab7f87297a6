//! Record CRUD tools.
//!
//! Tools: list_records, view_record, create_record, update_record, delete_record

use serde_json::{Map, Value as JsonValue};

use crate::api::PocketBaseApi;
use crate::error::{McpError, Result};
use crate::schema;
use crate::tools::ToolDef;
use crate::validate;

/// Tool names handled by this module.
pub const NAMES: &[&str] = &[
    "list_records",
    "view_record",
    "create_record",
    "update_record",
    "delete_record",
];

/// Get all record tool definitions.
pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            "list_records",
            "List records from a collection with optional filtering, sorting, and \
             pagination. sort prefixes fields with - for DESC (e.g. -created,title); \
             filter takes a PocketBase filter expression.",
            schema!(object {
                required: { "collection": string },
                optional: {
                    "page": integer,
                    "perPage": integer,
                    "sort": string,
                    "filter": string,
                    "expand": string,
                    "fields": string
                }
            }),
        ),
        ToolDef::new(
            "view_record",
            "View a single record by ID. expand resolves relations (e.g. \
             relField1,relField2.subRelField); fields limits the returned keys.",
            schema!(object {
                required: { "collection": string, "id": string },
                optional: { "expand": string, "fields": string }
            }),
        ),
        ToolDef::new(
            "create_record",
            "Create a new record in a collection. data holds the field values.",
            schema!(object {
                required: { "collection": string, "data": object },
                optional: { "expand": string }
            }),
        ),
        ToolDef::new(
            "update_record",
            "Update an existing record. data holds the field values to change.",
            schema!(object {
                required: { "collection": string, "id": string, "data": object },
                optional: { "expand": string }
            }),
        ),
        ToolDef::new(
            "delete_record",
            "Delete a record by ID.",
            schema!(object {
                required: { "collection": string, "id": string }
            }),
        ),
    ]
}

/// Dispatch a record tool call.
pub async fn dispatch(
    api: &mut PocketBaseApi,
    name: &str,
    args: &Map<String, JsonValue>,
) -> Result<JsonValue> {
    match name {
        "list_records" => {
            let parsed = validate::parse_list_records_args(args)?;
            api.list_records(&parsed).await
        }
        "view_record" => {
            let parsed = validate::parse_view_record_args(args)?;
            api.view_record(&parsed).await
        }
        "create_record" => {
            let parsed = validate::parse_create_record_args(args)?;
            api.create_record(&parsed).await
        }
        "update_record" => {
            let parsed = validate::parse_update_record_args(args)?;
            api.update_record(&parsed).await
        }
        "delete_record" => {
            let parsed = validate::parse_delete_record_args(args)?;
            api.delete_record(&parsed.collection, &parsed.id).await
        }
        _ => Err(McpError::UnknownTool(name.to_string())),
    }
}
