//! Tool argument validation.
//!
//! Every tool call arrives as an untrusted JSON argument bag. The parsers
//! here turn that bag into a strictly-typed, backend-ready argument struct
//! or fail fast with a precise validation error, before any network call.
//!
//! Presence and value are distinct: rule fields treat an explicit `null`
//! as a meaningful value (locked rule), different from an omitted key.

use serde_json::{Map, Value as JsonValue};

use crate::error::{McpError, Result};

/// The five collection access-rule keys, in their fixed order.
pub const RULE_KEYS: [&str; 5] = [
    "listRule",
    "viewRule",
    "createRule",
    "updateRule",
    "deleteRule",
];

/// Collection types accepted by the backend.
const COLLECTION_TYPES: [&str; 3] = ["base", "auth", "view"];

fn validation(message: String) -> McpError {
    McpError::Validation(message)
}

/// Required non-empty string. Missing and `null` are both "missing".
pub fn require_string(args: &Map<String, JsonValue>, name: &str) -> Result<String> {
    match args.get(name) {
        None | Some(JsonValue::Null) => {
            Err(validation(format!("Missing required parameter: {}", name)))
        }
        Some(JsonValue::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(_) => Err(validation(format!(
            "Invalid parameter: {} must be a non-empty string",
            name
        ))),
    }
}

/// Optional string. Absent passes through; present-but-not-a-string fails,
/// including an explicit `null`.
pub fn optional_string(args: &Map<String, JsonValue>, name: &str) -> Result<Option<String>> {
    match args.get(name) {
        None => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(validation(format!(
            "Invalid parameter: {} must be a string",
            name
        ))),
    }
}

/// Optional string where `null` is a valid, distinct value.
///
/// Returns `None` when the key is absent, `Some(Null)` for an explicit
/// `null`, `Some(String)` otherwise.
pub fn optional_nullable_string(
    args: &Map<String, JsonValue>,
    name: &str,
) -> Result<Option<JsonValue>> {
    match args.get(name) {
        None => Ok(None),
        Some(v @ (JsonValue::Null | JsonValue::String(_))) => Ok(Some(v.clone())),
        Some(_) => Err(validation(format!(
            "Invalid parameter: {} must be a string or null",
            name
        ))),
    }
}

/// Optional integer. Rejects floats and numeric strings; a caller sending
/// `"1"` for `page` gets a validation error, not silent coercion.
pub fn optional_integer(args: &Map<String, JsonValue>, name: &str) -> Result<Option<i64>> {
    match args.get(name) {
        None => Ok(None),
        Some(JsonValue::Number(n)) if n.is_i64() || n.is_u64() => Ok(n.as_i64()),
        Some(_) => Err(validation(format!(
            "Invalid parameter: {} must be an integer",
            name
        ))),
    }
}

/// Required plain object. Missing and `null` are "missing"; arrays and
/// scalars are invalid.
pub fn require_object(
    args: &Map<String, JsonValue>,
    name: &str,
) -> Result<Map<String, JsonValue>> {
    match args.get(name) {
        None | Some(JsonValue::Null) => {
            Err(validation(format!("Missing required parameter: {}", name)))
        }
        Some(JsonValue::Object(obj)) => Ok(obj.clone()),
        Some(_) => Err(validation(format!(
            "Invalid parameter: {} must be an object",
            name
        ))),
    }
}

/// Structural check: an array whose elements are all plain objects.
pub fn check_object_array(value: Option<&JsonValue>, name: &str) -> Result<Vec<JsonValue>> {
    match value {
        Some(JsonValue::Array(items)) if items.iter().all(JsonValue::is_object) => {
            Ok(items.clone())
        }
        _ => Err(validation(format!(
            "Invalid parameter: {} must be an array of objects",
            name
        ))),
    }
}

/// Structural check: an array whose elements are all strings.
pub fn check_string_array(value: Option<&JsonValue>, name: &str) -> Result<Vec<String>> {
    let items = match value {
        Some(JsonValue::Array(items)) => items,
        _ => {
            return Err(validation(format!(
                "Invalid parameter: {} must be an array of strings",
                name
            )))
        }
    };
    items
        .iter()
        .map(|item| {
            item.as_str().map(|s| s.to_string()).ok_or_else(|| {
                validation(format!(
                    "Invalid parameter: {} must be an array of strings",
                    name
                ))
            })
        })
        .collect()
}

/// Read the rule keys that are explicitly present in `args`.
///
/// Presence, not value, drives inclusion: an explicit `null` or `""` is
/// carried through, an omitted key is not.
pub fn rule_values(args: &Map<String, JsonValue>) -> Result<Map<String, JsonValue>> {
    let mut rules = Map::new();
    for rule in RULE_KEYS {
        if let Some(value) = optional_nullable_string(args, rule)? {
            rules.insert(rule.to_string(), value);
        }
    }
    Ok(rules)
}

/// Parsed `auth_admin` arguments.
#[derive(Debug)]
pub struct AuthAdminArgs {
    pub identity: String,
    pub password: String,
}

/// Parsed `auth_user` arguments.
#[derive(Debug)]
pub struct AuthUserArgs {
    pub collection: String,
    pub identity: String,
    pub password: String,
}

/// Parsed `create_collection` arguments.
#[derive(Debug)]
pub struct CreateCollectionArgs {
    pub name: String,
    /// `base`, `auth` or `view`; the backend default (`base`) applies when absent.
    pub collection_type: Option<String>,
    pub fields: Vec<JsonValue>,
    /// Rule keys explicitly supplied by the caller (values are string or null).
    pub rules: Map<String, JsonValue>,
    pub indexes: Option<Vec<String>>,
}

/// Parsed `update_collection` arguments. `data` is the complete PATCH
/// payload; for schema changes it must carry the full `fields` array.
#[derive(Debug)]
pub struct UpdateCollectionArgs {
    pub collection: String,
    pub data: Map<String, JsonValue>,
}

/// Parsed `update_collection_rules` arguments.
#[derive(Debug)]
pub struct UpdateRulesArgs {
    pub collection: String,
    /// Rule keys explicitly supplied by the caller (values are string or null).
    pub rules: Map<String, JsonValue>,
}

/// Parsed `list_records` arguments.
#[derive(Debug)]
pub struct ListRecordsArgs {
    pub collection: String,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub sort: Option<String>,
    pub filter: Option<String>,
    pub expand: Option<String>,
    pub fields: Option<String>,
}

/// Parsed `view_record` arguments.
#[derive(Debug)]
pub struct ViewRecordArgs {
    pub collection: String,
    pub id: String,
    pub expand: Option<String>,
    pub fields: Option<String>,
}

/// Parsed `create_record` arguments.
#[derive(Debug)]
pub struct CreateRecordArgs {
    pub collection: String,
    pub data: Map<String, JsonValue>,
    pub expand: Option<String>,
}

/// Parsed `update_record` arguments.
#[derive(Debug)]
pub struct UpdateRecordArgs {
    pub collection: String,
    pub id: String,
    pub data: Map<String, JsonValue>,
    pub expand: Option<String>,
}

/// Parsed `delete_record` arguments.
#[derive(Debug)]
pub struct DeleteRecordArgs {
    pub collection: String,
    pub id: String,
}

/// The `collection` parameter shared by most collection/record tools.
pub fn parse_collection_name(args: &Map<String, JsonValue>) -> Result<String> {
    require_string(args, "collection")
}

/// Parse `auth_admin` arguments.
pub fn parse_auth_admin_args(args: &Map<String, JsonValue>) -> Result<AuthAdminArgs> {
    Ok(AuthAdminArgs {
        identity: require_string(args, "identity")?,
        password: require_string(args, "password")?,
    })
}

/// Parse `auth_user` arguments.
pub fn parse_auth_user_args(args: &Map<String, JsonValue>) -> Result<AuthUserArgs> {
    Ok(AuthUserArgs {
        collection: require_string(args, "collection")?,
        identity: require_string(args, "identity")?,
        password: require_string(args, "password")?,
    })
}

/// Parse `create_collection` arguments. A missing `fields` key fails the
/// array-of-objects check, same as a malformed one.
pub fn parse_create_collection_args(args: &Map<String, JsonValue>) -> Result<CreateCollectionArgs> {
    let name = require_string(args, "name")?;
    let fields = check_object_array(args.get("fields"), "fields")?;
    let rules = rule_values(args)?;

    let collection_type = match args.get("type") {
        None => None,
        Some(v) => match v.as_str() {
            Some(t) if COLLECTION_TYPES.contains(&t) => Some(t.to_string()),
            _ => {
                return Err(validation(
                    "Invalid parameter: type must be one of base, auth, or view".to_string(),
                ))
            }
        },
    };

    let indexes = match args.get("indexes") {
        None => None,
        Some(v) => Some(check_string_array(Some(v), "indexes")?),
    };

    Ok(CreateCollectionArgs {
        name,
        collection_type,
        fields,
        rules,
        indexes,
    })
}

/// `update_collection` accepts two shapes: a nested `data` object, or the
/// update keys at top level next to `collection`. With nested `data`, the
/// convenience keys (`fields`, `indexes`, the five rules) are merged in
/// only where `data` does not already define them; `data` wins ties.
pub fn parse_update_collection_args(args: &Map<String, JsonValue>) -> Result<UpdateCollectionArgs> {
    let collection = parse_collection_name(args)?;

    let data = match args.get("data") {
        None => {
            let mut data = args.clone();
            data.remove("collection");
            data
        }
        Some(_) => {
            let mut data = require_object(args, "data")?;
            for key in ["fields", "indexes"].iter().chain(RULE_KEYS.iter()) {
                if let Some(value) = args.get(*key) {
                    if !data.contains_key(*key) {
                        data.insert((*key).to_string(), value.clone());
                    }
                }
            }
            data
        }
    };

    if data.is_empty() {
        return Err(validation(
            "Missing update payload. Provide update properties under data or at top-level \
             (besides collection). For schema changes, send fields as the full fields array \
             (existing fields + your changes)."
                .to_string(),
        ));
    }

    if let Some(fields) = data.get("fields") {
        check_object_array(Some(fields), "fields")?;
    }
    if let Some(indexes) = data.get("indexes") {
        check_string_array(Some(indexes), "indexes")?;
    }
    for rule in RULE_KEYS {
        optional_nullable_string(&data, rule)?;
    }

    Ok(UpdateCollectionArgs { collection, data })
}

/// Parse `update_collection_rules` arguments.
pub fn parse_update_rules_args(args: &Map<String, JsonValue>) -> Result<UpdateRulesArgs> {
    Ok(UpdateRulesArgs {
        collection: parse_collection_name(args)?,
        rules: rule_values(args)?,
    })
}

/// Parse `list_records` arguments.
pub fn parse_list_records_args(args: &Map<String, JsonValue>) -> Result<ListRecordsArgs> {
    Ok(ListRecordsArgs {
        collection: require_string(args, "collection")?,
        page: optional_integer(args, "page")?,
        per_page: optional_integer(args, "perPage")?,
        sort: optional_string(args, "sort")?,
        filter: optional_string(args, "filter")?,
        expand: optional_string(args, "expand")?,
        fields: optional_string(args, "fields")?,
    })
}

/// Parse `view_record` arguments.
pub fn parse_view_record_args(args: &Map<String, JsonValue>) -> Result<ViewRecordArgs> {
    Ok(ViewRecordArgs {
        collection: require_string(args, "collection")?,
        id: require_string(args, "id")?,
        expand: optional_string(args, "expand")?,
        fields: optional_string(args, "fields")?,
    })
}

/// Parse `create_record` arguments.
pub fn parse_create_record_args(args: &Map<String, JsonValue>) -> Result<CreateRecordArgs> {
    Ok(CreateRecordArgs {
        collection: require_string(args, "collection")?,
        data: require_object(args, "data")?,
        expand: optional_string(args, "expand")?,
    })
}

/// Parse `update_record` arguments.
pub fn parse_update_record_args(args: &Map<String, JsonValue>) -> Result<UpdateRecordArgs> {
    Ok(UpdateRecordArgs {
        collection: require_string(args, "collection")?,
        id: require_string(args, "id")?,
        data: require_object(args, "data")?,
        expand: optional_string(args, "expand")?,
    })
}

/// Parse `delete_record` arguments.
pub fn parse_delete_record_args(args: &Map<String, JsonValue>) -> Result<DeleteRecordArgs> {
    Ok(DeleteRecordArgs {
        collection: require_string(args, "collection")?,
        id: require_string(args, "id")?,
    })
}
