//! Authentication and session tools.
//!
//! Tools: auth_admin, auth_user, get_auth_status, logout, set_base_url
//!
//! The last three touch only local session state and make no HTTP call.

use serde_json::{Map, Value as JsonValue};

use crate::api::PocketBaseApi;
use crate::error::{McpError, Result};
use crate::schema;
use crate::tools::ToolDef;
use crate::validate;

/// Tool names handled by this module.
pub const NAMES: &[&str] = &[
    "auth_admin",
    "auth_user",
    "get_auth_status",
    "logout",
    "set_base_url",
];

/// Get all auth tool definitions.
pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            "auth_admin",
            "Authenticate as a PocketBase superuser with email/identity and password. \
             The session token is stored for subsequent calls; the response contains \
             only a redacted token preview.",
            schema!(object {
                required: { "identity": string, "password": string }
            }),
        ),
        ToolDef::new(
            "auth_user",
            "Authenticate against an auth collection (e.g. users) with identity and \
             password. The session token is stored for subsequent calls.",
            schema!(object {
                required: { "collection": string, "identity": string, "password": string }
            }),
        ),
        ToolDef::new(
            "get_auth_status",
            "Report whether a session token is held, its redacted preview, and the \
             current PocketBase base URL. Local state only, no HTTP call.",
            schema!(object {}),
        ),
        ToolDef::new(
            "logout",
            "Clear the stored session token. Local state only, no HTTP call.",
            schema!(object {}),
        ),
        ToolDef::new(
            "set_base_url",
            "Point the server at a different PocketBase URL. The stored token is \
             kept; re-authenticate if the new instance needs a different one.",
            schema!(object {
                required: { "url": string }
            }),
        ),
    ]
}

/// Dispatch an auth tool call.
pub async fn dispatch(
    api: &mut PocketBaseApi,
    name: &str,
    args: &Map<String, JsonValue>,
) -> Result<JsonValue> {
    match name {
        "auth_admin" => {
            let parsed = validate::parse_auth_admin_args(args)?;
            api.auth_admin(&parsed).await
        }
        "auth_user" => {
            let parsed = validate::parse_auth_user_args(args)?;
            api.auth_user(&parsed).await
        }
        "get_auth_status" => Ok(api.auth_status()),
        "logout" => Ok(api.logout()),
        "set_base_url" => {
            let url = validate::require_string(args, "url")?;
            Ok(api.set_base_url(&url))
        }
        _ => Err(McpError::UnknownTool(name.to_string())),
    }
}
