//! PocketBase API facade.
//!
//! One method per backend capability. Each method is path templating plus
//! one [`HttpClient`] call plus light response reshaping; no record data is
//! cached or transformed beyond that.

use reqwest::Method;
use serde_json::{json, Map, Value as JsonValue};

use crate::error::{McpError, Result};
use crate::http::HttpClient;
use crate::validate::{
    AuthAdminArgs, AuthUserArgs, CreateCollectionArgs, CreateRecordArgs, ListRecordsArgs,
    UpdateRecordArgs, UpdateRulesArgs, ViewRecordArgs, RULE_KEYS,
};

/// URI prefix for MCP collection resources.
const RESOURCE_URI_PREFIX: &str = "pocketbase://collection/";

/// Typed facade over the PocketBase HTTP API.
pub struct PocketBaseApi {
    http: HttpClient,
}

impl PocketBaseApi {
    /// Wrap an HTTP client.
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Access the underlying HTTP client (session state).
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Redacted display form of a token: first 8 + last 4 characters, or
    /// first 4 + ellipsis for short tokens. Never the full token.
    fn token_preview(token: Option<&str>) -> JsonValue {
        match token {
            None => JsonValue::Null,
            Some(token) => {
                let chars: Vec<char> = token.chars().collect();
                let preview = if chars.len() <= 12 {
                    format!("{}...", chars.iter().take(4).collect::<String>())
                } else {
                    format!(
                        "{}...{}",
                        chars[..8].iter().collect::<String>(),
                        chars[chars.len() - 4..].iter().collect::<String>()
                    )
                };
                JsonValue::String(preview)
            }
        }
    }

    fn collection_endpoint(collection: &str) -> String {
        format!("/api/collections/{}", urlencoding::encode(collection))
    }

    fn records_endpoint(collection: &str) -> String {
        format!("{}/records", Self::collection_endpoint(collection))
    }

    fn record_endpoint(collection: &str, id: &str) -> String {
        format!(
            "{}/records/{}",
            Self::collection_endpoint(collection),
            urlencoding::encode(id)
        )
    }

    /// Authenticate as a superuser; stores the token on success.
    pub async fn auth_admin(&mut self, args: &AuthAdminArgs) -> Result<JsonValue> {
        let result = self
            .http
            .request(
                Method::POST,
                "/api/collections/_superusers/auth-with-password",
                Some(&json!({ "identity": args.identity, "password": args.password })),
                &[],
                false,
            )
            .await?;

        let token = result
            .get("token")
            .and_then(|t| t.as_str())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string());
        self.http.set_token(token);

        Ok(json!({
            "authenticated": self.http.token().is_some(),
            "mode": "admin",
            "tokenPreview": Self::token_preview(self.http.token()),
            "record": result.get("record").cloned().unwrap_or(JsonValue::Null),
        }))
    }

    /// Authenticate against an auth collection; stores the token on success.
    pub async fn auth_user(&mut self, args: &AuthUserArgs) -> Result<JsonValue> {
        let endpoint = format!(
            "{}/auth-with-password",
            Self::collection_endpoint(&args.collection)
        );
        let result = self
            .http
            .request(
                Method::POST,
                &endpoint,
                Some(&json!({ "identity": args.identity, "password": args.password })),
                &[],
                false,
            )
            .await?;

        let token = result
            .get("token")
            .and_then(|t| t.as_str())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string());
        self.http.set_token(token);

        Ok(json!({
            "authenticated": self.http.token().is_some(),
            "mode": "user",
            "collection": args.collection,
            "tokenPreview": Self::token_preview(self.http.token()),
            "record": result.get("record").cloned().unwrap_or(JsonValue::Null),
        }))
    }

    /// Read-only auth status. No HTTP call.
    pub fn auth_status(&self) -> JsonValue {
        json!({
            "authenticated": self.http.token().is_some(),
            "tokenPreview": Self::token_preview(self.http.token()),
            "baseUrl": self.http.base_url(),
        })
    }

    /// Clear the stored token. No HTTP call.
    pub fn logout(&mut self) -> JsonValue {
        self.http.clear_token();
        json!({
            "message": "Authentication session cleared",
            "authenticated": false,
        })
    }

    /// Point at a different PocketBase instance. Keeps the stored token.
    pub fn set_base_url(&mut self, url: &str) -> JsonValue {
        self.http.set_base_url(url);
        json!({
            "message": "PocketBase URL updated. Re-authenticate if needed.",
            "baseUrl": self.http.base_url(),
            "authenticated": self.http.token().is_some(),
        })
    }

    /// Backend health check.
    pub async fn health(&self) -> Result<JsonValue> {
        self.http
            .request(Method::GET, "/api/health", None, &[], true)
            .await
    }

    /// List collections, trimmed to a compact summary per item. The full
    /// field and rule detail stays available via [`Self::view_collection`].
    pub async fn list_collections(&self) -> Result<JsonValue> {
        let result = self
            .http
            .request(Method::GET, "/api/collections", None, &[], true)
            .await?;

        let items: Vec<JsonValue> = result
            .get("items")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .map(|col| {
                        json!({
                            "id": col.get("id").cloned().unwrap_or(JsonValue::Null),
                            "name": col.get("name").cloned().unwrap_or(JsonValue::Null),
                            "type": col.get("type").cloned().unwrap_or(JsonValue::Null),
                            "fields": col
                                .get("fields")
                                .and_then(|f| f.as_array())
                                .map(|f| f.len())
                                .unwrap_or(0),
                            "system": col
                                .get("system")
                                .and_then(|s| s.as_bool())
                                .unwrap_or(false),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(json!({
            "page": result.get("page"),
            "perPage": result.get("perPage"),
            "totalItems": result.get("totalItems"),
            "totalPages": result.get("totalPages"),
            "items": items,
        }))
    }

    /// Fetch one collection, untouched.
    pub async fn view_collection(&self, collection: &str) -> Result<JsonValue> {
        self.http
            .request(
                Method::GET,
                &Self::collection_endpoint(collection),
                None,
                &[],
                true,
            )
            .await
    }

    /// Create a collection. Optional keys the caller omitted are never
    /// sent, letting the backend apply its own defaults.
    pub async fn create_collection(&self, args: &CreateCollectionArgs) -> Result<JsonValue> {
        let mut payload = Map::new();
        payload.insert("name".to_string(), json!(args.name));
        payload.insert(
            "type".to_string(),
            json!(args.collection_type.as_deref().unwrap_or("base")),
        );
        payload.insert("fields".to_string(), JsonValue::Array(args.fields.clone()));
        for (key, value) in &args.rules {
            payload.insert(key.clone(), value.clone());
        }
        if let Some(indexes) = &args.indexes {
            if !indexes.is_empty() {
                payload.insert("indexes".to_string(), json!(indexes));
            }
        }

        self.http
            .request(
                Method::POST,
                "/api/collections",
                Some(&JsonValue::Object(payload)),
                &[],
                true,
            )
            .await
    }

    /// PATCH a collection with the caller-supplied payload, verbatim.
    ///
    /// Full-replacement semantics for any key included; a `fields` key must
    /// be the complete field array, not a delta. This layer computes no merge.
    pub async fn update_collection(
        &self,
        collection: &str,
        data: &Map<String, JsonValue>,
    ) -> Result<JsonValue> {
        self.http
            .request(
                Method::PATCH,
                &Self::collection_endpoint(collection),
                Some(&JsonValue::Object(data.clone())),
                &[],
                true,
            )
            .await
    }

    /// Delete a collection.
    pub async fn delete_collection(&self, collection: &str) -> Result<JsonValue> {
        self.http
            .request(
                Method::DELETE,
                &Self::collection_endpoint(collection),
                None,
                &[],
                true,
            )
            .await?;
        Ok(json!({ "message": "Collection deleted successfully" }))
    }

    /// PATCH only the rule keys the caller explicitly supplied. With none
    /// supplied this is a no-op: no HTTP call is made.
    pub async fn update_collection_rules(&self, args: &UpdateRulesArgs) -> Result<JsonValue> {
        if args.rules.is_empty() {
            return Ok(json!({
                "message": "No rules specified to update",
                "collection": args.collection,
                "updatedRules": [],
                "currentRules": {},
            }));
        }

        let result = self
            .http
            .request(
                Method::PATCH,
                &Self::collection_endpoint(&args.collection),
                Some(&JsonValue::Object(args.rules.clone())),
                &[],
                true,
            )
            .await?;

        let updated: Vec<&str> = RULE_KEYS
            .iter()
            .filter(|rule| args.rules.contains_key(**rule))
            .copied()
            .collect();
        let mut current = Map::new();
        for rule in RULE_KEYS {
            current.insert(
                rule.to_string(),
                result.get(rule).cloned().unwrap_or(JsonValue::Null),
            );
        }

        Ok(json!({
            "message": "Collection rules updated successfully",
            "collection": args.collection,
            "updatedRules": updated,
            "currentRules": current,
        }))
    }

    /// List records with pagination/filter options forwarded as query
    /// parameters. Only defined, non-empty options are sent.
    pub async fn list_records(&self, args: &ListRecordsArgs) -> Result<JsonValue> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(page) = args.page {
            query.push(("page", page.to_string()));
        }
        if let Some(per_page) = args.per_page {
            query.push(("perPage", per_page.to_string()));
        }
        for (key, value) in [
            ("sort", &args.sort),
            ("filter", &args.filter),
            ("expand", &args.expand),
            ("fields", &args.fields),
        ] {
            if let Some(value) = value {
                query.push((key, value.clone()));
            }
        }

        self.http
            .request(
                Method::GET,
                &Self::records_endpoint(&args.collection),
                None,
                &query,
                true,
            )
            .await
    }

    /// Fetch one record.
    pub async fn view_record(&self, args: &ViewRecordArgs) -> Result<JsonValue> {
        let mut query: Vec<(&str, String)> = Vec::new();
        for (key, value) in [("expand", &args.expand), ("fields", &args.fields)] {
            if let Some(value) = value {
                query.push((key, value.clone()));
            }
        }

        self.http
            .request(
                Method::GET,
                &Self::record_endpoint(&args.collection, &args.id),
                None,
                &query,
                true,
            )
            .await
    }

    /// Create a record.
    pub async fn create_record(&self, args: &CreateRecordArgs) -> Result<JsonValue> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(expand) = &args.expand {
            query.push(("expand", expand.clone()));
        }

        self.http
            .request(
                Method::POST,
                &Self::records_endpoint(&args.collection),
                Some(&JsonValue::Object(args.data.clone())),
                &query,
                true,
            )
            .await
    }

    /// Update a record.
    pub async fn update_record(&self, args: &UpdateRecordArgs) -> Result<JsonValue> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(expand) = &args.expand {
            query.push(("expand", expand.clone()));
        }

        self.http
            .request(
                Method::PATCH,
                &Self::record_endpoint(&args.collection, &args.id),
                Some(&JsonValue::Object(args.data.clone())),
                &query,
                true,
            )
            .await
    }

    /// Delete a record. The backend returns an empty body; this reports a
    /// fixed success message instead.
    pub async fn delete_record(&self, collection: &str, id: &str) -> Result<JsonValue> {
        self.http
            .request(
                Method::DELETE,
                &Self::record_endpoint(collection, id),
                None,
                &[],
                true,
            )
            .await?;
        Ok(json!({ "message": "Record deleted successfully" }))
    }

    /// Derive the MCP resource view: one resource per collection.
    pub async fn list_resources(&self) -> Result<JsonValue> {
        let collections = self.list_collections().await?;
        let resources: Vec<JsonValue> = collections
            .get("items")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .map(|col| {
                        let name = col.get("name").and_then(|n| n.as_str()).unwrap_or("");
                        let kind = col.get("type").and_then(|t| t.as_str()).unwrap_or("");
                        json!({
                            "uri": format!("{}{}", RESOURCE_URI_PREFIX, name),
                            "name": name,
                            "description": format!("Collection: {} (type: {})", name, kind),
                            "mimeType": "application/json",
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(JsonValue::Array(resources))
    }

    /// Resolve a `pocketbase://collection/{name}` URI to the serialized
    /// collection. Anything else fails validation before any HTTP call.
    pub async fn read_resource(&self, uri: &str) -> Result<JsonValue> {
        let collection = match uri.strip_prefix(RESOURCE_URI_PREFIX) {
            Some(rest) if !rest.is_empty() => rest,
            _ => return Err(McpError::Validation("Invalid resource URI".to_string())),
        };

        let data = self.view_collection(collection).await?;

        Ok(json!({
            "uri": uri,
            "mimeType": "application/json",
            "text": serde_json::to_string_pretty(&data)?,
        }))
    }
}
