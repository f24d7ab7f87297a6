//! Integration tests for the MCP server.
//!
//! The PocketBase backend is stood in by a wiremock server; every test
//! drives the real registry -> validator -> facade -> HTTP client path.

use pocketbase_mcp::{HttpClient, McpError, PocketBaseApi, ToolRegistry};
use serde_json::{json, Map, Value as JsonValue};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Create a test API facade pointed at the given mock server.
fn test_api(base_url: &str) -> PocketBaseApi {
    PocketBaseApi::new(HttpClient::new(base_url, None))
}

/// Create a test API facade with a pre-seeded token.
fn test_api_with_token(base_url: &str, token: &str) -> PocketBaseApi {
    PocketBaseApi::new(HttpClient::new(base_url, Some(token.to_string())))
}

/// Helper to dispatch a tool call.
async fn call_tool(
    api: &mut PocketBaseApi,
    registry: &ToolRegistry,
    name: &str,
    args: JsonValue,
) -> JsonValue {
    let args_map: Map<String, JsonValue> = match args {
        JsonValue::Object(m) => m,
        _ => Map::new(),
    };
    registry
        .dispatch(api, name, &args_map)
        .await
        .unwrap_or_else(|e| panic!("Tool {} failed: {}", name, e))
}

/// Helper to dispatch a tool call and expect an error.
async fn call_tool_err(
    api: &mut PocketBaseApi,
    registry: &ToolRegistry,
    name: &str,
    args: JsonValue,
) -> McpError {
    let args_map: Map<String, JsonValue> = match args {
        JsonValue::Object(m) => m,
        _ => Map::new(),
    };
    registry
        .dispatch(api, name, &args_map)
        .await
        .expect_err(&format!("Expected tool {} to fail", name))
}

// =============================================================================
// Dispatch and validation
// =============================================================================

#[tokio::test]
async fn test_unknown_tool_is_validation_error() {
    let registry = ToolRegistry::new();
    let mut api = test_api("http://localhost:1");

    let err = call_tool_err(&mut api, &registry, "nonexistent_tool", json!({})).await;
    assert_eq!(err.to_string(), "Unknown tool: nonexistent_tool");
    assert_eq!(err.type_tag(), "validation_error");
}

#[tokio::test]
async fn test_missing_required_parameter_message() {
    let registry = ToolRegistry::new();
    // Port 1 is never serving; validation must fail before any connection.
    let mut api = test_api("http://localhost:1");

    let err = call_tool_err(&mut api, &registry, "view_collection", json!({})).await;
    assert_eq!(err.to_string(), "Missing required parameter: collection");

    let err = call_tool_err(&mut api, &registry, "view_record", json!({"collection": "posts"})).await;
    assert_eq!(err.to_string(), "Missing required parameter: id");
}

#[tokio::test]
async fn test_page_as_numeric_string_rejected() {
    let registry = ToolRegistry::new();
    let mut api = test_api("http://localhost:1");

    let err = call_tool_err(
        &mut api,
        &registry,
        "list_records",
        json!({"collection": "posts", "page": "1"}),
    )
    .await;
    assert_eq!(err.to_string(), "Invalid parameter: page must be an integer");
}

#[tokio::test]
async fn test_meta_tools_need_no_backend() {
    let registry = ToolRegistry::new();
    let mut api = test_api("http://localhost:1");

    let schema = call_tool(&mut api, &registry, "get_field_schema_reference", json!({})).await;
    assert!(schema["field_types"].get("relation").is_some());

    let rules = call_tool(&mut api, &registry, "get_rules_reference", json!({})).await;
    assert!(rules["rule_types"].get("listRule").is_some());
}

// =============================================================================
// Health and collections
// =============================================================================

#[tokio::test]
async fn test_health_passthrough() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "message": "API is healthy."
            })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let registry = ToolRegistry::new();
    let mut api = test_api(&server.uri());

    let result = call_tool(&mut api, &registry, "health", json!({})).await;
    assert_eq!(result["message"], "API is healthy.");
}

#[tokio::test]
async fn test_list_collections_reshapes_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "perPage": 30,
            "totalItems": 2,
            "totalPages": 1,
            "items": [
                {
                    "id": "c1",
                    "name": "posts",
                    "type": "base",
                    "system": false,
                    "fields": [{"name": "title", "type": "text"}, {"name": "body", "type": "editor"}],
                    "listRule": "",
                    "indexes": []
                },
                {
                    "id": "c2",
                    "name": "users",
                    "type": "auth",
                    "system": true,
                    "fields": [{"name": "email", "type": "email"}]
                }
            ]
        })))
        .mount(&server)
        .await;

    let registry = ToolRegistry::new();
    let mut api = test_api(&server.uri());

    let result = call_tool(&mut api, &registry, "list_collections", json!({})).await;
    assert_eq!(result["totalItems"], 2);
    let items = result["items"].as_array().unwrap();
    // Summaries carry a field count instead of the full schema.
    assert_eq!(items[0], json!({"id": "c1", "name": "posts", "type": "base", "fields": 2, "system": false}));
    assert_eq!(items[1]["fields"], 1);
    assert_eq!(items[1]["system"], true);
    assert!(items[0].get("listRule").is_none());
}

#[tokio::test]
async fn test_create_collection_body_shape() {
    let server = MockServer::start().await;
    // type defaults to base; listRule null is sent explicitly, indexes omitted.
    Mock::given(method("POST"))
        .and(path("/api/collections"))
        .and(body_json(json!({
            "name": "posts",
            "type": "base",
            "fields": [{"name": "title", "type": "text"}],
            "listRule": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "c1",
            "name": "posts",
            "type": "base"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = ToolRegistry::new();
    let mut api = test_api(&server.uri());

    let result = call_tool(
        &mut api,
        &registry,
        "create_collection",
        json!({
            "name": "posts",
            "fields": [{"name": "title", "type": "text"}],
            "listRule": null
        }),
    )
    .await;
    assert_eq!(result["name"], "posts");
}

#[tokio::test]
async fn test_update_collection_top_level_keys() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/collections/posts"))
        .and(body_json(json!({"listRule": ""})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "c1",
            "name": "posts",
            "listRule": ""
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = ToolRegistry::new();
    let mut api = test_api(&server.uri());

    let result = call_tool(
        &mut api,
        &registry,
        "update_collection",
        json!({"collection": "posts", "listRule": ""}),
    )
    .await;
    assert_eq!(result["listRule"], "");
}

#[tokio::test]
async fn test_update_collection_rejects_empty_payload() {
    let registry = ToolRegistry::new();
    let mut api = test_api("http://localhost:1");

    let err = call_tool_err(
        &mut api,
        &registry,
        "update_collection",
        json!({"collection": "posts"}),
    )
    .await;
    assert!(err.to_string().starts_with("Missing update payload."));
}

#[tokio::test]
async fn test_delete_collection_fixed_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/collections/old_stuff"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let registry = ToolRegistry::new();
    let mut api = test_api(&server.uri());

    let result = call_tool(
        &mut api,
        &registry,
        "delete_collection",
        json!({"collection": "old_stuff"}),
    )
    .await;
    assert_eq!(result["message"], "Collection deleted successfully");
}

// =============================================================================
// Rule updates
// =============================================================================

#[tokio::test]
async fn test_update_rules_without_rules_makes_no_call() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let registry = ToolRegistry::new();
    let mut api = test_api(&server.uri());

    let result = call_tool(
        &mut api,
        &registry,
        "update_collection_rules",
        json!({"collection": "posts"}),
    )
    .await;
    assert_eq!(result["message"], "No rules specified to update");
    assert_eq!(result["updatedRules"], json!([]));
    assert_eq!(result["currentRules"], json!({}));
}

#[tokio::test]
async fn test_update_rules_sends_only_present_keys() {
    let server = MockServer::start().await;
    // An empty string is an explicit value, distinct from omission.
    Mock::given(method("PATCH"))
        .and(path("/api/collections/posts"))
        .and(body_json(json!({"listRule": ""})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "c1",
            "name": "posts",
            "listRule": "",
            "viewRule": null,
            "createRule": "@request.auth.id != \"\""
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = ToolRegistry::new();
    let mut api = test_api(&server.uri());

    let result = call_tool(
        &mut api,
        &registry,
        "update_collection_rules",
        json!({"collection": "posts", "listRule": ""}),
    )
    .await;
    assert_eq!(result["message"], "Collection rules updated successfully");
    assert_eq!(result["updatedRules"], json!(["listRule"]));
    assert_eq!(result["currentRules"]["listRule"], "");
    assert_eq!(result["currentRules"]["viewRule"], JsonValue::Null);
    assert_eq!(
        result["currentRules"]["createRule"],
        "@request.auth.id != \"\""
    );
    // deleteRule was absent from the response; reported as null.
    assert_eq!(result["currentRules"]["deleteRule"], JsonValue::Null);
}

#[tokio::test]
async fn test_update_rules_null_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/collections/posts"))
        .and(body_json(json!({"deleteRule": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "c1",
            "deleteRule": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = ToolRegistry::new();
    let mut api = test_api(&server.uri());

    let result = call_tool(
        &mut api,
        &registry,
        "update_collection_rules",
        json!({"collection": "posts", "deleteRule": null}),
    )
    .await;
    assert_eq!(result["updatedRules"], json!(["deleteRule"]));
}

// =============================================================================
// Records
// =============================================================================

#[tokio::test]
async fn test_list_records_forwards_defined_options_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/collections/posts/records"))
        .and(query_param("page", "2"))
        .and(query_param("perPage", "50"))
        .and(query_param("sort", "-created"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 2,
            "perPage": 50,
            "totalItems": 0,
            "totalPages": 0,
            "items": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = ToolRegistry::new();
    let mut api = test_api(&server.uri());

    // filter is an empty string: defined but empty, so it must be omitted.
    let result = call_tool(
        &mut api,
        &registry,
        "list_records",
        json!({
            "collection": "posts",
            "page": 2,
            "perPage": 50,
            "sort": "-created",
            "filter": ""
        }),
    )
    .await;
    assert_eq!(result["page"], 2);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let query = requests[0].url.query().unwrap_or("");
    assert!(!query.contains("filter"), "empty filter must be omitted: {}", query);
}

#[tokio::test]
async fn test_view_record_percent_encodes_path() {
    let server = MockServer::start().await;
    // The record ID is percent-encoded into the request path.
    Mock::given(method("GET"))
        .and(path("/api/collections/posts/records/rec%20with%20space"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "rec with space",
            "collectionName": "posts"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = ToolRegistry::new();
    let mut api = test_api(&server.uri());

    let result = call_tool(
        &mut api,
        &registry,
        "view_record",
        json!({"collection": "posts", "id": "rec with space"}),
    )
    .await;
    assert_eq!(result["id"], "rec with space");
}

#[tokio::test]
async fn test_create_record_body_and_expand() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/collections/posts/records"))
        .and(query_param("expand", "author"))
        .and(body_json(json!({"title": "hello", "views": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "r1",
            "collectionName": "posts",
            "title": "hello",
            "views": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = ToolRegistry::new();
    let mut api = test_api(&server.uri());

    let result = call_tool(
        &mut api,
        &registry,
        "create_record",
        json!({
            "collection": "posts",
            "data": {"title": "hello", "views": 3},
            "expand": "author"
        }),
    )
    .await;
    assert_eq!(result["id"], "r1");
}

#[tokio::test]
async fn test_update_record_patches_data() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/collections/posts/records/r1"))
        .and(body_json(json!({"title": "renamed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "r1",
            "title": "renamed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = ToolRegistry::new();
    let mut api = test_api(&server.uri());

    let result = call_tool(
        &mut api,
        &registry,
        "update_record",
        json!({"collection": "posts", "id": "r1", "data": {"title": "renamed"}}),
    )
    .await;
    assert_eq!(result["title"], "renamed");
}

#[tokio::test]
async fn test_delete_record_fixed_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/collections/posts/records/r1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let registry = ToolRegistry::new();
    let mut api = test_api(&server.uri());

    let result = call_tool(
        &mut api,
        &registry,
        "delete_record",
        json!({"collection": "posts", "id": "r1"}),
    )
    .await;
    assert_eq!(result["message"], "Record deleted successfully");
}

// =============================================================================
// Error classification
// =============================================================================

#[tokio::test]
async fn test_401_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/collections/posts/records"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 401,
            "message": "The request requires valid record authorization token."
        })))
        .mount(&server)
        .await;

    let registry = ToolRegistry::new();
    let mut api = test_api(&server.uri());

    let err = call_tool_err(
        &mut api,
        &registry,
        "list_records",
        json!({"collection": "posts"}),
    )
    .await;
    assert_eq!(err.type_tag(), "auth_error");
    assert_eq!(err.status_code(), Some(401));
    assert_eq!(
        err.to_string(),
        "The request requires valid record authorization token."
    );
}

#[tokio::test]
async fn test_500_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let registry = ToolRegistry::new();
    let mut api = test_api(&server.uri());

    let err = call_tool_err(&mut api, &registry, "health", json!({})).await;
    assert_eq!(err.type_tag(), "api_error");
    assert_eq!(err.status_code(), Some(500));
    // Unparsable body falls back to the generic message.
    assert_eq!(err.to_string(), "HTTP error 500");
}

#[tokio::test]
async fn test_transport_failure_is_api_error_without_status() {
    let registry = ToolRegistry::new();
    let mut api = test_api("http://localhost:1");

    let err = call_tool_err(&mut api, &registry, "health", json!({})).await;
    assert_eq!(err.type_tag(), "api_error");
    assert_eq!(err.status_code(), None);
    assert!(err.to_string().starts_with("Request failed:"));
}

// =============================================================================
// Authentication and session
// =============================================================================

const TEST_TOKEN: &str = "abcdefgh0123456789ijklmnopqrst"; // 30 chars

#[tokio::test]
async fn test_auth_admin_stores_token_and_redacts_preview() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/collections/_superusers/auth-with-password"))
        .and(body_json(json!({"identity": "admin@example.com", "password": "hunter22"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": TEST_TOKEN,
            "record": {"id": "admin1", "email": "admin@example.com"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    // The stored token must flow into subsequent authorized requests.
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .and(header("authorization", TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200})))
        .expect(1)
        .mount(&server)
        .await;

    let registry = ToolRegistry::new();
    let mut api = test_api(&server.uri());

    let result = call_tool(
        &mut api,
        &registry,
        "auth_admin",
        json!({"identity": "admin@example.com", "password": "hunter22"}),
    )
    .await;
    assert_eq!(result["authenticated"], true);
    assert_eq!(result["mode"], "admin");
    assert_eq!(result["tokenPreview"], "abcdefgh...qrst");
    assert_eq!(result["record"]["id"], "admin1");
    assert!(!serde_json::to_string(&result).unwrap().contains(TEST_TOKEN));

    call_tool(&mut api, &registry, "health", json!({})).await;
}

#[tokio::test]
async fn test_auth_user_uses_collection_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/collections/customers/auth-with-password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": TEST_TOKEN,
            "record": {"id": "u1", "email": "user@example.com"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = ToolRegistry::new();
    let mut api = test_api(&server.uri());

    let result = call_tool(
        &mut api,
        &registry,
        "auth_user",
        json!({"collection": "customers", "identity": "user@example.com", "password": "pw"}),
    )
    .await;
    assert_eq!(result["mode"], "user");
    assert_eq!(result["collection"], "customers");
    assert_eq!(result["authenticated"], true);
}

#[tokio::test]
async fn test_auth_failure_leaves_session_unauthenticated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/collections/_superusers/auth-with-password"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 400,
            "message": "Failed to authenticate."
        })))
        .mount(&server)
        .await;

    let registry = ToolRegistry::new();
    let mut api = test_api(&server.uri());

    let err = call_tool_err(
        &mut api,
        &registry,
        "auth_admin",
        json!({"identity": "admin@example.com", "password": "wrong"}),
    )
    .await;
    assert_eq!(err.type_tag(), "api_error");

    let status = call_tool(&mut api, &registry, "get_auth_status", json!({})).await;
    assert_eq!(status["authenticated"], false);
}

#[tokio::test]
async fn test_logout_clears_token() {
    let registry = ToolRegistry::new();
    let mut api = test_api_with_token("http://localhost:1", TEST_TOKEN);

    let status = call_tool(&mut api, &registry, "get_auth_status", json!({})).await;
    assert_eq!(status["authenticated"], true);
    assert_eq!(status["tokenPreview"], "abcdefgh...qrst");

    let result = call_tool(&mut api, &registry, "logout", json!({})).await;
    assert_eq!(result["authenticated"], false);
    assert_eq!(result["message"], "Authentication session cleared");

    let status = call_tool(&mut api, &registry, "get_auth_status", json!({})).await;
    assert_eq!(status["authenticated"], false);
    assert_eq!(status["tokenPreview"], JsonValue::Null);
}

#[tokio::test]
async fn test_set_base_url_keeps_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .and(header("authorization", TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200})))
        .expect(1)
        .mount(&server)
        .await;

    let registry = ToolRegistry::new();
    let mut api = test_api_with_token("http://old-instance:8090", TEST_TOKEN);

    let before = call_tool(&mut api, &registry, "get_auth_status", json!({})).await;
    assert_eq!(before["authenticated"], true);

    let result = call_tool(
        &mut api,
        &registry,
        "set_base_url",
        json!({"url": server.uri()}),
    )
    .await;
    assert_eq!(result["baseUrl"], server.uri());
    assert_eq!(result["authenticated"], true);

    // No implicit logout, and subsequent requests target the new URL.
    let after = call_tool(&mut api, &registry, "get_auth_status", json!({})).await;
    assert_eq!(after["authenticated"], true);
    assert_eq!(after["baseUrl"], server.uri());

    call_tool(&mut api, &registry, "health", json!({})).await;
}

// =============================================================================
// Resources
// =============================================================================

#[tokio::test]
async fn test_list_resources_derives_collection_uris() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "perPage": 30,
            "totalItems": 1,
            "totalPages": 1,
            "items": [{"id": "c1", "name": "posts", "type": "base", "fields": []}]
        })))
        .mount(&server)
        .await;

    let api = test_api(&server.uri());
    let resources = api.list_resources().await.unwrap();
    let resources = resources.as_array().unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0]["uri"], "pocketbase://collection/posts");
    assert_eq!(resources[0]["mimeType"], "application/json");
    assert_eq!(resources[0]["description"], "Collection: posts (type: base)");
}

#[tokio::test]
async fn test_read_resource_round_trips_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/collections/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "c1",
            "name": "posts",
            "type": "base",
            "fields": [{"name": "title", "type": "text"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = test_api(&server.uri());
    let resource = api
        .read_resource("pocketbase://collection/posts")
        .await
        .unwrap();
    assert_eq!(resource["uri"], "pocketbase://collection/posts");
    assert_eq!(resource["mimeType"], "application/json");

    let parsed: JsonValue = serde_json::from_str(resource["text"].as_str().unwrap()).unwrap();
    assert_eq!(parsed["name"], "posts");
}

#[tokio::test]
async fn test_read_resource_invalid_uri_makes_no_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let api = test_api(&server.uri());
    let err = api.read_resource("invalid://uri").await.unwrap_err();
    assert_eq!(err.type_tag(), "validation_error");
    assert_eq!(err.to_string(), "Invalid resource URI");
}
