//! Static reference payloads for the two meta tools.
//!
//! Returned verbatim, no HTTP involved. Agents are expected to call these
//! before `create_collection` / `update_collection_rules` to learn the
//! backend's field and rule syntax.

use serde_json::{json, Value as JsonValue};

/// Field-schema reference returned by `get_field_schema_reference`.
pub fn field_schema_reference() -> JsonValue {
    json!({
        "description": "PocketBase Collection Field Schema Reference",
        "common_properties": {
            "name": "string (required) - Unique field name",
            "type": "string (required) - Field type",
            "required": "boolean - Field must have a value",
            "hidden": "boolean - Hide from API response",
            "presentable": "boolean - Show in relation preview labels",
            "system": "boolean - Prevents renaming/deletion",
        },
        "field_types": {
            "text": {
                "description": "String values. Zero default: \"\"",
                "options": {
                    "min": "number - Minimum characters",
                    "max": "number - Maximum characters (default: 5000)",
                    "pattern": "string - Regex pattern validation",
                    "autogeneratePattern": "string - Auto-generate on create, e.g. \"[a-z0-9]{8}\"",
                },
                "example": { "name": "title", "type": "text", "required": true, "max": 255 },
            },
            "bool": {
                "description": "True/false values. Zero default: false",
                "options": {},
                "example": { "name": "isActive", "type": "bool" },
            },
            "number": {
                "description": "Numeric/float64 values. Zero default: 0",
                "options": {
                    "min": "number - Minimum value",
                    "max": "number - Maximum value",
                    "onlyInt": "boolean - Allow only integers",
                    "noDecimal": "boolean - No decimal places",
                },
                "example": { "name": "price", "type": "number", "required": true, "min": 0 },
            },
            "email": {
                "description": "Email addresses with validation. Zero default: \"\"",
                "options": {
                    "exceptDomains": "array - Blocked domains, e.g. [\"gmail.com\"]",
                    "onlyDomains": "array - Allowed domains only",
                },
                "example": { "name": "email", "type": "email", "required": true },
            },
            "url": {
                "description": "URL strings with validation. Zero default: \"\"",
                "options": {},
                "example": { "name": "website", "type": "url" },
            },
            "editor": {
                "description": "HTML formatted text. Zero default: \"\"",
                "options": {},
                "example": { "name": "content", "type": "editor" },
            },
            "date": {
                "description": "Date values (YYYY-MM-DD format). Zero default: \"\"",
                "options": {},
                "example": { "name": "birthDate", "type": "date" },
            },
            "autodate": {
                "description": "Auto-sets on create/update. Zero default: \"\"",
                "options": {
                    "onCreate": "boolean - Auto-set on record create (default: true)",
                    "onUpdate": "boolean - Auto-set on record update (default: true)",
                },
                "example": { "name": "created", "type": "autodate", "onCreate": true, "onUpdate": false },
            },
            "select": {
                "description": "Single/multiple predefined values. Zero default: \"\" or []",
                "options": {
                    "values": "array (REQUIRED) - Options, e.g. [\"active\", \"inactive\"]",
                    "maxSelect": "number - 1 for single, 2+ for multiple (default: 1)",
                },
                "example": {
                    "name": "status",
                    "type": "select",
                    "values": ["draft", "published", "archived"],
                    "maxSelect": 1,
                },
            },
            "file": {
                "description": "File uploads. Zero default: []",
                "options": {
                    "maxSelect": "number - Max files allowed (default: 1)",
                    "maxSize": "number - Max file size in bytes (0 = unlimited)",
                    "mimeTypes": "array - Allowed MIME types, e.g. [\"image/jpeg\", \"image/png\"]",
                    "thumbs": "array - Thumbnail sizes, e.g. [\"100x100\", \"300x300\"]",
                    "protected": "boolean - Requires auth to access",
                },
                "example": {
                    "name": "avatar",
                    "type": "file",
                    "maxSelect": 1,
                    "maxSize": 5242880,
                    "mimeTypes": ["image/jpeg", "image/png", "image/webp"],
                },
            },
            "relation": {
                "description": "References records from other collections. Zero default: \"\" or []",
                "options": {
                    "collectionId": "string (REQUIRED) - Target collection ID",
                    "maxSelect": "number - 1 for single, 2+ for multiple (default: 1)",
                    "cascadeDelete": "boolean - Delete when related record deleted",
                },
                "example": {
                    "name": "author",
                    "type": "relation",
                    "collectionId": "users_collection_id",
                    "maxSelect": 1,
                },
            },
            "json": {
                "description": "Any serialized JSON. Zero default: null (can be nullable)",
                "options": {},
                "example": { "name": "metadata", "type": "json" },
            },
            "geopoint": {
                "description": "Geographic coordinates {lon, lat}. Zero default: {lon: 0, lat: 0}",
                "options": {},
                "example": { "name": "location", "type": "geopoint" },
            },
        },
        "api_rules": {
            "description": "Access control rules for collection endpoints",
            "values": {
                "null": "Disallow access (admin only)",
                "\"\"": "Allow all (public access)",
                "\"@request.auth.id != \\\"\\\"\"": "Authenticated users only",
                "\"@request.auth.id = owner\"": "Record owner only",
            },
            "rules": ["listRule", "viewRule", "createRule", "updateRule", "deleteRule"],
        },
        "complete_example": {
            "name": "posts",
            "type": "base",
            "listRule": "",
            "viewRule": "",
            "createRule": "@request.auth.id != \"\"",
            "updateRule": "@request.auth.id = author",
            "deleteRule": "@request.auth.id = author",
            "fields": [
                { "name": "title", "type": "text", "required": true, "max": 255 },
                { "name": "content", "type": "editor" },
                { "name": "status", "type": "select", "values": ["draft", "published"], "maxSelect": 1 },
                { "name": "author", "type": "relation", "collectionId": "users_id", "required": true },
                { "name": "images", "type": "file", "maxSelect": 5, "mimeTypes": ["image/jpeg", "image/png"] },
                { "name": "created", "type": "autodate", "onCreate": true, "onUpdate": false },
            ],
        },
    })
}

/// API-rules syntax reference returned by `get_rules_reference`.
pub fn rules_reference() -> JsonValue {
    json!({
        "description": "PocketBase API Rules and Filters Reference",
        "rule_types": {
            "listRule": "Controls who can list/search records",
            "viewRule": "Controls who can view a single record",
            "createRule": "Controls who can create records",
            "updateRule": "Controls who can update records",
            "deleteRule": "Controls who can delete records",
            "options.manageRule": "(Auth collections only) Allow managing other users data",
        },
        "rule_values": {
            "null": "Locked - Only superusers can perform this action (default)",
            "\"\"": "Public - Anyone can perform this action (superusers, users, guests)",
            "filter_expression": "Only requests satisfying the filter can perform this action",
        },
        "response_behavior": {
            "listRule_unsatisfied": "200 with empty items",
            "viewRule_unsatisfied": "404 Not Found",
            "createRule_unsatisfied": "400 Bad Request",
            "updateRule_unsatisfied": "404 Not Found",
            "deleteRule_unsatisfied": "404 Not Found",
            "locked_rule": "403 Forbidden (if not superuser)",
        },
        "filter_syntax": {
            "format": "OPERAND OPERATOR OPERAND",
            "operators": {
                "=": "Equal",
                "!=": "NOT equal",
                ">": "Greater than",
                ">=": "Greater than or equal",
                "<": "Less than",
                "<=": "Less than or equal",
                "~": "Like/Contains (auto wraps in % for wildcard)",
                "!~": "NOT Like/Contains",
                "?=": "Any/At least one of Equal (for arrays)",
                "?!=": "Any/At least one of NOT equal",
                "?>": "Any/At least one of Greater than",
                "?>=": "Any/At least one of Greater than or equal",
                "?<": "Any/At least one of Less than",
                "?<=": "Any/At least one of Less than or equal",
                "?~": "Any/At least one of Like/Contains",
                "?!~": "Any/At least one of NOT Like/Contains",
            },
            "logical": {
                "&&": "AND",
                "||": "OR",
                "(...)": "Grouping",
            },
            "comments": "// Single line comments supported",
        },
        "available_fields": {
            "collection_fields":
                "All your collection schema fields, including nested relations (e.g., someRelField.status)",
            "@request": {
                "@request.context": "Context: default, oauth2, otp, password, realtime, protectedFile",
                "@request.method": "HTTP method: GET, POST, PATCH, DELETE",
                "@request.headers.*":
                    "Request headers (lowercase, - becomes _). Ex: @request.headers.x_token",
                "@request.query.*": "Query parameters as strings. Ex: @request.query.page",
                "@request.auth.*":
                    "Current authenticated user. Ex: @request.auth.id, @request.auth.email",
                "@request.body.*": "Submitted body parameters. Ex: @request.body.title",
            },
            "@collection": {
                "usage": "Target other collections not directly related",
                "syntax": "@collection.collectionName.field",
                "alias": "@collection.collectionName:alias.field (for multiple joins)",
                "example":
                    "@collection.news.categoryId ?= categoryId && @collection.news.author ?= @request.auth.id",
            },
        },
        "modifiers": {
            ":isset": {
                "description": "Check if client submitted a field (only for @request.*)",
                "example": "@request.body.role:isset = false // disallow submitting role",
            },
            ":changed": {
                "description": "Check if client submitted AND changed a field (only for @request.body.*)",
                "example": "@request.body.role:changed = false // disallow changing role",
            },
            ":length": {
                "description": "Check array field length (file, select, relation)",
                "example": "someRelationField:length = 2",
            },
            ":each": {
                "description": "Apply condition on each array item (select, file, relation)",
                "example": "someSelectField:each ~ \"pb_%\" // all must have pb_ prefix",
            },
            ":lower": {
                "description": "Case-insensitive comparison (lowercase)",
                "example": "title:lower = \"test\" // matches Test, TEST, tEsT",
            },
        },
        "macros": {
            "@now": "Current datetime (UTC)",
            "@second": "Current second (0-59)",
            "@minute": "Current minute (0-59)",
            "@hour": "Current hour (0-23)",
            "@weekday": "Current weekday (0-6)",
            "@day": "Current day number",
            "@month": "Current month number",
            "@year": "Current year number",
            "@yesterday": "Yesterday datetime",
            "@tomorrow": "Tomorrow datetime",
            "@todayStart": "Beginning of today",
            "@todayEnd": "End of today",
            "@monthStart": "Beginning of current month",
            "@monthEnd": "End of current month",
            "@yearStart": "Beginning of current year",
            "@yearEnd": "End of current year",
        },
        "functions": {
            "geoDistance(lonA, latA, lonB, latB)": {
                "description": "Calculate Haversine distance between 2 points in kilometres",
                "example": "geoDistance(address.lon, address.lat, 23.32, 42.69) < 25",
            },
        },
        "common_examples": {
            "authenticated_only": "@request.auth.id != \"\"",
            "owner_only": "@request.auth.id = owner",
            "active_records": "status = \"active\"",
            "auth_and_active": "@request.auth.id != \"\" && status = \"active\"",
            "auth_or_pending": "@request.auth.id != \"\" && (status = \"active\" || status = \"pending\")",
            "in_allowed_list": "@request.auth.id != \"\" && allowed_users.id ?= @request.auth.id",
            "title_prefix": "title ~ \"Lorem%\"",
            "no_role_change": "@request.body.role:changed = false",
            "future_date": "@request.body.publishDate >= @now",
            "nearby_location":
                "geoDistance(location.lon, location.lat, @request.query.lon, @request.query.lat) < 10",
        },
        "tips": [
            "Rules act as filters - unsatisfied rules filter out records, not just deny access",
            "Superusers bypass all rules",
            "Use null (not \"null\" string) for admin-only access",
            "Empty string \"\" allows public access",
            "Test rules in PocketBase Admin UI with autocomplete",
            "Combine with indexes for better query performance",
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_schema_reference_covers_all_types() {
        let reference = field_schema_reference();
        let types = reference["field_types"].as_object().unwrap();
        for expected in [
            "text", "bool", "number", "email", "url", "editor", "date", "autodate", "select",
            "file", "relation", "json", "geopoint",
        ] {
            assert!(types.contains_key(expected), "missing field type {}", expected);
        }
    }

    #[test]
    fn test_rules_reference_lists_all_rule_types() {
        let reference = rules_reference();
        let rule_types = reference["rule_types"].as_object().unwrap();
        for rule in ["listRule", "viewRule", "createRule", "updateRule", "deleteRule"] {
            assert!(rule_types.contains_key(rule));
        }
    }
}
