//! HTTP client for the PocketBase API.
//!
//! Owns the session state every outgoing request reads: the normalized base
//! URL and the optional auth token. PocketBase expects the raw token in the
//! `Authorization` header, without a `Bearer ` prefix.
//!
//! One tool call maps to one request attempt. There are no retries and no
//! timeout beyond what reqwest provides by default.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::{json, Value as JsonValue};
use tracing::debug;

use crate::error::{McpError, Result};

/// Superuser password-auth endpoint.
const ADMIN_AUTH_ENDPOINT: &str = "/api/collections/_superusers/auth-with-password";

/// HTTP client holding the PocketBase session (base URL + token).
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new client for the given base URL, optionally pre-seeded
    /// with a static token.
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    /// The currently held auth token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Replace the stored token. `None` clears it.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Clear the stored token.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// The normalized base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Point the client at a different PocketBase instance.
    ///
    /// Deliberately keeps the stored token; callers are told to
    /// re-authenticate if the new instance needs a different one.
    pub fn set_base_url(&mut self, url: &str) {
        self.base_url = url.trim_end_matches('/').to_string();
    }

    /// Issue a single request against `base_url + endpoint`.
    ///
    /// Query pairs with empty values are dropped. The body is serialized
    /// only for POST/PATCH/PUT. On success returns the parsed JSON body,
    /// or `Null` when the body is empty or unparsable; callers that expect
    /// an object must tolerate that.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&JsonValue>,
        query: &[(&str, String)],
        use_auth: bool,
    ) -> Result<JsonValue> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(method = %method, url = %url, "PocketBase request");

        let mut req = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");

        if use_auth {
            if let Some(token) = &self.token {
                req = req.header(AUTHORIZATION, token.as_str());
            }
        }

        let pairs: Vec<(&str, &str)> = query
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (*k, v.as_str()))
            .collect();
        if !pairs.is_empty() {
            req = req.query(&pairs);
        }

        if matches!(method, Method::POST | Method::PATCH | Method::PUT) {
            if let Some(body) = body {
                req = req.json(body);
            }
        }

        let response = req.send().await.map_err(|e| McpError::Api {
            status: None,
            message: format!("Request failed: {}", e),
            details: Some(json!({ "method": method.as_str(), "endpoint": endpoint })),
        })?;

        let status = response.status().as_u16();
        let ok = response.status().is_success();
        let text = response.text().await.unwrap_or_default();
        let decoded: Option<JsonValue> = if text.is_empty() {
            None
        } else {
            serde_json::from_str(&text).ok()
        };

        if !ok {
            let message = decoded
                .as_ref()
                .and_then(|v| v.get("message"))
                .and_then(|m| m.as_str())
                .filter(|m| !m.is_empty())
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("HTTP error {}", status));
            let details = Some(json!({
                "method": method.as_str(),
                "endpoint": endpoint,
                "response": decoded,
            }));

            return Err(if status == 401 || status == 403 {
                McpError::Auth { status, message, details }
            } else {
                McpError::Api { status: Some(status), message, details }
            });
        }

        Ok(decoded.unwrap_or(JsonValue::Null))
    }

    /// Authenticate as a superuser and store the returned token.
    ///
    /// Issued without auth so a stale token cannot interfere. Returns the
    /// new token (or `None` if the backend response carried none).
    pub async fn authenticate(&mut self, identity: &str, password: &str) -> Result<Option<String>> {
        let response = self
            .request(
                Method::POST,
                ADMIN_AUTH_ENDPOINT,
                Some(&json!({ "identity": identity, "password": password })),
                &[],
                false,
            )
            .await?;

        self.token = response
            .get("token")
            .and_then(|t| t.as_str())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string());
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = HttpClient::new("http://localhost:8090/", None);
        assert_eq!(client.base_url(), "http://localhost:8090");
    }

    #[test]
    fn test_set_base_url_keeps_token() {
        let mut client = HttpClient::new("http://localhost:8090", Some("abc123".to_string()));
        client.set_base_url("http://other:8090/");
        assert_eq!(client.base_url(), "http://other:8090");
        assert_eq!(client.token(), Some("abc123"));
    }

    #[test]
    fn test_empty_seed_token_is_ignored() {
        let client = HttpClient::new("http://localhost:8090", Some(String::new()));
        assert!(client.token().is_none());
    }

    #[test]
    fn test_clear_token() {
        let mut client = HttpClient::new("http://localhost:8090", Some("abc".to_string()));
        client.clear_token();
        assert!(client.token().is_none());
    }
}
