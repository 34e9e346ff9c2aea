//! Access token payloads returned by the token endpoints

use fbgraph_core::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use url::form_urlencoded;

/// Parsed token endpoint response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenInfo {
    pub access_token: String,
    /// Lifetime in seconds; `None` for offline (non-expiring) tokens
    pub expires: Option<u64>,
    /// Every field of the response, including the two above
    pub fields: BTreeMap<String, String>,
}

impl AccessTokenInfo {
    /// Parse either `access_token=...&expires=...` or a JSON object.
    ///
    /// Bodies that mention `error` are treated as a failure reported by the
    /// server.
    pub fn parse(body: &str) -> GraphResult<Self> {
        let body = body.trim();
        if body.is_empty() {
            return Err(GraphError::api(
                "EmptyResponse",
                "token endpoint returned an empty body",
            ));
        }
        if body.contains("error") {
            return Err(GraphError::from_error_body(body));
        }

        let fields = if body.starts_with('{') {
            let object: Map<String, JsonValue> = serde_json::from_str(body)
                .map_err(|e| GraphError::Parse(format!("invalid token JSON: {}", e)))?;
            fields_from_json(&object)
        } else {
            form_urlencoded::parse(body.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        };

        Self::from_fields(fields)
            .ok_or_else(|| GraphError::Parse("token response has no access_token".to_string()))
    }

    /// Build from a JSON object; `None` when it carries no access token
    pub fn from_json(object: &Map<String, JsonValue>) -> Option<Self> {
        Self::from_fields(fields_from_json(object))
    }

    fn from_fields(fields: BTreeMap<String, String>) -> Option<Self> {
        let access_token = fields.get("access_token").filter(|t| !t.is_empty())?.clone();
        let expires = fields
            .get("expires")
            .or_else(|| fields.get("expires_in"))
            .and_then(|v| v.parse().ok());
        Some(Self {
            access_token,
            expires,
            fields,
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

fn fields_from_json(object: &Map<String, JsonValue>) -> BTreeMap<String, String> {
    object
        .iter()
        .filter_map(|(key, value)| {
            let value = match value {
                JsonValue::Null => return None,
                JsonValue::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), value))
        })
        .collect()
}
