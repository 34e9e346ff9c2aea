use serde::Deserialize;
use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

#[derive(Debug, Error)]
pub enum GraphError {
    /// The connection could not be established or the exchange broke off.
    #[error("transport: {0}")]
    Transport(String),

    /// The remote endpoint reported an application-level failure, or returned
    /// an empty body where content was required.
    #[error("api error ({kind}): {message}")]
    Api { kind: String, message: String },

    #[error("configuration: {0}")]
    Configuration(String),

    #[error("signature: {0}")]
    Signature(String),

    #[error("parse: {0}")]
    Parse(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("serde: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GraphError {
    pub fn api(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

/// Error object as returned by the Graph server:
/// `{"error": {"type": "OAuthException", "message": "..."}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
}

impl From<ApiErrorBody> for GraphError {
    fn from(body: ApiErrorBody) -> Self {
        let detail = body.error;
        let message = match (detail.message, detail.code) {
            (Some(message), Some(code)) => format!("{} (code {})", message, code),
            (Some(message), None) => message,
            (None, Some(code)) => format!("code {}", code),
            (None, None) => "unknown error".to_string(),
        };
        GraphError::Api {
            kind: detail.kind.unwrap_or_else(|| "Unknown".to_string()),
            message,
        }
    }
}

impl GraphError {
    /// Interpret a raw response body that is known to signal a failure.
    ///
    /// Bodies that carry a structured `error` object keep its type and
    /// message; anything else is reported verbatim.
    pub fn from_error_body(body: &str) -> Self {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) => parsed.into(),
            Err(_) => GraphError::api("Unknown", body.trim()),
        }
    }
}
