use crate::client::{build_client, transport_error};
use crate::config::{ConnectionConfig, HttpDefaults, RequestOptions};
use crate::encoding::{encode_params, normalize_path, path_with_query};
use crate::multipart::MultipartEncoder;
use fbgraph_core::{GraphError, GraphResult, Params, ResponseEnvelope, METHOD_KEY};
use reqwest::header::CONTENT_TYPE;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// HTTP verb of a Graph call.
///
/// Anything other than GET or POST is tunnelled through a POST with the verb
/// name in the `method` parameter, so the server distinguishes it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Verb {
    Get,
    #[default]
    Post,
    Custom(String),
}

impl Verb {
    pub fn parse(verb: &str) -> Self {
        match verb {
            "get" => Verb::Get,
            "post" | "" => Verb::Post,
            other => Verb::Custom(other.to_string()),
        }
    }
}

impl FromStr for Verb {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Verb::parse(s))
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verb::Get => write!(f, "get"),
            Verb::Post => write!(f, "post"),
            Verb::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// Executes Graph/REST calls with per-call connection settings.
///
/// Holds only read-only defaults; cloning is cheap and clones can be used
/// from any number of tasks at once.
#[derive(Debug, Clone, Default)]
pub struct RequestDispatcher {
    defaults: Arc<HttpDefaults>,
}

impl RequestDispatcher {
    pub fn new(defaults: HttpDefaults) -> Self {
        Self {
            defaults: Arc::new(defaults),
        }
    }

    pub fn defaults(&self) -> &HttpDefaults {
        &self.defaults
    }

    /// Execute one call and wrap whatever came back
    pub async fn execute(
        &self,
        path: &str,
        mut params: Params,
        verb: Verb,
        options: &RequestOptions,
    ) -> GraphResult<ResponseEnvelope> {
        let is_get = match verb {
            Verb::Get => true,
            Verb::Post => false,
            Verb::Custom(name) => {
                params.insert(METHOD_KEY, name);
                false
            }
        };

        let config = ConnectionConfig::resolve(&self.defaults, options, &params)?;
        let path = normalize_path(path);
        debug!(
            host = %config.host,
            port = ?config.port,
            ssl = config.use_ssl,
            proxy = config.proxy.is_some(),
            path = %path,
            get = is_get,
            "dispatching request"
        );

        let client = build_client(&config).await?;
        let base_url = config.base_url();

        let request = if is_get {
            client.get(format!("{}{}", base_url, path_with_query(&path, &params)))
        } else if MultipartEncoder::requires_multipart(&params) {
            let form = MultipartEncoder::encode(params).await?.into_form()?;
            client.post(format!("{}{}", base_url, path)).multipart(form)
        } else {
            client
                .post(format!("{}{}", base_url, path))
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(encode_params(&params))
        };

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(transport_error)?.to_vec();
        debug!(status, bytes = body.len(), "request completed");

        Ok(ResponseEnvelope::new(status, body, headers))
    }

    /// Convenience wrapper that parses the verb from a string
    pub async fn execute_str(
        &self,
        path: &str,
        params: Params,
        verb: &str,
        options: &RequestOptions,
    ) -> GraphResult<ResponseEnvelope> {
        self.execute(path, params, Verb::parse(verb), options).await
    }
}

/// Reject an empty body where the caller requires content
pub fn require_body(response: &ResponseEnvelope, context: &str) -> GraphResult<()> {
    if response.body().trim().is_empty() {
        Err(GraphError::api(
            "EmptyResponse",
            format!("{} returned an empty body (status {})", context, response.status()),
        ))
    } else {
        Ok(())
    }
}
