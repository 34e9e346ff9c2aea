use crate::cookie::parse_app_cookie;
use crate::signed_request::parse_signed_request;
use crate::token::AccessTokenInfo;
use fbgraph_core::{GraphError, GraphResult, Params};
use fbgraph_http::{require_body, RequestDispatcher, RequestOptions, Verb};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Requested permission scope, either pre-joined or as separate names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Permissions {
    Joined(String),
    List(Vec<String>),
}

impl Permissions {
    pub fn scope(&self) -> String {
        match self {
            Permissions::Joined(scope) => scope.clone(),
            Permissions::List(names) => names.join(","),
        }
    }
}

impl From<&str> for Permissions {
    fn from(scope: &str) -> Self {
        Permissions::Joined(scope.to_string())
    }
}

impl From<String> for Permissions {
    fn from(scope: String) -> Self {
        Permissions::Joined(scope)
    }
}

impl From<Vec<String>> for Permissions {
    fn from(names: Vec<String>) -> Self {
        Permissions::List(names)
    }
}

impl From<Vec<&str>> for Permissions {
    fn from(names: Vec<&str>) -> Self {
        Permissions::List(names.into_iter().map(String::from).collect())
    }
}

/// Per-call OAuth options
#[derive(Debug, Clone, Default)]
pub struct OAuthOptions {
    /// Overrides the manager's callback URL
    pub callback: Option<String>,
    pub permissions: Option<Permissions>,
    /// Dialog display mode (`page`, `popup`, ...)
    pub display: Option<String>,
    /// Connection overrides for token calls
    pub request: RequestOptions,
}

impl OAuthOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn callback(mut self, callback: impl Into<String>) -> Self {
        self.callback = Some(callback.into());
        self
    }

    pub fn permissions(mut self, permissions: impl Into<Permissions>) -> Self {
        self.permissions = Some(permissions.into());
        self
    }

    pub fn display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn request(mut self, request: RequestOptions) -> Self {
        self.request = request;
        self
    }
}

/// Builds OAuth URLs, exchanges codes and session keys for tokens, and
/// verifies cookies and signed requests for one application.
#[derive(Debug, Clone)]
pub struct OAuthTokenManager {
    app_id: String,
    app_secret: String,
    callback_url: Option<String>,
    dispatcher: RequestDispatcher,
}

impl OAuthTokenManager {
    pub fn new(
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
        callback_url: Option<String>,
        dispatcher: RequestDispatcher,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            callback_url,
            dispatcher,
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn app_secret(&self) -> &str {
        &self.app_secret
    }

    pub fn callback_url(&self) -> Option<&str> {
        self.callback_url.as_deref()
    }

    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    fn resolve_callback<'a>(&'a self, options: &'a OAuthOptions) -> GraphResult<&'a str> {
        options
            .callback
            .as_deref()
            .or(self.callback_url.as_deref())
            .ok_or_else(|| {
                GraphError::Configuration(
                    "a callback URL is required, either at construction or per call".to_string(),
                )
            })
    }

    fn oauth_base(&self) -> String {
        format!("https://{}/oauth", self.dispatcher.defaults().graph_server)
    }

    // Cookies

    /// All components of the app cookie, or `None` when it is missing or invalid
    pub fn user_info_from_cookies<'a, I>(&self, cookies: I) -> Option<BTreeMap<String, String>>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        parse_app_cookie(cookies, &self.app_id, &self.app_secret)
    }

    /// The user id carried by a valid app cookie
    pub fn user_from_cookies<'a, I>(&self, cookies: I) -> Option<String>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        self.user_info_from_cookies(cookies)
            .and_then(|mut info| info.remove("uid"))
    }

    // URLs

    /// URL of the authorization dialog; values are not escaped
    pub fn authorization_url(&self, options: &OAuthOptions) -> GraphResult<String> {
        let callback = self.resolve_callback(options)?;
        let mut url = format!(
            "{}/authorize?client_id={}&redirect_uri={}",
            self.oauth_base(),
            self.app_id,
            callback
        );
        if let Some(permissions) = &options.permissions {
            url.push_str("&scope=");
            url.push_str(&permissions.scope());
        }
        if let Some(display) = &options.display {
            url.push_str("&display=");
            url.push_str(display);
        }
        Ok(url)
    }

    /// URL that trades an authorization code for an access token
    pub fn token_exchange_url(&self, code: &str, options: &OAuthOptions) -> GraphResult<String> {
        let callback = self.resolve_callback(options)?;
        Ok(format!(
            "{}/access_token?client_id={}&redirect_uri={}&client_secret={}&code={}",
            self.oauth_base(),
            self.app_id,
            callback,
            self.app_secret,
            code
        ))
    }

    // Token exchange

    pub async fn fetch_access_token_info(
        &self,
        code: &str,
        options: &OAuthOptions,
    ) -> GraphResult<AccessTokenInfo> {
        let callback = self.resolve_callback(options)?;
        let args = Params::new()
            .with("code", code)
            .with("redirect_uri", callback);
        let body = self
            .fetch_token_string(args, Verb::Get, "access_token", &options.request)
            .await?;
        AccessTokenInfo::parse(&body)
    }

    pub async fn fetch_access_token(&self, code: &str, options: &OAuthOptions) -> GraphResult<String> {
        Ok(self.fetch_access_token_info(code, options).await?.access_token)
    }

    /// Token for the application itself (client-credentials grant)
    pub async fn fetch_app_access_token_info(
        &self,
        options: &OAuthOptions,
    ) -> GraphResult<AccessTokenInfo> {
        let args = Params::new().with("type", "client_cred");
        let body = self
            .fetch_token_string(args, Verb::Post, "access_token", &options.request)
            .await?;
        AccessTokenInfo::parse(&body)
    }

    pub async fn fetch_app_access_token(&self, options: &OAuthOptions) -> GraphResult<String> {
        Ok(self.fetch_app_access_token_info(options).await?.access_token)
    }

    /// Translate legacy session keys into tokens in a single call.
    ///
    /// The result has one slot per key, in order; keys the server rejected
    /// come back as `None`.
    pub async fn exchange_session_keys(
        &self,
        keys: &[String],
        options: &OAuthOptions,
    ) -> GraphResult<Vec<Option<AccessTokenInfo>>> {
        let args = Params::new()
            .with("type", "client_cred")
            .with("sessions", keys.join(","));
        let body = self
            .fetch_token_string(args, Verb::Post, "exchange_sessions", &options.request)
            .await?;

        let trimmed = body.trim();
        if trimmed.starts_with('{') && trimmed.contains("error") {
            return Err(GraphError::from_error_body(trimmed));
        }
        let slots: Vec<JsonValue> = serde_json::from_str(trimmed)
            .map_err(|e| GraphError::Parse(format!("session exchange response: {}", e)))?;

        let mut results: Vec<Option<AccessTokenInfo>> = slots
            .iter()
            .map(|slot| slot.as_object().and_then(AccessTokenInfo::from_json))
            .collect();
        if results.len() != keys.len() {
            warn!(
                expected = keys.len(),
                received = results.len(),
                "session exchange returned a different number of results"
            );
            results.resize(keys.len(), None);
        }
        Ok(results)
    }

    pub async fn tokens_from_session_keys(
        &self,
        keys: &[String],
        options: &OAuthOptions,
    ) -> GraphResult<Vec<Option<String>>> {
        Ok(self
            .exchange_session_keys(keys, options)
            .await?
            .into_iter()
            .map(|info| info.map(|i| i.access_token))
            .collect())
    }

    pub async fn token_from_session_key(
        &self,
        key: &str,
        options: &OAuthOptions,
    ) -> GraphResult<Option<String>> {
        let mut tokens = self
            .tokens_from_session_keys(&[key.to_string()], options)
            .await?;
        Ok(tokens.pop().flatten())
    }

    // Signed requests

    pub fn parse_signed_request(&self, signed_request: &str) -> GraphResult<Map<String, JsonValue>> {
        parse_signed_request(signed_request, &self.app_secret)
    }

    /// Call `/oauth/<endpoint>` with the app credentials plus `args` and
    /// return the raw body. SSL is on unless the options turn it off.
    async fn fetch_token_string(
        &self,
        args: Params,
        verb: Verb,
        endpoint: &str,
        request: &RequestOptions,
    ) -> GraphResult<String> {
        let mut params = Params::new()
            .with("client_id", self.app_id.as_str())
            .with("client_secret", self.app_secret.as_str());
        for (key, value) in args {
            params.insert(key, value);
        }

        let mut request = request.clone();
        if request.use_ssl.is_none() {
            request.use_ssl = Some(true);
        }

        debug!(endpoint, app_id = %self.app_id, "fetching token");
        let response = self
            .dispatcher
            .execute(&format!("/oauth/{}", endpoint), params, verb, &request)
            .await?;
        require_body(&response, &format!("oauth/{}", endpoint))?;
        Ok(response.into_body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookie::tests::{signed_cookies, APP_ID, SECRET};
    use crate::signed_request::sign_payload;
    use serde_json::json;

    fn manager() -> OAuthTokenManager {
        OAuthTokenManager::new(
            "123",
            "abc",
            Some("https://cb/".to_string()),
            RequestDispatcher::default(),
        )
    }

    #[test]
    fn authorization_url_without_options() {
        assert_eq!(
            manager().authorization_url(&OAuthOptions::new()).unwrap(),
            "https://graph.facebook.com/oauth/authorize?client_id=123&redirect_uri=https://cb/"
        );
    }

    #[test]
    fn authorization_url_with_scope_and_display() {
        let m = manager();
        assert_eq!(
            m.authorization_url(&OAuthOptions::new().permissions(vec!["a", "b"]))
                .unwrap(),
            "https://graph.facebook.com/oauth/authorize?client_id=123&redirect_uri=https://cb/&scope=a,b"
        );
        assert_eq!(
            m.authorization_url(&OAuthOptions::new().permissions("a,b").display("popup"))
                .unwrap(),
            "https://graph.facebook.com/oauth/authorize?client_id=123&redirect_uri=https://cb/&scope=a,b&display=popup"
        );
    }

    #[test]
    fn per_call_callback_wins() {
        let url = manager()
            .authorization_url(&OAuthOptions::new().callback("https://other/"))
            .unwrap();
        assert!(url.ends_with("redirect_uri=https://other/"));
    }

    #[test]
    fn missing_callback_is_a_configuration_error() {
        let m = OAuthTokenManager::new("123", "abc", None, RequestDispatcher::default());
        assert!(matches!(
            m.authorization_url(&OAuthOptions::new()).unwrap_err(),
            GraphError::Configuration(_)
        ));
        assert!(matches!(
            m.token_exchange_url("code", &OAuthOptions::new()).unwrap_err(),
            GraphError::Configuration(_)
        ));
        assert!(m
            .token_exchange_url("code", &OAuthOptions::new().callback("https://cb/"))
            .is_ok());
    }

    #[test]
    fn token_exchange_url_embeds_credentials() {
        assert_eq!(
            manager().token_exchange_url("xyz", &OAuthOptions::new()).unwrap(),
            "https://graph.facebook.com/oauth/access_token?client_id=123&redirect_uri=https://cb/&client_secret=abc&code=xyz"
        );
    }

    #[test]
    fn permissions_scope() {
        assert_eq!(Permissions::from("x,y").scope(), "x,y");
        assert_eq!(Permissions::from(vec!["x".to_string(), "y".to_string()]).scope(), "x,y");
    }

    #[test]
    fn cookies_through_the_manager() {
        let m = OAuthTokenManager::new(APP_ID, SECRET, None, RequestDispatcher::default());
        let jar = signed_cookies(&[("access_token", "tok"), ("uid", "42")]);
        assert_eq!(m.user_from_cookies(&jar), Some("42".to_string()));
        assert_eq!(m.user_info_from_cookies(&jar).unwrap().len(), 3);

        let other = OAuthTokenManager::new(APP_ID, "wrong", None, RequestDispatcher::default());
        assert_eq!(other.user_from_cookies(&jar), None);
    }

    #[test]
    fn signed_request_uses_the_app_secret() {
        let payload = json!({"algorithm": "HMAC-SHA256", "user_id": "1"})
            .as_object()
            .cloned()
            .unwrap();
        let signed = sign_payload(&payload, "abc").unwrap();
        assert_eq!(manager().parse_signed_request(&signed).unwrap(), payload);
        assert!(manager().parse_signed_request(&sign_payload(&payload, "zzz").unwrap()).is_err());
    }
}
