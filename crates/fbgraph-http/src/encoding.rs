//! `application/x-www-form-urlencoded` encoding for parameter sets

use fbgraph_core::Params;
use url::form_urlencoded;

/// Encode every scalar parameter as `key=value` pairs joined by `&`.
///
/// Strings are sent verbatim and other scalars as JSON. Upload values have no
/// form representation and are skipped; callers check for them first and use
/// the multipart encoder instead.
pub fn encode_params(params: &Params) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params.iter() {
        if let Some(value) = value.form_value() {
            serializer.append_pair(key, &value);
        }
    }
    serializer.finish()
}

/// Append encoded parameters to a path as a query string
pub fn path_with_query(path: &str, params: &Params) -> String {
    let query = encode_params(params);
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

/// Ensure a request path starts with `/`
pub fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbgraph_core::UploadableParameter;
    use serde_json::json;

    #[test]
    fn encodes_strings_and_json_values() {
        let params = Params::new()
            .with("message", "hello world & more")
            .with("limit", 5)
            .with("fields", json!(["id", "name"]));
        assert_eq!(
            encode_params(&params),
            "message=hello+world+%26+more&limit=5&fields=%5B%22id%22%2C%22name%22%5D"
        );
    }

    #[test]
    fn skips_uploads() {
        let params = Params::new()
            .with("caption", "hi")
            .with("source", UploadableParameter::from_bytes(vec![0u8], "image/png"));
        assert_eq!(encode_params(&params), "caption=hi");
    }

    #[test]
    fn query_only_added_when_present() {
        assert_eq!(path_with_query("/me", &Params::new()), "/me");
        assert_eq!(
            path_with_query("/me", &Params::new().with("fields", "id")),
            "/me?fields=id"
        );
    }

    #[test]
    fn leading_slash_is_ensured() {
        assert_eq!(normalize_path("me/feed"), "/me/feed");
        assert_eq!(normalize_path("/me/feed"), "/me/feed");
        assert_eq!(normalize_path(""), "/");
    }
}
