use http::HeaderMap;
use std::borrow::Cow;

/// Normalized outcome of one transport call.
///
/// No status interpretation happens here; a 500 is as much a response as a
/// 200. Callers decide what the status means. The body is kept as the bytes
/// received and only decoded on access.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    status: u16,
    body: Vec<u8>,
    headers: HeaderMap,
}

impl ResponseEnvelope {
    pub fn new(status: u16, body: impl Into<Vec<u8>>, headers: HeaderMap) -> Self {
        Self {
            status,
            body: body.into(),
            headers,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Body as text; invalid UTF-8 sequences are replaced
    pub fn body(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Body exactly as received
    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn into_body(self) -> String {
        match String::from_utf8(self.body) {
            Ok(body) => body,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{HeaderValue, CONTENT_TYPE};

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/javascript"));
        let response = ResponseEnvelope::new(200, "{}", headers);
        assert_eq!(response.header("Content-Type"), Some("text/javascript"));
        assert_eq!(response.header("x-fb-rev"), None);
        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), "{}");
    }

    #[test]
    fn body_bytes_are_kept_untouched() {
        let raw = vec![b'{', 0xff, 0xfe, b'}'];
        let response = ResponseEnvelope::new(200, raw.clone(), HeaderMap::new());
        assert_eq!(response.body_bytes(), raw.as_slice());
        assert_eq!(response.body(), "{\u{fffd}\u{fffd}}");
        assert_eq!(response.into_bytes(), raw);
    }
}
