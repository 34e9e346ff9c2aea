//! Request parameter model
//!
//! Every value is tagged at construction as either a scalar form value or an
//! upload, so deciding whether a request needs multipart encoding is a
//! structural check.

use crate::upload::UploadableParameter;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

/// Parameter key that carries an access token; its presence forces SSL
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Parameter key used to tunnel custom verbs through a POST
pub const METHOD_KEY: &str = "method";

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Scalar(JsonValue),
    Upload(UploadableParameter),
}

impl ParamValue {
    pub fn is_upload(&self) -> bool {
        matches!(self, ParamValue::Upload(_))
    }

    /// Form representation of a scalar: strings verbatim, everything else as
    /// JSON. Uploads have no form representation.
    pub fn form_value(&self) -> Option<String> {
        match self {
            ParamValue::Scalar(JsonValue::String(s)) => Some(s.clone()),
            ParamValue::Scalar(other) => Some(other.to_string()),
            ParamValue::Upload(_) => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Scalar(JsonValue::String(value.to_string()))
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Scalar(JsonValue::String(value))
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Scalar(JsonValue::from(value))
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Scalar(JsonValue::from(value))
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        ParamValue::Scalar(JsonValue::from(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Scalar(JsonValue::Bool(value))
    }
}

impl From<JsonValue> for ParamValue {
    fn from(value: JsonValue) -> Self {
        ParamValue::Scalar(value)
    }
}

impl From<UploadableParameter> for ParamValue {
    fn from(value: UploadableParameter) -> Self {
        ParamValue::Upload(value)
    }
}

/// Ordered parameter set for one call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: IndexMap<String, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.entries.iter()
    }

    /// True when an access token is present and not null
    pub fn has_access_token(&self) -> bool {
        match self.entries.get(ACCESS_TOKEN_KEY) {
            Some(ParamValue::Scalar(JsonValue::Null)) | None => false,
            Some(_) => true,
        }
    }

    pub fn has_uploads(&self) -> bool {
        self.entries.values().any(ParamValue::is_upload)
    }
}

impl IntoIterator for Params {
    type Item = (String, ParamValue);
    type IntoIter = indexmap::map::IntoIter<String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}
