//! Signed `fbs_<app id>` cookie parsing

use chrono::Utc;
use std::collections::BTreeMap;
use tracing::debug;

pub fn cookie_name(app_id: &str) -> String {
    format!("fbs_{}", app_id)
}

/// Constant-time string comparison
fn constant_time_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.len() != b.len() {
        return false;
    }
    let mut acc = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        acc |= x ^ y;
    }
    acc == 0
}

/// Split a raw cookie value into its `key=value` components.
///
/// Surrounding quotes are dropped; values are kept exactly as sent since the
/// signature covers the raw text.
pub fn split_components(raw: &str) -> BTreeMap<String, String> {
    raw.replace('"', "")
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

/// MD5 hex digest of the sorted components (minus `sig`) followed by the secret
pub fn cookie_signature(components: &BTreeMap<String, String>, app_secret: &str) -> String {
    let mut payload: String = components
        .iter()
        .filter(|(k, _)| k.as_str() != "sig")
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    payload.push_str(app_secret);
    format!("{:x}", md5::compute(payload.as_bytes()))
}

/// Validate the app cookie and return its components, `sig` included.
///
/// `None` when the cookie is absent, its signature does not match, or it
/// carries an expiry in the past. A missing or zero `expires` never expires.
pub fn parse_app_cookie<'a, I>(
    cookies: I,
    app_id: &str,
    app_secret: &str,
) -> Option<BTreeMap<String, String>>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let name = cookie_name(app_id);
    let raw = cookies
        .into_iter()
        .find(|(k, _)| k.as_str() == name)
        .map(|(_, v)| v)?;

    let components = split_components(raw);
    let sig = components.get("sig")?;
    if !constant_time_eq(sig, &cookie_signature(&components, app_secret)) {
        debug!(cookie = %name, "cookie signature mismatch");
        return None;
    }

    let expires = components
        .get("expires")
        .map(|v| v.parse::<i64>().unwrap_or(-1))
        .unwrap_or(0);
    if expires != 0 && expires <= Utc::now().timestamp() {
        debug!(cookie = %name, expires, "cookie expired");
        return None;
    }

    Some(components)
}
