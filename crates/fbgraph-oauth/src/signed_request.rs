//! Verification of `<signature>.<payload>` signed requests

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use fbgraph_core::{GraphError, GraphResult};
use hmac::{Hmac, Mac};
use serde_json::{Map, Value as JsonValue};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNED_REQUEST_ALGORITHM: &str = "HMAC-SHA256";

/// Decode a base64url segment, tolerating trailing padding
fn decode_segment(segment: &str, what: &str) -> GraphResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|e| GraphError::Parse(format!("invalid base64 in {}: {}", what, e)))
}

/// Verify a signed request against `app_secret` and return its payload.
pub fn parse_signed_request(
    signed_request: &str,
    app_secret: &str,
) -> GraphResult<Map<String, JsonValue>> {
    let (encoded_sig, encoded_payload) = signed_request
        .split_once('.')
        .ok_or_else(|| GraphError::Parse("signed request has no '.' separator".to_string()))?;

    let signature = decode_segment(encoded_sig, "signature")?;
    let payload_bytes = decode_segment(encoded_payload, "payload")?;
    let payload: Map<String, JsonValue> = serde_json::from_slice(&payload_bytes)
        .map_err(|e| GraphError::Parse(format!("signed request payload: {}", e)))?;

    match payload.get("algorithm").and_then(JsonValue::as_str) {
        Some(alg) if alg == SIGNED_REQUEST_ALGORITHM => {}
        Some(alg) => {
            return Err(GraphError::Signature(format!(
                "unsupported signature algorithm {}",
                alg
            )))
        }
        None => {
            return Err(GraphError::Signature(
                "signed request names no algorithm".to_string(),
            ))
        }
    }

    let mut mac = HmacSha256::new_from_slice(app_secret.as_bytes())
        .map_err(|e| GraphError::Signature(format!("hmac: {}", e)))?;
    mac.update(encoded_payload.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| GraphError::Signature("signed request signature mismatch".to_string()))?;

    Ok(payload)
}

/// Produce a signed request for `payload`, the inverse of [`parse_signed_request`].
pub fn sign_payload(payload: &Map<String, JsonValue>, app_secret: &str) -> GraphResult<String> {
    let encoded_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload)?);
    let mut mac = HmacSha256::new_from_slice(app_secret.as_bytes())
        .map_err(|e| GraphError::Signature(format!("hmac: {}", e)))?;
    mac.update(encoded_payload.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    Ok(format!("{}.{}", signature, encoded_payload))
}
