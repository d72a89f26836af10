//! Unverified JWT payload inspection.
//!
//! The server signs and verifies tokens. The client only reads the payload
//! to learn which user id to put into user-scoped paths.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;

const USER_ID_CLAIMS: [&str; 5] = ["userId", "user_id", "uid", "id", "sub"];

/// Extract the first numeric user id claim from a JWT.
pub fn decode_user_id(token: &str) -> Option<u64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;

    USER_ID_CLAIMS
        .iter()
        .filter_map(|claim| claims.get(claim))
        .find_map(numeric_claim)
}

fn numeric_claim(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
