//! Token-derived identity.
//!
//! The client never holds the signing secret, so tokens are decoded without
//! signature verification; the backend re-checks every request anyway. A token
//! that fails to decode simply yields no identity, it never raises.

use chrono::Utc;
use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl Identity {
    /// Role comparison is exact and case-sensitive; "admin" is not an admin.
    pub fn is_admin(&self) -> bool {
        self.role == "ADMIN"
    }
}

/// Decodes the claims of a bearer token without verifying its signature.
/// Returns `None` for anything that is not a well-formed JWT.
pub fn decode_claims(token: &str) -> Option<Map<String, Value>> {
    let header = decode_header(token).ok()?;
    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Value>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .and_then(|data| data.claims.as_object().cloned())
}

/// True iff the token decodes and its `exp` claim is strictly in the future.
pub fn token_is_live(token: &str) -> bool {
    let Some(claims) = decode_claims(token) else {
        return false;
    };
    match claims.get("exp").and_then(Value::as_i64) {
        Some(exp) => exp > Utc::now().timestamp(),
        None => false,
    }
}

/// Resolves an identity from a token. Different backend generations name the
/// id and role claims differently; each is tried in priority order. No
/// resolvable id means no identity.
pub fn resolve_identity(token: &str) -> Option<Identity> {
    let claims = decode_claims(token)?;

    let id = ["id", "userId", "user_id", "sub"]
        .iter()
        .find_map(|key| claims.get(*key).and_then(claim_as_i64))?;

    let role = claims
        .get("role")
        .and_then(claim_as_role)
        .or_else(|| claims.get("roles").and_then(claim_as_role))
        .or_else(|| claims.get("authorities").and_then(claim_as_role))
        .unwrap_or_default();

    let username = ["username", "name"]
        .iter()
        .find_map(|key| claims.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();

    let email = claims
        .get("email")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some(Identity {
        id,
        username,
        email,
        role,
    })
}

fn claim_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A role claim may be a plain string, a list of strings, or a list of
/// Spring-style `{authority}` objects; the first entry wins for lists.
fn claim_as_role(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.first().and_then(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj
                .get("authority")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        }),
        _ => None,
    }
}
