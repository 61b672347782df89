//! Token crafting and inspection helpers.
//!
//! These sign and decode with `jsonwebtoken` directly so tests can build
//! inbound tokens the way a foreign issuer would, and check outbound tokens
//! without trusting the adapter's own decoder.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{json, Map, Value};

/// Signing key shared by most tests.
pub const TEST_KEY: &[u8] = b"test_secret_key_for_testing_purposes_only";

/// Current unix time in seconds.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// Sign an arbitrary claims value.
///
/// Panics if encoding fails; only meant for tests.
pub fn sign_claims(claims: &Value, key: &[u8], algorithm: Algorithm) -> String {
    encode(&Header::new(algorithm), claims, &EncodingKey::from_secret(key))
        .expect("test token should encode")
}

/// Decode a token, checking only its signature and algorithm.
///
/// Panics on any failure; only meant for tests.
pub fn decode_claims(token: &str, key: &[u8], algorithm: Algorithm) -> Map<String, Value> {
    let mut validation = Validation::new(algorithm);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Map<String, Value>>(token, &DecodingKey::from_secret(key), &validation)
        .expect("test token should decode")
        .claims
}

/// A claim set shaped like one the backend would have issued earlier.
///
/// `exp_offset` is added to `now` to produce `exp`; pass a negative value
/// for an already expired token.
pub fn session_claims(sub: &str, aud: &str, now: i64, exp_offset: i64) -> Value {
    json!({
        "jti": "5e1f0c3a9b7d2e4f6a8c0b1d3e5f7a9c0b2d4e6f8a0c",
        "iss": "example.com",
        "sub": sub,
        "aud": aud,
        "iat": now,
        "nbf": now - 10,
        "exp": now + exp_offset,
    })
}
