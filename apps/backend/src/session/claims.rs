//! Session claim set.
//!
//! The token payload is a flat JSON object. A handful of registered claim
//! names carry the token lifecycle; everything else is application state.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ISS: &str = "iss";
pub const SUB: &str = "sub";
pub const AUD: &str = "aud";
pub const EXP: &str = "exp";
pub const NBF: &str = "nbf";
pub const IAT: &str = "iat";
pub const JTI: &str = "jti";

/// Claims rewritten on every token issuance. Callers cannot set these.
pub const LIFECYCLE_CLAIMS: [&str; 5] = [JTI, IAT, NBF, EXP, ISS];

pub fn is_lifecycle_claim(name: &str) -> bool {
    LIFECYCLE_CLAIMS.contains(&name)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionClaims(Map<String, Value>);

impl SessionClaims {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iss(&self) -> Option<&str> {
        self.str_claim(ISS)
    }

    pub fn sub(&self) -> Option<&str> {
        self.str_claim(SUB)
    }

    pub fn aud(&self) -> Option<&str> {
        self.str_claim(AUD)
    }

    pub fn jti(&self) -> Option<&str> {
        self.str_claim(JTI)
    }

    pub fn exp(&self) -> Option<i64> {
        self.time_claim(EXP)
    }

    pub fn nbf(&self) -> Option<i64> {
        self.time_claim(NBF)
    }

    pub fn iat(&self) -> Option<i64> {
        self.time_claim(IAT)
    }

    fn str_claim(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    // NumericDate may legally carry a fraction; other issuers do send floats.
    fn time_claim(&self, name: &str) -> Option<i64> {
        let value = self.0.get(name)?;
        value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f.floor() as i64))
    }
}

impl From<Map<String, Value>> for SessionClaims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for SessionClaims {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn registered_claim_accessors() {
        let mut claims = SessionClaims::new();
        claims.insert(SUB, "u1");
        claims.insert(AUD, "Admin");
        claims.insert(EXP, 1_700_000_900);
        claims.insert(NBF, json!(1_700_000_000.5));

        assert_eq!(claims.sub(), Some("u1"));
        assert_eq!(claims.aud(), Some("Admin"));
        assert_eq!(claims.exp(), Some(1_700_000_900));
        assert_eq!(claims.nbf(), Some(1_700_000_000));
        assert_eq!(claims.iat(), None);
        assert_eq!(claims.jti(), None);
    }

    #[test]
    fn non_string_subject_is_not_a_subject() {
        let mut claims = SessionClaims::new();
        claims.insert(SUB, 42);

        assert_eq!(claims.sub(), None);
        assert!(claims.contains(SUB));
    }

    #[test]
    fn serializes_as_flat_object() {
        let claims: SessionClaims = [
            ("sub".to_string(), json!("u1")),
            ("cart".to_string(), json!([1, 2])),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            serde_json::to_value(&claims).unwrap(),
            json!({"sub": "u1", "cart": [1, 2]})
        );
    }

    #[test]
    fn lifecycle_claims_are_recognized() {
        for name in ["jti", "iat", "nbf", "exp", "iss"] {
            assert!(is_lifecycle_claim(name));
        }
        assert!(!is_lifecycle_claim("sub"));
        assert!(!is_lifecycle_claim("aud"));
    }
}
