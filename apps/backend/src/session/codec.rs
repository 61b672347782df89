//! Signed token encoding and validation.
//!
//! Signature and algorithm checks are delegated to `jsonwebtoken`; the time
//! window is checked here against the caller's clock so that "now" is the
//! same instant the adapter stamps tokens with.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::SessionClaims;
use super::error::{DecodeFailure, SessionError};
use crate::state::session_config::SessionConfig;

/// Outcome of decoding a presented token.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeResult {
    Valid(SessionClaims),
    Invalid(DecodeFailure),
}

impl DecodeResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, DecodeResult::Valid(_))
    }

    pub fn claims(&self) -> Option<&SessionClaims> {
        match self {
            DecodeResult::Valid(claims) => Some(claims),
            DecodeResult::Invalid(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&DecodeFailure> {
        match self {
            DecodeResult::Valid(_) => None,
            DecodeResult::Invalid(failure) => Some(failure),
        }
    }
}

#[derive(Clone)]
pub struct TokenCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenCodec {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            algorithm: config.algorithm,
            encoding_key: config.encoding_key(),
            decoding_key: config.decoding_key(),
        }
    }

    pub fn encode(&self, claims: &SessionClaims) -> Result<String, SessionError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| SessionError::encode(e.to_string()))
    }

    /// Decode and validate `token` as of `now` (unix seconds).
    ///
    /// A token is valid when its signature verifies under the configured key
    /// and algorithm, it carries `exp`, `exp > now`, and `nbf <= now` when
    /// `nbf` is present.
    pub fn decode(&self, token: &str, now: i64) -> DecodeResult {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let claims = match decode::<SessionClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => data.claims,
            Err(e) => return DecodeResult::Invalid(e.into()),
        };

        let Some(exp) = claims.exp() else {
            return DecodeResult::Invalid(DecodeFailure::MissingExpiry);
        };
        if exp <= now {
            return DecodeResult::Invalid(DecodeFailure::Expired);
        }
        if claims.nbf().is_some_and(|nbf| nbf > now) {
            return DecodeResult::Invalid(DecodeFailure::Premature);
        }

        DecodeResult::Valid(claims)
    }
}
