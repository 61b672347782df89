use std::fmt;
use std::str::FromStr;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use serde::Deserialize;

use crate::config::session::SessionOptions;
use crate::session::SessionError;

pub const DEFAULT_ALGORITHM: Algorithm = Algorithm::HS512;
pub const DEFAULT_LIFETIME_SECONDS: i64 = 900;
pub const DEFAULT_TOKEN_NAME: &str = "X-Access-Token";
/// One year; longer-lived session tokens are a configuration mistake.
pub const MAX_LIFETIME_SECONDS: i64 = 365 * 24 * 60 * 60;

/// Where the session token travels between client and server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Cookie named after the token name; the default.
    #[default]
    Cookie,
    /// Request/response header named after the token name.
    Header,
}

impl FromStr for TransportKind {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cookie" => Ok(Self::Cookie),
            "header" => Ok(Self::Header),
            other => Err(SessionError::config(format!(
                "unknown session transport '{other}'"
            ))),
        }
    }
}

/// Validated configuration for the token session adapter.
#[derive(Clone)]
pub struct SessionConfig {
    signing_key: Vec<u8>,
    /// JWT algorithm; always one of the HMAC family
    pub algorithm: Algorithm,
    /// Token lifetime in seconds, strictly positive
    pub lifetime_seconds: i64,
    /// Cookie or header name carrying the token
    pub token_name: String,
    /// Value stamped into `iss`; omitted from tokens when unset
    pub issuer: Option<String>,
    pub transport: TransportKind,
}

impl SessionConfig {
    /// Build a configuration from raw options, applying defaults.
    ///
    /// Fails when the signing key is missing or empty, when the algorithm is
    /// unknown or not HMAC-based, or when the lifetime is not in
    /// `1..=MAX_LIFETIME_SECONDS`.
    pub fn configure(options: SessionOptions) -> Result<Self, SessionError> {
        let signing_key = options
            .signing_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| SessionError::config("A JWT signing key is required"))?;

        let algorithm = match options.algorithm.as_deref() {
            None => DEFAULT_ALGORITHM,
            Some(name) => Algorithm::from_str(name.trim()).map_err(|_| {
                SessionError::config(format!("unknown JWT algorithm '{name}'"))
            })?,
        };
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(SessionError::config(format!(
                "JWT algorithm {algorithm:?} needs a key pair; only HS256, HS384 and HS512 are supported"
            )));
        }

        let lifetime_seconds = options
            .lifetime_seconds
            .unwrap_or(DEFAULT_LIFETIME_SECONDS);
        if lifetime_seconds <= 0 {
            return Err(SessionError::config(format!(
                "session lifetime must be positive, got {lifetime_seconds}"
            )));
        }
        if lifetime_seconds > MAX_LIFETIME_SECONDS {
            return Err(SessionError::config(format!(
                "session lifetime must be at most {MAX_LIFETIME_SECONDS} seconds, got {lifetime_seconds}"
            )));
        }

        let token_name = options
            .token_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TOKEN_NAME.to_string());

        Ok(Self {
            signing_key: signing_key.into_bytes(),
            algorithm,
            lifetime_seconds,
            token_name,
            issuer: options.issuer.filter(|iss| !iss.is_empty()),
            transport: options.transport.unwrap_or_default(),
        })
    }

    /// Shorthand for a configuration that only sets the signing key.
    pub fn new(signing_key: impl Into<String>) -> Result<Self, SessionError> {
        Self::configure(SessionOptions {
            signing_key: Some(signing_key.into()),
            ..SessionOptions::default()
        })
    }

    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.signing_key)
    }

    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.signing_key)
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_transport(mut self, transport: TransportKind) -> Self {
        self.transport = transport;
        self
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("signing_key", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field("lifetime_seconds", &self.lifetime_seconds)
            .field("token_name", &self.token_name)
            .field("issuer", &self.issuer)
            .field("transport", &self.transport)
            .finish()
    }
}
