use serde::Deserialize;

use crate::session::SessionError;
use crate::state::session_config::TransportKind;

pub const SESSION_JWT_KEY: &str = "SESSION_JWT_KEY";
pub const SESSION_JWT_ALGORITHM: &str = "SESSION_JWT_ALGORITHM";
pub const SESSION_LIFETIME_SECONDS: &str = "SESSION_LIFETIME_SECONDS";
pub const SESSION_TOKEN_NAME: &str = "SESSION_TOKEN_NAME";
pub const SESSION_ISSUER: &str = "SESSION_ISSUER";
pub const SESSION_TRANSPORT: &str = "SESSION_TRANSPORT";

/// Raw, unvalidated session options.
///
/// Every field is optional here; `SessionConfig::configure` applies defaults
/// and rejects a missing signing key. Field aliases accept the camelCase
/// spelling used by JSON configuration files.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionOptions {
    #[serde(default, alias = "signingKey")]
    pub signing_key: Option<String>,
    #[serde(default)]
    pub algorithm: Option<String>,
    #[serde(default, alias = "lifetimeSeconds")]
    pub lifetime_seconds: Option<i64>,
    #[serde(default, alias = "tokenName")]
    pub token_name: Option<String>,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub transport: Option<TransportKind>,
}

impl SessionOptions {
    /// Read options from `SESSION_*` environment variables.
    ///
    /// Unset or empty variables stay `None`. Values that are present but do
    /// not parse are reported instead of silently falling back to defaults.
    pub fn from_env() -> Result<Self, SessionError> {
        let lifetime_seconds = match env_var(SESSION_LIFETIME_SECONDS) {
            Some(raw) => Some(raw.trim().parse::<i64>().map_err(|_| {
                SessionError::config(format!(
                    "{SESSION_LIFETIME_SECONDS} must be an integer number of seconds"
                ))
            })?),
            None => None,
        };

        let transport = env_var(SESSION_TRANSPORT)
            .map(|raw| raw.parse::<TransportKind>())
            .transpose()?;

        Ok(Self {
            signing_key: env_var(SESSION_JWT_KEY),
            algorithm: env_var(SESSION_JWT_ALGORITHM),
            lifetime_seconds,
            token_name: env_var(SESSION_TOKEN_NAME),
            issuer: env_var(SESSION_ISSUER),
            transport,
        })
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
