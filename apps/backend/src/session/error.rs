use thiserror::Error;

/// Why a presented token was not trusted.
///
/// Recovered locally by the adapter: the session starts empty and the
/// reason is kept for `last_error`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeFailure {
    #[error("Signature verification failed")]
    InvalidSignature,
    #[error("Token algorithm does not match the configured algorithm")]
    AlgorithmMismatch,
    #[error("Expired token")]
    Expired,
    #[error("Cannot handle token prior to its not-before time")]
    Premature,
    #[error("Token has no expiry")]
    MissingExpiry,
    #[error("Malformed token: {0}")]
    Malformed(String),
}

impl DecodeFailure {
    /// Stable identifier for logs.
    pub fn code(&self) -> &'static str {
        match self {
            DecodeFailure::InvalidSignature => "invalid_signature",
            DecodeFailure::AlgorithmMismatch => "algorithm_mismatch",
            DecodeFailure::Expired => "token_expired",
            DecodeFailure::Premature => "token_premature",
            DecodeFailure::MissingExpiry => "missing_expiry",
            DecodeFailure::Malformed(_) => "malformed_token",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for DecodeFailure {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidSignature => DecodeFailure::InvalidSignature,
            jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => DecodeFailure::AlgorithmMismatch,
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => DecodeFailure::Expired,
            jsonwebtoken::errors::ErrorKind::ImmatureSignature => DecodeFailure::Premature,
            _ => DecodeFailure::Malformed(e.to_string()),
        }
    }
}

/// A token source or sink could not do its job.
///
/// Never recovered by the adapter: without a place to read or write the
/// token the request cannot continue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Token transport unavailable: {0}")]
    Unavailable(String),
    #[error("Token transport failed: {0}")]
    Failed(String),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session configuration error: {detail}")]
    Config { detail: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Failed to encode session token: {detail}")]
    Encode { detail: String },
    #[error("Session is not active")]
    NotActive,
}

impl SessionError {
    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn encode(detail: impl Into<String>) -> Self {
        Self::Encode {
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::errors::{Error, ErrorKind};

    use super::*;

    #[test]
    fn jwt_errors_map_to_decode_failures() {
        assert_eq!(
            DecodeFailure::from(Error::from(ErrorKind::InvalidSignature)),
            DecodeFailure::InvalidSignature
        );
        assert_eq!(
            DecodeFailure::from(Error::from(ErrorKind::InvalidAlgorithm)),
            DecodeFailure::AlgorithmMismatch
        );
        assert!(matches!(
            DecodeFailure::from(Error::from(ErrorKind::InvalidToken)),
            DecodeFailure::Malformed(_)
        ));
    }

    #[test]
    fn failure_codes_are_stable() {
        assert_eq!(DecodeFailure::Expired.code(), "token_expired");
        assert_eq!(DecodeFailure::Premature.code(), "token_premature");
        assert_eq!(
            DecodeFailure::Malformed("x".to_string()).code(),
            "malformed_token"
        );
    }
}
