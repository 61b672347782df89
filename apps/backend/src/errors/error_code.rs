//! Error codes for the session backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that appear
//! in HTTP responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication
    /// No session subject
    Unauthorized,

    // Request validation
    BadRequest,
    /// Body is not a JSON object of claims
    InvalidClaims,
    /// Attempt to set a lifecycle claim owned by the adapter
    ReservedClaim,

    // Session lifecycle
    /// Session already closed or destroyed
    SessionNotActive,
    /// Session middleware not installed on this route
    SessionUnavailable,
    /// Token source or sink failed
    SessionTransport,
    /// Token could not be signed
    TokenEncode,

    // System
    ConfigError,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",

            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidClaims => "INVALID_CLAIMS",
            Self::ReservedClaim => "RESERVED_CLAIM",

            Self::SessionNotActive => "SESSION_NOT_ACTIVE",
            Self::SessionUnavailable => "SESSION_UNAVAILABLE",
            Self::SessionTransport => "SESSION_TRANSPORT",
            Self::TokenEncode => "TOKEN_ENCODE",

            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
