#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;
pub mod telemetry;

// Re-exports for public API
pub use error::AppError;
pub use errors::ErrorCode;
pub use extractors::Session;
pub use middleware::{RequestTrace, SessionMiddleware};
pub use session::{
    Clock, DecodeFailure, DecodeResult, FixedClock, JwtSession, SessionClaims, SessionError,
    SessionHandler, SessionStatus, TokenCodec,
};
pub use state::{AppState, SessionConfig, TransportKind};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    session_test_support::logging::init();
}
