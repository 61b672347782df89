use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use session_backend::session::FixedClock;
use session_backend::state::session_config::DEFAULT_TOKEN_NAME;
use session_backend::{AppState, SessionConfig, TransportKind};
use session_test_support::tokens::TEST_KEY;

/// Frozen "now" used by HTTP tests.
pub const NOW: i64 = 1_700_000_000;

/// App state with the shared test key, a frozen clock and the given transport.
pub fn test_state(transport: TransportKind) -> AppState {
    let key = String::from_utf8_lossy(TEST_KEY).into_owned();
    let config = SessionConfig::new(key)
        .expect("test session config")
        .with_issuer("session-backend.test")
        .with_transport(transport);

    AppState::new(config).with_clock(Arc::new(FixedClock::new(NOW)))
}

/// Value of the session cookie set on `resp`, if any.
pub fn session_cookie_value<B>(resp: &ServiceResponse<B>) -> Option<String> {
    resp.response()
        .cookies()
        .find(|c| c.name() == DEFAULT_TOKEN_NAME)
        .map(|c| c.value().to_string())
}
