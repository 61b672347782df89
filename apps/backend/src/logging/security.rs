use tracing::{info, warn};

use crate::logging::redact::Redacted;
use crate::session::DecodeFailure;

/// A presented session token was not trusted; the session starts empty.
pub fn session_token_rejected(failure: &DecodeFailure) {
    warn!(
        event = "SECURITY_SESSION_TOKEN_REJECTED",
        reason = failure.code(),
        detail = %failure,
        "Session token rejected"
    );
}

/// A session was explicitly destroyed and its token expired on the client.
pub fn session_destroyed(session_id: Option<&str>) {
    info!(
        event = "SECURITY_SESSION_DESTROYED",
        session_id = %Redacted(session_id.unwrap_or("")),
        "Session destroyed"
    );
}
