use std::sync::Arc;

use super::session_config::SessionConfig;
use crate::session::{Clock, SystemClock};

/// Application state shared by every worker.
#[derive(Clone)]
pub struct AppState {
    /// Validated session configuration
    pub session: Arc<SessionConfig>,
    /// Time source for token stamping and validation
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(session: SessionConfig) -> Self {
        Self {
            session: Arc::new(session),
            clock: Arc::new(SystemClock),
        }
    }

    /// Swap the clock, typically for a `FixedClock` in tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("session", &self.session)
            .field("now", &self.clock.now())
            .finish()
    }
}
