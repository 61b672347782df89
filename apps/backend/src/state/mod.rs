pub mod app_state;
pub mod session_config;

pub use app_state::AppState;
pub use session_config::{SessionConfig, TransportKind};
