pub mod request_trace;
pub mod session;

pub use request_trace::{RequestId, RequestTrace};
pub use session::SessionMiddleware;
