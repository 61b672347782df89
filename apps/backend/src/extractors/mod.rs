pub mod session;
pub mod validated_json;

pub use session::Session;
pub use validated_json::ValidatedJson;
