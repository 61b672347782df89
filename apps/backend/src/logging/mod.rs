pub mod redact;
pub mod security;
pub mod slack;

pub use redact::{redact, Redacted};
