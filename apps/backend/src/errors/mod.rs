//! Error codes shared by the HTTP layer.

pub mod error_code;

pub use error_code::ErrorCode;
