#![allow(dead_code)]

pub mod app_builder;
pub mod capture;

pub use app_builder::{session_cookie_value, test_state, NOW};
pub use capture::CaptureClient;
