//! Session backend test support utilities
//!
//! Shared helpers for the backend's unit and integration tests: a unified
//! logging initializer and token helpers that talk to `jsonwebtoken`
//! directly, independent of the session adapter under test.

pub mod logging;
pub mod tokens;
