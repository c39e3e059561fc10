//! Nexfloor — library crate for the notification feed and integration tests.
//!
//! Re-exports modules needed by the binary and by integration tests in `tests/`.

pub mod config;
pub mod errors;
pub mod models;
pub mod notification;
