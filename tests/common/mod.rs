//! Common test utilities for email-sink integration tests

#[allow(dead_code)]
pub mod config;
#[allow(dead_code)]
pub mod relay;

#[allow(unused_imports)]
pub use config::*;
#[allow(unused_imports)]
pub use relay::*;
