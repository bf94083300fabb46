#![allow(dead_code)]

pub mod config;
pub mod mock_whisper;
pub mod server;

/// Session token accepted by the default test configuration
pub const SESSION_TOKEN: &str = "test-session-token";

/// User the test session token resolves to
pub const SESSION_USER: &str = "user-test";
