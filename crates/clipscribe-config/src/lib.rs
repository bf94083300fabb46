#![allow(clippy::must_use_candidate)]

pub mod cors;
mod env;
pub mod health;
mod loader;
pub mod server;
pub mod session;
pub mod telemetry;
pub mod transcription;

use serde::Deserialize;

pub use cors::*;
pub use health::*;
pub use server::*;
pub use session::*;
pub use telemetry::{ExportProtocol, ExporterConfig, LogFormat, TelemetryConfig};
pub use transcription::*;

/// Top-level Clipscribe configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Session resolution
    #[serde(default)]
    pub session: SessionConfig,
    /// Transcription endpoint and provider
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
