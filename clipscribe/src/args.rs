use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clipscribe_client::{ResponseFormat, TimestampGranularity};

/// Clipscribe transcription proxy
#[derive(Debug, Parser)]
#[command(name = "clipscribe", about = "Authenticated audio transcription proxy")]
pub struct Args {
    /// Log filter directives
    #[arg(long, global = true, default_value = "info", env = "CLIPSCRIBE_LOG")]
    pub log_filter: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the transcription server
    Serve {
        /// Path to configuration file
        #[arg(short, long, default_value = "clipscribe.toml", env = "CLIPSCRIBE_CONFIG")]
        config: PathBuf,

        /// Override the listen address
        #[arg(long, env = "CLIPSCRIBE_LISTEN")]
        listen: Option<SocketAddr>,
    },

    /// Upload an audio file to a running server and print the result
    Transcribe(TranscribeArgs),
}

#[derive(Debug, clap::Args)]
pub struct TranscribeArgs {
    /// Audio file to upload
    pub file: PathBuf,

    /// Server base URL
    #[arg(long, default_value = "http://localhost:3000", env = "CLIPSCRIBE_URL")]
    pub url: String,

    /// Session token, sent as the session cookie
    #[arg(long, env = "CLIPSCRIBE_SESSION")]
    pub session: Option<String>,

    /// Session cookie name
    #[arg(long, default_value = clipscribe_client::DEFAULT_COOKIE_NAME)]
    pub cookie_name: String,

    /// Model identifier
    #[arg(long, default_value = clipscribe_client::DEFAULT_MODEL)]
    pub model: String,

    /// Spoken language hint
    #[arg(long)]
    pub language: Option<String>,

    /// Context prompt
    #[arg(long)]
    pub prompt: Option<String>,

    /// Response format (json, text, srt, verbose_json, vtt)
    #[arg(long, default_value_t = ResponseFormat::Json)]
    pub response_format: ResponseFormat,

    /// Sampling temperature between 0 and 1
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Timestamp granularity for verbose_json (word, segment), repeatable
    #[arg(long = "granularity")]
    pub granularities: Vec<TimestampGranularity>,
}
