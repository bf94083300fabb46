#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Client side of the Clipscribe transcription endpoint
//!
//! [`UploadForm`] holds what a user picks in the upload form and submits it
//! through [`TranscribeClient`].

mod client;
pub mod error;
mod form;

pub use client::{DEFAULT_COOKIE_NAME, DEFAULT_PATH, TranscribeClient};
pub use clipscribe_core::{ResponseFormat, TimestampGranularity};
pub use error::{ClientError, Result};
pub use form::{AudioFile, DEFAULT_MODEL, FAILURE_MESSAGE, Outcome, UploadForm};
