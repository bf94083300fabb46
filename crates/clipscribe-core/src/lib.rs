#![allow(clippy::must_use_candidate)]

//! Types shared between the session layer, the transcription endpoint and
//! the client

mod error;
mod format;
mod session;

pub use error::{ErrorBody, HttpError};
pub use format::{ResponseFormat, TimestampGranularity};
pub use session::Session;
