use http::StatusCode;
use serde_json::Value;

/// Body sent back to the caller when a request fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorBody {
    /// `text/plain` message
    Text(String),
    /// `application/json` document
    Json(Value),
}

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by each feature crate's error type. The conversion into an
/// actual axum response lives next to the handler, keeping domain errors
/// decoupled from the web framework.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Body that is safe to expose to API consumers
    fn client_body(&self) -> ErrorBody;
}
