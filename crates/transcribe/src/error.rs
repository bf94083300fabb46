use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use clipscribe_core::{ErrorBody, HttpError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TranscribeError>;

/// Body of every provider-side failure, whatever the cause
pub const PROVIDER_FAILURE_MESSAGE: &str = "Error during transcription";

/// Transcription endpoint errors with their HTTP mapping
#[derive(Debug, Error)]
pub enum TranscribeError {
    /// Request carries no valid session
    #[error("unauthorized")]
    Unauthorized,

    /// Multipart form has no `file` field
    #[error("no file uploaded")]
    MissingFile,

    /// Body is not a readable multipart form
    #[error("invalid multipart form: {0}")]
    MalformedForm(String),

    /// An optional field could not be interpreted
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// `response_format` outside the supported set
    #[error("invalid response format '{0}'")]
    UnsupportedFormat(String),

    /// Body exceeds the configured upload limit
    #[error("upload exceeds the size limit")]
    PayloadTooLarge,

    /// Provider answered with a non-success status
    #[error("provider API error ({status}): {message}")]
    ProviderApi { status: u16, message: String },

    /// Provider could not be reached
    #[error("connection error: {0}")]
    Connection(String),

    /// Provider answered with something that does not fit the requested format
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl TranscribeError {
    /// Short label used as a metric attribute
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::MissingFile => "missing_file",
            Self::MalformedForm(_) => "malformed_form",
            Self::InvalidField { .. } => "invalid_field",
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::PayloadTooLarge => "payload_too_large",
            Self::ProviderApi { .. } | Self::Connection(_) | Self::MalformedResponse(_) => "provider_error",
            Self::Config(_) => "config_error",
        }
    }
}

impl HttpError for TranscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::MissingFile | Self::MalformedForm(_) | Self::InvalidField { .. } | Self::UnsupportedFormat(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ProviderApi { .. } | Self::Connection(_) | Self::MalformedResponse(_) | Self::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn client_body(&self) -> ErrorBody {
        match self {
            Self::Unauthorized => ErrorBody::Text("Unauthorized".to_string()),
            Self::MissingFile => ErrorBody::Text("No file uploaded".to_string()),
            Self::MalformedForm(_) => ErrorBody::Text("Invalid multipart form".to_string()),
            Self::InvalidField { field, reason } => ErrorBody::Text(format!("Invalid {field}: {reason}")),
            Self::UnsupportedFormat(_) => ErrorBody::Json(serde_json::json!({ "error": "Invalid response format" })),
            Self::PayloadTooLarge => ErrorBody::Text("Uploaded file is too large".to_string()),
            Self::ProviderApi { .. } | Self::Connection(_) | Self::MalformedResponse(_) | Self::Config(_) => {
                ErrorBody::Text(PROVIDER_FAILURE_MESSAGE.to_string())
            }
        }
    }
}

impl IntoResponse for TranscribeError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self.client_body() {
            ErrorBody::Text(message) => (status, message).into_response(),
            ErrorBody::Json(body) => (status, Json(body)).into_response(),
        }
    }
}
