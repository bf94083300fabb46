/// Client-specific result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors from the transcription client and the upload form
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("{status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message, or the raw body when it is not JSON
        message: String,
    },

    /// Failed to parse response
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Selected file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Selected file is not audio
    #[error("{filename} is not an audio file ({content_type})")]
    NotAudio { filename: String, content_type: String },

    /// Temperature outside `[0, 1]`
    #[error("temperature must be between 0 and 1, got {0}")]
    InvalidTemperature(f32),

    /// Submit without a selected file
    #[error("no file selected")]
    NoFile,

    /// Submit while a request is in flight
    #[error("a submission is already in progress")]
    Busy,
}
