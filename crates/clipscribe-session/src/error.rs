/// Session resolution errors
///
/// An unknown or expired token is not an error: resolvers report it as
/// `Ok(None)`. These variants cover a backend that could not answer.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// HTTP request to the identity provider failed
    #[error("session lookup failed: {0}")]
    LookupFailed(#[from] reqwest::Error),

    /// Identity provider returned an unexpected response
    #[error("identity provider error ({status}): {message}")]
    ProviderError {
        /// HTTP status code
        status: u16,
        /// Error message from the provider
        message: String,
    },
}
