use async_trait::async_trait;
use clipscribe_core::Session;

use crate::SessionError;

/// Resolve the current caller identity from a session token
///
/// Implementations must be cheap to share across requests; the server holds
/// one instance behind an `Arc` for the lifetime of the process.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// Look up the session for `token`
    ///
    /// Returns `Ok(None)` when the token does not identify a live session.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be consulted
    async fn resolve(&self, token: &str) -> Result<Option<Session>, SessionError>;
}
