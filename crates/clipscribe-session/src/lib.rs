//! Session resolution for incoming requests
//!
//! A [`SessionResolver`] turns the token carried by a request (session
//! cookie or bearer header) into the caller's [`Session`]. The server
//! picks a concrete resolver from configuration with [`build_resolver`].

mod error;
mod resolver;
mod static_tokens;
mod token;
mod userinfo;

use std::sync::Arc;

use clipscribe_config::{SessionConfig, SessionResolverConfig};
pub use clipscribe_core::Session;

pub use error::SessionError;
pub use resolver::SessionResolver;
pub use static_tokens::StaticSessionResolver;
pub use token::session_token;
pub use userinfo::UserInfoSessionResolver;

/// Build the resolver described by the session configuration
///
/// # Errors
///
/// Returns an error if the userinfo HTTP client cannot be built
pub fn build_resolver(config: &SessionConfig) -> anyhow::Result<Arc<dyn SessionResolver>> {
    let resolver: Arc<dyn SessionResolver> = match &config.resolver {
        SessionResolverConfig::Static { tokens } => {
            tracing::debug!("Using static session table with {} token(s)", tokens.len());
            Arc::new(StaticSessionResolver::from_config(tokens))
        }
        SessionResolverConfig::Userinfo(userinfo) => {
            tracing::debug!(url = %userinfo.url, "Using userinfo session resolver");
            Arc::new(UserInfoSessionResolver::from_config(userinfo)?)
        }
    };

    Ok(resolver)
}
