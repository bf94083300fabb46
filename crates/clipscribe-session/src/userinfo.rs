use std::time::Duration;

use async_trait::async_trait;
use clipscribe_config::UserInfoConfig;
use clipscribe_core::Session;
use mini_moka::sync::Cache;
use sha2::{Digest, Sha256};
use url::Url;

use crate::{SessionError, SessionResolver};

/// Resolves sessions against an OIDC userinfo endpoint with caching
///
/// Only successful lookups are cached; a rejected token is asked about
/// again on its next use.
#[derive(Clone)]
pub struct UserInfoSessionResolver {
    http: reqwest::Client,
    url: Url,
    cache: Cache<String, Session>,
}

impl UserInfoSessionResolver {
    /// Create a new resolver
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(
        url: Url,
        cache_ttl: Duration,
        cache_capacity: u64,
        timeout: Duration,
        tls_skip_verify: bool,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(tls_skip_verify)
            .build()?;

        let cache = Cache::builder()
            .time_to_live(cache_ttl)
            .max_capacity(cache_capacity)
            .build();

        Ok(Self { http, url, cache })
    }

    /// Create a resolver from the `[session.resolver]` section
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn from_config(config: &UserInfoConfig) -> anyhow::Result<Self> {
        Self::new(
            config.url.clone(),
            Duration::from_secs(config.cache_ttl_seconds),
            config.cache_capacity,
            Duration::from_secs(config.timeout_seconds),
            config.tls_skip_verify,
        )
    }

    /// Drop a cached session (e.g. after logout)
    pub fn invalidate(&self, token: &str) {
        self.cache.invalidate(&cache_key(token));
    }
}

#[async_trait]
impl SessionResolver for UserInfoSessionResolver {
    async fn resolve(&self, token: &str) -> Result<Option<Session>, SessionError> {
        let key = cache_key(token);

        if let Some(cached) = self.cache.get(&key) {
            return Ok(Some(cached));
        }

        let response = self.http.get(self.url.clone()).bearer_auth(token).send().await?;
        let status = response.status().as_u16();

        if matches!(status, 401 | 403 | 404) {
            tracing::debug!(status, "identity provider rejected session token");
            return Ok(None);
        }

        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SessionError::ProviderError { status, message });
        }

        let session: Session = response.json().await.map_err(|e| SessionError::ProviderError {
            status,
            message: format!("failed to parse userinfo response: {e}"),
        })?;

        self.cache.insert(key, session.clone());

        Ok(Some(session))
    }
}

/// Tokens are cached under their SHA-256 digest, never in the clear
fn cache_key(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
