use indexmap::IndexMap;
use serde::Deserialize;
use url::Url;

/// Session resolution configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session token
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Paths that skip session resolution
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
    /// Backend used to turn a token into a caller identity
    #[serde(default)]
    pub resolver: SessionResolverConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            public_paths: default_public_paths(),
            resolver: SessionResolverConfig::default(),
        }
    }
}

/// Session backend selection
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionResolverConfig {
    /// Fixed token table, for local development and tests
    Static {
        /// Session token to user mapping
        #[serde(default)]
        tokens: IndexMap<String, StaticSessionUser>,
    },
    /// OIDC userinfo endpoint of an external identity provider
    Userinfo(UserInfoConfig),
}

impl Default for SessionResolverConfig {
    fn default() -> Self {
        Self::Static {
            tokens: IndexMap::new(),
        }
    }
}

/// User entry of the static token table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticSessionUser {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Userinfo resolver settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserInfoConfig {
    /// Userinfo endpoint, called with the token as a bearer credential
    pub url: Url,
    /// Cache TTL in seconds for resolved sessions
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
    /// Maximum number of cached sessions
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
    /// Timeout for a single userinfo call
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Skip TLS certificate verification (dev only)
    #[serde(default)]
    pub tls_skip_verify: bool,
}

fn default_cookie_name() -> String {
    "appSession".to_string()
}

fn default_public_paths() -> Vec<String> {
    vec!["/health".to_string()]
}

#[allow(clippy::missing_const_for_fn)]
fn default_cache_ttl() -> u64 {
    60
}

#[allow(clippy::missing_const_for_fn)]
fn default_cache_capacity() -> u64 {
    10_000
}

#[allow(clippy::missing_const_for_fn)]
fn default_timeout() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_empty_static_table() {
        let config: SessionConfig = toml::from_str("").unwrap();

        assert_eq!(config.cookie_name, "appSession");
        assert_eq!(config.public_paths, vec!["/health".to_string()]);
        assert!(matches!(config.resolver, SessionResolverConfig::Static { ref tokens } if tokens.is_empty()));
    }

    #[test]
    fn static_tokens() {
        let config: SessionConfig = toml::from_str(
            r#"
            [resolver]
            type = "static"

            [resolver.tokens.dev-token]
            user_id = "ada"
            email = "ada@example.com"
            "#,
        )
        .unwrap();

        let SessionResolverConfig::Static { tokens } = config.resolver else {
            panic!("expected static resolver");
        };
        let user = &tokens["dev-token"];
        assert_eq!(user.user_id, "ada");
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
        assert!(user.name.is_none());
    }

    #[test]
    fn userinfo_resolver() {
        let config: SessionConfig = toml::from_str(
            r#"
            cookie_name = "sid"

            [resolver]
            type = "userinfo"
            url = "https://tenant.auth.example.com/userinfo"
            cache_ttl_seconds = 15
            "#,
        )
        .unwrap();

        assert_eq!(config.cookie_name, "sid");
        let SessionResolverConfig::Userinfo(userinfo) = config.resolver else {
            panic!("expected userinfo resolver");
        };
        assert_eq!(userinfo.url.as_str(), "https://tenant.auth.example.com/userinfo");
        assert_eq!(userinfo.cache_ttl_seconds, 15);
        assert_eq!(userinfo.cache_capacity, 10_000);
        assert_eq!(userinfo.timeout_seconds, 5);
        assert!(!userinfo.tls_skip_verify);
    }
}
