//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use clipscribe_config::{
    Config, CorsConfig, ServerConfig, SessionResolverConfig, StaticSessionUser, TranscriptionProviderConfig,
    TranscriptionProviderType,
};
use indexmap::IndexMap;
use secrecy::SecretString;

use super::{SESSION_TOKEN, SESSION_USER};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with one known session token
    pub fn new() -> Self {
        let mut tokens = IndexMap::new();
        tokens.insert(
            SESSION_TOKEN.to_owned(),
            StaticSessionUser {
                user_id: SESSION_USER.to_owned(),
                email: Some("test@example.com".to_owned()),
                name: None,
            },
        );

        let mut config = Config {
            server: ServerConfig {
                listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                ..ServerConfig::default()
            },
            ..Config::default()
        };
        config.session.resolver = SessionResolverConfig::Static { tokens };

        Self { config }
    }

    /// Use an OpenAI-compatible provider pointed at a mock backend
    pub fn with_openai_provider(mut self, base_url: &str) -> Self {
        self.config.transcription.provider = Some(TranscriptionProviderConfig {
            provider_type: TranscriptionProviderType::Openai,
            api_key: SecretString::from("test-key"),
            base_url: Some(base_url.to_owned()),
        });
        self
    }

    /// Limit the size of upload bodies
    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.config.transcription.max_upload_bytes = max_upload_bytes;
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
