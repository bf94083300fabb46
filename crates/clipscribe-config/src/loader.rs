use std::path::Path;

use secrecy::ExposeSecret;

use crate::{Config, SessionResolverConfig};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is missing or a section holds
    /// values the server cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_transcription_config()?;
        self.validate_session_config()?;
        self.validate_telemetry_config()?;
        Ok(())
    }

    fn validate_transcription_config(&self) -> anyhow::Result<()> {
        let transcription = &self.transcription;

        let Some(ref provider) = transcription.provider else {
            anyhow::bail!("transcription.provider must be configured");
        };

        if provider.api_key.expose_secret().is_empty() {
            anyhow::bail!("transcription.provider.api_key must not be empty");
        }

        if !transcription.path.starts_with('/') {
            anyhow::bail!("transcription.path must start with '/'");
        }

        if transcription.default_model.is_empty() {
            anyhow::bail!("transcription.default_model must not be empty");
        }

        if transcription.max_upload_bytes == 0 {
            anyhow::bail!("transcription.max_upload_bytes must be greater than 0");
        }

        Ok(())
    }

    fn validate_session_config(&self) -> anyhow::Result<()> {
        if self.session.cookie_name.is_empty() {
            anyhow::bail!("session.cookie_name must not be empty");
        }

        match &self.session.resolver {
            SessionResolverConfig::Static { tokens } if tokens.is_empty() => {
                anyhow::bail!("session.resolver must list at least one token or use the userinfo resolver");
            }
            SessionResolverConfig::Static { .. } => {}
            SessionResolverConfig::Userinfo(userinfo) => {
                if userinfo.cache_ttl_seconds == 0 {
                    anyhow::bail!("session.resolver.cache_ttl_seconds must be greater than 0");
                }

                if userinfo.cache_capacity > 1_000_000 {
                    anyhow::bail!("session.resolver.cache_capacity exceeds maximum of 1,000,000");
                }
            }
        }

        Ok(())
    }

    fn validate_telemetry_config(&self) -> anyhow::Result<()> {
        if let Some(ref telemetry) = self.telemetry
            && !(0.0..=1.0).contains(&telemetry.sampling_rate)
        {
            anyhow::bail!("telemetry.sampling_rate must be between 0.0 and 1.0");
        }

        Ok(())
    }
}
