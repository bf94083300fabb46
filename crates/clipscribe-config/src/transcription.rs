use secrecy::SecretString;
use serde::Deserialize;

/// Transcription endpoint configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranscriptionConfig {
    /// Route the endpoint is mounted on
    #[serde(default = "default_path")]
    pub path: String,
    /// Model used when the form does not name one
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Upper bound for the whole multipart body
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Upstream speech-to-text provider
    #[serde(default)]
    pub provider: Option<TranscriptionProviderConfig>,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            default_model: default_model(),
            max_upload_bytes: default_max_upload_bytes(),
            provider: None,
        }
    }
}

/// Configuration for the upstream provider
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranscriptionProviderConfig {
    /// Provider type
    #[serde(rename = "type")]
    pub provider_type: TranscriptionProviderType,
    /// API key
    pub api_key: SecretString,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Supported transcription providers
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptionProviderType {
    /// `OpenAI` audio transcriptions API, or any server speaking it
    Openai,
}

fn default_path() -> String {
    "/api/transcribe".to_string()
}

fn default_model() -> String {
    "whisper-1".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_upload_bytes() -> usize {
    // 32 MiB
    32 << 20
}
