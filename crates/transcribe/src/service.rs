use std::sync::Arc;
use std::time::Instant;

use clipscribe_config::{TranscriptionConfig, TranscriptionProviderType};
use clipscribe_core::Session;
use serde_json::Value;

use crate::{
    error::TranscribeError,
    metrics::TranscriptionMetrics,
    provider::{Transcriber, openai::OpenAiProvider},
    types::{TranscriptionForm, TranscriptionRequest, envelope},
};

/// Validates uploads, calls the provider and shapes its answer
pub struct TranscriptionService {
    provider: Arc<dyn Transcriber>,
    default_model: String,
    metrics: TranscriptionMetrics,
}

impl TranscriptionService {
    /// Create a service around an existing provider
    pub fn new(provider: Arc<dyn Transcriber>, default_model: impl Into<String>) -> Self {
        Self {
            provider,
            default_model: default_model.into(),
            metrics: TranscriptionMetrics::new(),
        }
    }

    /// Name of the provider requests are forwarded to
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Handle one upload from an authenticated caller
    ///
    /// Each call is independent: one provider call, no retry, nothing kept
    /// once the envelope is returned.
    pub async fn handle(&self, session: &Session, form: TranscriptionForm) -> crate::error::Result<Value> {
        let request = form
            .resolve(&self.default_model)
            .inspect_err(|e| self.metrics.rejected(e))?;

        tracing::debug!(
            user_id = %session.user_id,
            model = %request.model,
            response_format = %request.response_format,
            bytes = request.audio.len(),
            "forwarding transcription request"
        );

        let format = request.response_format;
        let start = Instant::now();
        let result = self.transcribe(request).await;
        self.metrics.completed(format, result.as_ref().map(|_| ()), start);

        if let Err(ref e) = result {
            tracing::error!(provider = self.provider.name(), error = %e, "transcription failed");
        }

        result
    }

    /// Call the provider and wrap its output in the client envelope
    pub(crate) async fn transcribe(&self, request: TranscriptionRequest) -> crate::error::Result<Value> {
        let format = request.response_format;
        let output = self.provider.transcribe(request).await?;

        envelope(format, output)
    }
}

/// Builder for constructing the transcription service from configuration
pub struct TranscriptionServiceBuilder<'a> {
    config: &'a TranscriptionConfig,
    transcriber: Option<Arc<dyn Transcriber>>,
}

impl<'a> TranscriptionServiceBuilder<'a> {
    pub fn new(config: &'a TranscriptionConfig) -> Self {
        Self {
            config,
            transcriber: None,
        }
    }

    /// Use this provider instead of the configured one
    #[must_use]
    pub fn transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    pub fn build(self) -> crate::error::Result<TranscriptionService> {
        let provider: Arc<dyn Transcriber> = match self.transcriber {
            Some(transcriber) => transcriber,
            None => {
                let provider_config = self
                    .config
                    .provider
                    .as_ref()
                    .ok_or_else(|| TranscribeError::Config("no transcription provider configured".to_string()))?;

                match provider_config.provider_type {
                    TranscriptionProviderType::Openai => Arc::new(OpenAiProvider::new(
                        provider_config.api_key.clone(),
                        provider_config.base_url.clone(),
                    )),
                }
            }
        };

        tracing::debug!(
            provider = provider.name(),
            default_model = %self.config.default_model,
            "Transcription service initialized"
        );

        Ok(TranscriptionService::new(provider, self.config.default_model.clone()))
    }
}
