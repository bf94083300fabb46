use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use crate::{
    error::TranscribeError,
    http_client::http_client,
    types::{TranscriptionOutput, TranscriptionRequest},
};

use super::Transcriber;

const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// `OpenAI` audio transcriptions API
pub(crate) struct OpenAiProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl OpenAiProvider {
    pub fn new(api_key: SecretString, base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_OPENAI_API_URL.to_string());

        Self {
            client: http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn build_form(request: TranscriptionRequest) -> crate::error::Result<reqwest::multipart::Form> {
        let file = reqwest::multipart::Part::bytes(request.audio)
            .file_name(request.filename)
            .mime_str(&request.content_type)
            .map_err(|e| TranscribeError::InvalidField {
                field: "file",
                reason: format!("invalid content type: {e}"),
            })?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("model", request.model)
            .text("response_format", request.response_format.to_string());

        if let Some(language) = request.language {
            form = form.text("language", language);
        }

        if let Some(prompt) = request.prompt {
            form = form.text("prompt", prompt);
        }

        if let Some(temperature) = request.temperature {
            form = form.text("temperature", temperature.to_string());
        }

        for granularity in request.timestamp_granularities {
            form = form.text("timestamp_granularities[]", granularity.to_string());
        }

        Ok(form)
    }
}

#[async_trait]
impl Transcriber for OpenAiProvider {
    async fn transcribe(&self, request: TranscriptionRequest) -> crate::error::Result<TranscriptionOutput> {
        let url = format!("{}/audio/transcriptions", self.base_url);
        let response_format = request.response_format;

        tracing::debug!(
            "OpenAI transcription request: {} bytes, model={}, format={response_format}",
            request.audio.len(),
            request.model,
        );

        let form = Self::build_form(request)?;

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("OpenAI request failed: {e}");
                TranscribeError::Connection(format!("Failed to send request to OpenAI: {e}"))
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!("OpenAI API error ({status}): {error_text}");

            return Err(TranscribeError::ProviderApi {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let output = if response_format.is_json() {
            response.json().await.map(TranscriptionOutput::Json).map_err(|e| {
                tracing::error!("Failed to parse OpenAI response: {e}");
                TranscribeError::MalformedResponse(e.to_string())
            })?
        } else {
            response.text().await.map(TranscriptionOutput::Text).map_err(|e| {
                tracing::error!("Failed to read OpenAI response: {e}");
                TranscribeError::MalformedResponse(e.to_string())
            })?
        };

        tracing::debug!("OpenAI transcription complete");

        Ok(output)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Multipart, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::{Json, Router, routing};
    use clipscribe_core::{ResponseFormat, TimestampGranularity};
    use serde_json::json;

    use super::*;

    type Seen = Arc<Mutex<Vec<(String, String)>>>;

    async fn transcriptions(State(seen): State<Seen>, headers: HeaderMap, mut multipart: Multipart) -> Response {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "Bearer sk-test");
        if !authorized {
            return (StatusCode::UNAUTHORIZED, "bad key").into_response();
        }

        let mut format = String::from("json");
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap().to_string();
            let value = if name == "file" {
                format!("{} bytes", field.bytes().await.unwrap().len())
            } else {
                field.text().await.unwrap()
            };
            if name == "response_format" {
                format.clone_from(&value);
            }
            seen.lock().unwrap().push((name, value));
        }

        match format.as_str() {
            "json" => Json(json!({ "text": "hello" })).into_response(),
            "verbose_json" => Json(json!({ "text": "hello", "words": [] })).into_response(),
            "text" => "hello\n".into_response(),
            _ => (StatusCode::BAD_REQUEST, "unsupported").into_response(),
        }
    }

    async fn start_backend() -> (String, Seen) {
        let seen = Seen::default();
        let app = Router::new()
            .route("/v1/audio/transcriptions", routing::post(transcriptions))
            .with_state(Arc::clone(&seen));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.ok() });

        (format!("http://{addr}/v1/"), seen)
    }

    fn request(response_format: ResponseFormat) -> TranscriptionRequest {
        TranscriptionRequest {
            audio: vec![0; 16],
            filename: "clip.wav".to_string(),
            content_type: "audio/wav".to_string(),
            model: "whisper-1".to_string(),
            language: None,
            prompt: None,
            response_format,
            temperature: None,
            timestamp_granularities: Vec::new(),
        }
    }

    #[tokio::test]
    async fn json_format_returns_document() {
        let (base_url, seen) = start_backend().await;
        let provider = OpenAiProvider::new(SecretString::from("sk-test"), Some(base_url));

        let output = provider.transcribe(request(ResponseFormat::Json)).await.unwrap();

        assert_eq!(output, TranscriptionOutput::Json(json!({ "text": "hello" })));
        let seen = seen.lock().unwrap();
        assert!(seen.contains(&("file".to_string(), "16 bytes".to_string())));
        assert!(seen.contains(&("model".to_string(), "whisper-1".to_string())));
        assert!(!seen.iter().any(|(name, _)| name == "temperature" || name == "language"));
    }

    #[tokio::test]
    async fn text_format_returns_raw_body() {
        let (base_url, _) = start_backend().await;
        let provider = OpenAiProvider::new(SecretString::from("sk-test"), Some(base_url));

        let output = provider.transcribe(request(ResponseFormat::Text)).await.unwrap();

        assert_eq!(output, TranscriptionOutput::Text("hello\n".to_string()));
    }

    #[tokio::test]
    async fn optional_parameters_are_forwarded() {
        let (base_url, seen) = start_backend().await;
        let provider = OpenAiProvider::new(SecretString::from("sk-test"), Some(base_url));

        let mut req = request(ResponseFormat::VerboseJson);
        req.language = Some("de".to_string());
        req.prompt = Some("names: Ada".to_string());
        req.temperature = Some(0.5);
        req.timestamp_granularities = vec![TimestampGranularity::Word, TimestampGranularity::Segment];

        provider.transcribe(req).await.unwrap();

        let seen = seen.lock().unwrap();
        for expected in [
            ("language", "de"),
            ("prompt", "names: Ada"),
            ("temperature", "0.5"),
            ("response_format", "verbose_json"),
            ("timestamp_granularities[]", "word"),
            ("timestamp_granularities[]", "segment"),
        ] {
            assert!(
                seen.contains(&(expected.0.to_string(), expected.1.to_string())),
                "missing {expected:?}"
            );
        }
    }

    #[tokio::test]
    async fn provider_rejection_is_an_api_error() {
        let (base_url, _) = start_backend().await;
        let provider = OpenAiProvider::new(SecretString::from("sk-wrong"), Some(base_url));

        let err = provider.transcribe(request(ResponseFormat::Json)).await.unwrap_err();

        assert!(matches!(err, TranscribeError::ProviderApi { status: 401, .. }));
    }

    #[tokio::test]
    async fn unreachable_provider_is_a_connection_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = OpenAiProvider::new(SecretString::from("sk-test"), Some(format!("http://{addr}/v1")));

        let err = provider.transcribe(request(ResponseFormat::Json)).await.unwrap_err();

        assert!(matches!(err, TranscribeError::Connection(_)));
    }
}
