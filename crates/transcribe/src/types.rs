use clipscribe_core::{ResponseFormat, TimestampGranularity};
use serde_json::{Map, Value};

use crate::error::{Result, TranscribeError};

/// Audio part of the multipart form
#[derive(Debug, Clone)]
pub struct AudioUpload {
    /// Raw audio data
    pub data: Vec<u8>,
    /// Original filename
    pub filename: String,
    /// Content type declared by the client
    pub content_type: String,
}

/// Multipart form as received, before defaults and validation
///
/// Every field keeps its raw text so that the endpoint decides what an
/// empty or malformed value means.
#[derive(Debug, Default)]
pub struct TranscriptionForm {
    pub file: Option<AudioUpload>,
    pub model: Option<String>,
    pub language: Option<String>,
    pub prompt: Option<String>,
    pub response_format: Option<String>,
    pub temperature: Option<String>,
    /// JSON-encoded array, e.g. `["word","segment"]`
    pub timestamp_granularities: Option<String>,
}

/// Fully resolved request handed to the provider
#[derive(Debug)]
pub struct TranscriptionRequest {
    /// Raw audio data
    pub audio: Vec<u8>,
    /// Original filename
    pub filename: String,
    /// Content type of the audio file
    pub content_type: String,
    /// Model identifier (e.g. "whisper-1")
    pub model: String,
    /// Optional language hint (ISO 639-1)
    pub language: Option<String>,
    /// Optional prompt to guide transcription
    pub prompt: Option<String>,
    /// Requested result shape
    pub response_format: ResponseFormat,
    /// Sampling temperature in `(0, 1]`, `None` leaves the provider default
    pub temperature: Option<f32>,
    /// Only ever non-empty for `verbose_json`
    pub timestamp_granularities: Vec<TimestampGranularity>,
}

/// Payload returned by the provider
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptionOutput {
    /// JSON document (`json`, `verbose_json`)
    Json(Value),
    /// Raw text body (`text`, `srt`, `vtt`)
    Text(String),
}

impl TranscriptionForm {
    /// Apply defaults and validate the optional fields
    ///
    /// The file check runs first, so a form without audio is always
    /// reported as such whatever else it contains.
    ///
    /// # Errors
    ///
    /// Returns `MissingFile`, `UnsupportedFormat` or `InvalidField`
    pub fn resolve(self, default_model: &str) -> Result<TranscriptionRequest> {
        let file = self.file.ok_or(TranscribeError::MissingFile)?;

        let response_format = match non_empty(self.response_format) {
            Some(raw) => raw
                .parse::<ResponseFormat>()
                .map_err(|_| TranscribeError::UnsupportedFormat(raw))?,
            None => ResponseFormat::default(),
        };

        let temperature = non_empty(self.temperature)
            .map(|raw| parse_temperature(&raw))
            .transpose()?
            .filter(|t| *t > 0.0);

        let mut timestamp_granularities = non_empty(self.timestamp_granularities)
            .map(|raw| parse_granularities(&raw))
            .transpose()?
            .unwrap_or_default();

        if !timestamp_granularities.is_empty() && !response_format.supports_timestamp_granularities() {
            tracing::debug!(%response_format, "dropping timestamp granularities for non verbose_json format");
            timestamp_granularities.clear();
        }

        Ok(TranscriptionRequest {
            audio: file.data,
            filename: file.filename,
            content_type: file.content_type,
            model: non_empty(self.model).unwrap_or_else(|| default_model.to_string()),
            language: non_empty(self.language),
            prompt: non_empty(self.prompt),
            response_format,
            temperature,
            timestamp_granularities,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_temperature(raw: &str) -> Result<f32> {
    let value = raw.trim().parse::<f32>().map_err(|e| TranscribeError::InvalidField {
        field: "temperature",
        reason: e.to_string(),
    })?;

    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(TranscribeError::InvalidField {
            field: "temperature",
            reason: "must be between 0 and 1".to_string(),
        });
    }

    Ok(value)
}

fn parse_granularities(raw: &str) -> Result<Vec<TimestampGranularity>> {
    let parsed: Vec<TimestampGranularity> =
        serde_json::from_str(raw).map_err(|e| TranscribeError::InvalidField {
            field: "timestamp_granularities",
            reason: e.to_string(),
        })?;

    let mut unique = Vec::with_capacity(parsed.len());
    for granularity in parsed {
        if !unique.contains(&granularity) {
            unique.push(granularity);
        }
    }

    Ok(unique)
}

/// Reshape provider output into the client-facing envelope
///
/// JSON formats pass through untouched; textual formats are wrapped under
/// the key named after the format.
///
/// # Errors
///
/// Returns `MalformedResponse` when the payload kind does not match the
/// requested format
pub fn envelope(format: ResponseFormat, output: TranscriptionOutput) -> Result<Value> {
    match (format.envelope_key(), output) {
        (None, TranscriptionOutput::Json(document)) => Ok(document),
        (Some(key), TranscriptionOutput::Text(text)) => {
            let mut wrapped = Map::new();
            wrapped.insert(key.to_string(), Value::String(text));
            Ok(Value::Object(wrapped))
        }
        (None, TranscriptionOutput::Text(_)) => Err(TranscribeError::MalformedResponse(format!(
            "expected a JSON document for {format}"
        ))),
        (Some(_), TranscriptionOutput::Json(_)) => Err(TranscribeError::MalformedResponse(format!(
            "expected a text body for {format}"
        ))),
    }
}
