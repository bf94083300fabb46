use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{FromRequest, FromRequestParts, Multipart, Request};
use axum::http::StatusCode;
use axum::http::request::Parts;
use clipscribe_core::Session;

use crate::error::TranscribeError;
use crate::types::{AudioUpload, TranscriptionForm};

/// Content type assumed when the file part does not declare one
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Session placed in the request extensions by the session middleware
///
/// Rejects with `401` before the body is touched, so unauthenticated
/// uploads are never read.
#[derive(Debug, Clone)]
pub struct RequireSession(pub Session);

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
{
    type Rejection = TranscribeError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(Self)
            .ok_or(TranscribeError::Unauthorized)
    }
}

impl<S> FromRequest<S> for TranscriptionForm
where
    S: Send + Sync,
{
    type Rejection = TranscribeError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| TranscribeError::MalformedForm(e.body_text()))?;

        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            match name.as_str() {
                "file" => form.file = read_file(field).await?,
                "model" => form.model = Some(read_text(field).await?),
                "language" => form.language = Some(read_text(field).await?),
                "prompt" => form.prompt = Some(read_text(field).await?),
                "response_format" => form.response_format = Some(read_text(field).await?),
                "temperature" => form.temperature = Some(read_text(field).await?),
                "timestamp_granularities" => form.timestamp_granularities = Some(read_text(field).await?),
                _ => tracing::debug!(field = %name, "ignoring unknown form field"),
            }
        }

        Ok(form)
    }
}

/// Read the audio part
///
/// A file input submitted without a selection arrives as an empty part with
/// an empty filename; that is treated as no file at all.
async fn read_file(field: Field<'_>) -> Result<Option<AudioUpload>, TranscribeError> {
    let filename = field.file_name().filter(|name| !name.is_empty()).map(str::to_owned);
    let content_type = field.content_type().map(str::to_owned);
    let data = field.bytes().await.map_err(multipart_error)?;

    if filename.is_none() && data.is_empty() {
        return Ok(None);
    }

    Ok(Some(AudioUpload {
        data: data.to_vec(),
        filename: filename.unwrap_or_else(|| "audio".to_string()),
        content_type: content_type.unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string()),
    }))
}

async fn read_text(field: Field<'_>) -> Result<String, TranscribeError> {
    field.text().await.map_err(multipart_error)
}

fn multipart_error(error: MultipartError) -> TranscribeError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        TranscribeError::PayloadTooLarge
    } else {
        TranscribeError::MalformedForm(error.body_text())
    }
}
