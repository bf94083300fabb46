#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

//! Transcription proxy endpoint
//!
//! Accepts a multipart audio upload from an authenticated caller, forwards
//! it to the configured speech-to-text provider and answers with a JSON
//! envelope shaped by the requested response format.

mod error;
mod http_client;
mod metrics;
mod provider;
mod request;
mod service;
mod types;

use std::sync::Arc;

use axum::{Json, Router, extract::DefaultBodyLimit, extract::State, routing::post};
use clipscribe_config::TranscriptionConfig;
use serde_json::Value;

pub use error::{PROVIDER_FAILURE_MESSAGE, Result, TranscribeError};
pub use provider::Transcriber;
pub use request::RequireSession;
pub use service::{TranscriptionService, TranscriptionServiceBuilder};
pub use types::{AudioUpload, TranscriptionForm, TranscriptionOutput, TranscriptionRequest, envelope};

/// Build the transcription service from configuration
///
/// # Errors
///
/// Returns an error if no provider is configured
pub fn build_service(config: &TranscriptionConfig) -> anyhow::Result<Arc<TranscriptionService>> {
    let service = TranscriptionServiceBuilder::new(config)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to initialize transcription service: {e}"))?;

    Ok(Arc::new(service))
}

/// Create the endpoint router, mounted at the configured path
pub fn endpoint_router(config: &TranscriptionConfig) -> Router<Arc<TranscriptionService>> {
    Router::new().route(
        &config.path,
        post(transcribe).layer(DefaultBodyLimit::max(config.max_upload_bytes)),
    )
}

/// Handle transcription uploads
///
/// The session is extracted before the form, so a request without one is
/// refused without reading the upload.
async fn transcribe(
    State(service): State<Arc<TranscriptionService>>,
    RequireSession(session): RequireSession,
    form: TranscriptionForm,
) -> Result<Json<Value>> {
    tracing::debug!("Transcription handler called by {}", session.user_id);

    let body = service.handle(&session, form).await?;

    Ok(Json(body))
}
