//! Mock transcription backend for integration tests
//!
//! Implements the OpenAI `audio/transcriptions` endpoint with canned
//! results for each response format

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use tokio_util::sync::CancellationToken;

/// Transcript every canned response is built from
pub const TRANSCRIPT: &str = "The quick brown fox jumps over the lazy dog.";

/// Mock transcription backend that returns predictable responses
pub struct MockWhisper {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockWhisperState>,
}

/// Fields of the last request the mock received
#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub fields: Vec<(String, String)>,
    pub file_name: Option<String>,
    pub file_bytes: usize,
}

impl RecordedRequest {
    /// First value of a text field
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    /// Every value of a repeated text field
    pub fn all(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

struct MockWhisperState {
    request_count: AtomicU32,
    failing: AtomicBool,
    last_request: Mutex<Option<RecordedRequest>>,
}

impl MockWhisper {
    /// Start the mock server, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(false).await
    }

    /// Start a mock server that answers every request with 500
    pub async fn start_failing() -> anyhow::Result<Self> {
        Self::start_inner(true).await
    }

    async fn start_inner(failing: bool) -> anyhow::Result<Self> {
        let state = Arc::new(MockWhisperState {
            request_count: AtomicU32::new(0),
            failing: AtomicBool::new(failing),
            last_request: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1/audio/transcriptions", routing::post(handle_transcription))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as a provider
    ///
    /// Includes `/v1` since the OpenAI provider appends `/audio/transcriptions`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of transcription requests received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    /// Last request received, if any
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.last_request.lock().unwrap().clone()
    }
}

impl Drop for MockWhisper {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_transcription(
    State(state): State<Arc<MockWhisperState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    let mut recorded = RecordedRequest {
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        ..RecordedRequest::default()
    };

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_owned();
        if name == "file" {
            recorded.file_name = field.file_name().map(str::to_owned);
            recorded.file_bytes = field.bytes().await.map(|b| b.len()).unwrap_or_default();
        } else {
            let value = field.text().await.unwrap_or_default();
            recorded.fields.push((name, value));
        }
    }

    let format = recorded.field("response_format").unwrap_or("json").to_owned();
    *state.last_request.lock().unwrap() = Some(recorded);

    if state.failing.load(Ordering::Relaxed) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": { "message": "upstream exploded", "type": "server_error" }
            })),
        )
            .into_response();
    }

    match format.as_str() {
        "json" => Json(serde_json::json!({ "text": TRANSCRIPT })).into_response(),
        "verbose_json" => Json(serde_json::json!({
            "task": "transcribe",
            "language": "english",
            "duration": 2.5,
            "text": TRANSCRIPT,
            "segments": [{ "id": 0, "start": 0.0, "end": 2.5, "text": TRANSCRIPT }],
        }))
        .into_response(),
        "text" => format!("{TRANSCRIPT}\n").into_response(),
        "srt" => format!("1\n00:00:00,000 --> 00:00:02,500\n{TRANSCRIPT}\n\n").into_response(),
        "vtt" => format!("WEBVTT\n\n00:00:00.000 --> 00:00:02.500\n{TRANSCRIPT}\n\n").into_response(),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": { "message": "invalid response_format" } })),
        )
            .into_response(),
    }
}
