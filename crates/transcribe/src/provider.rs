pub(crate) mod openai;

use async_trait::async_trait;

use crate::types::{TranscriptionOutput, TranscriptionRequest};

/// External speech-to-text capability
///
/// The single I/O boundary of the endpoint: `transcribe(audio, params) ->
/// result | error`. Implementations are shared across requests and must not
/// retry on their own.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe audio in the requested response format
    async fn transcribe(&self, request: TranscriptionRequest) -> crate::error::Result<TranscriptionOutput>;

    /// Get the provider name
    fn name(&self) -> &str;
}
