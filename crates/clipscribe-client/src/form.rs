use std::path::Path;

use clipscribe_core::{ResponseFormat, TimestampGranularity};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::client::TranscribeClient;
use crate::error::{ClientError, Result};

/// Message shown for every failed submission
pub const FAILURE_MESSAGE: &str = "Failed to upload file and transcribe.";

/// Model preselected by a new form
pub const DEFAULT_MODEL: &str = "whisper-1";

/// Audio selected for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl AudioFile {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data,
        }
    }
}

/// What the last submission produced
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Envelope returned by the server
    Result(Value),
    /// Generic failure message
    Error(String),
}

/// State behind the transcription upload form
///
/// Holds the selected file and parameters, performs at most one request at
/// a time and keeps the outcome of the latest one.
#[derive(Debug)]
pub struct UploadForm {
    client: TranscribeClient,
    file: Option<AudioFile>,
    model: String,
    language: String,
    prompt: String,
    response_format: ResponseFormat,
    temperature: Option<f32>,
    granularities: Vec<TimestampGranularity>,
    busy: bool,
    outcome: Option<Outcome>,
}

impl UploadForm {
    pub fn new(client: TranscribeClient) -> Self {
        Self {
            client,
            file: None,
            model: DEFAULT_MODEL.to_owned(),
            language: String::new(),
            prompt: String::new(),
            response_format: ResponseFormat::default(),
            temperature: None,
            granularities: Vec::new(),
            busy: false,
            outcome: None,
        }
    }

    /// Select the file to upload, replacing any previous selection
    ///
    /// Only `audio/*` files are accepted. The server does not repeat this
    /// check, so it only saves a pointless upload.
    pub fn select_file(&mut self, file: AudioFile) -> Result<()> {
        if !is_audio(&file.content_type) {
            return Err(ClientError::NotAudio {
                filename: file.filename,
                content_type: file.content_type,
            });
        }

        self.file = Some(file);
        Ok(())
    }

    /// Select a file from disk, with the MIME type guessed from its extension
    pub async fn select_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let filename = path
            .file_name()
            .map_or_else(|| "audio".to_owned(), |name| name.to_string_lossy().into_owned());
        let content_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream");

        if !is_audio(content_type) {
            return Err(ClientError::NotAudio {
                filename,
                content_type: content_type.to_owned(),
            });
        }

        let data = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
            path: path.display().to_string(),
            source,
        })?;

        self.select_file(AudioFile::new(filename, content_type, data))
    }

    pub fn clear_file(&mut self) {
        self.file = None;
    }

    pub const fn file(&self) -> Option<&AudioFile> {
        self.file.as_ref()
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Set the spoken language hint; empty means unset
    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    /// Set the context prompt; empty means unset
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Choose the response format
    ///
    /// Leaving `verbose_json` drops the selected timestamp granularities.
    pub fn set_response_format(&mut self, format: ResponseFormat) {
        self.response_format = format;

        if !format.supports_timestamp_granularities() {
            self.granularities.clear();
        }
    }

    pub const fn response_format(&self) -> ResponseFormat {
        self.response_format
    }

    /// Set or clear the sampling temperature
    pub fn set_temperature(&mut self, temperature: Option<f32>) -> Result<()> {
        if let Some(value) = temperature
            && !(0.0..=1.0).contains(&value)
        {
            return Err(ClientError::InvalidTemperature(value));
        }

        self.temperature = temperature;
        Ok(())
    }

    pub const fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    /// Flip one timestamp granularity, returning whether it is now selected
    ///
    /// Does nothing unless the response format is `verbose_json`.
    pub fn toggle_granularity(&mut self, granularity: TimestampGranularity) -> bool {
        if !self.response_format.supports_timestamp_granularities() {
            return false;
        }

        if let Some(index) = self.granularities.iter().position(|g| *g == granularity) {
            self.granularities.remove(index);
            false
        } else {
            self.granularities.push(granularity);
            true
        }
    }

    pub fn granularities(&self) -> &[TimestampGranularity] {
        &self.granularities
    }

    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// A file is selected and nothing is in flight
    pub const fn can_submit(&self) -> bool {
        self.file.is_some() && !self.busy
    }

    /// Upload the selected file with the current parameters
    ///
    /// The previous outcome is cleared first. Request failures end up in
    /// [`Self::outcome`] as the generic message; only unmet preconditions are
    /// returned as errors.
    pub async fn submit(&mut self) -> Result<()> {
        if self.busy {
            return Err(ClientError::Busy);
        }
        let form = self.build_form()?;

        self.outcome = None;

        let result = {
            let _busy = BusyFlag::raise(&mut self.busy);
            self.client.transcribe(form).await
        };

        self.outcome = Some(match result {
            Ok(envelope) => Outcome::Result(envelope),
            Err(e) => {
                tracing::warn!(error = %e, "transcription upload failed");
                Outcome::Error(FAILURE_MESSAGE.to_owned())
            }
        });

        Ok(())
    }

    pub const fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Text shown under the form: pretty-printed envelope or failure message
    pub fn render(&self) -> Option<String> {
        self.outcome.as_ref().map(|outcome| match outcome {
            Outcome::Result(envelope) => {
                serde_json::to_string_pretty(envelope).unwrap_or_else(|_| envelope.to_string())
            }
            Outcome::Error(message) => message.clone(),
        })
    }

    fn build_form(&self) -> Result<Form> {
        let file = self.file.as_ref().ok_or(ClientError::NoFile)?;

        let part = Part::bytes(file.data.clone())
            .file_name(file.filename.clone())
            .mime_str(&file.content_type)
            .map_err(|e| ClientError::Config(format!("invalid mime type: {e}")))?;

        let mut form = Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("response_format", self.response_format.to_string());

        if !self.language.is_empty() {
            form = form.text("language", self.language.clone());
        }
        if !self.prompt.is_empty() {
            form = form.text("prompt", self.prompt.clone());
        }
        if let Some(temperature) = self.temperature {
            form = form.text("temperature", temperature.to_string());
        }
        if !self.granularities.is_empty() {
            let encoded =
                serde_json::to_string(&self.granularities).map_err(|e| ClientError::Parse(e.to_string()))?;
            form = form.text("timestamp_granularities", encoded);
        }

        Ok(form)
    }
}

fn is_audio(content_type: &str) -> bool {
    content_type
        .split_once('/')
        .is_some_and(|(kind, subtype)| kind.eq_ignore_ascii_case("audio") && !subtype.is_empty())
}

/// Keeps the busy flag raised until dropped
struct BusyFlag<'a>(&'a mut bool);

impl<'a> BusyFlag<'a> {
    fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for BusyFlag<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
