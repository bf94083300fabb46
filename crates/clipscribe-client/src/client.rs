use reqwest::header::COOKIE;
use reqwest::multipart::Form;
use serde_json::Value;
use url::Url;

use crate::error::{ClientError, Result};

/// Route the server mounts the endpoint on by default
pub const DEFAULT_PATH: &str = "/api/transcribe";

/// Cookie the server reads the session token from by default
pub const DEFAULT_COOKIE_NAME: &str = "appSession";

/// HTTP client for the transcription endpoint
#[derive(Debug, Clone)]
pub struct TranscribeClient {
    base_url: Url,
    http: reqwest::Client,
    path: String,
    cookie_name: String,
    session: Option<String>,
}

impl TranscribeClient {
    /// Create a new client pointing at the given base URL
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::Config(format!("invalid base URL: {e}")))?;

        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            path: DEFAULT_PATH.to_owned(),
            cookie_name: DEFAULT_COOKIE_NAME.to_owned(),
            session: None,
        })
    }

    /// Send this session token as the session cookie
    #[must_use]
    pub fn with_session(mut self, token: impl Into<String>) -> Self {
        self.session = Some(token.into());
        self
    }

    /// Use a different session cookie name
    #[must_use]
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Use a different endpoint path
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Get the base URL
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Upload a multipart form and return the JSON envelope
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status or a body
    /// that is not JSON
    pub async fn transcribe(&self, form: Form) -> Result<Value> {
        let url = make_url(&self.base_url, &self.path);

        let mut request = self.http.post(url.as_str()).multipart(form);
        if let Some(token) = &self.session {
            request = request.header(COOKIE, format!("{}={token}", self.cookie_name));
        }

        let response = handle_error(request.send().await?).await?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| ClientError::Parse(e.to_string()))
    }
}

/// Build a full URL from base and path
fn make_url(base_url: &Url, path: &str) -> Url {
    let mut url = base_url.clone();
    url.set_path(path);
    url
}

/// Check an HTTP response for errors
async fn handle_error(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    Err(ClientError::Api {
        status: status.as_u16(),
        message: parse_error_body(&body),
    })
}

/// Pull the message out of an error body
///
/// The server answers with plain text, except for `{"error": "..."}` on an
/// unsupported response format.
fn parse_error_body(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json["error"].as_str().map(str::to_owned))
        .unwrap_or_else(|| body.to_owned())
}
