/// Gemini HTTP client implementation.
///
/// This module provides `GeminiClient` for making synchronous requests to the
/// Gemini `generateContent` API, along with error types and a builder for
/// configuration.
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::prompt::Prompt;

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model used for analysis.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when interacting with the Gemini API.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// HTTP errors without a readable error body
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// Errors reported by the API in its error body (auth, quota, bad request)
    #[error("Gemini API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The reply contained no candidate text
    #[error("Gemini returned no text in its reply")]
    EmptyResponse,

    /// No API key was configured
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Builder for constructing `GeminiClient` instances.
///
/// # Examples
///
/// ```
/// use cvmatch::gemini::GeminiClientBuilder;
///
/// let client = GeminiClientBuilder::new()
///     .api_key("test-key")
///     .model("gemini-2.0-flash")
///     .build()
///     .expect("Failed to create client");
/// ```
#[derive(Debug, Default)]
pub struct GeminiClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    json_mode: bool,
    timeout: Option<Duration>,
}

impl GeminiClientBuilder {
    /// Creates a new `GeminiClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key sent with every request.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL for the API (e.g. a proxy or a local test server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model name (e.g. "gemini-2.0-flash").
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Asks the API for a JSON-only reply (`responseMimeType: application/json`).
    pub fn json_mode(mut self, enabled: bool) -> Self {
        self.json_mode = enabled;
        self
    }

    /// Overrides the whole-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the `GeminiClient` with the configured settings.
    ///
    /// # Errors
    ///
    /// Returns `GeminiError::MissingApiKey` if no non-blank key was set, and
    /// `GeminiError::InvalidUrl` if the base URL does not parse.
    pub fn build(self) -> Result<GeminiClient, GeminiError> {
        let api_key = self
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(GeminiError::MissingApiKey)?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let model = self
            .model
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        reqwest::Url::parse(&base_url)
            .map_err(|e| GeminiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout.unwrap_or(REQUEST_TIMEOUT))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(GeminiError::Network)?;

        Ok(GeminiClient {
            client,
            api_key,
            base_url,
            model,
            json_mode: self.json_mode,
        })
    }
}

/// Synchronous HTTP client for the Gemini API.
///
/// Construct it with `GeminiClientBuilder`. Each `generate` call issues exactly
/// one HTTP request; repetition policy belongs to the caller.
pub struct GeminiClient {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    model: String,
    json_mode: bool,
}

/// Trait for model inference.
///
/// This is the seam the analyzer depends on, so tests can substitute scripted
/// replies for real HTTP calls.
pub trait GeminiClientTrait: Send + Sync {
    /// Sends a multi-part prompt and returns the model's reply text.
    fn generate(&self, prompt: &Prompt) -> Result<String, GeminiError>;
}

impl GeminiClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the model name configured for this client.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns whether JSON-only replies are requested.
    pub fn json_mode(&self) -> bool {
        self.json_mode
    }

    /// Returns the full `generateContent` URL for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn generate_internal(&self, prompt: &Prompt) -> Result<String, GeminiError> {
        let url = self.endpoint();
        let body = build_request(prompt, self.json_mode);

        debug!(model = %self.model, parts = prompt.parts().len(), "calling Gemini");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&body)
            .send()
            .map_err(classify_send_error)?;

        let status = response.status();
        let text = response.text().map_err(classify_send_error)?;

        if !status.is_success() {
            let status = status.as_u16();
            return Err(match parse_error_message(&text) {
                Some(message) => GeminiError::Api { status, message },
                None => GeminiError::Http { status },
            });
        }

        parse_reply_text(&text)
    }
}

impl GeminiClientTrait for GeminiClient {
    fn generate(&self, prompt: &Prompt) -> Result<String, GeminiError> {
        self.generate_internal(prompt)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    status: Option<String>,
}

fn build_request(prompt: &Prompt, json_mode: bool) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: vec![RequestContent {
            role: "user",
            parts: prompt
                .parts()
                .iter()
                .map(|text| RequestPart {
                    text: text.as_str(),
                })
                .collect(),
        }],
        generation_config: json_mode.then_some(GenerationConfig {
            response_mime_type: "application/json",
        }),
    }
}

/// Joins the text parts of the first candidate.
fn parse_reply_text(body: &str) -> Result<String, GeminiError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(GeminiError::Serialization)?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        Err(GeminiError::EmptyResponse)
    } else {
        Ok(text)
    }
}

fn parse_error_message(body: &str) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
    Some(match envelope.error.status {
        Some(status) => format!("{}: {}", status, envelope.error.message),
        None => envelope.error.message,
    })
}

fn classify_send_error(error: reqwest::Error) -> GeminiError {
    if error.is_timeout() {
        GeminiError::Timeout(error)
    } else {
        GeminiError::Network(error)
    }
}
