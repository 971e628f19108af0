/// Gemini HTTP client module.
///
/// This module provides a blocking HTTP client for the Gemini `generateContent`
/// endpoint, including error handling and timeout configuration.
mod client;

pub use client::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient, GeminiClientBuilder, GeminiClientTrait,
    GeminiError,
};
