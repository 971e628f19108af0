//! CV-to-role match analysis using an LLM.
//!
//! This module provides the `MatchAnalyzer` struct, which sends the analysis
//! prompt to a `GeminiClientTrait` implementation, pulls the JSON object out of
//! the free-text reply, and re-prompts once when the reply is incomplete.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::gemini::GeminiClientTrait;
use crate::models::RawAnalysis;
use crate::prompt::{Prompt, build_prompt, refine_prompt};

/// Keys every reply must carry.
pub const REQUIRED_FIELDS: [&str; 3] = ["match_score", "skill_gaps", "recommendations"];

/// Why a first reply needs the single refined retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefinementReason {
    /// The call failed or the reply held no decodable JSON object.
    NoResponse,
    /// One or more required keys are absent.
    MissingFields(Vec<&'static str>),
    /// Skill gaps were reported without any recommendation.
    GapsWithoutRecommendations,
}

impl fmt::Display for RefinementReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResponse => write!(f, "no usable response"),
            Self::MissingFields(fields) => write!(f, "missing fields: {}", fields.join(", ")),
            Self::GapsWithoutRecommendations => {
                write!(f, "skill gaps reported without recommendations")
            }
        }
    }
}

/// Decides whether a first reply must be retried.
///
/// Returns `None` when the reply can be used as-is.
pub fn needs_refinement(response: Option<&RawAnalysis>) -> Option<RefinementReason> {
    let Some(response) = response else {
        return Some(RefinementReason::NoResponse);
    };

    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|key| !response.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Some(RefinementReason::MissingFields(missing));
    }

    let has_gaps = response.get("skill_gaps").is_some_and(has_entries);
    let has_recommendations = response.get("recommendations").is_some_and(has_entries);

    if has_gaps && !has_recommendations {
        return Some(RefinementReason::GapsWithoutRecommendations);
    }

    None
}

/// Whether a field holds at least one entry.
///
/// A lone object or string counts too: models sometimes drop the list
/// wrapper around a single item.
fn has_entries(value: &Value) -> bool {
    match value {
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::String(text) => !text.trim().is_empty(),
        _ => false,
    }
}

/// Builder for constructing `MatchAnalyzer` instances.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use cvmatch::analyzer::MatchAnalyzerBuilder;
/// use cvmatch::gemini::GeminiClientBuilder;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GeminiClientBuilder::new().api_key("key").build()?;
///
/// let analyzer = MatchAnalyzerBuilder::new()
///     .client(Arc::new(client))
///     .build();
///
/// if let Some(analysis) = analyzer.analyze_match("CV text", "Role text") {
///     println!("score: {:?}", analysis.get("match_score"));
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct MatchAnalyzerBuilder {
    client: Option<Arc<dyn GeminiClientTrait>>,
}

impl MatchAnalyzerBuilder {
    /// Creates a new `MatchAnalyzerBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the client used for model calls.
    pub fn client(mut self, client: Arc<dyn GeminiClientTrait>) -> Self {
        self.client = Some(client);
        self
    }

    /// Builds the `MatchAnalyzer`.
    ///
    /// # Panics
    ///
    /// Panics if `client()` was not called before `build()`.
    #[must_use]
    pub fn build(self) -> MatchAnalyzer {
        MatchAnalyzer {
            client: self.client.expect("client must be set via client() method"),
        }
    }
}

/// Compares a CV against a role description through an LLM.
///
/// At most two model calls are made per analysis: the initial request and one
/// refined retry.
pub struct MatchAnalyzer {
    client: Arc<dyn GeminiClientTrait>,
}

impl MatchAnalyzer {
    /// Creates a new `MatchAnalyzer` with the specified client.
    ///
    /// Prefer using `MatchAnalyzerBuilder` for more ergonomic construction.
    #[must_use]
    pub fn new(client: Arc<dyn GeminiClientTrait>) -> Self {
        Self { client }
    }

    /// Runs the analysis and returns the model's decoded JSON object.
    ///
    /// If the first reply is missing, lacks a required key, or lists skill gaps
    /// without recommendations, one refined call is made and its result is
    /// returned whatever it contains.
    ///
    /// # Returns
    ///
    /// `None` when no usable JSON object was obtained. Remote and decode
    /// failures are logged, never propagated.
    pub fn analyze_match(&self, cv_text: &str, role_text: &str) -> Option<RawAnalysis> {
        let prompt = build_prompt(cv_text, role_text);
        let response = self.call_model(&prompt);

        match needs_refinement(response.as_ref()) {
            None => {
                debug!("first response accepted");
                response
            }
            Some(reason) => {
                warn!(%reason, "retrying with refined prompt");
                let refined = refine_prompt(&prompt, response.as_ref());
                self.call_model(&refined)
            }
        }
    }

    fn call_model(&self, prompt: &Prompt) -> Option<RawAnalysis> {
        let reply = match self.client.generate(prompt) {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "Gemini request failed; verify the API request and retry");
                return None;
            }
        };

        let Some(json_str) = extract_json(&reply) else {
            error!("no JSON object found in model reply");
            return None;
        };

        match serde_json::from_str::<Value>(json_str) {
            Ok(Value::Object(map)) => Some(map),
            Ok(_) => {
                error!("model reply JSON is not an object");
                None
            }
            Err(e) => {
                error!(
                    error = %e,
                    "error decoding JSON response; it may not be in the expected format"
                );
                None
            }
        }
    }
}

/// Returns the span from the first `{` to the last `}` of a model reply.
///
/// Handles markdown fences and explanatory text around the JSON. The span is
/// greedy, so nested objects are kept whole.
pub fn extract_json(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;

    if start <= end {
        Some(&reply[start..=end])
    } else {
        None
    }
}
