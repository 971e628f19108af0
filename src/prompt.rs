//! Prompt assembly for CV-to-role analysis.
//!
//! A prompt is an ordered list of text parts. The remote client sends each part
//! as a separate `text` part of a single user turn.

use crate::models::RawAnalysis;

/// Persona statement that opens every prompt.
const PERSONA: &str = "You are an advanced AI specializing in CV analysis.";

/// Output schema and reasoning instructions.
const INSTRUCTIONS: &str = "Identify *all* significant skill gaps, even if there are many. \
Do not omit any important gaps. Evaluate the candidate's CV against the job description and \
provide the results in JSON format with the following keys:
- 'match_score' (integer, 0-100)
- 'skill_gaps' (list of dictionaries, each with 'category' and 'gap' keys)
- 'recommendations' (list of strings)

Use structured reasoning before generating the JSON. Ensure the JSON is valid and parsable.";

/// Appended on the single retry.
const REFINEMENT_INSTRUCTION: &str = "\nEnsure all required fields are included: \
'match_score', 'skill_gaps' and 'recommendations'. If you report any skill gaps, \
include at least one recommendation.";

/// An ordered, multi-part request for the model.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Prompt {
    parts: Vec<String>,
}

impl Prompt {
    /// Creates a prompt from its parts.
    pub fn new(parts: Vec<String>) -> Self {
        Self { parts }
    }

    /// Returns the parts in send order.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Appends a part to the end of the prompt.
    pub fn push(&mut self, part: impl Into<String>) {
        self.parts.push(part.into());
    }
}

/// Builds the initial analysis prompt.
///
/// Parts, in order: persona, output instructions, CV text, role description.
/// Both texts are included verbatim.
pub fn build_prompt(cv_text: &str, role_text: &str) -> Prompt {
    Prompt::new(vec![
        PERSONA.to_string(),
        INSTRUCTIONS.to_string(),
        format!("CV Text: \n{cv_text}"),
        format!("Role Description: \n{role_text}"),
    ])
}

/// Builds the retry prompt from the original request and the previous reply.
///
/// The original parts are kept unchanged; a correction instruction and a dump
/// of the previous response are appended.
pub fn refine_prompt(prompt: &Prompt, previous: Option<&RawAnalysis>) -> Prompt {
    let mut refined = prompt.clone();
    refined.push(REFINEMENT_INSTRUCTION);
    refined.push(format!("\nPrevious response: {}", describe_previous(previous)));
    refined
}

fn describe_previous(previous: Option<&RawAnalysis>) -> String {
    match previous {
        Some(map) => serde_json::to_string(map).unwrap_or_else(|_| "unavailable".to_string()),
        None => "none".to_string(),
    }
}
