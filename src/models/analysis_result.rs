use serde::Serialize;

use super::SkillGap;

/// The decoded JSON object returned by the model, before normalization.
pub type RawAnalysis = serde_json::Map<String, serde_json::Value>;

/// Normalized outcome of comparing a CV against a role description.
///
/// Field order matches the serialized report: `match_score`, `skill_gaps`,
/// `recommendations`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AnalysisResult {
    match_score: u8,
    skill_gaps: Vec<SkillGap>,
    recommendations: Vec<String>,
}

impl AnalysisResult {
    /// Highest score the report can carry.
    pub const MAX_SCORE: u8 = 100;

    /// Creates a new `AnalysisResult`.
    ///
    /// `match_score` is clamped to `0..=100`.
    pub fn new(match_score: u8, skill_gaps: Vec<SkillGap>, recommendations: Vec<String>) -> Self {
        Self {
            match_score: match_score.min(Self::MAX_SCORE),
            skill_gaps,
            recommendations,
        }
    }

    /// Returns the overall fit, 0-100.
    pub fn match_score(&self) -> u8 {
        self.match_score
    }

    /// Returns the reported skill gaps in model order.
    pub fn skill_gaps(&self) -> &[SkillGap] {
        &self.skill_gaps
    }

    /// Returns the recommendations in model order.
    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }
}
