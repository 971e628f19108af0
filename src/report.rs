//! Normalization and serialization of analysis reports.
//!
//! Whatever the model returned, the report always has the same three fields.
//! Absent or malformed values fall back to `0` / empty lists.

use serde::Serialize;
use serde::ser::Error as _;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

use crate::models::{AnalysisResult, RawAnalysis, SkillGap};

/// Builds an `AnalysisResult` from a raw model reply.
///
/// - `match_score`: integers are kept, floats are rounded, the value is clamped
///   to 0-100; anything else becomes 0.
/// - `skill_gaps`: elements that decode as `{category, gap}` objects are kept.
///   A lone object is read as a one-element list.
/// - `recommendations`: string elements are kept; a lone string counts as one.
pub fn normalize(raw: Option<&RawAnalysis>) -> AnalysisResult {
    let Some(raw) = raw else {
        return AnalysisResult::default();
    };

    let match_score = raw.get("match_score").map_or(0, score_from_value);

    let skill_gaps = entries(raw, "skill_gaps")
        .iter()
        .filter_map(|v| serde_json::from_value::<SkillGap>(v.clone()).ok())
        .collect();

    let recommendations = entries(raw, "recommendations")
        .iter()
        .filter_map(|v| v.as_str().map(String::from))
        .collect();

    AnalysisResult::new(match_score, skill_gaps, recommendations)
}

/// Serializes a report as JSON with 4-space indentation.
///
/// Non-ASCII characters are written as-is.
pub fn to_json(result: &AnalysisResult) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    result.serialize(&mut serializer)?;

    String::from_utf8(buf).map_err(serde_json::Error::custom)
}

/// Normalizes a raw reply and serializes it in one step.
pub fn format_report(raw: Option<&RawAnalysis>) -> Result<String, serde_json::Error> {
    to_json(&normalize(raw))
}

fn score_from_value(value: &Value) -> u8 {
    if let Some(n) = value.as_i64() {
        return n.clamp(0, i64::from(AnalysisResult::MAX_SCORE)) as u8;
    }
    if let Some(n) = value.as_u64() {
        return n.min(u64::from(AnalysisResult::MAX_SCORE)) as u8;
    }
    match value.as_f64() {
        Some(f) if f.is_finite() => {
            f.round().clamp(0.0, f64::from(AnalysisResult::MAX_SCORE)) as u8
        }
        _ => 0,
    }
}

fn entries<'a>(raw: &'a RawAnalysis, key: &str) -> &'a [Value] {
    match raw.get(key) {
        Some(Value::Array(items)) => items.as_slice(),
        Some(value @ (Value::Object(_) | Value::String(_))) => std::slice::from_ref(value),
        _ => &[],
    }
}
