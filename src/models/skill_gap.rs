use serde::{Deserialize, Serialize};

/// A single mismatch between the CV and the role requirements.
///
/// Missing members default to the empty string so that a partially filled
/// gap reported by the model is still kept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkillGap {
    /// Broad grouping of the gap (e.g. "Technical", "Soft skills").
    #[serde(default)]
    pub category: String,
    /// Description of what is missing.
    #[serde(default)]
    pub gap: String,
}

impl SkillGap {
    /// Creates a new skill gap.
    pub fn new(category: impl Into<String>, gap: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            gap: gap.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_category_and_gap_keys() {
        let gap = SkillGap::new("Tech", "Java");
        let json = serde_json::to_value(&gap).unwrap();

        assert_eq!(json, serde_json::json!({"category": "Tech", "gap": "Java"}));
    }

    #[test]
    fn missing_members_default_to_empty() {
        let gap: SkillGap = serde_json::from_str(r#"{"gap": "Kubernetes"}"#).unwrap();

        assert_eq!(gap.category, "");
        assert_eq!(gap.gap, "Kubernetes");
    }

    #[test]
    fn non_object_is_rejected() {
        let result: Result<SkillGap, _> = serde_json::from_str(r#""just a string""#);
        assert!(result.is_err());
    }
}
