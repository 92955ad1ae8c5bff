use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized output of one agent invocation.
///
/// Every response parser produces exactly one of these regardless of how
/// unstructured the raw model text was; the orchestrator never sees a
/// half-built result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResult {
    pub success: bool,
    /// Human-readable message content for the transcript
    pub content: String,
    /// Quality signal, always within [0.0, 1.0]
    pub confidence: f64,
    /// Ordered suggestion strings extracted from the response
    pub suggestions: Vec<String>,
    /// Agent-specific structured fields (scores, issues, verdicts)
    pub analysis: Value,
    /// Error detail, present only when `success` is false
    pub error: Option<String>,
}

impl AgentResult {
    /// Build a successful result, clamping confidence into range
    pub fn ok(
        content: impl Into<String>,
        confidence: f64,
        suggestions: Vec<String>,
        analysis: Value,
    ) -> Self {
        Self {
            success: true,
            content: content.into(),
            confidence: clamp_confidence(confidence),
            suggestions,
            analysis,
            error: None,
        }
    }

    /// Build a failed result carrying the error detail
    pub fn failure(error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            success: false,
            content: error.clone(),
            confidence: 0.0,
            suggestions: Vec::new(),
            analysis: Value::Object(Default::default()),
            error: Some(error),
        }
    }

    /// Fetch a string field from the analysis object, if present and non-empty
    pub fn analysis_str(&self, key: &str) -> Option<&str> {
        self.analysis
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn confidence_is_clamped() {
        let high = AgentResult::ok("x", 7.5, vec![], json!({}));
        assert_eq!(high.confidence, 1.0);
        let low = AgentResult::ok("x", -0.3, vec![], json!({}));
        assert_eq!(low.confidence, 0.0);
        let nan = AgentResult::ok("x", f64::NAN, vec![], json!({}));
        assert_eq!(nan.confidence, 0.0);
    }

    #[test]
    fn failure_carries_error_detail() {
        let result = AgentResult::failure("backend unreachable");
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("backend unreachable"));
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn analysis_str_ignores_blank_fields() {
        let result = AgentResult::ok("x", 0.5, vec![], json!({"final_prompt": "  "}));
        assert_eq!(result.analysis_str("final_prompt"), None);
        let result = AgentResult::ok("x", 0.5, vec![], json!({"final_prompt": "improved"}));
        assert_eq!(result.analysis_str("final_prompt"), Some("improved"));
    }
}
