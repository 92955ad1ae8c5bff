use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use promptforge_agent::{AgentKind, AgentResult};

/// Transcript message categories, one per pipeline stage plus `Error`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageType {
    Critique,
    Refinement,
    Evaluation,
    Error,
}

impl StageType {
    pub fn for_kind(kind: AgentKind) -> Self {
        match kind {
            AgentKind::Critic => StageType::Critique,
            AgentKind::Refiner => StageType::Refinement,
            AgentKind::Evaluator => StageType::Evaluation,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StageType::Critique => "critique",
            StageType::Refinement => "refinement",
            StageType::Evaluation => "evaluation",
            StageType::Error => "error",
        }
    }
}

impl std::fmt::Display for StageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Provenance attached to every transcript message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// Producing agent, e.g. `critic-webdev`
    pub agent: String,
    pub role: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    pub correlation_id: String,
}

/// One entry in the pipeline transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineMessage {
    #[serde(rename = "type")]
    pub stage: StageType,
    pub content: String,
    pub metadata: MessageMetadata,
    pub timestamp: DateTime<Utc>,
}

impl PipelineMessage {
    /// Record a completed stage's normalized result
    pub fn from_result(
        kind: AgentKind,
        agent_name: &str,
        role: &str,
        correlation_id: &str,
        result: &AgentResult,
    ) -> Self {
        Self {
            stage: StageType::for_kind(kind),
            content: result.content.clone(),
            metadata: MessageMetadata {
                agent: agent_name.to_string(),
                role: role.to_string(),
                confidence: result.confidence,
                suggestions: result.suggestions.clone(),
                correlation_id: correlation_id.to_string(),
            },
            timestamp: Utc::now(),
        }
    }

    /// Record a stage or pipeline failure
    pub fn error(agent_name: &str, role: &str, correlation_id: &str, detail: &str) -> Self {
        Self {
            stage: StageType::Error,
            content: detail.to_string(),
            metadata: MessageMetadata {
                agent: agent_name.to_string(),
                role: role.to_string(),
                confidence: 0.0,
                suggestions: Vec::new(),
                correlation_id: correlation_id.to_string(),
            },
            timestamp: Utc::now(),
        }
    }

    /// Record an absorbed evaluator failure: the message keeps the
    /// evaluation slot in the transcript but signals zero confidence.
    pub fn degraded_evaluation(
        agent_name: &str,
        role: &str,
        correlation_id: &str,
        detail: &str,
    ) -> Self {
        Self {
            stage: StageType::Evaluation,
            content: format!("Evaluation unavailable: {detail}"),
            metadata: MessageMetadata {
                agent: agent_name.to_string(),
                role: role.to_string(),
                confidence: 0.0,
                suggestions: Vec::new(),
                correlation_id: correlation_id.to_string(),
            },
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stage_type_maps_from_agent_kind() {
        assert_eq!(StageType::for_kind(AgentKind::Critic), StageType::Critique);
        assert_eq!(
            StageType::for_kind(AgentKind::Evaluator),
            StageType::Evaluation
        );
    }

    #[test]
    fn message_serializes_with_type_tag() {
        let result = AgentResult::ok("looks good", 0.9, vec!["tighten scope".into()], json!({}));
        let message = PipelineMessage::from_result(
            AgentKind::Critic,
            "critic-webdev",
            "webdev",
            "c1",
            &result,
        );
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "critique");
        assert_eq!(value["metadata"]["agent"], "critic-webdev");
        assert_eq!(value["metadata"]["confidence"], 0.9);
    }

    #[test]
    fn degraded_evaluation_carries_zero_confidence() {
        let message =
            PipelineMessage::degraded_evaluation("evaluator-webdev", "webdev", "c1", "timed out");
        assert_eq!(message.stage, StageType::Evaluation);
        assert_eq!(message.metadata.confidence, 0.0);
        assert!(message.content.contains("timed out"));
    }
}
