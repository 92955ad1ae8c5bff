use serde::{Deserialize, Serialize};

use crate::message::PipelineMessage;

/// Terminal result of one pipeline run.
///
/// Always well-formed: on failure `final_prompt` is the caller's original
/// prompt, byte for byte, so downstream consumers can use it unconditionally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub success: bool,
    /// Ordered transcript of stage messages
    pub messages: Vec<PipelineMessage>,
    pub final_prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PipelineOutcome {
    pub fn succeeded(messages: Vec<PipelineMessage>, final_prompt: impl Into<String>) -> Self {
        Self {
            success: true,
            messages,
            final_prompt: final_prompt.into(),
            error: None,
        }
    }

    pub fn failed(
        messages: Vec<PipelineMessage>,
        original_prompt: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            messages,
            final_prompt: original_prompt.into(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Process exit code for CLI consumers
    pub fn exit_code(&self) -> i32 {
        if self.success {
            0
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_outcome_echoes_original_prompt() {
        let outcome = PipelineOutcome::failed(Vec::new(), "  raw prompt  ", "backend down");
        assert!(!outcome.is_success());
        assert_eq!(outcome.final_prompt, "  raw prompt  ");
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn error_field_is_omitted_on_success() {
        let outcome = PipelineOutcome::succeeded(Vec::new(), "refined");
        let value = serde_json::to_value(&outcome).unwrap();
        assert!(value.get("error").is_none());
        assert_eq!(outcome.exit_code(), 0);
    }
}
