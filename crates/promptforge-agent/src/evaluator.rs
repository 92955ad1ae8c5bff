use async_trait::async_trait;

use crate::{
    directive, parse, Agent, AgentKind, AgentResult, Role, SamplingProfile, StageConfig,
    StageContext,
};

/// Validates the refined prompt against the critic's concerns and issues
/// the final verdict. A quality gate rather than a producer: the pipeline
/// can finish without it.
pub struct EvaluatorAgent {
    config: StageConfig,
}

impl EvaluatorAgent {
    pub fn new(role: Role, model: impl Into<String>) -> Self {
        Self {
            config: StageConfig::new(AgentKind::Evaluator, role, model),
        }
    }

    pub fn with_profile(mut self, profile: SamplingProfile) -> Self {
        self.config.profile = profile;
        self
    }
}

#[async_trait]
impl Agent for EvaluatorAgent {
    fn config(&self) -> &StageConfig {
        &self.config
    }

    fn request_text(&self, prompt: &str, ctx: &StageContext) -> String {
        directive::evaluator_request(self.role(), prompt, ctx)
    }

    fn parse_response(&self, raw: &str) -> AgentResult {
        parse::parse_evaluator(raw)
    }
}
