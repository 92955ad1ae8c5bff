use async_trait::async_trait;

use crate::{
    directive, parse, Agent, AgentKind, AgentResult, Role, SamplingProfile, StageConfig,
    StageContext,
};

/// Rewrites the prompt guided by the critic's analysis and reports what
/// each change addressed.
pub struct RefinerAgent {
    config: StageConfig,
}

impl RefinerAgent {
    pub fn new(role: Role, model: impl Into<String>) -> Self {
        Self {
            config: StageConfig::new(AgentKind::Refiner, role, model),
        }
    }

    pub fn with_profile(mut self, profile: SamplingProfile) -> Self {
        self.config.profile = profile;
        self
    }
}

#[async_trait]
impl Agent for RefinerAgent {
    fn config(&self) -> &StageConfig {
        &self.config
    }

    fn request_text(&self, prompt: &str, ctx: &StageContext) -> String {
        directive::refiner_request(self.role(), prompt, ctx)
    }

    fn parse_response(&self, raw: &str) -> AgentResult {
        parse::parse_refiner(raw)
    }
}
