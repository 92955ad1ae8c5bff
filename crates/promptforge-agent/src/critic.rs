use async_trait::async_trait;

use crate::{
    directive, parse, Agent, AgentKind, AgentResult, Role, SamplingProfile, StageConfig,
    StageContext,
};

/// Analyzes the raw prompt: scores clarity, technical accuracy, and role
/// alignment, and enumerates issues for the refiner to address.
pub struct CriticAgent {
    config: StageConfig,
}

impl CriticAgent {
    pub fn new(role: Role, model: impl Into<String>) -> Self {
        Self {
            config: StageConfig::new(AgentKind::Critic, role, model),
        }
    }

    pub fn with_profile(mut self, profile: SamplingProfile) -> Self {
        self.config.profile = profile;
        self
    }
}

#[async_trait]
impl Agent for CriticAgent {
    fn config(&self) -> &StageConfig {
        &self.config
    }

    fn request_text(&self, prompt: &str, ctx: &StageContext) -> String {
        directive::critic_request(self.role(), prompt, ctx)
    }

    fn parse_response(&self, raw: &str) -> AgentResult {
        parse::parse_critic(raw)
    }
}
