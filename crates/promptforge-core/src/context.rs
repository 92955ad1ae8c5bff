use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::warn;

use promptforge_agent::context::{self, StageContext};
use promptforge_agent::{AgentResult, Role};

/// Accumulated state for one pipeline run.
///
/// Stage results are write-once: each slot is filled exactly once as the
/// pipeline advances, and a repeated write is ignored with a warning rather
/// than silently clobbering earlier output. Downstream stages read the slots
/// through [`refiner_inputs`](Self::refiner_inputs) and
/// [`evaluator_inputs`](Self::evaluator_inputs).
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub prompt: String,
    pub role: Role,
    pub correlation_id: String,
    critic: Option<AgentResult>,
    refiner: Option<AgentResult>,
    started_at: Instant,
}

impl PipelineContext {
    pub fn new(prompt: impl Into<String>, role: Role, correlation_id: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            role,
            correlation_id: correlation_id.into(),
            critic: None,
            refiner: None,
            started_at: Instant::now(),
        }
    }

    pub fn record_critic(&mut self, result: AgentResult) {
        if self.critic.is_some() {
            warn!(correlation_id = %self.correlation_id, "Critic result already recorded");
            return;
        }
        self.critic = Some(result);
    }

    pub fn record_refiner(&mut self, result: AgentResult) {
        if self.refiner.is_some() {
            warn!(correlation_id = %self.correlation_id, "Refiner result already recorded");
            return;
        }
        self.refiner = Some(result);
    }

    /// Contextual inputs for the refiner stage: the critic's structured
    /// analysis, once recorded
    pub fn refiner_inputs(&self) -> StageContext {
        let mut inputs = StageContext::new();
        if let Some(critic) = &self.critic {
            inputs.insert(context::CRITIC_ANALYSIS, critic.analysis.clone());
        }
        inputs
    }

    /// Contextual inputs for the evaluator stage: the original prompt plus
    /// whatever the earlier stages have recorded
    pub fn evaluator_inputs(&self) -> StageContext {
        let mut inputs = StageContext::new()
            .with(context::ORIGINAL_PROMPT, Value::String(self.prompt.clone()));
        if let Some(critic) = &self.critic {
            inputs.insert(context::CRITIC_FEEDBACK, Value::String(critic.content.clone()));
        }
        if let Some(refiner) = &self.refiner {
            inputs.insert(context::REFINEMENT, refiner.analysis.clone());
        }
        inputs
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}
