use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use promptforge_agent::{
    directive, parse, Agent, AgentError, AgentKind, AgentResult, CriticAgent, EvaluatorAgent,
    RefinerAgent, Role, StageContext, StageProfiles,
};
use promptforge_llm::{ChatMessage, CompletionClient, CompletionError, CompletionRequest};
use promptforge_logging::{LogEvent, LogFormat, Logger, Stage};

use crate::context::PipelineContext;
use crate::message::PipelineMessage;
use crate::outcome::PipelineOutcome;

const PREVIEW_LEN: usize = 120;

/// Drives one prompt through Critic → Refiner → Evaluator.
///
/// Transition rules:
/// - Critic or Refiner failure aborts the run. The outcome is a failure and
///   `final_prompt` echoes the caller's original prompt unchanged.
/// - Evaluator failure degrades instead: the run still succeeds with the
///   refiner's output, and the transcript records a zero-confidence
///   evaluation message.
pub struct PipelineRunner {
    client: Arc<dyn CompletionClient>,
    model: String,
    profiles: StageProfiles,
    logger: Arc<Logger>,
}

impl PipelineRunner {
    pub fn new(client: Arc<dyn CompletionClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            profiles: StageProfiles::default(),
            logger: Arc::new(Logger::new(LogFormat::Pretty)),
        }
    }

    pub fn with_profiles(mut self, profiles: StageProfiles) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn with_logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Resolve a role id, then run. An unknown role fails the run before any
    /// stage executes.
    pub async fn run_for_role_id(
        &self,
        prompt: &str,
        role_id: &str,
        correlation_id: &str,
    ) -> PipelineOutcome {
        match Role::from_str(role_id) {
            Ok(role) => self.run(prompt, role, correlation_id).await,
            Err(err) => {
                let detail = err.to_string();
                let message = PipelineMessage::error("pipeline", role_id, correlation_id, &detail);
                PipelineOutcome::failed(vec![message], prompt, detail)
            }
        }
    }

    /// Run the full three-stage pipeline for one prompt
    pub async fn run(&self, prompt: &str, role: Role, correlation_id: &str) -> PipelineOutcome {
        self.logger.log(&LogEvent::PipelineStarted {
            correlation_id: correlation_id.to_string(),
            role: role.id().to_string(),
            prompt_preview: preview(prompt),
        });

        let mut ctx = PipelineContext::new(prompt, role, correlation_id);

        if prompt.trim().is_empty() {
            return self.fail(
                &ctx,
                Vec::new(),
                "pipeline",
                "Prompt must not be empty".to_string(),
            );
        }

        let mut messages = Vec::new();

        // Stage 1: critique the original prompt.
        let critic_agent =
            CriticAgent::new(role, &self.model).with_profile(self.profiles.critic);
        let critic = match self
            .run_stage(&critic_agent, Stage::Critic, prompt, &StageContext::new(), correlation_id)
            .await
        {
            Ok(result) => result,
            Err(err) => {
                let detail = format!("Critic stage failed: {err}");
                return self.fail(&ctx, messages, critic_agent.config().name.as_str(), detail);
            }
        };
        messages.push(PipelineMessage::from_result(
            AgentKind::Critic,
            &critic_agent.config().name,
            role.id(),
            correlation_id,
            &critic,
        ));
        ctx.record_critic(critic);

        // Stage 2: refine against the critic's structured analysis.
        let refiner_agent =
            RefinerAgent::new(role, &self.model).with_profile(self.profiles.refiner);
        let refiner_ctx = ctx.refiner_inputs();
        let refiner = match self
            .run_stage(&refiner_agent, Stage::Refiner, prompt, &refiner_ctx, correlation_id)
            .await
        {
            Ok(result) => result,
            Err(err) => {
                let detail = format!("Refiner stage failed: {err}");
                return self.fail(&ctx, messages, refiner_agent.config().name.as_str(), detail);
            }
        };
        messages.push(PipelineMessage::from_result(
            AgentKind::Refiner,
            &refiner_agent.config().name,
            role.id(),
            correlation_id,
            &refiner,
        ));
        let refined_prompt = refiner.content.clone();
        ctx.record_refiner(refiner);

        // Stage 3: validate the refinement against the original intent. A
        // failure here degrades rather than aborts: the refiner already
        // produced a usable prompt.
        let evaluator_agent =
            EvaluatorAgent::new(role, &self.model).with_profile(self.profiles.evaluator);
        let evaluator_ctx = ctx.evaluator_inputs();
        match self
            .run_stage(
                &evaluator_agent,
                Stage::Evaluator,
                &refined_prompt,
                &evaluator_ctx,
                correlation_id,
            )
            .await
        {
            Ok(evaluation) => {
                let final_prompt = final_prompt_from(&evaluation, &refined_prompt);
                messages.push(PipelineMessage::from_result(
                    AgentKind::Evaluator,
                    &evaluator_agent.config().name,
                    role.id(),
                    correlation_id,
                    &evaluation,
                ));
                self.complete(&ctx, true);
                PipelineOutcome::succeeded(messages, final_prompt)
            }
            Err(err) => {
                self.logger.log(&LogEvent::StageDegraded {
                    correlation_id: correlation_id.to_string(),
                    stage: Stage::Evaluator,
                    error: err.to_string(),
                });
                messages.push(PipelineMessage::degraded_evaluation(
                    &evaluator_agent.config().name,
                    role.id(),
                    correlation_id,
                    &err.to_string(),
                ));
                self.complete(&ctx, true);
                PipelineOutcome::succeeded(messages, refined_prompt)
            }
        }
    }

    /// Single-call refinement that skips the staged pipeline entirely
    pub async fn run_direct(&self, prompt: &str, role: Role) -> Result<String, CompletionError> {
        let request = CompletionRequest {
            messages: vec![
                ChatMessage::system(directive::direct_system(role)),
                ChatMessage::user(directive::direct_user(role, prompt)),
            ],
            model: self.model.clone(),
            temperature: 0.7,
            max_tokens: 1500,
            seed: None,
        };
        let completion = self.client.complete(&request).await?;
        let content = completion.content.trim().to_string();
        Ok(parse::extract_enhanced_prompt(&content).unwrap_or(content))
    }

    async fn run_stage(
        &self,
        agent: &dyn Agent,
        stage: Stage,
        prompt: &str,
        stage_ctx: &StageContext,
        correlation_id: &str,
    ) -> Result<AgentResult, AgentError> {
        self.logger.log(&LogEvent::StageStarted {
            correlation_id: correlation_id.to_string(),
            stage,
        });
        let started = Instant::now();
        match agent.run(prompt, stage_ctx, self.client.as_ref()).await {
            Ok(result) => {
                self.logger.log(&LogEvent::StageCompleted {
                    correlation_id: correlation_id.to_string(),
                    stage,
                    confidence: result.confidence,
                    duration_secs: started.elapsed().as_secs_f64(),
                });
                Ok(result)
            }
            Err(err) => {
                self.logger.log(&LogEvent::StageFailed {
                    correlation_id: correlation_id.to_string(),
                    stage,
                    error: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn fail(
        &self,
        ctx: &PipelineContext,
        mut messages: Vec<PipelineMessage>,
        agent_name: &str,
        detail: String,
    ) -> PipelineOutcome {
        messages.push(PipelineMessage::error(
            agent_name,
            ctx.role.id(),
            &ctx.correlation_id,
            &detail,
        ));
        self.complete(ctx, false);
        PipelineOutcome::failed(messages, ctx.prompt.clone(), detail)
    }

    fn complete(&self, ctx: &PipelineContext, success: bool) {
        self.logger.log(&LogEvent::PipelineCompleted {
            correlation_id: ctx.correlation_id.clone(),
            success,
            duration_secs: ctx.elapsed().as_secs_f64(),
        });
    }
}

/// The evaluator's structured output carries the validated prompt when the
/// response parsed cleanly; otherwise fall back to the refiner's text.
fn final_prompt_from(evaluation: &AgentResult, refined_prompt: &str) -> String {
    evaluation
        .analysis_str("final_prompt")
        .unwrap_or(refined_prompt)
        .to_string()
}

fn preview(prompt: &str) -> String {
    let trimmed = prompt.trim();
    if trimmed.chars().count() <= PREVIEW_LEN {
        trimmed.to_string()
    } else {
        trimmed.chars().take(PREVIEW_LEN).collect()
    }
}
