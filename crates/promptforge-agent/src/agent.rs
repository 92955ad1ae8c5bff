use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use promptforge_llm::{ChatMessage, CompletionClient, CompletionError, CompletionRequest};

use crate::{AgentKind, AgentResult, StageConfig, StageContext};

/// Errors that can occur while running one pipeline stage.
///
/// Parse failures never appear here: the response parser degrades instead
/// of erroring, so the only failure modes are the collaborator itself.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("{kind} agent completion failed: {source}")]
    Completion {
        kind: AgentKind,
        #[source]
        source: CompletionError,
    },

    #[error("{0} agent returned an empty response")]
    EmptyResponse(AgentKind),
}

impl AgentError {
    pub fn kind(&self) -> AgentKind {
        match self {
            AgentError::Completion { kind, .. } => *kind,
            AgentError::EmptyResponse(kind) => *kind,
        }
    }
}

/// One stage of the pipeline: composes a directive, invokes the completion
/// collaborator, and normalizes whatever text comes back.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Resolved (stage, role) configuration
    fn config(&self) -> &StageConfig;

    fn kind(&self) -> AgentKind {
        self.config().kind
    }

    fn role(&self) -> crate::Role {
        self.config().role
    }

    /// Stage-specific body of the user message
    fn request_text(&self, prompt: &str, ctx: &StageContext) -> String;

    /// Normalize raw model output. Must always produce a well-formed result.
    fn parse_response(&self, raw: &str) -> AgentResult;

    /// Full message list for one invocation: system directive plus the
    /// composed user request.
    fn build_directive(&self, prompt: &str, ctx: &StageContext) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.config().system_directive.clone()),
            ChatMessage::user(self.request_text(prompt, ctx)),
        ]
    }

    /// Run the stage end to end against the given collaborator
    async fn run(
        &self,
        prompt: &str,
        ctx: &StageContext,
        client: &dyn CompletionClient,
    ) -> Result<AgentResult, AgentError> {
        let config = self.config();
        let request = CompletionRequest {
            messages: self.build_directive(prompt, ctx),
            model: config.model.clone(),
            temperature: config.profile.temperature,
            max_tokens: config.profile.max_tokens,
            seed: config.profile.seed,
        };

        debug!(
            agent = %config.name,
            prompt_len = prompt.len(),
            temperature = config.profile.temperature,
            "Running agent"
        );

        let completion = request_completion(client, &request, self.kind()).await?;
        Ok(self.parse_response(&completion.content))
    }
}

async fn request_completion(
    client: &dyn CompletionClient,
    request: &CompletionRequest,
    kind: AgentKind,
) -> Result<promptforge_llm::Completion, AgentError> {
    let completion = client
        .complete(request)
        .await
        .map_err(|source| AgentError::Completion { kind, source })?;
    if completion.content.trim().is_empty() {
        return Err(AgentError::EmptyResponse(kind));
    }
    Ok(completion)
}
