use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use promptforge_agent::Role;
use promptforge_core::{PipelineRunner, StageType};
use promptforge_llm::{Completion, CompletionClient, CompletionError, CompletionRequest};

/// Serves a fixed script of responses, one per completion call, and records
/// the requests it saw.
struct ScriptedClient {
    responses: Mutex<VecDeque<Result<String, CompletionError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    fn new(responses: Vec<Result<String, CompletionError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, index: usize) -> CompletionRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CompletionError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(CompletionError::EmptyChoices));
        next.map(|content| Completion {
            content,
            model: request.model.clone(),
        })
    }
}

fn api_error() -> CompletionError {
    CompletionError::Api {
        status: 500,
        body: "backend unavailable".into(),
    }
}

fn critic_json() -> String {
    r#"{
        "clarity_score": 0.4,
        "technical_accuracy_score": 0.6,
        "role_alignment_score": 0.5,
        "issues": [
            {"type": "clarity", "description": "vague goal", "suggestion": "name the target layout"}
        ],
        "overall_assessment": "The prompt is underspecified"
    }"#
    .to_string()
}

fn refiner_json() -> String {
    r#"{
        "refined_prompt": "Explain how to center a div with CSS grid, with code",
        "improvements": [
            {"original_issue": "vague goal", "how_addressed": "named the layout technique", "impact": "high"}
        ],
        "technical_enhancements": [],
        "confidence_assessment": {
            "clarity_improvement": 0.9,
            "technical_accuracy_improvement": 0.9,
            "role_alignment_improvement": 0.9
        }
    }"#
    .to_string()
}

fn evaluator_json() -> String {
    r#"{
        "evaluation_scores": {
            "clarity": 0.9,
            "technical_accuracy": 0.9,
            "role_alignment": 0.9,
            "improvement_impact": 0.9
        },
        "validation_checks": [
            {"aspect": "clarity", "passed": true, "comment": "clear"}
        ],
        "final_verdict": {
            "approved": true,
            "reasoning": "all concerns addressed",
            "suggestions_if_not_approved": []
        },
        "final_prompt": "Explain how to center a div with CSS grid, with code examples"
    }"#
    .to_string()
}

#[tokio::test]
async fn full_run_produces_three_messages_and_evaluator_prompt() {
    let client = ScriptedClient::new(vec![
        Ok(critic_json()),
        Ok(refiner_json()),
        Ok(evaluator_json()),
    ]);
    let runner = PipelineRunner::new(client.clone(), "sonar");

    let outcome = runner
        .run("how do I center a div", Role::WebDev, "run-1")
        .await;

    assert!(outcome.is_success());
    assert_eq!(outcome.messages.len(), 3);
    assert_eq!(outcome.messages[0].stage, StageType::Critique);
    assert_eq!(outcome.messages[1].stage, StageType::Refinement);
    assert_eq!(outcome.messages[2].stage, StageType::Evaluation);
    assert_eq!(
        outcome.final_prompt,
        "Explain how to center a div with CSS grid, with code examples"
    );
    // Critic confidence is the mean of its three sub-scores
    assert!((outcome.messages[0].metadata.confidence - 0.5).abs() < 1e-9);
    assert_eq!(client.request_count(), 3);
}

#[tokio::test]
async fn stage_temperatures_cool_along_the_pipeline() {
    let client = ScriptedClient::new(vec![
        Ok(critic_json()),
        Ok(refiner_json()),
        Ok(evaluator_json()),
    ]);
    let runner = PipelineRunner::new(client.clone(), "sonar");
    runner.run("center a div", Role::WebDev, "run-2").await;

    assert_eq!(client.request(0).temperature, 0.7);
    assert_eq!(client.request(1).temperature, 0.5);
    assert_eq!(client.request(2).temperature, 0.3);
    for i in 0..3 {
        assert_eq!(client.request(i).model, "sonar");
        assert_eq!(client.request(i).max_tokens, 1500);
    }
}

#[tokio::test]
async fn critic_context_flows_into_refiner_request() {
    let client = ScriptedClient::new(vec![
        Ok(critic_json()),
        Ok(refiner_json()),
        Ok(evaluator_json()),
    ]);
    let runner = PipelineRunner::new(client.clone(), "sonar");
    runner.run("center a div", Role::WebDev, "run-3").await;

    let refiner_request = client.request(1);
    let user = &refiner_request.messages[1].content;
    assert!(user.contains("vague goal"));

    let evaluator_request = client.request(2);
    let user = &evaluator_request.messages[1].content;
    assert!(user.contains("center a div"));
    assert!(user.contains("The prompt is underspecified"));
}

#[tokio::test]
async fn critic_failure_aborts_with_original_prompt() {
    let client = ScriptedClient::new(vec![Err(api_error())]);
    let runner = PipelineRunner::new(client.clone(), "sonar");

    let original = "  exactly this text, spaces and all  ";
    let outcome = runner.run(original, Role::SysEng, "run-4").await;

    assert!(!outcome.is_success());
    assert_eq!(outcome.final_prompt, original);
    assert_eq!(outcome.messages.len(), 1);
    assert_eq!(outcome.messages[0].stage, StageType::Error);
    assert!(outcome.error.as_deref().unwrap().contains("Critic"));
    // No further stages were attempted
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn refiner_failure_aborts_but_keeps_critique_message() {
    let client = ScriptedClient::new(vec![Ok(critic_json()), Err(api_error())]);
    let runner = PipelineRunner::new(client.clone(), "sonar");

    let outcome = runner.run("tune my kernel", Role::SysEng, "run-5").await;

    assert!(!outcome.is_success());
    assert_eq!(outcome.final_prompt, "tune my kernel");
    assert_eq!(outcome.messages.len(), 2);
    assert_eq!(outcome.messages[0].stage, StageType::Critique);
    assert_eq!(outcome.messages[1].stage, StageType::Error);
    assert_eq!(client.request_count(), 2);
}

#[tokio::test]
async fn blank_critic_response_fails_like_a_completion_error() {
    let client = ScriptedClient::new(vec![Ok("   \n".to_string())]);
    let runner = PipelineRunner::new(client.clone(), "sonar");

    let outcome = runner.run("center a div", Role::WebDev, "run-10").await;

    assert!(!outcome.is_success());
    assert_eq!(outcome.final_prompt, "center a div");
    assert_eq!(outcome.messages.len(), 1);
    assert_eq!(outcome.messages[0].stage, StageType::Error);
    assert!(outcome.error.as_deref().unwrap().contains("empty response"));
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn blank_evaluator_response_degrades_to_refined_prompt() {
    let client = ScriptedClient::new(vec![
        Ok(critic_json()),
        Ok(refiner_json()),
        Ok("  \n ".to_string()),
    ]);
    let runner = PipelineRunner::new(client.clone(), "sonar");

    let outcome = runner.run("center a div", Role::WebDev, "run-11").await;

    assert!(outcome.is_success());
    assert_eq!(
        outcome.final_prompt,
        "Explain how to center a div with CSS grid, with code"
    );
    assert_eq!(outcome.messages.len(), 3);
    assert_eq!(outcome.messages[2].stage, StageType::Evaluation);
    assert_eq!(outcome.messages[2].metadata.confidence, 0.0);
}

#[tokio::test]
async fn evaluator_failure_degrades_to_refined_prompt() {
    let client = ScriptedClient::new(vec![
        Ok(critic_json()),
        Ok(refiner_json()),
        Err(api_error()),
    ]);
    let runner = PipelineRunner::new(client.clone(), "sonar");

    let outcome = runner.run("center a div", Role::WebDev, "run-6").await;

    assert!(outcome.is_success());
    assert_eq!(
        outcome.final_prompt,
        "Explain how to center a div with CSS grid, with code"
    );
    assert_eq!(outcome.messages.len(), 3);
    assert_eq!(outcome.messages[2].stage, StageType::Evaluation);
    assert_eq!(outcome.messages[2].metadata.confidence, 0.0);
    assert!(outcome.messages[2].content.contains("unavailable"));
}

#[tokio::test]
async fn unparseable_evaluator_output_falls_back_to_refiner_content() {
    let client = ScriptedClient::new(vec![
        Ok(critic_json()),
        Ok(refiner_json()),
        Ok("looks fine to me".to_string()),
    ]);
    let runner = PipelineRunner::new(client.clone(), "sonar");

    let outcome = runner.run("center a div", Role::WebDev, "run-7").await;

    assert!(outcome.is_success());
    // The evaluator produced no structured final_prompt, so the refined
    // prompt carries through.
    assert_eq!(
        outcome.final_prompt,
        "Explain how to center a div with CSS grid, with code"
    );
}

#[tokio::test]
async fn empty_prompt_fails_without_calling_backend() {
    let client = ScriptedClient::new(vec![Ok(critic_json())]);
    let runner = PipelineRunner::new(client.clone(), "sonar");

    let outcome = runner.run("   \n  ", Role::Analyst, "run-8").await;

    assert!(!outcome.is_success());
    assert_eq!(outcome.final_prompt, "   \n  ");
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn unknown_role_fails_before_any_stage() {
    let client = ScriptedClient::new(vec![Ok(critic_json())]);
    let runner = PipelineRunner::new(client.clone(), "sonar");

    let outcome = runner
        .run_for_role_id("center a div", "astronaut", "run-9")
        .await;

    assert!(!outcome.is_success());
    assert!(outcome.error.as_deref().unwrap().contains("astronaut"));
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn direct_mode_extracts_enhanced_prompt() {
    let client = ScriptedClient::new(vec![Ok(
        "Enhanced prompt: Build a responsive navbar with flexbox\n\nRationale: added specifics."
            .to_string(),
    )]);
    let runner = PipelineRunner::new(client.clone(), "sonar");

    let refined = runner
        .run_direct("make a navbar", Role::WebDev)
        .await
        .unwrap();

    assert_eq!(refined, "Build a responsive navbar with flexbox");
    assert_eq!(client.request_count(), 1);
    let request = client.request(0);
    assert_eq!(request.messages.len(), 2);
    assert!(request.messages[1].content.contains("make a navbar"));
}

#[tokio::test]
async fn direct_mode_returns_raw_text_when_unlabeled() {
    let client = ScriptedClient::new(vec![Ok("Just a plain rewrite".to_string())]);
    let runner = PipelineRunner::new(client, "sonar");

    let refined = runner
        .run_direct("make a navbar", Role::WebDev)
        .await
        .unwrap();
    assert_eq!(refined, "Just a plain rewrite");
}
