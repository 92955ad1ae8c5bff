//! Directive templates for the three stages.
//!
//! Each stage sends a system message (base instructions composed with role
//! guidance) and a user message built here. Context values are rendered
//! through [`StageContext`] so the directive text is deterministic for the
//! same inputs.

use serde_json::Value;

use crate::context::{self, StageContext};
use crate::{AgentKind, Role};

/// Base instructions fixed per stage
pub fn base_instructions(kind: AgentKind) -> &'static str {
    match kind {
        AgentKind::Critic => {
            "You are a Critic agent responsible for analyzing prompts.\n\
             Your task is to:\n\
             1. Identify potential issues in clarity and specificity\n\
             2. Check for technical accuracy and best practices\n\
             3. Suggest areas for improvement\n\
             4. Consider the role-specific context"
        }
        AgentKind::Refiner => {
            "You are a Refiner agent responsible for improving prompts.\n\
             Your task is to:\n\
             1. Address issues identified by the Critic\n\
             2. Enhance technical accuracy and specificity\n\
             3. Apply role-specific best practices\n\
             4. Maintain clarity and conciseness"
        }
        AgentKind::Evaluator => {
            "You are an Evaluator agent responsible for validating prompts.\n\
             Your task is to:\n\
             1. Verify that all Critic's concerns are addressed\n\
             2. Ensure alignment with role-specific requirements\n\
             3. Validate technical accuracy and completeness\n\
             4. Provide a final quality assessment"
        }
    }
}

/// Composed system message for a (stage, role) pair
pub fn system_directive(kind: AgentKind, role: Role) -> String {
    format!(
        "{}\n\nRole-specific context:\n{}",
        base_instructions(kind),
        role.guidance()
    )
}

/// User message for the critic stage
pub fn critic_request(role: Role, prompt: &str, ctx: &StageContext) -> String {
    let mut message = format!(
        r#"Analyze this prompt as a {role_name} expert:

Prompt: {prompt}

Provide your analysis in the following JSON format:
{{
    "clarity_score": float,
    "technical_accuracy_score": float,
    "role_alignment_score": float,
    "issues": [
        {{
            "type": "clarity" | "technical" | "role-specific",
            "description": str,
            "suggestion": str
        }}
    ],
    "overall_assessment": str
}}

All scores range from 0.0 to 1.0.

Focus on:
1. Clarity and specificity
2. Technical accuracy for {role_name}
3. Alignment with {role_name} best practices
4. Areas for improvement"#,
        role_name = role.display_name(),
        prompt = prompt,
    );
    append_remaining_context(&mut message, ctx, &[]);
    message
}

/// User message for the refiner stage.
///
/// Consumers treat missing analysis fields as defaults so the critic's own
/// emitted analysis can always be fed back in, however degraded.
pub fn refiner_request(role: Role, prompt: &str, ctx: &StageContext) -> String {
    let empty = Value::Object(Default::default());
    let analysis = ctx.get(context::CRITIC_ANALYSIS).unwrap_or(&empty);

    let assessment = analysis
        .get("overall_assessment")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("No assessment provided");
    let clarity = score_or_default(analysis, "clarity_score");
    let technical = score_or_default(analysis, "technical_accuracy_score");
    let alignment = score_or_default(analysis, "role_alignment_score");
    let issues = analysis
        .get("issues")
        .map(|v| serde_json::to_string_pretty(v).unwrap_or_else(|_| "[]".to_string()))
        .unwrap_or_else(|| "[]".to_string());

    let mut message = format!(
        r#"As a {role_name} expert, improve this prompt based on the critic's analysis:

Original Prompt: {prompt}

Critic's Assessment:
{assessment}

Scores:
- Clarity: {clarity:.2}
- Technical Accuracy: {technical:.2}
- Role Alignment: {alignment:.2}

Issues to Address:
{issues}

Provide your refinements in the following JSON format:
{{
    "refined_prompt": str,
    "improvements": [
        {{
            "original_issue": str,
            "how_addressed": str,
            "impact": str
        }}
    ],
    "technical_enhancements": [
        {{
            "aspect": str,
            "enhancement": str
        }}
    ],
    "confidence_assessment": {{
        "clarity_improvement": float,
        "technical_accuracy_improvement": float,
        "role_alignment_improvement": float
    }}
}}

Focus on:
1. Addressing each issue raised by the critic
2. Enhancing technical accuracy and specificity
3. Improving alignment with {role_name} best practices
4. Maintaining clarity and conciseness"#,
        role_name = role.display_name(),
        prompt = prompt,
        assessment = assessment,
        clarity = clarity,
        technical = technical,
        alignment = alignment,
        issues = issues,
    );
    append_remaining_context(&mut message, ctx, &[context::CRITIC_ANALYSIS]);
    message
}

/// User message for the evaluator stage; `prompt` is the refined prompt
pub fn evaluator_request(role: Role, prompt: &str, ctx: &StageContext) -> String {
    let original = ctx
        .get_str(context::ORIGINAL_PROMPT)
        .unwrap_or("Not provided");
    let feedback = ctx
        .get_str(context::CRITIC_FEEDBACK)
        .unwrap_or("Not provided");
    let refinement = ctx
        .get(context::REFINEMENT)
        .map(|v| serde_json::to_string_pretty(v).unwrap_or_else(|_| "{}".to_string()))
        .unwrap_or_else(|| "Not provided".to_string());

    let mut message = format!(
        r#"As a {role_name} expert, evaluate this refined prompt:

Original Prompt: "{original}"

Refined Prompt: "{prompt}"

Critic's Feedback:
{feedback}

Refiner's Improvements:
{refinement}

Provide your evaluation in the following JSON format:
{{
    "evaluation_scores": {{
        "clarity": float,
        "technical_accuracy": float,
        "role_alignment": float,
        "improvement_impact": float
    }},
    "validation_checks": [
        {{
            "aspect": str,
            "passed": bool,
            "comment": str
        }}
    ],
    "final_verdict": {{
        "approved": bool,
        "reasoning": str,
        "suggestions_if_not_approved": [str]
    }},
    "final_prompt": str
}}

The final_prompt is the refined prompt with any last minor adjustments.

Focus on:
1. Validating that all critic's concerns are addressed
2. Ensuring technical accuracy for {role_name}
3. Verifying alignment with best practices
4. Making final minor adjustments if necessary"#,
        role_name = role.display_name(),
        original = original,
        prompt = prompt,
        feedback = feedback,
        refinement = refinement,
    );
    append_remaining_context(
        &mut message,
        ctx,
        &[
            context::ORIGINAL_PROMPT,
            context::CRITIC_FEEDBACK,
            context::REFINEMENT,
        ],
    );
    message
}

/// System message for the single-call direct refinement mode
pub fn direct_system(role: Role) -> String {
    format!(
        r#"You are a prompt optimization expert specializing in {role_name} topics. Your task is to IMPROVE the given prompt, not to answer it.

Focus on making the original prompt:
1. More specific and detailed
2. Better structured
3. More likely to get a high-quality response
4. Include relevant context and constraints

Role-specific guidance:
{guidance}

DO NOT answer the prompt's question - instead, rewrite it to be a better prompt.

Your response should be in this format:
"Enhanced prompt: [your improved version of the prompt]"

Followed by a brief explanation of what you improved and why."#,
        role_name = role.display_name(),
        guidance = role.guidance(),
    )
}

/// User message for the direct refinement mode
pub fn direct_user(role: Role, prompt: &str) -> String {
    format!(
        "Original prompt: {prompt}\nRole context: I am asking as a {}.",
        role.display_name()
    )
}

fn score_or_default(analysis: &Value, key: &str) -> f64 {
    analysis.get(key).and_then(Value::as_f64).unwrap_or(0.5)
}

fn append_remaining_context(message: &mut String, ctx: &StageContext, consumed: &[&str]) {
    if let Some(block) = ctx.render_remaining(consumed) {
        message.push_str("\n\nAdditional Context:\n");
        message.push_str(&block);
    }
}
