//! Layered response normalization.
//!
//! Every stage parser has the same non-throwing contract: tier 1 attempts a
//! strict JSON decode of the schema the directive asked for, tier 2 mines
//! labeled sections out of free-form text, and tier 3 wraps the raw text
//! with the stage's default confidence. Each tier is a total function; a
//! payload that defeats one tier simply falls through to the next, so the
//! orchestrator always receives a well-formed [`AgentResult`].

pub mod extract;
mod schema;

pub use schema::{
    ConfidenceAssessment, CriticAnalysis, CriticIssue, Evaluation, EvaluationScores, FinalVerdict,
    Improvement, Refinement, TechnicalEnhancement, ValidationCheck,
};

use serde_json::{json, Value};
use tracing::debug;

use crate::{AgentKind, AgentResult};

const CRITIC_KEYS: &[&str] = &[
    "clarity_score",
    "technical_accuracy_score",
    "role_alignment_score",
    "issues",
    "overall_assessment",
];

const EVALUATION_KEYS: &[&str] = &[
    "evaluation_scores",
    "validation_checks",
    "final_verdict",
    "final_prompt",
];

/// Dispatch to the stage-specific parser
pub fn parse_response(kind: AgentKind, raw: &str) -> AgentResult {
    match kind {
        AgentKind::Critic => parse_critic(raw),
        AgentKind::Refiner => parse_refiner(raw),
        AgentKind::Evaluator => parse_evaluator(raw),
    }
}

pub fn parse_critic(raw: &str) -> AgentResult {
    parse_critic_json(raw).unwrap_or_else(|| parse_critic_text(raw))
}

pub fn parse_refiner(raw: &str) -> AgentResult {
    parse_refiner_json(raw).unwrap_or_else(|| parse_refiner_text(raw))
}

pub fn parse_evaluator(raw: &str) -> AgentResult {
    parse_evaluator_json(raw).unwrap_or_else(|| parse_evaluator_text(raw))
}

/// Extract the enhanced prompt from a direct-mode response
pub fn extract_enhanced_prompt(raw: &str) -> Option<String> {
    extract::find_section(raw, &["enhanced prompt", "improved prompt"])
}

/// A score outside the unit range is corrupted input; substitute the stage
/// default rather than deriving a confidence from it.
fn confidence_or_default(kind: AgentKind, score: f64) -> f64 {
    if (0.0..=1.0).contains(&score) {
        score
    } else {
        kind.default_confidence()
    }
}

fn text_confidence(kind: AgentKind, numeric: Option<f64>, raw: &str) -> f64 {
    numeric
        .filter(|score| (0.0..=1.0).contains(score))
        .or_else(|| extract::qualitative_score(raw))
        .unwrap_or_else(|| kind.default_confidence())
}

// ── Tier 1: strict JSON ─────────────────────────────────────────

fn json_object(raw: &str) -> Option<Value> {
    let body = extract::strip_code_fence(raw);
    let value: Value = serde_json::from_str(body).ok()?;
    value.is_object().then_some(value)
}

fn has_any_key(value: &Value, keys: &[&str]) -> bool {
    keys.iter().any(|key| value.get(key).is_some())
}

fn parse_critic_json(raw: &str) -> Option<AgentResult> {
    let value = json_object(raw)?;
    if !has_any_key(&value, CRITIC_KEYS) {
        return None;
    }
    let analysis: CriticAnalysis = serde_json::from_value(value.clone()).ok()?;

    let mean = (analysis.clarity_score
        + analysis.technical_accuracy_score
        + analysis.role_alignment_score)
        / 3.0;
    let confidence = confidence_or_default(AgentKind::Critic, mean);
    let suggestions: Vec<String> = analysis
        .issues
        .iter()
        .map(|issue| issue.suggestion.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    let content = if analysis.overall_assessment.trim().is_empty() {
        "Analysis completed".to_string()
    } else {
        analysis.overall_assessment.clone()
    };

    debug!(confidence, issues = analysis.issues.len(), "Parsed critic JSON");
    Some(AgentResult::ok(content, confidence, suggestions, value))
}

fn parse_refiner_json(raw: &str) -> Option<AgentResult> {
    let value = json_object(raw)?;
    let refinement: Refinement = serde_json::from_value(value.clone()).ok()?;
    if refinement.refined_prompt.trim().is_empty() {
        return None;
    }

    let scores = &refinement.confidence_assessment;
    let mean = (scores.clarity_improvement
        + scores.technical_accuracy_improvement
        + scores.role_alignment_improvement)
        / 3.0;
    let confidence = confidence_or_default(AgentKind::Refiner, mean);
    let mut suggestions: Vec<String> = refinement
        .improvements
        .iter()
        .map(|imp| format!("{} → {}", imp.original_issue, imp.how_addressed))
        .collect();
    suggestions.extend(
        refinement
            .technical_enhancements
            .iter()
            .map(|enh| format!("Enhanced {}: {}", enh.aspect, enh.enhancement)),
    );

    debug!(
        confidence,
        improvements = refinement.improvements.len(),
        "Parsed refiner JSON"
    );
    Some(AgentResult::ok(
        refinement.refined_prompt.clone(),
        confidence,
        suggestions,
        value,
    ))
}

fn parse_evaluator_json(raw: &str) -> Option<AgentResult> {
    let value = json_object(raw)?;
    if !has_any_key(&value, EVALUATION_KEYS) {
        return None;
    }
    let evaluation: Evaluation = serde_json::from_value(value.clone()).ok()?;
    if evaluation.final_prompt.trim().is_empty() {
        return None;
    }

    let scores = &evaluation.evaluation_scores;
    let mean = (scores.clarity
        + scores.technical_accuracy
        + scores.role_alignment
        + scores.improvement_impact)
        / 4.0;
    let confidence = confidence_or_default(AgentKind::Evaluator, mean);

    let mut suggestions: Vec<String> = evaluation
        .validation_checks
        .iter()
        .filter(|check| !check.passed)
        .map(|check| format!("Issue with {}: {}", check.aspect, check.comment))
        .collect();
    if !evaluation.final_verdict.approved {
        suggestions.extend(evaluation.final_verdict.suggestions_if_not_approved.clone());
    }

    debug!(
        confidence,
        approved = evaluation.final_verdict.approved,
        "Parsed evaluator JSON"
    );
    Some(AgentResult::ok(
        evaluation.final_prompt.clone(),
        confidence,
        suggestions,
        value,
    ))
}

// ── Tier 2: labeled sections ────────────────────────────────────

fn parse_critic_text(raw: &str) -> AgentResult {
    let mut found = false;
    let mut issues: Vec<String> = Vec::new();
    for headings in [
        &["recommendations"][..],
        &["issues"],
        &["suggestions"],
        &["areas for improvement"],
    ] {
        if let Some(block) = extract::find_section(raw, headings) {
            found = true;
            issues.extend(extract::list_items(&block));
        }
    }

    let numeric = extract::labeled_score(raw, &["confidence"]);
    found |= numeric.is_some();
    if !found {
        return unstructured(AgentKind::Critic, raw);
    }

    let confidence = text_confidence(AgentKind::Critic, numeric, raw);
    let analysis = json!({
        "clarity_score": 0.5,
        "technical_accuracy_score": 0.5,
        "role_alignment_score": 0.5,
        "issues": issues
            .iter()
            .map(|issue| json!({
                "type": "clarity",
                "description": issue,
                "suggestion": issue,
            }))
            .collect::<Vec<_>>(),
        "overall_assessment": raw,
    });
    AgentResult::ok(raw.to_string(), confidence, issues, analysis)
}

fn parse_refiner_text(raw: &str) -> AgentResult {
    let refined = extract::find_section(
        raw,
        &["refined prompt", "improved prompt", "enhanced prompt", "final prompt"],
    );
    let mut found = refined.is_some();

    let mut improvements: Vec<String> = Vec::new();
    for headings in [
        &["improvements"][..],
        &["changes made"],
        &["improvements made"],
        &["enhancements"],
    ] {
        if let Some(block) = extract::find_section(raw, headings) {
            found = true;
            improvements.extend(extract::list_items(&block));
        }
    }

    let numeric = extract::labeled_score(raw, &["confidence"]);
    found |= numeric.is_some();
    if !found {
        return unstructured(AgentKind::Refiner, raw);
    }

    let confidence = text_confidence(AgentKind::Refiner, numeric, raw);
    let content = refined.unwrap_or_else(|| raw.to_string());
    let analysis = json!({
        "raw_response": raw,
        "improvement_count": improvements.len(),
    });
    AgentResult::ok(content, confidence, improvements, analysis)
}

fn parse_evaluator_text(raw: &str) -> AgentResult {
    let assessment = extract::find_section(
        raw,
        &["overall assessment", "assessment", "evaluation", "summary"],
    );
    let mut found = assessment.is_some();

    let strengths = extract::find_section(
        raw,
        &["strengths", "positive aspects", "pros", "what works well"],
    )
    .map(|block| extract::list_items(&block))
    .unwrap_or_default();
    found |= !strengths.is_empty();

    let weaknesses = extract::find_section(
        raw,
        &["weaknesses", "areas for improvement", "negative aspects", "cons", "suggestions"],
    )
    .map(|block| extract::list_items(&block))
    .unwrap_or_default();
    found |= !weaknesses.is_empty();

    let numeric = extract::labeled_score(raw, &["quality score", "rating", "confidence"]);
    found |= numeric.is_some();
    if !found {
        return unstructured(AgentKind::Evaluator, raw);
    }

    let confidence = text_confidence(AgentKind::Evaluator, numeric, raw);
    let content = assessment
        .or_else(|| extract::first_paragraph(raw).map(str::to_string))
        .unwrap_or_else(|| raw.to_string());
    let analysis = json!({
        "quality_score": confidence,
        "strengths": strengths,
        "weaknesses": weaknesses.clone(),
        "assessment": content.clone(),
    });
    AgentResult::ok(content, confidence, weaknesses, analysis)
}

// ── Tier 3: unstructured fallback ───────────────────────────────

fn unstructured(kind: AgentKind, raw: &str) -> AgentResult {
    debug!(%kind, "Response had no recognizable structure");
    AgentResult::ok(
        raw.to_string(),
        kind.default_confidence(),
        Vec::new(),
        json!({ "note": "response could not be parsed as structured output" }),
    )
}
