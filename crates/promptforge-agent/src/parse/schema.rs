//! Typed views of the structured output each stage is asked to emit.
//!
//! All fields default so a partially populated object still decodes; field
//! presence is checked separately before the strict tier accepts a payload.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticAnalysis {
    pub clarity_score: f64,
    pub technical_accuracy_score: f64,
    pub role_alignment_score: f64,
    pub issues: Vec<CriticIssue>,
    pub overall_assessment: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticIssue {
    #[serde(rename = "type")]
    pub issue_type: String,
    pub description: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Refinement {
    pub refined_prompt: String,
    pub improvements: Vec<Improvement>,
    pub technical_enhancements: Vec<TechnicalEnhancement>,
    pub confidence_assessment: ConfidenceAssessment,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Improvement {
    pub original_issue: String,
    pub how_addressed: String,
    pub impact: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalEnhancement {
    pub aspect: String,
    pub enhancement: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceAssessment {
    pub clarity_improvement: f64,
    pub technical_accuracy_improvement: f64,
    pub role_alignment_improvement: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Evaluation {
    pub evaluation_scores: EvaluationScores,
    pub validation_checks: Vec<ValidationCheck>,
    pub final_verdict: FinalVerdict,
    pub final_prompt: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationScores {
    pub clarity: f64,
    pub technical_accuracy: f64,
    pub role_alignment: f64,
    pub improvement_impact: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationCheck {
    pub aspect: String,
    pub passed: bool,
    pub comment: String,
}

// An unstated check counts as passed; only explicit failures become
// suggestions.
impl Default for ValidationCheck {
    fn default() -> Self {
        Self {
            aspect: String::new(),
            passed: true,
            comment: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalVerdict {
    pub approved: bool,
    pub reasoning: String,
    pub suggestions_if_not_approved: Vec<String>,
}
