use serde_json::Value;
use std::collections::BTreeMap;

/// Context keys with stage-specific handling in the directives
pub const CRITIC_ANALYSIS: &str = "critic_analysis";
pub const CRITIC_FEEDBACK: &str = "critic_feedback";
pub const ORIGINAL_PROMPT: &str = "original_prompt";
pub const REFINEMENT: &str = "refinement";

/// Contextual inputs handed to one stage.
///
/// Backed by a `BTreeMap` so the rendered context block is deterministic:
/// the same inputs always produce the same directive text.
#[derive(Debug, Clone, Default)]
pub struct StageContext {
    entries: BTreeMap<String, Value>,
}

impl StageContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render entries not named in `consumed` as `key: value` lines, in key
    /// order. Returns `None` when nothing is left to render.
    pub fn render_remaining(&self, consumed: &[&str]) -> Option<String> {
        let lines: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, _)| !consumed.contains(&key.as_str()))
            .map(|(key, value)| format!("{key}: {}", render_value(value)))
            .collect();
        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
