use serde::{Deserialize, Serialize};

/// The three pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Critic,
    Refiner,
    Evaluator,
}

/// Sampling parameters for one stage's completion calls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingProfile {
    pub temperature: f64,
    pub max_tokens: u32,
    /// Advisory seed hint; remote providers may ignore it
    pub seed: Option<u64>,
}

const DEFAULT_MAX_TOKENS: u32 = 1500;
const DEFAULT_SEED: u64 = 42;

impl AgentKind {
    pub const ALL: [AgentKind; 3] = [AgentKind::Critic, AgentKind::Refiner, AgentKind::Evaluator];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Critic => "critic",
            AgentKind::Refiner => "refiner",
            AgentKind::Evaluator => "evaluator",
        }
    }

    /// Default sampling profile per stage. The analytical stages run cooler
    /// than the generative refiner, the validating evaluator coolest of all.
    pub fn default_profile(&self) -> SamplingProfile {
        let temperature = match self {
            AgentKind::Critic => 0.7,
            AgentKind::Refiner => 0.5,
            AgentKind::Evaluator => 0.3,
        };
        SamplingProfile {
            temperature,
            max_tokens: DEFAULT_MAX_TOKENS,
            seed: Some(DEFAULT_SEED),
        }
    }

    /// Confidence assigned when the stage's response defies all parsing
    pub fn default_confidence(&self) -> f64 {
        match self {
            AgentKind::Critic => 0.6,
            AgentKind::Refiner => 0.8,
            AgentKind::Evaluator => 0.7,
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_cool_toward_validation() {
        let critic = AgentKind::Critic.default_profile();
        let refiner = AgentKind::Refiner.default_profile();
        let evaluator = AgentKind::Evaluator.default_profile();
        assert!(critic.temperature > refiner.temperature);
        assert!(refiner.temperature > evaluator.temperature);
    }

    #[test]
    fn default_confidence_stays_in_range() {
        for kind in AgentKind::ALL {
            let c = kind.default_confidence();
            assert!((0.0..=1.0).contains(&c));
        }
    }
}
