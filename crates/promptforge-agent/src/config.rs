use crate::directive;
use crate::{AgentKind, Role, SamplingProfile};

/// Resolved configuration for one (stage, role) pair.
///
/// Assembled on demand when an agent is constructed; the system directive is
/// the stage's base instructions composed with the role's guidance text.
#[derive(Debug, Clone)]
pub struct StageConfig {
    pub kind: AgentKind,
    pub role: Role,
    /// Display name, e.g. `critic-webdev`
    pub name: String,
    /// Composed system message sent with every request for this stage
    pub system_directive: String,
    pub profile: SamplingProfile,
    pub model: String,
}

impl StageConfig {
    pub fn new(kind: AgentKind, role: Role, model: impl Into<String>) -> Self {
        Self {
            kind,
            role,
            name: format!("{kind}-{role}"),
            system_directive: directive::system_directive(kind, role),
            profile: kind.default_profile(),
            model: model.into(),
        }
    }
}

/// Per-stage sampling overrides, assembled once at startup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageProfiles {
    pub critic: SamplingProfile,
    pub refiner: SamplingProfile,
    pub evaluator: SamplingProfile,
}

impl Default for StageProfiles {
    fn default() -> Self {
        Self {
            critic: AgentKind::Critic.default_profile(),
            refiner: AgentKind::Refiner.default_profile(),
            evaluator: AgentKind::Evaluator.default_profile(),
        }
    }
}

impl StageProfiles {
    pub fn profile_for(&self, kind: AgentKind) -> SamplingProfile {
        match kind {
            AgentKind::Critic => self.critic,
            AgentKind::Refiner => self.refiner,
            AgentKind::Evaluator => self.evaluator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_composes_role_guidance() {
        let config = StageConfig::new(AgentKind::Critic, Role::WebDev, "sonar");
        assert_eq!(config.name, "critic-webdev");
        assert!(config.system_directive.contains("Critic agent"));
        assert!(config.system_directive.contains("web developer"));
    }

    #[test]
    fn default_profiles_match_kind_defaults() {
        let profiles = StageProfiles::default();
        for kind in AgentKind::ALL {
            assert_eq!(profiles.profile_for(kind), kind.default_profile());
        }
    }
}
