//! Configuration file support for promptforge.
//!
//! Loads configuration from `promptforge.toml` in the working directory,
//! falling back to the user config directory.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use promptforge_agent::{AgentKind, SamplingProfile, StageProfiles};

pub const CONFIG_FILE_NAME: &str = "promptforge.toml";
pub const DEFAULT_MODEL: &str = "sonar";
pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration loaded from `promptforge.toml`
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ForgeConfig {
    /// Model identifier sent with every completion request
    pub model: Option<String>,
    /// Base URL of the OpenAI-compatible completion API
    pub base_url: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Critic stage overrides
    #[serde(default)]
    pub critic: StageOverride,
    /// Refiner stage overrides
    #[serde(default)]
    pub refiner: StageOverride,
    /// Evaluator stage overrides
    #[serde(default)]
    pub evaluator: StageOverride,
}

/// Sampling overrides for one stage
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct StageOverride {
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub seed: Option<u64>,
}

impl StageOverride {
    fn apply(&self, base: SamplingProfile) -> SamplingProfile {
        SamplingProfile {
            temperature: self.temperature.unwrap_or(base.temperature),
            max_tokens: self.max_tokens.unwrap_or(base.max_tokens),
            seed: self.seed.or(base.seed),
        }
    }
}

impl ForgeConfig {
    /// Load configuration, checking the working directory first and the
    /// user config directory second.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if a file exists and parses successfully
    /// - `Ok(None)` if no config file exists
    /// - `Err(...)` if a file exists but fails to parse (hard error)
    pub fn load(working_dir: &Path) -> Result<Option<Self>> {
        for path in Self::candidate_paths(working_dir) {
            if path.exists() {
                return Self::load_file(&path).map(Some);
            }
        }
        Ok(None)
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ForgeConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    fn candidate_paths(working_dir: &Path) -> Vec<PathBuf> {
        let mut paths = vec![working_dir.join(CONFIG_FILE_NAME)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("promptforge").join(CONFIG_FILE_NAME));
        }
        paths
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Per-stage sampling profiles with config overrides applied on top of
    /// the stage defaults
    pub fn stage_profiles(&self) -> StageProfiles {
        StageProfiles {
            critic: self.critic.apply(AgentKind::Critic.default_profile()),
            refiner: self.refiner.apply(AgentKind::Refiner.default_profile()),
            evaluator: self.evaluator.apply(AgentKind::Evaluator.default_profile()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_no_config_present() {
        let config = ForgeConfig::default();
        assert_eq!(config.model(), "sonar");
        assert_eq!(config.base_url(), "https://api.perplexity.ai");
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.stage_profiles(), StageProfiles::default());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = ForgeConfig::load(dir.path()).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn stage_overrides_layer_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            r#"
model = "sonar-pro"
timeout_secs = 30

[critic]
temperature = 0.9

[evaluator]
max_tokens = 800
seed = 7
"#,
        )
        .unwrap();

        let config = ForgeConfig::load(dir.path()).unwrap().unwrap();
        assert_eq!(config.model(), "sonar-pro");
        assert_eq!(config.timeout(), Duration::from_secs(30));

        let profiles = config.stage_profiles();
        assert_eq!(profiles.critic.temperature, 0.9);
        assert_eq!(profiles.critic.max_tokens, 1500);
        assert_eq!(profiles.refiner, AgentKind::Refiner.default_profile());
        assert_eq!(profiles.evaluator.max_tokens, 800);
        assert_eq!(profiles.evaluator.seed, Some(7));
        assert_eq!(profiles.evaluator.temperature, 0.3);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "modle = \"typo\"\n").unwrap();
        assert!(ForgeConfig::load(dir.path()).is_err());
    }
}
