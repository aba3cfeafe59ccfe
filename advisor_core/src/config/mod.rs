//! Advisor configuration, read from an optional TOML file.
//!
//! Every key has a default, so an empty or missing file is a valid
//! configuration. The defaults are the engine's documented constants.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::context_assembler::AssemblerConfig;
use crate::matcher::FuzzyMatcher;
use crate::reinforcement::Reinforcer;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub storage: StorageConfig,
    pub learning: LearningConfig,
    pub generation: GenerationConfig,
}

/// Where durable state lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Persisted, ranked question catalogue.
    pub catalogue_path: PathBuf,
    /// Session record left by the upstream scan workflow.
    pub handoff_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            catalogue_path: PathBuf::from("agent_learning_db.json"),
            handoff_path: PathBuf::from("current_session.json"),
        }
    }
}

/// Matching, reinforcement, and prompt-window tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Fraction of the remaining distance to 1.0 covered per reinforcement.
    pub learning_rate: f64,
    /// Similarity a free-text match must strictly exceed.
    pub match_threshold: f64,
    /// Exchanges rendered into each prompt.
    pub history_window: usize,
    /// Entries weighted strictly above this are highlighted as popular.
    pub popular_weight: f64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: Reinforcer::DEFAULT_LEARNING_RATE,
            match_threshold: FuzzyMatcher::DEFAULT_THRESHOLD,
            history_window: AssemblerConfig::default().history_window,
            popular_weight: 0.8,
        }
    }
}

/// Generation backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub endpoint: String,
    pub model: String,
    /// Upper bound on a single generation call.
    pub timeout_secs: u64,
    pub temperature: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:11434".to_string(),
            model: "llama3".to_string(),
            timeout_secs: 60,
            temperature: 0.7,
        }
    }
}

impl GenerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AdvisorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AdvisorConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match fs::read_to_string(path.as_ref()) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Reject values the engine cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let learning = &self.learning;
        if !(learning.learning_rate > 0.0 && learning.learning_rate < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "learning.learning_rate must be in (0, 1), got {}",
                learning.learning_rate
            )));
        }
        if !(0.0..1.0).contains(&learning.match_threshold) {
            return Err(ConfigError::Invalid(format!(
                "learning.match_threshold must be in [0, 1), got {}",
                learning.match_threshold
            )));
        }
        if self.generation.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "generation.timeout_secs must be positive".to_string(),
            ));
        }
        if self.generation.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "generation.endpoint must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_engine_constants() {
        let config = AdvisorConfig::default();
        assert_eq!(config.learning.learning_rate, 0.1);
        assert_eq!(config.learning.match_threshold, 0.8);
        assert_eq!(config.learning.history_window, 3);
        assert_eq!(config.storage.catalogue_path, PathBuf::from("agent_learning_db.json"));
        assert_eq!(config.storage.handoff_path, PathBuf::from("current_session.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_document() {
        let config = AdvisorConfig::from_toml_str(
            r#"
            [generation]
            model = "mistral"
            timeout_secs = 15

            [learning]
            history_window = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.generation.model, "mistral");
        assert_eq!(config.generation.timeout(), Duration::from_secs(15));
        assert_eq!(config.generation.endpoint, "http://127.0.0.1:11434");
        assert_eq!(config.learning.history_window, 5);
        assert_eq!(config.learning.learning_rate, 0.1);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(AdvisorConfig::from_toml_str("").unwrap(), AdvisorConfig::default());
    }

    #[test]
    fn test_invalid_learning_rate() {
        let err = AdvisorConfig::from_toml_str("[learning]\nlearning_rate = 1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = AdvisorConfig::from_toml_str("[learning]\nlearning_rate = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = AdvisorConfig::from_toml_str("[generation]\ntimeout_secs = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_bad_toml() {
        let err = AdvisorConfig::from_toml_str("[learning\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AdvisorConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AdvisorConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field-advisor.toml");
        fs::write(&path, "[storage]\ncatalogue_path = \"data/db.json\"\n").unwrap();

        let config = AdvisorConfig::load(&path).unwrap();
        assert_eq!(config.storage.catalogue_path, PathBuf::from("data/db.json"));
    }
}
