//! Runtime configuration loaded from YAML

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ClassifierConfig
// ---------------------------------------------------------------------------

/// Scoring constants for intent classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub base_confidence: f64,
    /// Weight of the primary label's pattern score.
    pub pattern_weight: f64,
    /// Bonus per extracted entity, capped at `entity_cap`.
    pub entity_weight: f64,
    pub entity_cap: f64,
    /// Messages shorter than this many characters are penalised.
    pub short_message_len: usize,
    pub short_message_penalty: f64,
    /// Secondary intents score strictly inside (secondary_min, secondary_max).
    pub secondary_min: f64,
    pub secondary_max: f64,
    pub max_secondary: usize,
    pub entity_confidence: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_confidence: 0.5,
            pattern_weight: 0.4,
            entity_weight: 0.1,
            entity_cap: 0.3,
            short_message_len: 10,
            short_message_penalty: 0.8,
            secondary_min: 0.3,
            secondary_max: 0.8,
            max_secondary: 2,
            entity_confidence: 0.8,
        }
    }
}

// ---------------------------------------------------------------------------
// ComposerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhraseSelection {
    #[default]
    Random,
    First,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    pub phrase_selection: PhraseSelection,
}

// ---------------------------------------------------------------------------
// RecommenderConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    pub max_results: usize,
    /// Added when the preferred style is one of the template's tags.
    pub style_bonus: u32,
    /// Added for a "minimal" colour scheme on a template named minimal.
    pub minimal_bonus: u32,
    pub preview_url: String,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            max_results: 3,
            style_bonus: 20,
            minimal_bonus: 15,
            preview_url: "http://localhost:3000".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// JSON template catalog; the built-in catalog is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub composer: ComposerConfig,
    #[serde(default)]
    pub recommender: RecommenderConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            catalog_path: None,
            classifier: ClassifierConfig::default(),
            composer: ComposerConfig::default(),
            recommender: RecommenderConfig::default(),
        }
    }
}

impl Config {
    pub fn from_yaml_str(data: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(data)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&data)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn empty_yaml_uses_defaults() {
        let config = Config::from_yaml_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.recommender.max_results, 3);
        assert_eq!(config.classifier.short_message_len, 10);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let yaml = "log_level: debug\nclassifier:\n  entity_cap: 0.2\ncomposer:\n  phrase_selection: first\n";
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.classifier.entity_cap, 0.2);
        assert_eq!(config.classifier.base_confidence, 0.5);
        assert_eq!(config.composer.phrase_selection, PhraseSelection::First);
        assert_eq!(config.recommender, RecommenderConfig::default());
    }

    #[test]
    fn load_round_trips_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("windwalker.yaml");
        let mut config = Config::default();
        config.recommender.preview_url = "http://localhost:8080".to_string();
        std::fs::write(&path, config.to_yaml().unwrap()).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, crate::error::CoreError::Io(_)));
    }
}
