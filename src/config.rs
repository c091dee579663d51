//! config.rs — assistant configuration.
//!
//! A small TOML file tunes the emergency keyword lists, suggestion
//! scoring and history capacity. Every field has a default and a
//! missing or malformed file falls back to those defaults with a
//! warning, so the binary always starts.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use crate::suggest::{DEFAULT_SUGGEST_LIMIT, DEFAULT_SUGGEST_THRESHOLD};
use crate::triage::EmergencyLexicon;

pub const DEFAULT_CONFIG_PATH: &str = "config/assistant.toml";
pub const ENV_CONFIG_PATH: &str = "HEALTH_CONFIG_PATH";
pub const ENV_APP_ENV: &str = "HEALTH_ENV";
pub const ENV_DEV_LOG: &str = "HEALTH_DEV_LOG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub emergency: EmergencySection,
    pub suggest: SuggestSection,
    pub history: HistorySection,
}

/// Keyword overrides for the two emergency gates.
/// An empty list keeps the built-in seed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmergencySection {
    pub chat_keywords: Vec<String>,
    pub checker_keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SuggestSection {
    pub threshold: f64,
    pub max: usize,
}

impl Default for SuggestSection {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SUGGEST_THRESHOLD,
            max: DEFAULT_SUGGEST_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistorySection {
    pub capacity: usize,
}

impl Default for HistorySection {
    fn default() -> Self {
        Self { capacity: 2000 }
    }
}

impl AssistantConfig {
    /// Resolved config path: env override or the default location.
    pub fn path() -> PathBuf {
        std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Load the config; any failure falls back to defaults with a warning.
    pub fn load() -> Self {
        let path = Self::path();
        match fs::read_to_string(&path) {
            Ok(raw) => match Self::from_toml_str(&raw) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "config unreadable; using defaults");
                    Self::default()
                }
            },
            Err(err) => {
                warn!(path = %path.display(), error = %err, "config missing; using defaults");
                Self::default()
            }
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("parse assistant config TOML")
    }

    pub fn lexicon(&self) -> EmergencyLexicon {
        EmergencyLexicon::from_lists(
            self.emergency.chat_keywords.clone(),
            self.emergency.checker_keywords.clone(),
        )
    }
}

/// Dev environment gate: debug builds, or HEALTH_ENV in {local, development, dev}.
pub(crate) fn app_env_is_dev() -> bool {
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var(ENV_APP_ENV)
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// Dev logging gate: HEALTH_DEV_LOG=1 AND dev env.
pub(crate) fn dev_logging_enabled() -> bool {
    let on = std::env::var(ENV_DEV_LOG).ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    app_env_is_dev()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg = AssistantConfig::from_toml_str("").unwrap();
        assert!(cfg.emergency.chat_keywords.is_empty());
        assert!((cfg.suggest.threshold - DEFAULT_SUGGEST_THRESHOLD).abs() < 1e-9);
        assert_eq!(cfg.suggest.max, DEFAULT_SUGGEST_LIMIT);
        assert_eq!(cfg.history.capacity, 2000);
    }

    #[test]
    fn sections_override_independently() {
        let cfg = AssistantConfig::from_toml_str(
            r#"
            [suggest]
            threshold = 0.9

            [history]
            capacity = 50
            "#,
        )
        .unwrap();
        assert!((cfg.suggest.threshold - 0.9).abs() < 1e-9);
        assert_eq!(cfg.suggest.max, DEFAULT_SUGGEST_LIMIT);
        assert_eq!(cfg.history.capacity, 50);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(AssistantConfig::from_toml_str("not = [toml").is_err());
    }

    #[test]
    fn lexicon_uses_seeds_until_overridden() {
        let default_cfg = AssistantConfig::default();
        assert!(default_cfg.lexicon().chat_emergency("heart attack").is_some());

        let cfg = AssistantConfig::from_toml_str(
            r#"
            [emergency]
            chat_keywords = ["custom phrase"]
            "#,
        )
        .unwrap();
        let lex = cfg.lexicon();
        assert!(lex.chat_emergency("heart attack").is_none());
        assert!(lex.chat_emergency("a custom phrase here").is_some());
        // checker list was not configured, so its seed stays
        assert!(lex.checker_emergency("high fever").is_some());
    }
}
