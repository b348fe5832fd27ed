use crate::constants::{
    DEFAULT_LOCAL_MODEL, DEFAULT_LOCAL_MODEL_ROOT, DEFAULT_MAX_TOKENS, DEFAULT_OPENAI_BASE_URL,
    DEFAULT_OPENAI_MODEL, DEFAULT_TEMPERATURE, OPENAI_API_KEY_ENV,
};
use crate::normalize::NormalizeVariant;
use crate::utils;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Application configuration loaded from settings.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub local: LocalConfig,
    #[serde(default)]
    pub normalizer: NormalizerConfig,
}

/// Which answer strategy a session uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineStrategy {
    /// Hosted chat-completion API
    #[default]
    Remote,
    /// In-process extractive QA model
    Local,
}

impl FromStr for EngineStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "remote" | "openai" => Ok(EngineStrategy::Remote),
            "local" => Ok(EngineStrategy::Local),
            other => Err(format!(
                "unknown engine '{}' (expected 'remote' or 'local')",
                other
            )),
        }
    }
}

impl fmt::Display for EngineStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineStrategy::Remote => f.write_str("remote"),
            EngineStrategy::Local => f.write_str("local"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub strategy: EngineStrategy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout; no timeout when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_OPENAI_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_OPENAI_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalConfig {
    #[serde(default = "default_local_model")]
    pub model_name: String,
    /// Directory with the converted weights (`rust_model.ot`, `config.json`,
    /// `spm.model`). Defaults to `~/.local/share/docquery/models/<model_name>`.
    #[serde(default)]
    pub model_dir: Option<String>,
}

fn default_local_model() -> String {
    DEFAULT_LOCAL_MODEL.to_string()
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            model_name: default_local_model(),
            model_dir: None,
        }
    }
}

impl LocalConfig {
    /// Resolved weights directory, with `~` expanded
    pub fn model_dir(&self) -> PathBuf {
        match &self.model_dir {
            Some(dir) => utils::expand_path(dir),
            None => utils::expand_path(DEFAULT_LOCAL_MODEL_ROOT).join(&self.model_name),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizerConfig {
    #[serde(default)]
    pub variant: NormalizeVariant,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration from default location or return defaults
    pub fn load() -> Result<Self> {
        let default_paths = [
            PathBuf::from("config/settings.toml"),
            PathBuf::from("./config/settings.toml"),
            utils::expand_path("~/.config/docquery/settings.toml"),
        ];

        for path in &default_paths {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::from_file(path);
            }
        }

        Ok(Self::default())
    }

    /// OpenAI credential from the environment; never read from the config file
    pub fn openai_api_key_from_env() -> Option<String> {
        std::env::var(OPENAI_API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.engine.strategy, EngineStrategy::Remote);
        assert_eq!(config.openai.base_url, "https://api.openai.com/v1");
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert_eq!(config.openai.max_tokens, 5000);
        assert!((config.openai.temperature - 0.6).abs() < f32::EPSILON);
        assert_eq!(config.openai.timeout_secs, None);
        assert_eq!(config.local.model_name, "timpal0l/mdeberta-v3-base-squad2");
        assert_eq!(config.normalizer.variant, NormalizeVariant::Strict);
    }

    #[test]
    fn test_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        std::fs::write(
            &path,
            r#"
[engine]
strategy = "local"

[openai]
model = "gpt-4o"
timeout_secs = 30

[local]
model_dir = "/opt/models/qa"

[normalizer]
variant = "extended"
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.engine.strategy, EngineStrategy::Local);
        assert_eq!(config.openai.model, "gpt-4o");
        assert_eq!(config.openai.max_tokens, 5000);
        assert_eq!(config.openai.timeout_secs, Some(30));
        assert_eq!(config.local.model_dir(), PathBuf::from("/opt/models/qa"));
        assert_eq!(config.normalizer.variant, NormalizeVariant::Extended);
    }

    #[test]
    fn test_config_empty_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        std::fs::write(&path, "").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.engine.strategy, EngineStrategy::Remote);
        assert_eq!(config.openai.model, "gpt-4o-mini");
    }

    #[test]
    fn test_config_invalid_variant() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        std::fs::write(&path, "[normalizer]\nvariant = \"loose\"\n").unwrap();

        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_config_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(Config::from_file(temp_dir.path().join("nope.toml")).is_err());
    }

    #[test]
    fn test_default_model_dir_ends_with_model_name() {
        let local = LocalConfig::default();
        assert!(local
            .model_dir()
            .ends_with("models/timpal0l/mdeberta-v3-base-squad2"));
    }

    #[test]
    fn test_engine_strategy_from_str() {
        assert_eq!("remote".parse::<EngineStrategy>(), Ok(EngineStrategy::Remote));
        assert_eq!("OpenAI".parse::<EngineStrategy>(), Ok(EngineStrategy::Remote));
        assert_eq!("local".parse::<EngineStrategy>(), Ok(EngineStrategy::Local));
        assert!("cloud".parse::<EngineStrategy>().is_err());
    }
}
