//! Configuration loading, validation, and management for querylens.
//!
//! Loads configuration from `~/.querylens/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use querylens_core::catalog::BusinessDomain;
use querylens_core::section::{OptimizationStrategy, TokenBudget};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The root configuration structure.
///
/// Maps directly to `~/.querylens/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Text-generation and embedding endpoint
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Interpretation pipeline settings
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Prioritization engine settings
    #[serde(default)]
    pub prioritization: PrioritizationConfig,

    /// Known business domains used by domain detection
    #[serde(default)]
    pub domains: Vec<BusinessDomain>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider label used in logs
    #[serde(default = "default_provider_name")]
    pub name: String,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model used for classification prompts
    #[serde(default = "default_model")]
    pub model: String,

    /// Model used for embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    #[serde(default)]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// HTTP timeout for one call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider_name() -> String {
    "openai".into()
}
fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".into()
}
fn default_max_tokens() -> u32 {
    512
}
fn default_timeout_secs() -> u64 {
    60
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("api_url", &self.api_url)
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("embedding_model", &self.embedding_model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            api_url: default_api_url(),
            api_key: None,
            model: default_model(),
            embedding_model: default_embedding_model(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Which similarity capability backs domain detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityBackend {
    /// Cosine similarity over provider embeddings
    Embedding,
    /// Character-bigram overlap, no network calls
    #[default]
    Lexical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// How long an interpreted profile stays cached
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    #[serde(default)]
    pub similarity: SimilarityBackend,

    /// Disable to recompute every profile
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
}

fn default_cache_ttl_secs() -> u64 {
    30 * 60
}

/// Longest cache TTL `validate` accepts (one week).
pub const MAX_CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60;
fn default_true() -> bool {
    true
}

impl AnalysisConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
            similarity: SimilarityBackend::default(),
            cache_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrioritizationConfig {
    /// How long a prioritized selection stays cached
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Strategy used by `optimize` when none is given
    #[serde(default)]
    pub default_strategy: OptimizationStrategy,

    /// Ceiling for the entire prompt
    #[serde(default = "default_total_tokens")]
    pub total_tokens: usize,

    /// Share of the ceiling available to context sections
    #[serde(default = "default_context_tokens")]
    pub context_tokens: usize,

    /// Upper bound on the knapsack table size (items x budget)
    #[serde(default = "default_max_dp_cells")]
    pub max_dp_cells: usize,

    /// Disable to recompute every selection
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
}

fn default_total_tokens() -> usize {
    8000
}
fn default_context_tokens() -> usize {
    4000
}
fn default_max_dp_cells() -> usize {
    50_000_000
}

impl PrioritizationConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn budget(&self) -> TokenBudget {
        TokenBudget::new(self.total_tokens, self.context_tokens)
    }
}

impl Default for PrioritizationConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
            default_strategy: OptimizationStrategy::default(),
            total_tokens: default_total_tokens(),
            context_tokens: default_context_tokens(),
            max_dp_cells: default_max_dp_cells(),
            cache_enabled: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.querylens/config.toml).
    ///
    /// Environment overrides:
    /// - `QUERYLENS_API_KEY`, then `OPENAI_API_KEY` (only if no key is configured)
    /// - `QUERYLENS_MODEL`
    /// - `QUERYLENS_API_URL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file path, then apply env overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::read_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn apply_env_overrides(&mut self) {
        if self.provider.api_key.is_none() {
            self.provider.api_key = std::env::var("QUERYLENS_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("QUERYLENS_MODEL") {
            self.provider.model = model;
        }

        if let Ok(url) = std::env::var("QUERYLENS_API_URL") {
            self.provider.api_url = url;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".querylens")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(ConfigError::ValidationError(
                "provider.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        for (field, ttl) in [
            ("analysis.cache_ttl_secs", self.analysis.cache_ttl_secs),
            ("prioritization.cache_ttl_secs", self.prioritization.cache_ttl_secs),
        ] {
            if ttl > MAX_CACHE_TTL_SECS {
                return Err(ConfigError::ValidationError(format!(
                    "{field} ({ttl}) exceeds the maximum of {MAX_CACHE_TTL_SECS}"
                )));
            }
        }

        let p = &self.prioritization;
        if p.context_tokens > p.total_tokens {
            return Err(ConfigError::ValidationError(format!(
                "prioritization.context_tokens ({}) exceeds total_tokens ({})",
                p.context_tokens, p.total_tokens
            )));
        }

        if p.max_dp_cells == 0 {
            return Err(ConfigError::ValidationError(
                "prioritization.max_dp_cells must be > 0".into(),
            ));
        }

        if let Some(i) = self.domains.iter().position(|d| d.name.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "domains[{i}] has an empty name"
            )));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.provider.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `config` command).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.analysis.cache_ttl(), Duration::from_secs(1800));
        assert_eq!(config.prioritization.cache_ttl(), Duration::from_secs(1800));
        assert_eq!(config.prioritization.default_strategy, OptimizationStrategy::Balanced);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.provider.model, config.provider.model);
        assert_eq!(parsed.prioritization.context_tokens, config.prioritization.context_tokens);
    }

    #[test]
    fn context_budget_above_total_rejected() {
        let config = AppConfig {
            prioritization: PrioritizationConfig {
                total_tokens: 1000,
                context_tokens: 2000,
                ..PrioritizationConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_cache_ttl_rejected() {
        let mut config = AppConfig::default();
        config.analysis.cache_ttl_secs = u64::MAX;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.prioritization.cache_ttl_secs = MAX_CACHE_TTL_SECS + 1;
        assert!(config.validate().is_err());

        config.prioritization.cache_ttl_secs = MAX_CACHE_TTL_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_temperature_rejected() {
        let mut config = AppConfig::default();
        config.provider.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::read_file(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.provider.api_url, "https://api.openai.com/v1");
    }

    #[test]
    fn api_key_is_redacted_in_debug() {
        let mut config = AppConfig::default();
        config.provider.api_key = Some("sk-secret".into());
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn domains_and_strategy_parse_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[prioritization]
default_strategy = "max_coverage"
context_tokens = 1500
cache_enabled = false

[[domains]]
name = "Sales"
description = "Orders, revenue and bookings"
key_concepts = ["revenue", "order"]
related_tables = ["orders", "customers"]

[[domains]]
name = "Support"
description = "Tickets and resolution times"
"#
        )
        .unwrap();

        let config = AppConfig::read_file(file.path()).unwrap();
        assert_eq!(config.prioritization.default_strategy, OptimizationStrategy::MaxCoverage);
        assert_eq!(config.prioritization.budget(), TokenBudget::new(8000, 1500));
        assert!(!config.prioritization.cache_enabled);
        assert!(config.analysis.cache_enabled);
        assert_eq!(config.domains.len(), 2);
        assert_eq!(config.domains[0].related_tables, vec!["orders", "customers"]);
        assert!(config.domains[1].key_concepts.is_empty());
    }

    #[test]
    fn unnamed_domain_rejected() {
        let config = AppConfig {
            domains: vec![BusinessDomain {
                name: "  ".into(),
                description: String::new(),
                key_concepts: vec![],
                related_tables: vec![],
            }],
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("gpt-4o-mini"));
        assert!(toml_str.contains("balanced"));
    }
}
