//! Configuration loading, validation, and management for PaperForge.
//!
//! Loads configuration from `~/.paperforge/config.toml`, then `.env`, then
//! environment variable overrides. Validates all settings at startup.
//! Nothing downstream reads the environment: the loaded [`AppConfig`] is
//! threaded into the engine and evidence provider constructors.

use paperforge_core::ModelSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Engines that speak the Amplify chat payload.
pub const AMPLIFY_ENGINE: &str = "amplify";

/// Evidence provider names.
pub const OPENALEX_PROVIDER: &str = "openalex";
pub const GOOGLE_PROVIDER: &str = "google";

/// The root configuration structure.
///
/// Maps directly to `~/.paperforge/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Synthesis engine connection
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Evidence provider selection and credentials
    #[serde(default)]
    pub evidence: EvidenceConfig,

    /// Per-stage model settings
    #[serde(default)]
    pub stages: StagesConfig,

    /// Output file settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Pipeline behaviour
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// "amplify" or the name of an OpenAI-compatible provider
    #[serde(default = "default_engine")]
    pub engine: String,

    /// Base URL override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_synthesis_timeout")]
    pub timeout_secs: u64,
}

fn default_engine() -> String {
    AMPLIFY_ENGINE.into()
}
fn default_synthesis_timeout() -> u64 {
    60
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            api_url: None,
            api_key: None,
            timeout_secs: default_synthesis_timeout(),
        }
    }
}

impl std::fmt::Debug for SynthesisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynthesisConfig")
            .field("engine", &self.engine)
            .field("api_url", &self.api_url)
            .field("api_key", &redact(&self.api_key))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct EvidenceConfig {
    /// "openalex" or "google"
    #[serde(default = "default_evidence_provider")]
    pub provider: String,

    /// Records requested per subcategory
    #[serde(default = "default_evidence_limit")]
    pub limit: usize,

    #[serde(default = "default_evidence_timeout")]
    pub timeout_secs: u64,

    /// Contact address for the OpenAlex polite pool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openalex_mailto: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_cse_id: Option<String>,
}

fn default_evidence_provider() -> String {
    OPENALEX_PROVIDER.into()
}
fn default_evidence_limit() -> usize {
    5
}
fn default_evidence_timeout() -> u64 {
    15
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            provider: default_evidence_provider(),
            limit: default_evidence_limit(),
            timeout_secs: default_evidence_timeout(),
            openalex_mailto: None,
            google_api_key: None,
            google_cse_id: None,
        }
    }
}

impl std::fmt::Debug for EvidenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvidenceConfig")
            .field("provider", &self.provider)
            .field("limit", &self.limit)
            .field("timeout_secs", &self.timeout_secs)
            .field("openalex_mailto", &self.openalex_mailto)
            .field("google_api_key", &redact(&self.google_api_key))
            .field("google_cse_id", &redact(&self.google_cse_id))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagesConfig {
    #[serde(default = "default_decompose")]
    pub decompose: ModelSettings,

    #[serde(default = "default_research")]
    pub research: ModelSettings,

    #[serde(default = "default_coalesce")]
    pub coalesce: ModelSettings,
}

fn default_decompose() -> ModelSettings {
    ModelSettings::new("gpt-4o-mini", 0.4, 200)
}
fn default_research() -> ModelSettings {
    ModelSettings::new("gpt-4o", 0.5, 2500)
}
fn default_coalesce() -> ModelSettings {
    ModelSettings::new("gpt-4o", 0.6, 4000)
}

impl Default for StagesConfig {
    fn default() -> Self {
        Self {
            decompose: default_decompose(),
            research: default_research(),
            coalesce: default_coalesce(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the final document is written to
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_file_prefix() -> String {
    "research_paper".into()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            file_prefix: default_file_prefix(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Upper bound on parsed subcategories. Unset keeps every parsed line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_subcategories: Option<usize>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.paperforge/config.toml).
    ///
    /// A `.env` file in the working directory is loaded first, then these
    /// environment variables override the file:
    /// - `AMPLIFY_API_KEY`
    /// - `PAPERFORGE_ENGINE`, `PAPERFORGE_API_URL`
    /// - `PAPERFORGE_EVIDENCE`
    /// - `OPENALEX_EMAIL`
    /// - `GOOGLE_SEARCH_API_KEY`, `GOOGLE_CSE_ID`
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }

        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// Credentials from the environment take precedence over the file.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("AMPLIFY_API_KEY") {
            self.synthesis.api_key = Some(key);
        }
        if let Some(engine) = non_empty("PAPERFORGE_ENGINE") {
            self.synthesis.engine = engine;
        }
        if let Some(url) = non_empty("PAPERFORGE_API_URL") {
            self.synthesis.api_url = Some(url);
        }
        if let Some(provider) = non_empty("PAPERFORGE_EVIDENCE") {
            self.evidence.provider = provider.to_lowercase();
        }
        if let Some(mailto) = non_empty("OPENALEX_EMAIL") {
            self.evidence.openalex_mailto = Some(mailto);
        }
        if let Some(key) = non_empty("GOOGLE_SEARCH_API_KEY") {
            self.evidence.google_api_key = Some(key);
        }
        if let Some(cse) = non_empty("GOOGLE_CSE_ID") {
            self.evidence.google_cse_id = Some(cse);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".paperforge")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (stage, settings) in [
            ("decompose", &self.stages.decompose),
            ("research", &self.stages.research),
            ("coalesce", &self.stages.coalesce),
        ] {
            if !(0.0..=2.0).contains(&settings.temperature) {
                return Err(ConfigError::ValidationError(format!(
                    "stages.{stage}.temperature must be between 0.0 and 2.0"
                )));
            }
            if settings.max_tokens == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "stages.{stage}.max_tokens must be > 0"
                )));
            }
            if settings.model.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "stages.{stage}.model must not be empty"
                )));
            }
        }

        if self.evidence.limit == 0 {
            return Err(ConfigError::ValidationError(
                "evidence.limit must be > 0".into(),
            ));
        }

        if !matches!(
            self.evidence.provider.as_str(),
            OPENALEX_PROVIDER | GOOGLE_PROVIDER
        ) {
            return Err(ConfigError::ValidationError(format!(
                "unknown evidence provider '{}' (expected 'openalex' or 'google')",
                self.evidence.provider
            )));
        }

        if self.synthesis.timeout_secs == 0 || self.evidence.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeouts must be > 0 seconds".into(),
            ));
        }

        if self.pipeline.max_subcategories == Some(0) {
            return Err(ConfigError::ValidationError(
                "pipeline.max_subcategories must be > 0 when set".into(),
            ));
        }

        Ok(())
    }

    /// Check that every credential the selected engine and provider need is present.
    pub fn require_credentials(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();

        if self.synthesis.api_key.is_none() {
            if self.synthesis.engine == AMPLIFY_ENGINE {
                missing.push("AMPLIFY_API_KEY".to_string());
            } else {
                missing.push(format!(
                    "API key for engine '{}' (synthesis.api_key or AMPLIFY_API_KEY)",
                    self.synthesis.engine
                ));
            }
        }

        if self.evidence.provider == GOOGLE_PROVIDER {
            if self.evidence.google_api_key.is_none() {
                missing.push("GOOGLE_SEARCH_API_KEY".to_string());
            }
            if self.evidence.google_cse_id.is_none() {
                missing.push("GOOGLE_CSE_ID".to_string());
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::CredentialMissing(missing.join(", ")))
        }
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

    #[error("{0} not found in environment variables or config file")]
    CredentialMissing(String),
}
