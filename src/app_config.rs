use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::errors::TranslationError;

/// Application configuration module
/// This module holds the per-job translation options and the backend
/// settings, and loads them from an optional JSON file.
/// Options for one translation job
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct JobConfig {
    /// Target language, a code such as `es` or free text
    pub target_language: String,

    /// Model identifier passed to the backend
    pub model_id: String,

    /// Optional service region passed to the backend
    pub region: Option<String>,

    /// Cues per backend request
    pub batch_size: usize,

    /// Maximum batches in flight at once
    pub concurrency: usize,

    /// Retries after the first attempt of a batch
    pub retries: u32,

    /// Base backoff delay, doubled after every failed attempt
    pub retry_backoff_ms: u64,

    /// Skip the backend and tag each text with the target language
    pub dry_run: bool,

    /// Source file name, used to give the model context
    pub context_hint: Option<String>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            target_language: "es".to_string(),
            model_id: String::new(),
            region: None,
            batch_size: default_batch_size(),
            concurrency: default_concurrency(),
            retries: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            dry_run: false,
            context_hint: None,
        }
    }
}

impl JobConfig {
    /// Create a job for the given target language and model
    pub fn new(target_language: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            target_language: target_language.into(),
            model_id: model_id.into(),
            ..Default::default()
        }
    }

    /// Reject options that would make the job meaningless
    pub fn validate(&self) -> Result<(), TranslationError> {
        if self.target_language.trim().is_empty() {
            return Err(TranslationError::Config("target language must not be empty".to_string()));
        }
        if self.batch_size == 0 {
            return Err(TranslationError::Config("batch_size must be greater than zero".to_string()));
        }
        if self.concurrency == 0 {
            return Err(TranslationError::Config("concurrency must be greater than zero".to_string()));
        }
        if !self.dry_run && self.model_id.trim().is_empty() {
            return Err(TranslationError::Config("a model id is required unless dry_run is set".to_string()));
        }
        Ok(())
    }
}

/// Backend type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Anthropic Messages API
    Anthropic,
    /// Local Ollama server
    #[default]
    Ollama,
}

impl BackendKind {
    /// Capitalized backend name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Anthropic => "Anthropic",
            Self::Ollama => "Ollama",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anthropic => write!(f, "anthropic"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Backend connection settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Which backend to use
    pub provider: BackendKind,

    /// Service URL, the backend's public default when unset
    pub endpoint: Option<String>,

    /// API key for hosted backends
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum tokens generated per batch
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: BackendKind::default(),
            endpoint: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// Translation job options
    pub job: JobConfig,

    /// Backend settings
    pub backend: BackendConfig,

    /// Log level
    pub log_level: LogLevel,
}

fn default_batch_size() -> usize {
    30
}

fn default_concurrency() -> usize {
    3
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    500 // doubled on each retry
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.0
}

impl Config {
    /// Load configuration from a JSON file
    ///
    /// Missing fields take their defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.job.validate()?;

        if !self.job.dry_run && self.backend.provider == BackendKind::Anthropic {
            let has_key = self.backend.api_key.as_deref().is_some_and(|key| !key.trim().is_empty());
            if !has_key {
                return Err(anyhow!("Translation API key is required for Anthropic provider"));
            }
        }

        Ok(())
    }
}
