use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    pub source_language: String,

    /// Target language code (ISO)
    pub target_language: String,

    /// Translation config
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation backend type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: OpenAI-compatible chat API
    #[default]
    OpenAI,
    // @provider: Deterministic offline mock, no network
    Mock,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenAI => "openai".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Translation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    // @field: Backend selection
    #[serde(default)]
    pub provider: TranslationProvider,

    // @field: Model name
    #[serde(default = "default_model")]
    pub model: String,

    // @field: API key (falls back to the OPENAI_API_KEY env variable)
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Endpoint override, empty for the public API
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Units per backend call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    // @field: Optional cap on extracted units
    #[serde(default)]
    pub max_units: Option<usize>,

    // @field: Pause between backend calls
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,

    // @field: Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    // @field: System prompt template with {source_language} and
    //         {target_language} placeholders
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl TranslationConfig {
    /// Resolve the API key from config or environment
    pub fn resolve_api_key(&self) -> Option<String> {
        if !self.api_key.trim().is_empty() {
            return Some(self.api_key.clone());
        }
        std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty())
    }

    /// Fill the language placeholders of the system prompt template
    pub fn rendered_system_prompt(&self, source_language: &str, target_language: &str) -> String {
        self.system_prompt
            .replace("{source_language}", source_language)
            .replace("{target_language}", target_language)
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            model: default_model(),
            api_key: String::new(),
            endpoint: String::new(),
            timeout_secs: default_timeout_secs(),
            batch_size: default_batch_size(),
            max_units: None,
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
            temperature: default_temperature(),
            system_prompt: default_system_prompt(),
        }
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_language: "de".to_string(),
            target_language: "en".to_string(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file, creating the file with
    /// defaults when it does not exist yet
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {:?}", path))?;
            return serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path));
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Self::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {:?}", path))?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.source_language.trim().is_empty() {
            return Err(anyhow!("Source language must not be empty"));
        }
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language must not be empty"));
        }
        if self.translation.batch_size == 0 {
            return Err(anyhow!("Batch size must be at least 1"));
        }
        if let Some(0) = self.translation.max_units {
            return Err(anyhow!("Max units must be at least 1 when set"));
        }
        if !(0.0..=2.0).contains(&self.translation.temperature) {
            return Err(anyhow!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.translation.temperature
            ));
        }
        if !self.translation.endpoint.is_empty() {
            url::Url::parse(&self.translation.endpoint)
                .map_err(|e| anyhow!("Invalid endpoint URL '{}': {}", self.translation.endpoint, e))?;
        }
        Ok(())
    }
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_batch_size() -> usize {
    100
}

fn default_rate_limit_delay_ms() -> u64 {
    500
}

fn default_temperature() -> f32 {
    0.0
}

fn default_system_prompt() -> String {
    "You are a professional translator specializing in academic and technical content. \
     Translate from {source_language} to {target_language}, preserving all LaTeX commands \
     and formatting exactly as they appear in the original text. Do not add any $ that were \
     not there before. Also do not make the translation longer than the input."
        .to_string()
}
