use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use url::Url;

use crate::language_utils::{self, AUTO};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Initial source selector value (a code or `auto`)
    #[serde(default = "default_source_selection")]
    pub source_language: String,

    /// Initial target selector value
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Source language used when detection is impossible
    #[serde(default = "default_source_language")]
    pub default_source_language: String,

    /// Languages offered by the selectors and expected by the detector
    #[serde(default = "default_supported_languages")]
    pub supported_languages: Vec<String>,

    /// Quiet period before a burst of input edits triggers a translation
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Input length at which the character counter is flagged
    #[serde(default = "default_char_limit")]
    pub char_limit: usize,

    /// Capability backend
    #[serde(default)]
    pub backend: CapabilityBackend,

    /// Ollama backend settings
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Speech settings
    #[serde(default)]
    pub speech: SpeechConfig,

    /// User-visible status strings
    #[serde(default)]
    pub messages: Messages,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Backend providing the translation and detection capabilities
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityBackend {
    // @backend: Local Ollama server
    #[default]
    Ollama,
    // @backend: No capabilities, every translation reports the capability-missing message
    Disabled,
}

impl CapabilityBackend {
    // @returns: Capitalized backend name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Ollama => "Ollama",
            Self::Disabled => "Disabled",
        }
    }

    // @returns: Lowercase backend identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Ollama => "ollama".to_string(),
            Self::Disabled => "disabled".to_string(),
        }
    }
}

impl std::fmt::Display for CapabilityBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for CapabilityBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "disabled" | "none" => Ok(Self::Disabled),
            _ => Err(anyhow!("Invalid backend type: {}", s)),
        }
    }
}

/// Ollama service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OllamaConfig {
    /// Model name (e.g., "llama3.2:3b")
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Service endpoint URL
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            model: default_ollama_model(),
            endpoint: default_ollama_endpoint(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

/// Speech synthesis settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpeechConfig {
    /// Speaking rate, 1.0 is normal speed
    #[serde(default = "default_speech_rate")]
    pub rate: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            rate: default_speech_rate(),
        }
    }
}

/// Fixed strings written to the output sink
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Messages {
    /// Transient status while a request is in flight
    #[serde(default = "default_translating_message")]
    pub translating: String,

    /// Selected pair not supported, or availability check failed
    #[serde(default = "default_pair_unavailable_message")]
    pub pair_unavailable: String,

    /// Engine creation or translate call failed
    #[serde(default = "default_translation_error_message")]
    pub translation_error: String,

    /// The host lacks the translation capabilities entirely
    #[serde(default = "default_capability_missing_message")]
    pub capability_missing: String,

    /// Model download status; `{percent}` is replaced by the progress value
    #[serde(default = "default_downloading_message")]
    pub downloading: String,

    /// Input placeholder while idle
    #[serde(default = "default_placeholder_message")]
    pub placeholder: String,

    /// Input placeholder while the recognizer is listening
    #[serde(default = "default_listening_message")]
    pub listening: String,

    /// Input placeholder after a recognition error
    #[serde(default = "default_listening_error_message")]
    pub listening_error: String,

    /// Label of the `auto` option; `{language}` is replaced by the detected language name
    #[serde(default = "default_detected_label")]
    pub detected_label: String,
}

impl Messages {
    /// Render the download status for a progress fraction in `0.0..=1.0`
    pub fn downloading(&self, fraction: f64) -> String {
        let percent = (fraction.clamp(0.0, 1.0) * 100.0).floor() as u32;
        self.downloading.replace("{percent}", &percent.to_string())
    }

    /// Render the `auto` option label for a detected language name
    pub fn detected_label(&self, language_name: &str) -> String {
        self.detected_label.replace("{language}", language_name)
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            translating: default_translating_message(),
            pair_unavailable: default_pair_unavailable_message(),
            translation_error: default_translation_error_message(),
            capability_missing: default_capability_missing_message(),
            downloading: default_downloading_message(),
            placeholder: default_placeholder_message(),
            listening: default_listening_message(),
            listening_error: default_listening_error_message(),
            detected_label: default_detected_label(),
        }
    }
}

/// Log verbosity level
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

impl LogLevel {
    /// Convert to the `log` crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_selection() -> String {
    AUTO.to_string()
}

fn default_target_language() -> String {
    language_utils::DEFAULT_TARGET_LANGUAGE.to_string()
}

fn default_source_language() -> String {
    language_utils::DEFAULT_SOURCE_LANGUAGE.to_string()
}

fn default_supported_languages() -> Vec<String> {
    language_utils::SUPPORTED_LANGUAGES
        .iter()
        .map(|code| code.to_string())
        .collect()
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_char_limit() -> usize {
    5000
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_temperature() -> f32 {
    0.1
}

fn default_speech_rate() -> f32 {
    1.0
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_translating_message() -> String {
    "Translating...".to_string()
}

fn default_pair_unavailable_message() -> String {
    "Translation is not available for the selected languages.".to_string()
}

fn default_translation_error_message() -> String {
    "Error translating the text.".to_string()
}

fn default_capability_missing_message() -> String {
    "Your environment does not support the translation capabilities. Please enable a supported backend.".to_string()
}

fn default_downloading_message() -> String {
    "Downloading model: {percent}%".to_string()
}

fn default_placeholder_message() -> String {
    "Enter text".to_string()
}

fn default_listening_message() -> String {
    "Listening...".to_string()
}

fn default_listening_error_message() -> String {
    "Error listening".to_string()
}

fn default_detected_label() -> String {
    "Detect language ({language})".to_string()
}

impl Config {
    /// Load a configuration file, creating it with defaults when missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;

            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

            return Ok(config);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());

        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Resolve the config path when none was given on the command line:
    /// `conf.json` in the working directory if present, else the user config dir
    pub fn default_path() -> PathBuf {
        let local = PathBuf::from("conf.json");
        if local.exists() {
            return local;
        }

        dirs::config_dir()
            .map(|dir| dir.join("lingo").join("conf.json"))
            .unwrap_or(local)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.supported_languages.is_empty() {
            return Err(anyhow!("At least one supported language is required"));
        }

        for code in &self.supported_languages {
            language_utils::validate_language_code(code)
                .with_context(|| format!("Invalid supported language: {}", code))?;
        }

        if !language_utils::is_supported(&self.default_source_language, &self.supported_languages) {
            return Err(anyhow!(
                "Default source language '{}' is not in the supported languages",
                self.default_source_language
            ));
        }

        if !language_utils::is_auto(&self.source_language)
            && !language_utils::is_supported(&self.source_language, &self.supported_languages)
        {
            return Err(anyhow!("Unsupported source language: {}", self.source_language));
        }

        if language_utils::is_auto(&self.target_language) {
            return Err(anyhow!("'auto' cannot be used as the target language"));
        }

        if !language_utils::is_supported(&self.target_language, &self.supported_languages) {
            return Err(anyhow!("Unsupported target language: {}", self.target_language));
        }

        if self.backend == CapabilityBackend::Ollama {
            Url::parse(&self.ollama.endpoint)
                .with_context(|| format!("Invalid Ollama endpoint: {}", self.ollama.endpoint))?;

            if self.ollama.model.trim().is_empty() {
                return Err(anyhow!("An Ollama model name is required"));
            }
        }

        if !(0.1..=10.0).contains(&self.speech.rate) {
            return Err(anyhow!("Speech rate must be between 0.1 and 10.0"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_selection(),
            target_language: default_target_language(),
            default_source_language: default_source_language(),
            supported_languages: default_supported_languages(),
            debounce_ms: default_debounce_ms(),
            char_limit: default_char_limit(),
            backend: CapabilityBackend::default(),
            ollama: OllamaConfig::default(),
            speech: SpeechConfig::default(),
            messages: Messages::default(),
            log_level: LogLevel::default(),
        }
    }
}
