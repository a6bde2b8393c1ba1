/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use tempfile::TempDir;

use lingo::app_config::{CapabilityBackend, Config, LogLevel};

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "auto");
    assert_eq!(config.target_language, "en");
    assert_eq!(config.default_source_language, "es");
    assert_eq!(config.supported_languages.len(), 9);
    assert_eq!(config.debounce_ms, 500);
    assert_eq!(config.char_limit, 5000);
    assert_eq!(config.backend, CapabilityBackend::Ollama);
    assert_eq!(config.speech.rate, 1.0);
    assert_eq!(config.messages.translating, "Translating...");
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.target_language = "auto".to_string();
    assert!(config.validate().is_err());
    config.target_language = "ko".to_string();
    assert!(config.validate().is_err());
    config.target_language = "fr".to_string();
    assert!(config.validate().is_ok());

    config.source_language = "xyz".to_string();
    assert!(config.validate().is_err());
    config.source_language = "de".to_string();
    assert!(config.validate().is_ok());

    config.default_source_language = "ko".to_string();
    assert!(config.validate().is_err());
    config.default_source_language = "es".to_string();

    config.ollama.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());

    // The endpoint is irrelevant without the Ollama backend
    config.backend = CapabilityBackend::Disabled;
    assert!(config.validate().is_ok());

    config.speech.rate = 0.0;
    assert!(config.validate().is_err());
}

/// A missing file is created with the defaults
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("nested").join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.target_language, "en");

    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.debounce_ms, config.debounce_ms);
    Ok(())
}

/// Missing fields fall back to their defaults
#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("conf.json");
    std::fs::write(
        &path,
        r#"{ "target_language": "ja", "backend": "disabled", "messages": { "translating": "..." } }"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.target_language, "ja");
    assert_eq!(config.source_language, "auto");
    assert_eq!(config.backend, CapabilityBackend::Disabled);
    assert_eq!(config.messages.translating, "...");
    assert_eq!(config.messages.listening, "Listening...");
    assert_eq!(config.ollama.model, "llama3.2:3b");
    Ok(())
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

#[test]
fn test_save_shouldRoundTripChanges() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.debounce_ms = 250;
    config.log_level = LogLevel::Debug;
    config.save(&path)?;

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded.debounce_ms, 250);
    assert_eq!(loaded.log_level, LogLevel::Debug);
    assert_eq!(loaded.log_level.to_level_filter(), log::LevelFilter::Debug);
    Ok(())
}
