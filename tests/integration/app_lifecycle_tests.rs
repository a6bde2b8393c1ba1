/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use tempfile::TempDir;

use lingo::app_config::{CapabilityBackend, Config};
use lingo::app_controller::Controller;
use lingo::capabilities::Capabilities;
use lingo::session::OutputKind;

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withDefaultConfig_shouldStartIdle() {
    let controller = Controller::new_for_test();

    let view = controller.session().view();
    assert_eq!(view.source_language, "auto");
    assert_eq!(view.target_language, "en");
    assert_eq!(view.placeholder, "Enter text");
    assert_eq!(view.output_kind, OutputKind::Cleared);
    assert!(!controller.session().has_capability_support());
}

/// A config written to disk drives the session built from it
#[test]
fn test_controller_withConfigFromFile_shouldUseItsSelections() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.source_language = "it".to_string();
    config.target_language = "ja".to_string();
    config.backend = CapabilityBackend::Disabled;
    config.save(&path)?;

    let loaded = Config::load_or_create(&path)?;
    loaded.validate()?;
    let controller = Controller::with_config(&loaded, Capabilities::from_config(&loaded));

    let view = controller.session().view();
    assert_eq!(view.source_language, "it");
    assert_eq!(view.target_language, "ja");
    assert!(!controller.session().has_capability_support());
    Ok(())
}

/// The disabled backend answers every translation with the capability-missing message
#[test]
fn test_disabledBackend_shouldReportCapabilityMissing() {
    let mut config = Config::default();
    config.backend = CapabilityBackend::Disabled;
    let controller = Controller::with_config(&config, Capabilities::from_config(&config));

    let output = tokio_test::block_on(async {
        controller.session().translate_text("Hola").await;
        controller.session().view().output
    });

    assert_eq!(output, config.messages.capability_missing);
}

/// The Ollama backend provides translation and detection without contacting the server
#[test]
fn test_ollamaBackend_shouldProvideTranslationSupport() {
    let capabilities = Capabilities::from_config(&Config::default());

    assert!(capabilities.has_translation_support());
    assert!(capabilities.speech_recognition.is_none());
    assert!(capabilities.speech_synthesis.is_none());
}
