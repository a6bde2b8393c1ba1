/*!
 * Tests for the interactive prompt controller
 */

use lingo::app_config::Config;
use lingo::app_controller::{Command, Controller, Flow, format_status};
use lingo::capabilities::mock::{MockClipboard, MockDetection, MockTranslation};
use lingo::session::OutputKind;
use std::sync::Arc;

use crate::common;

fn controller(translation: &MockTranslation) -> Controller {
    common::init_logging();
    let capabilities = common::capabilities(translation, &MockDetection::fixed("es"));
    Controller::with_config(&Config::default(), capabilities)
}

#[tokio::test]
async fn test_handle_withLanguageCommands_shouldUpdateSelectors() {
    let controller = controller(&MockTranslation::working());

    assert_eq!(controller.handle(Command::Source("fr".to_string())).await, Flow::Continue);
    assert_eq!(controller.handle(Command::Target("de".to_string())).await, Flow::Continue);

    let view = controller.session().view();
    assert_eq!(view.source_language, "fr");
    assert_eq!(view.target_language, "de");
}

#[tokio::test]
async fn test_handle_withInvalidLanguage_shouldKeepSelection() {
    let controller = controller(&MockTranslation::working());

    controller.handle(Command::Target("auto".to_string())).await;
    controller.handle(Command::Source("klingon".to_string())).await;

    let view = controller.session().view();
    assert_eq!(view.source_language, "auto");
    assert_eq!(view.target_language, "en");
}

#[tokio::test]
async fn test_handle_withQuit_shouldStop() {
    let controller = Controller::new_for_test();

    assert_eq!(controller.handle(Command::Quit).await, Flow::Quit);
    assert_eq!(controller.handle(Command::Help).await, Flow::Continue);
}

#[tokio::test(start_paused = true)]
async fn test_handle_withTypedText_shouldTranslateAfterQuietPeriod() {
    let translation = MockTranslation::working();
    let controller = controller(&translation);

    controller.handle(Command::parse("Hola")).await;
    assert_eq!(controller.session().view().input, "Hola");
    assert_eq!(translation.counters().translate_calls(), 0);

    tokio::time::sleep(std::time::Duration::from_millis(600)).await;

    let view = controller.session().view();
    assert_eq!(view.output, "[en] Hola");
    assert_eq!(view.output_kind, OutputKind::Result);
}

#[tokio::test]
async fn test_run_withScript_shouldApplyCommandsUntilQuit() {
    let clipboard = MockClipboard::new();
    let capabilities = common::capabilities(&MockTranslation::working(), &MockDetection::fixed("es"))
        .with_clipboard(Arc::new(clipboard.clone()));
    let controller = Controller::with_config(&Config::default(), capabilities);

    let script = b":target fr\n:source es\nHola\n:copy\n:quit\n:target de\n";
    controller.run(&script[..]).await.unwrap();

    let view = controller.session().view();
    assert_eq!(view.source_language, "es");
    assert_eq!(view.target_language, "fr");
    assert_eq!(view.input, "Hola");
    // The typed line was still waiting for its quiet period when copying
    assert_eq!(clipboard.contents(), None);
}

#[tokio::test]
async fn test_run_withInputEndingMidEdit_shouldTranslateLastLine() {
    let translation = MockTranslation::working();
    let controller = controller(&translation);

    controller.run(&b"Hola\n"[..]).await.unwrap();

    let view = controller.session().view();
    assert_eq!(view.output, "[en] Hola");
    assert_eq!(view.output_kind, OutputKind::Result);
    assert_eq!(translation.counters().translate_calls(), 1);
}

#[tokio::test]
async fn test_run_withEmptyInput_shouldNotTranslate() {
    let translation = MockTranslation::working();
    let controller = controller(&translation);

    controller.run(&b""[..]).await.unwrap();

    assert_eq!(translation.counters().availability_calls(), 0);
    assert_eq!(controller.session().view().output_kind, OutputKind::Cleared);
}

#[test]
fn test_formatStatus_withDetectedLanguageAndOutput_shouldShowBoth() {
    let mut view = lingo::session::ViewState::new("auto", "fr", "Enter text");
    view.auto_label = Some("Detect language (Spanish)".to_string());
    view.output = "[fr] Hola".to_string();
    view.char_count = 4;

    assert_eq!(
        format_status(&view),
        "Detect language (Spanish) -> French (fr) | 4 chars | [fr] Hola"
    );
}
