/*!
 * End-to-end translation scenarios through the session
 */

use std::sync::Arc;

use lingo::app_config::Messages;
use lingo::capabilities::Capabilities;
use lingo::capabilities::mock::{DetectionMode, MockBehavior, MockDetection, MockTranslation};
use lingo::session::{OutputKind, Session, TranslationOutcome};
use lingo::translation::Detection;

use crate::common::{self, drain_events, output_writes};

/// "Hola" es->en on an available pair is translated by the engine
#[tokio::test]
async fn test_translate_withAvailablePair_shouldWriteEngineResult() {
    let translation = MockTranslation::working();
    let session = common::session_with(&translation, &MockDetection::fixed("fr"));
    session.select_source_language("es").await.unwrap();

    let outcome = session.translate_text("Hola").await;

    match outcome {
        TranslationOutcome::Translated(result) => {
            assert_eq!(result.text, "[en] Hola");
            assert_eq!(result.source_language, "es");
            assert_eq!(result.detection, None);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(session.view().output, "[en] Hola");
    assert_eq!(translation.counters().create_calls(), 1);
}

/// An unavailable pair shows the pair-unavailable message and never creates an engine
#[tokio::test]
async fn test_translate_withUnavailablePair_shouldShowMessageWithoutEngine() {
    let translation = MockTranslation::working().without_pair("es", "ja");
    let session = common::session_with(&translation, &MockDetection::fixed("es"));
    session.select_target_language("ja").await.unwrap();

    let outcome = session.translate_text("Hola").await;

    let expected = Messages::default().pair_unavailable;
    assert!(matches!(outcome, TranslationOutcome::Failed { ref message, .. } if *message == expected));
    assert_eq!(session.view().output, expected);
    assert_eq!(session.view().output_kind, OutputKind::Error);
    assert_eq!(translation.counters().create_calls(), 0);
}

/// A capability with no available pair never creates an engine, whatever the target
#[tokio::test]
async fn test_translate_withNoAvailablePairs_shouldNeverCreateEngine() {
    let translation = MockTranslation::unavailable();
    let session = common::session_with(&translation, &MockDetection::fixed("es"));

    session.translate_text("Hola").await;
    session.select_target_language("fr").await.unwrap();

    assert_eq!(session.view().output, Messages::default().pair_unavailable);
    assert_eq!(translation.counters().availability_calls(), 2);
    assert_eq!(translation.counters().create_calls(), 0);
}

/// A failing availability check is reported like an unavailable pair
#[tokio::test]
async fn test_translate_withFailingAvailabilityCheck_shouldShowPairUnavailable() {
    let translation = MockTranslation::new(MockBehavior::AvailabilityFails);
    let session = common::session_with(&translation, &MockDetection::fixed("es"));

    session.translate_text("Hola").await;

    assert_eq!(session.view().output, Messages::default().pair_unavailable);
}

/// Creation and call failures show the generic message and leave the session usable
#[tokio::test]
async fn test_translate_withEngineFailures_shouldShowGenericMessage() {
    for translation in [MockTranslation::new(MockBehavior::CreationFails), MockTranslation::failing()] {
        let session = common::session_with(&translation, &MockDetection::fixed("es"));

        session.translate_text("Hola").await;
        assert_eq!(session.view().output, Messages::default().translation_error);

        assert_eq!(session.translate_text("").await, TranslationOutcome::Cleared);
        assert_eq!(session.view().output, "");
    }
}

/// Empty input clears the output without calling any capability
#[tokio::test]
async fn test_translate_withEmptyInput_shouldClearWithoutCalls() {
    let translation = MockTranslation::working();
    let detection = MockDetection::fixed("es");
    let session = common::session_with(&translation, &detection);

    assert_eq!(session.translate_text("").await, TranslationOutcome::Cleared);

    assert_eq!(translation.counters().availability_calls(), 0);
    assert_eq!(detection.create_calls(), 0);
    assert_eq!(session.view().output_kind, OutputKind::Cleared);
}

/// Identical source and target return the input unchanged without capability calls
#[tokio::test]
async fn test_translate_withIdentityPair_shouldEchoInput() {
    let translation = MockTranslation::working();
    let session = common::session_with(&translation, &MockDetection::fixed("en"));

    let outcome = session.translate_text("  Hello there ").await;

    assert_eq!(outcome.translated_text(), Some("Hello there"));
    assert_eq!(translation.counters().availability_calls(), 0);
    assert_eq!(translation.counters().create_calls(), 0);
}

/// Without a detection capability the default source language is used
#[tokio::test]
async fn test_translate_withoutDetection_shouldUseDefaultSource() {
    common::init_logging();
    let translation = MockTranslation::working().with_custom_response(|text: &str, source: &str, target: &str| {
        format!("{}>{}: {}", source, target, text)
    });
    let session = Session::new(Capabilities::none().with_translation(Arc::new(translation)));

    let outcome = session.translate_text("Bonjour").await;

    assert_eq!(outcome.translated_text(), Some("es>en: Bonjour"));
    assert!(!session.has_capability_support());
    assert_eq!(session.view().auto_label, None);
}

/// Without any capability the capability-missing message is shown
#[tokio::test]
async fn test_translate_withoutCapabilities_shouldShowCapabilityMissing() {
    common::init_logging();
    let session = Session::new(Capabilities::none());

    session.translate_text("Hola").await;

    assert_eq!(session.view().output, Messages::default().capability_missing);
}

/// A supported detection updates the auto label with the language name
#[tokio::test]
async fn test_translate_withDetectedLanguage_shouldUpdateAutoLabel() {
    let session = common::session_with(&MockTranslation::working(), &MockDetection::fixed("fr"));

    let outcome = session.translate_text("Bonjour").await;

    match outcome {
        TranslationOutcome::Translated(result) => {
            assert_eq!(result.source_language, "fr");
            assert_eq!(result.detection, Some(Detection::Detected("fr".to_string())));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(session.view().auto_label.as_deref(), Some("Detect language (French)"));
}

/// Undetermined and unsupported detections fall back silently and keep the label
#[tokio::test]
async fn test_translate_withUnusableDetection_shouldFallBackAndKeepLabel() {
    for detection in [
        MockDetection::undetermined(),
        MockDetection::fixed("ko"),
        MockDetection::new(DetectionMode::Failing),
    ] {
        let session = common::session_with(&MockTranslation::working(), &detection);

        let outcome = session.translate_text("???").await;

        match outcome {
            TranslationOutcome::Translated(result) => assert_eq!(result.source_language, "es"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(session.view().auto_label, None);
    }
}

/// The detector is created once and reused across requests
#[tokio::test]
async fn test_translate_repeatedly_shouldReuseDetectorAndEngine() {
    let translation = MockTranslation::working();
    let detection = MockDetection::fixed("es");
    let session = common::session_with(&translation, &detection);

    session.translate_text("Hola").await;
    session.translate_text("Hola mundo").await;

    assert_eq!(detection.create_calls(), 1);
    assert_eq!(detection.detect_calls(), 2);
    assert_eq!(translation.counters().create_calls(), 1);
    assert_eq!(translation.counters().translate_calls(), 2);
}

/// Changing the target recreates the engine for the new pair
#[tokio::test]
async fn test_selectTargetLanguage_shouldTranslateImmediatelyWithNewEngine() {
    let translation = MockTranslation::working();
    let session = common::session_with(&translation, &MockDetection::fixed("es"));
    session.translate_text("Hola").await;

    let outcome = session.select_target_language("de").await.unwrap();

    assert_eq!(outcome.translated_text(), Some("[de] Hola"));
    assert_eq!(translation.counters().create_calls(), 2);
}

/// Download progress is shown as status, never as the final result
#[tokio::test]
async fn test_translate_withDownloadablePair_shouldReportProgressThenResult() {
    let session = common::session_with(&MockTranslation::downloadable(4), &MockDetection::fixed("es"));
    let mut events = session.subscribe();

    session.translate_text("Hola").await;

    let writes = output_writes(&drain_events(&mut events));
    assert_eq!(
        writes,
        vec![
            ("Translating...".to_string(), OutputKind::Status),
            ("Downloading model: 25%".to_string(), OutputKind::Progress),
            ("Downloading model: 50%".to_string(), OutputKind::Progress),
            ("Downloading model: 75%".to_string(), OutputKind::Progress),
            ("Downloading model: 100%".to_string(), OutputKind::Progress),
            ("[en] Hola".to_string(), OutputKind::Result),
        ]
    );
}

/// The character counter follows the input and flags the limit at 5000
#[tokio::test]
async fn test_charCounter_shouldFlagAtLimit() {
    let session = common::session_with(&MockTranslation::working(), &MockDetection::fixed("es"));

    session.set_input(&"a".repeat(4999));
    let view = session.view();
    assert_eq!(view.char_count, 4999);
    assert!(!view.over_limit);

    session.set_input(&"a".repeat(5000));
    let view = session.view();
    assert_eq!(view.char_count, 5000);
    assert!(view.over_limit);

    session.set_input("ñandú");
    assert_eq!(session.view().char_count, 5);
    assert!(!session.view().over_limit);
}
