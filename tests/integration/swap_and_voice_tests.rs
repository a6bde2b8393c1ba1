/*!
 * Swap, voice input, voice output and clipboard through the session
 */

use std::sync::Arc;
use std::time::Duration;

use lingo::capabilities::mock::{MockClipboard, MockDetection, MockSpeechRecognizer, MockSpeechSynthesizer, MockTranslation};
use lingo::capabilities::{RecognitionOptions, Utterance};
use lingo::session::{
    CopyOutcome, IndicatorState, OutputKind, RecognitionOutcome, Session, SpeechOutcome, TranslationOutcome, ViewEvent,
};

use crate::common::{self, drain_events};

/// Swap on (auto, en) detecting es gives (en, es) and moves the output into the input
#[tokio::test]
async fn test_swapLanguages_withAutoSource_shouldResolveAndExchange() {
    let translation = MockTranslation::working();
    let detection = MockDetection::fixed("es");
    let session = common::session_with(&translation, &detection);
    session.translate_text("Hola").await;

    let outcome = session.swap_languages().await;

    let view = session.view();
    assert_eq!(view.source_language, "en");
    assert_eq!(view.target_language, "es");
    assert_eq!(view.input, "[en] Hola");
    assert_eq!(view.char_count, "[en] Hola".chars().count());
    assert_eq!(outcome.translated_text(), Some("[es] [en] Hola"));
    assert_eq!(view.output, "[es] [en] Hola");
}

/// The source selector keeps the resolved language after a swap, it does not go back to auto
#[tokio::test]
async fn test_swapLanguages_twice_shouldNotRestoreAuto() {
    let session = common::session_with(&MockTranslation::working(), &MockDetection::fixed("es"));
    session.translate_text("Hola").await;

    session.swap_languages().await;
    session.swap_languages().await;

    let view = session.view();
    assert_eq!(view.source_language, "es");
    assert_eq!(view.target_language, "en");
}

/// With no output the swap exchanges languages and clears without translating
#[tokio::test]
async fn test_swapLanguages_withEmptyOutput_shouldNotTranslate() {
    let translation = MockTranslation::working();
    let detection = MockDetection::fixed("fr");
    let session = common::session_with(&translation, &detection);

    let outcome = session.swap_languages().await;

    assert_eq!(outcome, TranslationOutcome::Cleared);
    let view = session.view();
    // Empty input resolves auto to the default source without detecting
    assert_eq!(view.source_language, "en");
    assert_eq!(view.target_language, "es");
    assert_eq!(view.input, "");
    assert_eq!(view.output_kind, OutputKind::Cleared);
    assert_eq!(detection.detect_calls(), 0);
    assert_eq!(translation.counters().translate_calls(), 0);
}

/// A spoken utterance becomes the input and is translated
#[tokio::test]
async fn test_startVoiceRecognition_withTranscript_shouldTranslateIt() {
    common::init_logging();
    let recognizer = MockSpeechRecognizer::hearing("Hola");
    let capabilities = common::capabilities(&MockTranslation::working(), &MockDetection::fixed("es"))
        .with_speech_recognition(Arc::new(recognizer.clone()));
    let session = Session::new(capabilities);
    let mut events = session.subscribe();

    let outcome = session.start_voice_recognition().await;

    match outcome {
        RecognitionOutcome::Transcribed { transcript, translation } => {
            assert_eq!(transcript, "Hola");
            assert_eq!(translation.translated_text(), Some("[en] Hola"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    assert_eq!(
        recognizer.last_options(),
        Some(RecognitionOptions {
            language: "es-ES".to_string(),
            continuous: false,
            interim_results: false,
        })
    );

    let view = session.view();
    assert_eq!(view.input, "Hola");
    assert_eq!(view.char_count, 4);
    assert_eq!(view.placeholder, "Enter text");
    assert_eq!(view.microphone, IndicatorState::Idle);

    let events = drain_events(&mut events);
    assert!(events.contains(&ViewEvent::PlaceholderChanged {
        text: "Listening...".to_string()
    }));
    assert!(events.contains(&ViewEvent::MicrophoneChanged {
        state: IndicatorState::Active
    }));
}

/// A transcript replaces a pending typed edit instead of being translated twice
#[tokio::test(start_paused = true)]
async fn test_startVoiceRecognition_withPendingEdit_shouldTranslateOnce() {
    let translation = MockTranslation::working();
    let capabilities = common::capabilities(&translation, &MockDetection::fixed("es"))
        .with_speech_recognition(Arc::new(MockSpeechRecognizer::hearing("Hola")));
    let session = Session::new(capabilities);

    session.on_input_changed("Hol");
    session.start_voice_recognition().await;
    tokio::time::sleep(Duration::from_millis(1000)).await;

    assert_eq!(translation.counters().translate_calls(), 1);
    assert_eq!(session.view().output, "[en] Hola");
}

/// Recognition uses the concrete source selection's locale
#[tokio::test]
async fn test_startVoiceRecognition_withFixedSource_shouldUseItsLocale() {
    common::init_logging();
    let recognizer = MockSpeechRecognizer::hearing("Guten Tag");
    let capabilities = common::capabilities(&MockTranslation::working(), &MockDetection::fixed("es"))
        .with_speech_recognition(Arc::new(recognizer.clone()));
    let session = Session::new(capabilities);
    session.select_source_language("de").await.unwrap();

    session.start_voice_recognition().await;

    assert_eq!(recognizer.last_options().map(|o| o.language), Some("de-DE".to_string()));
    assert_eq!(session.view().output, "[en] Guten Tag");
}

/// The translation is spoken in the target locale and the speaker indicator returns to idle
#[tokio::test]
async fn test_speakTranslation_shouldSpeakOutputInTargetLocale() {
    common::init_logging();
    let synthesizer = MockSpeechSynthesizer::new();
    let capabilities = common::capabilities(&MockTranslation::working(), &MockDetection::fixed("es"))
        .with_speech_synthesis(Arc::new(synthesizer.clone()));
    let session = Session::new(capabilities);
    session.translate_text("Hola").await;
    let mut events = session.subscribe();

    assert_eq!(session.speak_translation().await, SpeechOutcome::Spoken);

    assert_eq!(
        synthesizer.spoken(),
        vec![Utterance {
            text: "[en] Hola".to_string(),
            language: "en-US".to_string(),
            rate: 1.0,
        }]
    );
    assert_eq!(session.view().speaker, IndicatorState::Idle);
    assert_eq!(
        drain_events(&mut events),
        vec![
            ViewEvent::SpeakerChanged {
                state: IndicatorState::Active
            },
            ViewEvent::SpeakerChanged {
                state: IndicatorState::Idle
            },
        ]
    );
}

#[tokio::test]
async fn test_speakTranslation_withSynthesisError_shouldResetIndicator() {
    common::init_logging();
    let capabilities = common::capabilities(&MockTranslation::working(), &MockDetection::fixed("es"))
        .with_speech_synthesis(Arc::new(MockSpeechSynthesizer::failing("audio-busy")));
    let session = Session::new(capabilities);
    session.translate_text("Hola").await;

    assert_eq!(
        session.speak_translation().await,
        SpeechOutcome::Failed("audio-busy".to_string())
    );
    assert_eq!(session.view().speaker, IndicatorState::Idle);
}

/// Copy writes the output to the clipboard and leaves the view untouched
#[tokio::test]
async fn test_copyTranslation_shouldWriteOutput() {
    common::init_logging();
    let clipboard = MockClipboard::new();
    let capabilities = common::capabilities(&MockTranslation::working(), &MockDetection::fixed("es"))
        .with_clipboard(Arc::new(clipboard.clone()));
    let session = Session::new(capabilities);

    assert_eq!(session.copy_translation().await, CopyOutcome::NothingToCopy);

    session.translate_text("Hola").await;
    let before = session.view();

    assert_eq!(session.copy_translation().await, CopyOutcome::Copied);
    assert_eq!(clipboard.contents().as_deref(), Some("[en] Hola"));
    assert_eq!(session.view(), before);
}
