/*!
 * Voice input and output around the translation pipeline, plus clipboard copy.
 *
 * Every adapter is a no-op when its capability is absent.
 */

use log::{debug, error, info};

use crate::capabilities::{RecognitionEvent, RecognitionOptions, SynthesisEvent, Utterance};
use crate::language_utils;

use super::manager::{Session, write_input};
use super::models::{CopyOutcome, IndicatorState, RecognitionOutcome, SpeechOutcome, ViewEvent, ViewState};

fn set_placeholder(view: &mut ViewState, events: &mut Vec<ViewEvent>, text: &str) {
    if view.placeholder != text {
        view.placeholder = text.to_string();
        events.push(ViewEvent::PlaceholderChanged {
            text: view.placeholder.clone(),
        });
    }
}

fn set_microphone(view: &mut ViewState, events: &mut Vec<ViewEvent>, state: IndicatorState) {
    if view.microphone != state {
        view.microphone = state;
        events.push(ViewEvent::MicrophoneChanged { state });
    }
}

fn set_speaker(view: &mut ViewState, events: &mut Vec<ViewEvent>, state: IndicatorState) {
    if view.speaker != state {
        view.speaker = state;
        events.push(ViewEvent::SpeakerChanged { state });
    }
}

impl Session {
    /// Listen for one utterance in the source language, then translate it.
    ///
    /// Runs until the recognizer ends its session.
    pub async fn start_voice_recognition(&self) -> RecognitionOutcome {
        let inner = &self.inner;
        let Some(recognizer) = inner.capabilities.speech_recognition.clone() else {
            info!("Speech recognition is not available");
            return RecognitionOutcome::Unavailable;
        };
        let messages = &inner.config.messages;

        let (selection, text) = {
            let view = inner.view();
            (view.source_language, view.input.trim().to_string())
        };
        let source = self.resolve_concrete_source(&selection, &text).await;

        let options = RecognitionOptions {
            language: language_utils::full_language_code(&source, &inner.config.default_source_language).to_string(),
            continuous: false,
            interim_results: false,
        };
        debug!("Starting speech recognition in {}", options.language);

        let mut recognition = match recognizer.start(options).await {
            Ok(receiver) => receiver,
            Err(e) => {
                error!("Error starting speech recognition: {}", e);
                return RecognitionOutcome::Failed(e.to_string());
            }
        };

        let mut transcribed = None;
        let mut failure = None;

        while let Some(event) = recognition.recv().await {
            match event {
                RecognitionEvent::Started => inner.update(|view, events| {
                    set_placeholder(view, events, &messages.listening);
                    set_microphone(view, events, IndicatorState::Active);
                }),
                RecognitionEvent::Transcript(transcript) => {
                    debug!("Recognized '{}'", transcript);
                    let char_limit = inner.config.char_limit;
                    inner.update(|view, events| write_input(view, events, &transcript, char_limit));
                    let translation = self.translate_now().await;
                    transcribed = Some((transcript, translation));
                }
                RecognitionEvent::Error(e) => {
                    error!("Error listening: {}", e);
                    inner.update(|view, events| set_placeholder(view, events, &messages.listening_error));
                    failure = Some(e);
                }
                RecognitionEvent::Ended => break,
            }
        }

        inner.update(|view, events| {
            set_placeholder(view, events, &messages.placeholder);
            set_microphone(view, events, IndicatorState::Idle);
        });

        match (transcribed, failure) {
            (Some((transcript, translation)), _) => RecognitionOutcome::Transcribed { transcript, translation },
            (None, Some(e)) => RecognitionOutcome::Failed(e),
            (None, None) => RecognitionOutcome::NoSpeech,
        }
    }

    /// Speak the output in the target language
    pub async fn speak_translation(&self) -> SpeechOutcome {
        let inner = &self.inner;
        let Some(synthesizer) = inner.capabilities.speech_synthesis.clone() else {
            info!("Speech synthesis is not available");
            return SpeechOutcome::Unavailable;
        };

        let view = inner.view();
        if !view.has_output() {
            return SpeechOutcome::NothingToSpeak;
        }

        let utterance = Utterance {
            text: view.output,
            language: language_utils::full_language_code(&view.target_language, &inner.config.default_source_language)
                .to_string(),
            rate: inner.config.speech.rate,
        };

        let mut synthesis = match synthesizer.speak(utterance).await {
            Ok(receiver) => receiver,
            Err(e) => {
                error!("Error speaking the translation: {}", e);
                return SpeechOutcome::Failed(e.to_string());
            }
        };

        let mut failure = None;
        while let Some(event) = synthesis.recv().await {
            match event {
                SynthesisEvent::Started => {
                    inner.update(|view, events| set_speaker(view, events, IndicatorState::Active))
                }
                SynthesisEvent::Error(e) => {
                    error!("Error speaking the translation: {}", e);
                    failure = Some(e);
                }
                SynthesisEvent::Ended => break,
            }
        }

        inner.update(|view, events| set_speaker(view, events, IndicatorState::Idle));

        match failure {
            Some(e) => SpeechOutcome::Failed(e),
            None => SpeechOutcome::Spoken,
        }
    }

    /// Copy the output to the clipboard
    pub async fn copy_translation(&self) -> CopyOutcome {
        let Some(clipboard) = self.inner.capabilities.clipboard.clone() else {
            info!("Clipboard is not available");
            return CopyOutcome::Unavailable;
        };

        let view = self.inner.view();
        if !view.has_output() {
            return CopyOutcome::NothingToCopy;
        }

        match clipboard.write_text(&view.output).await {
            Ok(()) => {
                info!("Translation copied to the clipboard");
                CopyOutcome::Copied
            }
            Err(e) => {
                error!("Error copying the translation: {}", e);
                CopyOutcome::Failed(e)
            }
        }
    }
}
