/*!
 * Session-specific models.
 *
 * `ViewState` is the snapshot of every slot a front-end renders. Each change
 * to it is also published as a `ViewEvent`, and every session operation
 * reports what happened through one of the outcome enums below.
 */

use serde::Serialize;

use crate::errors::{CapabilityError, TranslationError};
use crate::translation::Detection;

/// State of a microphone or speaker indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorState {
    #[default]
    Idle,
    Active,
}

/// What the output slot currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Nothing
    #[default]
    Cleared,
    /// A transient status such as "Translating..."
    Status,
    /// Model download progress
    Progress,
    /// A translation result
    Result,
    /// A user-visible failure message
    Error,
}

/// Snapshot of the front-end slots owned by the session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    /// Input text as entered
    pub input: String,
    /// Output text
    pub output: String,
    /// Kind of the current output
    pub output_kind: OutputKind,
    /// Source selector value, a language code or `auto`
    pub source_language: String,
    /// Target selector value
    pub target_language: String,
    /// Label of the `auto` option once a language has been detected
    pub auto_label: Option<String>,
    /// Number of characters in the input
    pub char_count: usize,
    /// Whether the character count reached the limit
    pub over_limit: bool,
    /// Input placeholder
    pub placeholder: String,
    pub microphone: IndicatorState,
    pub speaker: IndicatorState,
}

impl ViewState {
    pub fn new(source_language: impl Into<String>, target_language: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            input: String::new(),
            output: String::new(),
            output_kind: OutputKind::Cleared,
            source_language: source_language.into(),
            target_language: target_language.into(),
            auto_label: None,
            char_count: 0,
            over_limit: false,
            placeholder: placeholder.into(),
            microphone: IndicatorState::Idle,
            speaker: IndicatorState::Idle,
        }
    }

    /// Whether the output holds a non-empty text
    pub fn has_output(&self) -> bool {
        !self.output.trim().is_empty()
    }
}

/// One change to the view, in the order it was applied
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ViewEvent {
    InputChanged { text: String },
    OutputChanged { text: String, kind: OutputKind },
    DownloadProgress { fraction: f64 },
    CharCountChanged { count: usize, over_limit: bool },
    LanguagesChanged { source: String, target: String },
    AutoLabelChanged { label: String },
    PlaceholderChanged { text: String },
    MicrophoneChanged { state: IndicatorState },
    SpeakerChanged { state: IndicatorState },
}

/// A successful translation
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub text: String,
    /// Language the text was translated from, after resolution
    pub source_language: String,
    pub target_language: String,
    /// Detection outcome when the source selection was `auto`
    pub detection: Option<Detection>,
}

impl Translation {
    /// Whether the text was returned unchanged because source equals target
    pub fn is_identity(&self) -> bool {
        self.source_language == self.target_language
    }
}

/// Result of one translate trigger
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationOutcome {
    /// The trimmed input was empty and the output was cleared
    Cleared,
    /// The translation was written to the output
    Translated(Translation),
    /// The request failed; `message` was written to the output
    Failed {
        error: TranslationError,
        message: String,
    },
    /// A newer request was issued meanwhile; nothing was written
    Superseded,
}

impl TranslationOutcome {
    pub fn translated_text(&self) -> Option<&str> {
        match self {
            Self::Translated(translation) => Some(&translation.text),
            _ => None,
        }
    }
}

/// Result of a speech recognition session
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionOutcome {
    /// No speech recognition capability
    Unavailable,
    /// A transcript was recognized and translated
    Transcribed {
        transcript: String,
        translation: TranslationOutcome,
    },
    /// The session ended without a transcript
    NoSpeech,
    /// The recognizer could not start or reported an error
    Failed(String),
}

/// Result of speaking the translation
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechOutcome {
    /// No speech synthesis capability
    Unavailable,
    /// The output is empty
    NothingToSpeak,
    Spoken,
    Failed(String),
}

/// Result of copying the translation
#[derive(Debug, Clone, PartialEq)]
pub enum CopyOutcome {
    /// No clipboard capability
    Unavailable,
    /// The output is empty
    NothingToCopy,
    Copied,
    Failed(CapabilityError),
}
