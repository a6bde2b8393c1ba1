/*!
 * Capability contracts consumed by the translation session.
 *
 * The session never talks to a translation model, a speech engine or the
 * clipboard directly. It goes through the traits below, so hosts can plug in:
 * - `ollama`: translation and detection over a local Ollama server
 * - `clipboard`: the system clipboard (behind the `clipboard` feature)
 * - `mock`: scripted capabilities for tests and offline runs
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::app_config::{CapabilityBackend, Config};
use crate::errors::CapabilityError;

pub mod clipboard;
pub mod mock;
pub mod ollama;

/// Availability of a language pair on the translation capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// An engine can be created immediately
    Available,
    /// The pair is not supported at all
    Unavailable,
    /// The pair is supported once a model has been downloaded
    Downloadable,
}

/// Receives model download progress as a fraction in `0.0..=1.0`
pub type ProgressCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// A translator bound to one language pair
#[async_trait]
pub trait TranslatorEngine: Send + Sync + Debug {
    /// Translate `text` from the engine's source to its target language
    async fn translate(&self, text: &str) -> Result<String, CapabilityError>;
}

/// Host capability that builds translator engines
#[async_trait]
pub trait TranslationCapability: Send + Sync + Debug {
    /// Check whether `source -> target` can be translated
    async fn availability(&self, source: &str, target: &str) -> Result<Availability, CapabilityError>;

    /// Build an engine for `source -> target`.
    ///
    /// Implementations that need a one-time download report it through `on_progress`.
    async fn create(
        &self,
        source: &str,
        target: &str,
        on_progress: ProgressCallback,
    ) -> Result<Arc<dyn TranslatorEngine>, CapabilityError>;
}

/// One ranked guess returned by a detector
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionCandidate {
    /// Language code, or `und` when the detector has no confident guess
    pub language: String,
    /// Confidence in `0.0..=1.0`
    pub confidence: f32,
}

impl DetectionCandidate {
    pub fn new(language: impl Into<String>, confidence: f32) -> Self {
        Self {
            language: language.into(),
            confidence,
        }
    }
}

/// A language detector
#[async_trait]
pub trait DetectorEngine: Send + Sync + Debug {
    /// Detect the language of `text`, best guess first
    async fn detect(&self, text: &str) -> Result<Vec<DetectionCandidate>, CapabilityError>;
}

/// Host capability that builds language detectors
#[async_trait]
pub trait DetectionCapability: Send + Sync + Debug {
    /// Build a detector expecting input in one of `expected_languages`
    async fn create(&self, expected_languages: &[String]) -> Result<Arc<dyn DetectorEngine>, CapabilityError>;
}

/// Settings for one speech recognition session
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionOptions {
    /// Full locale code, e.g. `es-ES`
    pub language: String,
    /// Keep listening after the first result
    pub continuous: bool,
    /// Emit partial transcripts
    pub interim_results: bool,
}

/// Notifications emitted while recognizing speech
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    Started,
    Transcript(String),
    Error(String),
    Ended,
}

/// Host speech-to-text capability
#[async_trait]
pub trait SpeechRecognizer: Send + Sync + Debug {
    /// Start a recognition session; events arrive on the returned channel until it closes
    async fn start(
        &self,
        options: RecognitionOptions,
    ) -> Result<mpsc::UnboundedReceiver<RecognitionEvent>, CapabilityError>;
}

/// Text to be spoken
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// Full locale code, e.g. `en-US`
    pub language: String,
    pub rate: f32,
}

/// Notifications emitted while speaking
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisEvent {
    Started,
    Ended,
    Error(String),
}

/// Host text-to-speech capability
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + Debug {
    /// Speak an utterance; events arrive on the returned channel until it closes
    async fn speak(&self, utterance: Utterance) -> Result<mpsc::UnboundedReceiver<SynthesisEvent>, CapabilityError>;
}

/// Host clipboard capability
#[async_trait]
pub trait Clipboard: Send + Sync + Debug {
    async fn write_text(&self, text: &str) -> Result<(), CapabilityError>;
}

/// The set of capabilities the host provides; any of them may be absent
#[derive(Debug, Clone, Default)]
pub struct Capabilities {
    pub translation: Option<Arc<dyn TranslationCapability>>,
    pub detection: Option<Arc<dyn DetectionCapability>>,
    pub speech_recognition: Option<Arc<dyn SpeechRecognizer>>,
    pub speech_synthesis: Option<Arc<dyn SpeechSynthesizer>>,
    pub clipboard: Option<Arc<dyn Clipboard>>,
}

impl Capabilities {
    /// A host without any capability
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_translation(mut self, capability: Arc<dyn TranslationCapability>) -> Self {
        self.translation = Some(capability);
        self
    }

    pub fn with_detection(mut self, capability: Arc<dyn DetectionCapability>) -> Self {
        self.detection = Some(capability);
        self
    }

    pub fn with_speech_recognition(mut self, capability: Arc<dyn SpeechRecognizer>) -> Self {
        self.speech_recognition = Some(capability);
        self
    }

    pub fn with_speech_synthesis(mut self, capability: Arc<dyn SpeechSynthesizer>) -> Self {
        self.speech_synthesis = Some(capability);
        self
    }

    pub fn with_clipboard(mut self, capability: Arc<dyn Clipboard>) -> Self {
        self.clipboard = Some(capability);
        self
    }

    /// Both translation and detection are required for full support
    pub fn has_translation_support(&self) -> bool {
        self.translation.is_some() && self.detection.is_some()
    }

    /// Build the capabilities selected by the configuration
    pub fn from_config(config: &Config) -> Self {
        let mut capabilities = match config.backend {
            CapabilityBackend::Ollama => {
                let client = Arc::new(ollama::OllamaClient::new(&config.ollama));
                Self::none()
                    .with_translation(Arc::new(ollama::OllamaTranslation::new(
                        client.clone(),
                        config.supported_languages.clone(),
                    )))
                    .with_detection(Arc::new(ollama::OllamaDetection::new(client)))
            }
            CapabilityBackend::Disabled => Self::none(),
        };

        capabilities.clipboard = clipboard::system_clipboard();
        capabilities
    }
}
