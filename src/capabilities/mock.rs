/*!
 * Mock capability implementations for testing.
 *
 * This module provides scripted capabilities that simulate different behaviors:
 * - `MockTranslation::working()` - Every pair is available and translates
 * - `MockTranslation::unavailable()` - Every pair is reported unavailable
 * - `MockTranslation::failing()` - Engines are created but every call fails
 * - `MockDetection::fixed("es")` - Always detects the same language
 *
 * Every mock counts its calls so tests can assert which steps ran.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::capabilities::{
    Availability, Clipboard, DetectionCandidate, DetectionCapability, DetectorEngine, ProgressCallback,
    RecognitionEvent, RecognitionOptions, SpeechRecognizer, SpeechSynthesizer, SynthesisEvent,
    TranslationCapability, TranslatorEngine, Utterance,
};
use crate::errors::CapabilityError;
use crate::language_utils::UNDETERMINED;

/// Behavior mode for the mock translation capability
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Every pair is available and translates
    Working,
    /// Every pair needs a download first, reported in `ticks` progress steps
    Downloadable { ticks: usize },
    /// Every pair is reported unavailable
    Unavailable,
    /// The availability check itself fails
    AvailabilityFails,
    /// Engine creation is rejected
    CreationFails,
    /// Engines are created but every translate call fails
    Failing,
}

/// Shared call counters for a mock translation capability and its engines
#[derive(Debug, Default)]
pub struct CallCounters {
    pub availability: AtomicUsize,
    pub create: AtomicUsize,
    pub translate: AtomicUsize,
}

impl CallCounters {
    pub fn availability_calls(&self) -> usize {
        self.availability.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create.load(Ordering::SeqCst)
    }

    pub fn translate_calls(&self) -> usize {
        self.translate.load(Ordering::SeqCst)
    }
}

/// Mock translation capability
#[derive(Debug, Clone)]
pub struct MockTranslation {
    /// Behavior mode
    behavior: MockBehavior,
    /// Counters shared with every clone and every engine created
    counters: Arc<CallCounters>,
    /// Pairs reported unavailable regardless of the behavior
    unavailable_pairs: Vec<(String, String)>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&str, &str, &str) -> String>,
    /// Simulated translate latency per input text (optional)
    latency: Option<fn(&str) -> u64>,
}

impl MockTranslation {
    /// Create a new mock capability with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            counters: Arc::new(CallCounters::default()),
            unavailable_pairs: Vec::new(),
            custom_response: None,
            latency: None,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn downloadable(ticks: usize) -> Self {
        Self::new(MockBehavior::Downloadable { ticks })
    }

    pub fn unavailable() -> Self {
        Self::new(MockBehavior::Unavailable)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Report one specific pair as unavailable
    pub fn without_pair(mut self, source: &str, target: &str) -> Self {
        self.unavailable_pairs.push((source.to_string(), target.to_string()));
        self
    }

    /// Set a custom response generator taking `(text, source, target)`
    pub fn with_custom_response(mut self, generator: fn(&str, &str, &str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Delay each translate call by `latency(text)` milliseconds
    pub fn with_latency(mut self, latency: fn(&str) -> u64) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Call counters shared by this capability and its engines
    pub fn counters(&self) -> Arc<CallCounters> {
        Arc::clone(&self.counters)
    }

    /// Default rendering of a translation
    pub fn render(text: &str, target: &str) -> String {
        format!("[{}] {}", target, text)
    }
}

#[async_trait]
impl TranslationCapability for MockTranslation {
    async fn availability(&self, source: &str, target: &str) -> Result<Availability, CapabilityError> {
        self.counters.availability.fetch_add(1, Ordering::SeqCst);

        if self
            .unavailable_pairs
            .iter()
            .any(|(s, t)| s == source && t == target)
        {
            return Ok(Availability::Unavailable);
        }

        match self.behavior {
            MockBehavior::Unavailable => Ok(Availability::Unavailable),
            MockBehavior::AvailabilityFails => Err(CapabilityError::CallFailed(
                "Simulated availability failure".to_string(),
            )),
            MockBehavior::Downloadable { .. } => Ok(Availability::Downloadable),
            _ => Ok(Availability::Available),
        }
    }

    async fn create(
        &self,
        source: &str,
        target: &str,
        on_progress: ProgressCallback,
    ) -> Result<Arc<dyn TranslatorEngine>, CapabilityError> {
        self.counters.create.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::CreationFails => {
                return Err(CapabilityError::Rejected(format!(
                    "Simulated creation failure for {}-{}",
                    source, target
                )));
            }
            MockBehavior::Downloadable { ticks } => {
                for tick in 1..=ticks {
                    tokio::task::yield_now().await;
                    on_progress(tick as f64 / ticks as f64);
                }
            }
            _ => {}
        }

        Ok(Arc::new(MockTranslatorEngine {
            source: source.to_string(),
            target: target.to_string(),
            failing: self.behavior == MockBehavior::Failing,
            counters: Arc::clone(&self.counters),
            custom_response: self.custom_response,
            latency: self.latency,
        }))
    }
}

/// Engine produced by `MockTranslation`
#[derive(Debug)]
pub struct MockTranslatorEngine {
    pub source: String,
    pub target: String,
    failing: bool,
    counters: Arc<CallCounters>,
    custom_response: Option<fn(&str, &str, &str) -> String>,
    latency: Option<fn(&str) -> u64>,
}

#[async_trait]
impl TranslatorEngine for MockTranslatorEngine {
    async fn translate(&self, text: &str) -> Result<String, CapabilityError> {
        self.counters.translate.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(Duration::from_millis(latency(text))).await;
        }

        if self.failing {
            return Err(CapabilityError::CallFailed("Simulated translate failure".to_string()));
        }

        Ok(match self.custom_response {
            Some(generator) => generator(text, &self.source, &self.target),
            None => MockTranslation::render(text, &self.target),
        })
    }
}

/// Behavior mode for the mock detection capability
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionMode {
    /// Always detect the same language
    Fixed(String),
    /// Always report the undetermined sentinel
    Undetermined,
    /// Return an empty ranking
    Empty,
    /// Detector creation is rejected
    CreationFails,
    /// Detector is created but every call fails
    Failing,
}

/// Mock detection capability
#[derive(Debug, Clone)]
pub struct MockDetection {
    mode: DetectionMode,
    create_calls: Arc<AtomicUsize>,
    detect_calls: Arc<AtomicUsize>,
    expected: Arc<Mutex<Vec<String>>>,
}

impl MockDetection {
    pub fn new(mode: DetectionMode) -> Self {
        Self {
            mode,
            create_calls: Arc::new(AtomicUsize::new(0)),
            detect_calls: Arc::new(AtomicUsize::new(0)),
            expected: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn fixed(language: &str) -> Self {
        Self::new(DetectionMode::Fixed(language.to_string()))
    }

    pub fn undetermined() -> Self {
        Self::new(DetectionMode::Undetermined)
    }

    pub fn failing() -> Self {
        Self::new(DetectionMode::Failing)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn detect_calls(&self) -> usize {
        self.detect_calls.load(Ordering::SeqCst)
    }

    /// Languages passed to the last `create` call
    pub fn expected_languages(&self) -> Vec<String> {
        self.expected.lock().clone()
    }
}

#[async_trait]
impl DetectionCapability for MockDetection {
    async fn create(&self, expected_languages: &[String]) -> Result<Arc<dyn DetectorEngine>, CapabilityError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        *self.expected.lock() = expected_languages.to_vec();

        if self.mode == DetectionMode::CreationFails {
            return Err(CapabilityError::Rejected("Simulated detector creation failure".to_string()));
        }

        Ok(Arc::new(MockDetector {
            mode: self.mode.clone(),
            detect_calls: Arc::clone(&self.detect_calls),
        }))
    }
}

/// Detector produced by `MockDetection`
#[derive(Debug)]
pub struct MockDetector {
    mode: DetectionMode,
    detect_calls: Arc<AtomicUsize>,
}

#[async_trait]
impl DetectorEngine for MockDetector {
    async fn detect(&self, _text: &str) -> Result<Vec<DetectionCandidate>, CapabilityError> {
        self.detect_calls.fetch_add(1, Ordering::SeqCst);

        match &self.mode {
            DetectionMode::Fixed(language) => Ok(vec![
                DetectionCandidate::new(language.clone(), 0.9),
                DetectionCandidate::new(UNDETERMINED, 0.1),
            ]),
            DetectionMode::Undetermined => Ok(vec![DetectionCandidate::new(UNDETERMINED, 1.0)]),
            DetectionMode::Empty => Ok(Vec::new()),
            DetectionMode::CreationFails | DetectionMode::Failing => Err(CapabilityError::CallFailed(
                "Simulated detection failure".to_string(),
            )),
        }
    }
}

/// Mock speech recognizer emitting a scripted event sequence
#[derive(Debug, Clone)]
pub struct MockSpeechRecognizer {
    events: Vec<RecognitionEvent>,
    start_error: Option<String>,
    last_options: Arc<Mutex<Option<RecognitionOptions>>>,
}

impl MockSpeechRecognizer {
    /// Recognize `transcript` once: start, transcript, end
    pub fn hearing(transcript: &str) -> Self {
        Self::scripted(vec![
            RecognitionEvent::Started,
            RecognitionEvent::Transcript(transcript.to_string()),
            RecognitionEvent::Ended,
        ])
    }

    /// Fail with `error`: start, error, end
    pub fn failing(error: &str) -> Self {
        Self::scripted(vec![
            RecognitionEvent::Started,
            RecognitionEvent::Error(error.to_string()),
            RecognitionEvent::Ended,
        ])
    }

    /// Refuse to start a session with `error`
    pub fn refusing(error: &str) -> Self {
        Self {
            start_error: Some(error.to_string()),
            ..Self::scripted(Vec::new())
        }
    }

    pub fn scripted(events: Vec<RecognitionEvent>) -> Self {
        Self {
            events,
            start_error: None,
            last_options: Arc::new(Mutex::new(None)),
        }
    }

    /// Options passed to the last `start` call
    pub fn last_options(&self) -> Option<RecognitionOptions> {
        self.last_options.lock().clone()
    }
}

#[async_trait]
impl SpeechRecognizer for MockSpeechRecognizer {
    async fn start(
        &self,
        options: RecognitionOptions,
    ) -> Result<mpsc::UnboundedReceiver<RecognitionEvent>, CapabilityError> {
        *self.last_options.lock() = Some(options);
        if let Some(error) = &self.start_error {
            return Err(CapabilityError::CallFailed(error.clone()));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        for event in self.events.iter().cloned() {
            let _ = tx.send(event);
        }
        Ok(rx)
    }
}

/// Mock speech synthesizer recording every utterance
#[derive(Debug, Clone, Default)]
pub struct MockSpeechSynthesizer {
    error: Option<String>,
    spoken: Arc<Mutex<Vec<Utterance>>>,
}

impl MockSpeechSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a synthesis error between start and end
    pub fn failing(error: &str) -> Self {
        Self {
            error: Some(error.to_string()),
            spoken: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSpeechSynthesizer {
    async fn speak(&self, utterance: Utterance) -> Result<mpsc::UnboundedReceiver<SynthesisEvent>, CapabilityError> {
        self.spoken.lock().push(utterance);

        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(SynthesisEvent::Started);
        if let Some(error) = &self.error {
            let _ = tx.send(SynthesisEvent::Error(error.clone()));
        }
        let _ = tx.send(SynthesisEvent::Ended);
        Ok(rx)
    }
}

/// Mock clipboard keeping the last written text
#[derive(Debug, Clone, Default)]
pub struct MockClipboard {
    failing: bool,
    contents: Arc<Mutex<Option<String>>>,
}

impl MockClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            contents: Arc::new(Mutex::new(None)),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }
}

#[async_trait]
impl Clipboard for MockClipboard {
    async fn write_text(&self, text: &str) -> Result<(), CapabilityError> {
        if self.failing {
            return Err(CapabilityError::CallFailed("Simulated clipboard failure".to_string()));
        }

        *self.contents.lock() = Some(text.to_string());
        Ok(())
    }
}
