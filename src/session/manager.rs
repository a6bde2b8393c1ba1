/*!
 * Translation session.
 *
 * The session owns the view state, the engine cache and the debounce timer,
 * and runs every trigger path (typing, selector changes, swap, voice input)
 * through the same pipeline:
 *
 * 1. Trim the input; an empty input clears the output
 * 2. Show the translating status
 * 3. Resolve the source language, detecting it when the selection is `auto`
 * 4. Execute the request and write the result or a failure message
 *
 * Every trigger takes a sequence number. Writes to the output, including
 * download progress, only land while that number is still the latest one
 * issued; anything older is dropped as `Superseded`.
 */

use log::{debug, error, info, warn};
use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::broadcast;

use crate::app_config::Config;
use crate::capabilities::{Capabilities, ProgressCallback};
use crate::errors::{LanguageError, TranslationError};
use crate::language_utils;
use crate::translation::{
    Debouncer, Detection, EngineCache, LanguageResolver, TranslationExecutor, TranslationRequest, truncate_text,
};

use super::models::{OutputKind, Translation, TranslationOutcome, ViewEvent, ViewState};

/// Capacity of the view event channel
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Mutable state guarded by the session lock
#[derive(Debug)]
pub(super) struct SessionState {
    pub(super) view: ViewState,
    /// Sequence number of the most recently issued request
    latest_request: u64,
}

#[derive(Debug)]
pub(super) struct SessionInner {
    pub(super) config: Config,
    pub(super) capabilities: Capabilities,
    pub(super) resolver: LanguageResolver,
    executor: TranslationExecutor,
    debouncer: Debouncer,
    state: RwLock<SessionState>,
    events: broadcast::Sender<ViewEvent>,
}

impl SessionInner {
    /// Apply `mutate` to the view and publish the events it produced
    pub(super) fn update<F>(&self, mutate: F)
    where
        F: FnOnce(&mut ViewState, &mut Vec<ViewEvent>),
    {
        let mut events = Vec::new();
        {
            let mut state = self.state.write();
            mutate(&mut state.view, &mut events);
        }
        self.publish(events);
    }

    /// Like `update`, but only while `request` is the latest request
    fn update_if_latest<F>(&self, request: u64, mutate: F) -> bool
    where
        F: FnOnce(&mut ViewState, &mut Vec<ViewEvent>),
    {
        let mut events = Vec::new();
        let applied = {
            let mut state = self.state.write();
            if state.latest_request == request {
                mutate(&mut state.view, &mut events);
                true
            } else {
                false
            }
        };
        self.publish(events);
        applied
    }

    /// Issue a new sequence number, invalidating every request in flight
    fn next_request(&self) -> u64 {
        let mut state = self.state.write();
        state.latest_request += 1;
        state.latest_request
    }

    fn publish(&self, events: Vec<ViewEvent>) {
        for event in events {
            // No subscriber is fine
            let _ = self.events.send(event);
        }
    }

    pub(super) fn view(&self) -> ViewState {
        self.state.read().view.clone()
    }
}

/// Replace the input and refresh the character counter
pub(super) fn write_input(view: &mut ViewState, events: &mut Vec<ViewEvent>, text: &str, char_limit: usize) {
    view.input = text.to_string();
    events.push(ViewEvent::InputChanged {
        text: view.input.clone(),
    });
    refresh_char_count(view, events, char_limit);
}

fn refresh_char_count(view: &mut ViewState, events: &mut Vec<ViewEvent>, char_limit: usize) {
    view.char_count = view.input.chars().count();
    view.over_limit = view.char_count >= char_limit;
    events.push(ViewEvent::CharCountChanged {
        count: view.char_count,
        over_limit: view.over_limit,
    });
}

fn write_output(view: &mut ViewState, events: &mut Vec<ViewEvent>, text: &str, kind: OutputKind) {
    view.output = text.to_string();
    view.output_kind = kind;
    events.push(ViewEvent::OutputChanged {
        text: view.output.clone(),
        kind,
    });
}

/// Orchestrates translations for one interactive front-end.
///
/// Cheap to clone; clones share the same state.
#[derive(Debug, Clone)]
pub struct Session {
    pub(super) inner: Arc<SessionInner>,
}

impl Session {
    /// Create a session with the default configuration
    pub fn new(capabilities: Capabilities) -> Self {
        Self::with_config(&Config::default(), capabilities)
    }

    /// Create a session from a validated configuration
    pub fn with_config(config: &Config, capabilities: Capabilities) -> Self {
        let cache = Arc::new(EngineCache::new());
        let resolver = LanguageResolver::new(
            capabilities.detection.clone(),
            Arc::clone(&cache),
            config.default_source_language.clone(),
            config.supported_languages.clone(),
        );
        let executor = TranslationExecutor::new(capabilities.translation.clone(), cache);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let view = ViewState::new(
            config.source_language.clone(),
            config.target_language.clone(),
            config.messages.placeholder.clone(),
        );

        if capabilities.has_translation_support() {
            info!("Translation and language detection capabilities available");
        } else {
            warn!("{}", config.messages.capability_missing);
        }

        Self {
            inner: Arc::new(SessionInner {
                config: config.clone(),
                capabilities,
                resolver,
                executor,
                debouncer: Debouncer::new(Duration::from_millis(config.debounce_ms)),
                state: RwLock::new(SessionState {
                    view,
                    latest_request: 0,
                }),
                events,
            }),
        }
    }

    /// Whether both translation and detection capabilities are present
    pub fn has_capability_support(&self) -> bool {
        self.inner.capabilities.has_translation_support()
    }

    /// Snapshot of the current view
    pub fn view(&self) -> ViewState {
        self.inner.view()
    }

    /// Receive every view change from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.inner.events.subscribe()
    }

    /// Replace the input text without triggering a translation
    pub fn set_input(&self, text: &str) {
        let char_limit = self.inner.config.char_limit;
        self.inner
            .update(|view, events| write_input(view, events, text, char_limit));
    }

    /// Replace the input text and translate once the input has been quiet
    /// for the debounce period.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_input_changed(&self, text: &str) {
        self.set_input(text);

        let session = Arc::downgrade(&self.inner);
        self.inner.debouncer.schedule(move || Self::translate_weak(session));
    }

    async fn translate_weak(session: Weak<SessionInner>) {
        if let Some(inner) = session.upgrade() {
            Session { inner }.translate().await;
        }
    }

    /// Replace the input text and translate it immediately
    pub async fn translate_text(&self, text: &str) -> TranslationOutcome {
        self.set_input(text);
        self.translate().await
    }

    /// Translate the current input with the current selections
    pub async fn translate(&self) -> TranslationOutcome {
        let inner = &self.inner;
        let messages = &inner.config.messages;

        let (request_id, text, selection, target) = {
            let mut state = inner.state.write();
            state.latest_request += 1;
            (
                state.latest_request,
                state.view.input.trim().to_string(),
                state.view.source_language.clone(),
                state.view.target_language.clone(),
            )
        };

        if text.is_empty() {
            let cleared = inner.update_if_latest(request_id, |view, events| {
                write_output(view, events, "", OutputKind::Cleared)
            });
            return if cleared {
                TranslationOutcome::Cleared
            } else {
                TranslationOutcome::Superseded
            };
        }

        debug!(
            "Request #{}: '{}' ({} -> {})",
            request_id,
            truncate_text(&text, 30),
            selection,
            target
        );

        inner.update_if_latest(request_id, |view, events| {
            write_output(view, events, &messages.translating, OutputKind::Status)
        });

        let resolution = inner.resolver.resolve_source(&selection, &text).await;

        if let Some(Detection::Detected(code)) = &resolution.detection {
            let name = language_utils::get_language_name(code).unwrap_or_else(|_| code.clone());
            let label = messages.detected_label(&name);
            inner.update_if_latest(request_id, |view, events| {
                view.auto_label = Some(label.clone());
                events.push(ViewEvent::AutoLabelChanged { label });
            });
        }

        let request = TranslationRequest::new(text, resolution.language, target);
        let result = inner
            .executor
            .execute(&request, self.progress_reporter(request_id))
            .await;

        match result {
            Ok(translated) => {
                let written = inner.update_if_latest(request_id, |view, events| {
                    write_output(view, events, &translated, OutputKind::Result)
                });
                if !written {
                    debug!("Request #{} superseded, dropping result", request_id);
                    return TranslationOutcome::Superseded;
                }

                TranslationOutcome::Translated(Translation {
                    text: translated,
                    source_language: request.pair.source,
                    target_language: request.pair.target,
                    detection: resolution.detection,
                })
            }
            Err(e) => {
                error!("Error translating {}: {}", request.pair, e);

                let message = self.failure_message(&e);
                let written = inner.update_if_latest(request_id, |view, events| {
                    write_output(view, events, &message, OutputKind::Error)
                });
                if !written {
                    return TranslationOutcome::Superseded;
                }

                TranslationOutcome::Failed { error: e, message }
            }
        }
    }

    /// Download progress writer bound to one request
    fn progress_reporter(&self, request_id: u64) -> ProgressCallback {
        let session = Arc::downgrade(&self.inner);
        Arc::new(move |fraction: f64| {
            let Some(inner) = session.upgrade() else {
                return;
            };
            let text = inner.config.messages.downloading(fraction);
            inner.update_if_latest(request_id, |view, events| {
                write_output(view, events, &text, OutputKind::Progress);
                events.push(ViewEvent::DownloadProgress {
                    fraction: fraction.clamp(0.0, 1.0),
                });
            });
        })
    }

    /// User-visible message for a failed translation
    fn failure_message(&self, error: &TranslationError) -> String {
        let messages = &self.inner.config.messages;

        if !self.has_capability_support() || matches!(error, TranslationError::CapabilityAbsent(_)) {
            messages.capability_missing.clone()
        } else if error.is_pair_unavailable() {
            messages.pair_unavailable.clone()
        } else {
            messages.translation_error.clone()
        }
    }

    /// Change the source selector and translate immediately
    pub async fn select_source_language(&self, code: &str) -> Result<TranslationOutcome, LanguageError> {
        let code = code.trim().to_lowercase();
        if !language_utils::is_auto(&code)
            && !language_utils::is_supported(&code, &self.inner.config.supported_languages)
        {
            return Err(LanguageError::Unsupported(code));
        }

        self.inner.update(|view, events| {
            view.source_language = code;
            events.push(languages_changed(view));
        });

        Ok(self.translate_now().await)
    }

    /// Change the target selector and translate immediately
    pub async fn select_target_language(&self, code: &str) -> Result<TranslationOutcome, LanguageError> {
        let code = code.trim().to_lowercase();
        if language_utils::is_auto(&code) {
            return Err(LanguageError::AutoTarget);
        }
        if !language_utils::is_supported(&code, &self.inner.config.supported_languages) {
            return Err(LanguageError::Unsupported(code));
        }

        self.inner.update(|view, events| {
            view.target_language = code;
            events.push(languages_changed(view));
        });

        Ok(self.translate_now().await)
    }

    /// Translate without waiting for the debounce period
    pub(super) async fn translate_now(&self) -> TranslationOutcome {
        if self.inner.debouncer.cancel() {
            debug!("Pending debounced translation replaced by an immediate one");
        }
        self.translate().await
    }

    /// Run a still-waiting debounced translation right away.
    ///
    /// Returns `None` when nothing was pending.
    pub async fn flush_pending(&self) -> Option<TranslationOutcome> {
        if !self.inner.debouncer.cancel() {
            return None;
        }
        debug!("Flushing pending debounced translation");
        Some(self.translate().await)
    }

    /// Exchange source and target, moving the output into the input.
    ///
    /// An `auto` source is first resolved by detecting the input language. The
    /// source selector keeps the resolved language afterwards.
    pub async fn swap_languages(&self) -> TranslationOutcome {
        let (selection, text) = {
            let view = self.inner.view();
            (view.source_language, view.input.trim().to_string())
        };

        let source = self.resolve_concrete_source(&selection, &text).await;
        let char_limit = self.inner.config.char_limit;

        self.inner.next_request();
        self.inner.update(|view, events| {
            view.source_language = std::mem::replace(&mut view.target_language, source);
            events.push(languages_changed(view));

            let moved = std::mem::take(&mut view.output);
            write_input(view, events, &moved, char_limit);
            write_output(view, events, "", OutputKind::Cleared);
        });

        let view = self.view();
        info!(
            "Swapped languages to {} -> {}",
            view.source_language, view.target_language
        );

        if view.input.trim().is_empty() {
            return TranslationOutcome::Cleared;
        }

        self.translate_now().await
    }

    /// Concrete source language for swap and voice input.
    ///
    /// An empty text falls back to the default source without detection.
    pub(super) async fn resolve_concrete_source(&self, selection: &str, text: &str) -> String {
        if !language_utils::is_auto(selection) {
            return selection.to_string();
        }

        if text.is_empty() {
            return self.inner.resolver.default_source().to_string();
        }

        self.inner.resolver.detect_language(text).await.0
    }
}

fn languages_changed(view: &ViewState) -> ViewEvent {
    ViewEvent::LanguagesChanged {
        source: view.source_language.clone(),
        target: view.target_language.clone(),
    }
}
