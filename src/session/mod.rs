/*!
 * Interactive translation session.
 *
 * This module provides:
 * - `Session`, the orchestrator every front-end event goes through
 * - The view snapshot and change events a front-end renders
 * - Voice input, voice output and clipboard adapters
 */

pub mod manager;
pub mod models;
mod voice;

// Re-export main types
pub use manager::Session;
pub use models::{
    CopyOutcome, IndicatorState, OutputKind, RecognitionOutcome, SpeechOutcome, Translation, TranslationOutcome,
    ViewEvent, ViewState,
};
