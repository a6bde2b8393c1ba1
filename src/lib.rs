/*!
 * # Lingo - interactive translator
 *
 * A Rust library that turns a stream of rapid user edits into a correctly
 * sequenced series of asynchronous translations.
 *
 * ## Features
 *
 * - Debounced translation while typing
 * - Automatic source language detection with a safe fallback
 * - A single cached translator engine per language pair, with download progress
 * - Swapping languages, voice input and output, clipboard copy
 * - Stale results never overwrite newer ones
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `capabilities`: Contracts for the host services and their implementations:
 *   - `capabilities::ollama`: Translation and detection over a local Ollama server
 *   - `capabilities::clipboard`: System clipboard
 *   - `capabilities::mock`: Scripted capabilities for tests
 * - `translation`: The orchestration pipeline:
 *   - `translation::debounce`: Input debouncing
 *   - `translation::resolver`: Source language resolution
 *   - `translation::engine_cache`: Translator and detector engine caching
 *   - `translation::executor`: Availability check and translate call
 * - `session`: The session tying the pipeline to the view state
 * - `app_controller`: Interactive prompt controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod capabilities;
pub mod errors;
pub mod language_utils;
pub mod session;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use capabilities::Capabilities;
pub use errors::{AppError, CapabilityError, LanguageError, TranslationError};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part1};
pub use session::{Session, TranslationOutcome, ViewEvent, ViewState};
