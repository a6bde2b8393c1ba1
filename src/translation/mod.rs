/*!
 * Translation orchestration for the interactive session.
 *
 * This module contains the pieces the session composes into its pipeline:
 *
 * - `debounce`: coalescing bursts of input edits into one trigger
 * - `resolver`: resolving the `auto` source selection through detection
 * - `engine_cache`: the single live translator and detector engines
 * - `executor`: availability check, engine acquisition and the translate call
 */

use std::fmt;

// Re-export main types for easier usage
pub use self::debounce::Debouncer;
pub use self::engine_cache::EngineCache;
pub use self::executor::TranslationExecutor;
pub use self::resolver::{Detection, LanguageResolver, Resolution};

// Submodules
pub mod debounce;
pub mod engine_cache;
pub mod executor;
pub mod resolver;

/// Ordered (source, target) pair identifying a translation direction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Whether translating along this pair is the identity
    pub fn is_identity(&self) -> bool {
        self.source == self.target
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}

/// One triggered translation: trimmed text and resolved languages
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    pub text: String,
    pub pair: LanguagePair,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pair: LanguagePair::new(source, target),
        }
    }
}

/// Truncate text to a maximum number of characters with ellipsis
pub(crate) fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}
