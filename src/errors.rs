/*!
 * Error types for the lingo application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors reported by an external capability (translator, detector, speech, clipboard)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CapabilityError {
    /// The capability refused to build an engine
    #[error("Capability rejected creation: {0}")]
    Rejected(String),

    /// The capability accepted the call but failed while performing it
    #[error("Capability call failed: {0}")]
    CallFailed(String),

    /// Error establishing or maintaining a connection to the backing service
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error when parsing a response from the backing service fails
    #[error("Failed to parse capability response: {0}")]
    ParseError(String),

    /// Error returned by the backing service itself
    #[error("Service responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the service
        message: String,
    },
}

/// Errors that can occur along the translation path
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// The selected language pair is not supported by the translation capability
    #[error("Translation unavailable for {source_language} -> {target_language}")]
    UnavailableLanguagePair {
        /// Resolved source language
        source_language: String,
        /// Target language
        target_language: String,
    },

    /// The availability check itself failed
    #[error("Availability check failed: {0}")]
    AvailabilityCheck(CapabilityError),

    /// The capability refused to build a translator or detector
    #[error("Engine creation failed: {0}")]
    EngineCreation(CapabilityError),

    /// The engine was created but failed mid-call
    #[error("Translate call failed: {0}")]
    TranslateCall(CapabilityError),

    /// The host lacks a required capability entirely
    #[error("Capability absent: {0}")]
    CapabilityAbsent(&'static str),
}

impl TranslationError {
    /// Whether this error should be rendered as the pair-unavailable message
    pub fn is_pair_unavailable(&self) -> bool {
        matches!(
            self,
            Self::UnavailableLanguagePair { .. } | Self::AvailabilityCheck(_)
        )
    }
}

/// Errors raised when a selector receives an invalid language value
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LanguageError {
    /// The code is not part of the supported language set
    #[error("Unsupported language: {0}")]
    Unsupported(String),

    /// The auto-detect sentinel is only valid as a source language
    #[error("'auto' cannot be used as the target language")]
    AutoTarget,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a capability
    #[error("Capability error: {0}")]
    Capability(#[from] CapabilityError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from a language selection
    #[error("Language error: {0}")]
    Language(#[from] LanguageError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
