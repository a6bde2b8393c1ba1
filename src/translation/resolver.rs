/*!
 * Source language resolution.
 *
 * A concrete source selection is used as is. The `auto` selection is resolved
 * by detection; every detection problem (capability absent, creation or call
 * failure, empty ranking, undetermined or unsupported result) falls back to
 * the configured default source language and is only logged.
 */

use log::{debug, error, warn};
use std::sync::Arc;

use super::EngineCache;
use super::truncate_text;
use crate::capabilities::DetectionCapability;
use crate::language_utils::{self, UNDETERMINED};

/// What the detector said about a text
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// A supported language was detected
    Detected(String),
    /// The detector had no confident guess
    Undetermined,
    /// The detector answered with a language outside the supported set
    Unsupported(String),
    /// Detection could not run or failed
    Failed,
}

/// Effective source language for one request
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Language the request will be translated from
    pub language: String,
    /// Detection outcome when the selection was `auto`
    pub detection: Option<Detection>,
}

/// Resolves the source selection, detecting when it is `auto`
#[derive(Debug)]
pub struct LanguageResolver {
    detection: Option<Arc<dyn DetectionCapability>>,
    cache: Arc<EngineCache>,
    default_source: String,
    supported_languages: Vec<String>,
}

impl LanguageResolver {
    pub fn new(
        detection: Option<Arc<dyn DetectionCapability>>,
        cache: Arc<EngineCache>,
        default_source: impl Into<String>,
        supported_languages: Vec<String>,
    ) -> Self {
        Self {
            detection,
            cache,
            default_source: default_source.into(),
            supported_languages,
        }
    }

    pub fn default_source(&self) -> &str {
        &self.default_source
    }

    /// Resolve `selection` for `text`
    pub async fn resolve_source(&self, selection: &str, text: &str) -> Resolution {
        if !language_utils::is_auto(selection) {
            return Resolution {
                language: selection.to_string(),
                detection: None,
            };
        }

        let (language, detection) = self.detect_language(text).await;
        Resolution {
            language,
            detection: Some(detection),
        }
    }

    /// Detect the language of `text`.
    ///
    /// Returns the language to translate from together with what the detector
    /// reported. Never fails: problems resolve to the default source language.
    pub async fn detect_language(&self, text: &str) -> (String, Detection) {
        let detection = self.run_detection(text).await;

        let language = match &detection {
            Detection::Detected(code) => code.clone(),
            Detection::Unsupported(code) => {
                warn!(
                    "Detected language '{}' is not supported, using '{}'",
                    code, self.default_source
                );
                self.default_source.clone()
            }
            Detection::Undetermined | Detection::Failed => self.default_source.clone(),
        };

        debug!(
            "Resolved source '{}' for '{}' ({:?})",
            language,
            truncate_text(text, 30),
            detection
        );

        (language, detection)
    }

    async fn run_detection(&self, text: &str) -> Detection {
        let Some(capability) = self.detection.as_deref() else {
            warn!("Language detection capability is absent");
            return Detection::Failed;
        };

        let detector = match self
            .cache
            .acquire_detector(capability, &self.supported_languages)
            .await
        {
            Ok(detector) => detector,
            Err(e) => {
                error!("Error creating the language detector: {}", e);
                return Detection::Failed;
            }
        };

        let ranking = match detector.detect(text).await {
            Ok(ranking) => ranking,
            Err(e) => {
                error!("Error detecting the language: {}", e);
                return Detection::Failed;
            }
        };

        let Some(best) = ranking.first() else {
            return Detection::Undetermined;
        };

        if best.language == UNDETERMINED {
            return Detection::Undetermined;
        }

        let code = language_utils::normalize_to_part1(&best.language)
            .unwrap_or_else(|_| best.language.clone());

        if language_utils::is_supported(&code, &self.supported_languages) {
            Detection::Detected(code)
        } else {
            Detection::Unsupported(code)
        }
    }
}
