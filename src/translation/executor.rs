/*!
 * Execution of one translation request.
 *
 * The executor runs the capability steps in order: availability check,
 * engine acquisition (which may download a model and report progress) and
 * the translate call. It knows nothing about the session state; deciding
 * whether a result is still wanted is the caller's job.
 */

use log::{debug, info};
use std::sync::Arc;

use super::{EngineCache, TranslationRequest, truncate_text};
use crate::capabilities::{Availability, ProgressCallback, TranslationCapability};
use crate::errors::TranslationError;

/// Runs translation requests against the translation capability
#[derive(Debug)]
pub struct TranslationExecutor {
    capability: Option<Arc<dyn TranslationCapability>>,
    cache: Arc<EngineCache>,
}

impl TranslationExecutor {
    pub fn new(capability: Option<Arc<dyn TranslationCapability>>, cache: Arc<EngineCache>) -> Self {
        Self { capability, cache }
    }

    /// Translate `request.text` along `request.pair`.
    ///
    /// Identical source and target return the text unchanged without touching
    /// the capability.
    pub async fn execute(
        &self,
        request: &TranslationRequest,
        on_progress: ProgressCallback,
    ) -> Result<String, TranslationError> {
        let pair = &request.pair;

        if pair.is_identity() {
            debug!("Identity pair {}, skipping translation", pair);
            return Ok(request.text.clone());
        }

        let capability = self
            .capability
            .as_deref()
            .ok_or(TranslationError::CapabilityAbsent("translation"))?;

        let availability = capability
            .availability(&pair.source, &pair.target)
            .await
            .map_err(TranslationError::AvailabilityCheck)?;

        match availability {
            Availability::Unavailable => {
                return Err(TranslationError::UnavailableLanguagePair {
                    source_language: pair.source.clone(),
                    target_language: pair.target.clone(),
                });
            }
            Availability::Downloadable => info!("Model for {} must be downloaded first", pair),
            Availability::Available => {}
        }

        let engine = self.cache.acquire_translator(capability, pair, on_progress).await?;

        let translated = engine
            .translate(&request.text)
            .await
            .map_err(TranslationError::TranslateCall)?;

        debug!(
            "Translated {} '{}' -> '{}'",
            pair,
            truncate_text(&request.text, 30),
            truncate_text(&translated, 30)
        );

        Ok(translated)
    }
}
