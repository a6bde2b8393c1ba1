/*!
 * Engine caching for the translation session.
 *
 * At most one translator engine is alive at a time, keyed by the language
 * pair that produced it, plus at most one detector. Asking for a different
 * pair replaces the translator; a failed creation leaves the cached one as is.
 */

use log::debug;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::LanguagePair;
use crate::capabilities::{DetectionCapability, DetectorEngine, ProgressCallback, TranslationCapability, TranslatorEngine};
use crate::errors::{CapabilityError, TranslationError};

/// Translator engine together with the pair it was created for
#[derive(Debug, Clone)]
struct CachedTranslator {
    pair: LanguagePair,
    engine: Arc<dyn TranslatorEngine>,
}

/// Owner of the live translator and detector engines
#[derive(Debug, Default)]
pub struct EngineCache {
    translator: Mutex<Option<CachedTranslator>>,
    detector: Mutex<Option<Arc<dyn DetectorEngine>>>,
}

impl EngineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the translator for `pair`, creating it when nothing is cached or
    /// the cached engine was built for another pair.
    pub async fn acquire_translator(
        &self,
        capability: &dyn TranslationCapability,
        pair: &LanguagePair,
        on_progress: ProgressCallback,
    ) -> Result<Arc<dyn TranslatorEngine>, TranslationError> {
        let mut cached = self.translator.lock().await;

        if let Some(existing) = cached.as_ref().filter(|c| &c.pair == pair) {
            debug!("Reusing translator for {}", pair);
            return Ok(Arc::clone(&existing.engine));
        }

        debug!("Creating translator for {}", pair);
        let engine = capability
            .create(&pair.source, &pair.target, on_progress)
            .await
            .map_err(TranslationError::EngineCreation)?;

        *cached = Some(CachedTranslator {
            pair: pair.clone(),
            engine: Arc::clone(&engine),
        });

        Ok(engine)
    }

    /// Return the shared detector, creating it on first use
    pub async fn acquire_detector(
        &self,
        capability: &dyn DetectionCapability,
        expected_languages: &[String],
    ) -> Result<Arc<dyn DetectorEngine>, CapabilityError> {
        let mut cached = self.detector.lock().await;

        if let Some(detector) = cached.as_ref() {
            return Ok(Arc::clone(detector));
        }

        debug!("Creating language detector for {} languages", expected_languages.len());
        let detector = capability.create(expected_languages).await?;
        *cached = Some(Arc::clone(&detector));

        Ok(detector)
    }

    /// The pair of the cached translator, if any
    pub async fn cached_pair(&self) -> Option<LanguagePair> {
        self.translator.lock().await.as_ref().map(|c| c.pair.clone())
    }

    pub async fn has_detector(&self) -> bool {
        self.detector.lock().await.is_some()
    }
}
