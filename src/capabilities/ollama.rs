/*!
 * Translation and detection capabilities backed by a local Ollama server.
 *
 * - availability: the pair must be in the supported list; the pair is
 *   `Downloadable` until the configured model shows up in `/api/tags`
 * - creation: pulls the model through `/api/pull`, streaming progress
 * - translate / detect: single non-streamed `/api/generate` calls
 */

use async_trait::async_trait;
use log::{debug, error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::OllamaConfig;
use crate::capabilities::{
    Availability, DetectionCandidate, DetectionCapability, DetectorEngine, ProgressCallback,
    TranslationCapability, TranslatorEngine,
};
use crate::errors::CapabilityError;
use crate::language_utils::{self, UNDETERMINED};

static LANGUAGE_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([a-z]{2,3})\b").expect("valid language code regex")
});

/// A reply made of a single tag such as `pt` or `pt-BR`
static LANGUAGE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z]{2,3}(?:[-_][a-z0-9]{2,4})?$").expect("valid language tag regex")
});

/// Generate request for the Ollama API
#[derive(Debug, Serialize)]
struct GenerationRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct GenerationOptions {
    temperature: f32,
}

/// Generation response from the Ollama API
#[derive(Debug, Deserialize)]
struct GenerationResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

#[derive(Debug, Serialize)]
struct PullRequest<'a> {
    model: &'a str,
    stream: bool,
}

/// One line of the streamed `/api/pull` response
#[derive(Debug, Deserialize)]
struct PullStatus {
    #[serde(default)]
    status: String,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    completed: Option<u64>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the Ollama API
#[derive(Debug)]
pub struct OllamaClient {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    model: String,
    temperature: f32,
}

impl OllamaClient {
    pub fn new(config: &OllamaConfig) -> Self {
        Self {
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_else(|e| {
                    warn!(
                        "Failed to build HTTP client with a {}s timeout, using defaults: {}",
                        config.timeout_secs, e
                    );
                    Client::new()
                }),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Whether the configured model is present on the server
    pub async fn has_model(&self) -> Result<bool, CapabilityError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CapabilityError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CapabilityError::ApiError {
                status_code: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| CapabilityError::ParseError(e.to_string()))?;

        let tagged = format!("{}:latest", self.model);
        Ok(tags
            .models
            .iter()
            .any(|m| m.name == self.model || m.name == tagged))
    }

    /// Pull the configured model, reporting progress as a fraction
    pub async fn pull(&self, on_progress: &ProgressCallback) -> Result<(), CapabilityError> {
        info!("Pulling Ollama model '{}'", self.model);

        let url = format!("{}/api/pull", self.base_url);
        let mut response = self
            .client
            .post(&url)
            .timeout(Duration::from_secs(60 * 60))
            .json(&PullRequest {
                model: &self.model,
                stream: true,
            })
            .send()
            .await
            .map_err(|e| CapabilityError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CapabilityError::Rejected(format!(
                "Model pull failed with status {}",
                status.as_u16()
            )));
        }

        let mut buffer: Vec<u8> = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| CapabilityError::ConnectionError(e.to_string()))?
        {
            buffer.extend_from_slice(&chunk);

            while let Some(newline) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=newline).collect();
                Self::handle_pull_line(&line, on_progress)?;
            }
        }

        if !buffer.is_empty() {
            Self::handle_pull_line(&buffer, on_progress)?;
        }

        Ok(())
    }

    fn handle_pull_line(line: &[u8], on_progress: &ProgressCallback) -> Result<(), CapabilityError> {
        let line = String::from_utf8_lossy(line);
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        let status: PullStatus = serde_json::from_str(line)
            .map_err(|e| CapabilityError::ParseError(format!("{}: {}", e, line)))?;

        if let Some(error) = status.error {
            return Err(CapabilityError::Rejected(error));
        }

        if let (Some(total), Some(completed)) = (status.total, status.completed) {
            if total > 0 {
                on_progress(completed as f64 / total as f64);
            }
        } else {
            debug!("Ollama pull: {}", status.status);
        }

        Ok(())
    }

    /// Run one non-streamed generation
    pub async fn generate(&self, prompt: String, system: String) -> Result<String, CapabilityError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerationRequest {
            model: self.model.clone(),
            prompt,
            system: Some(system),
            options: Some(GenerationOptions {
                temperature: self.temperature,
            }),
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| CapabilityError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("Ollama API error {}: {}", status.as_u16(), message);
            return Err(CapabilityError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let generated: GenerationResponse = response
            .json()
            .await
            .map_err(|e| CapabilityError::ParseError(e.to_string()))?;

        Ok(generated.response)
    }
}

fn language_label(code: &str) -> String {
    language_utils::get_language_name(code).unwrap_or_else(|_| code.to_string())
}

/// Translation capability over an Ollama model
#[derive(Debug)]
pub struct OllamaTranslation {
    client: Arc<OllamaClient>,
    supported_languages: Vec<String>,
}

impl OllamaTranslation {
    pub fn new(client: Arc<OllamaClient>, supported_languages: Vec<String>) -> Self {
        Self {
            client,
            supported_languages,
        }
    }
}

#[async_trait]
impl TranslationCapability for OllamaTranslation {
    async fn availability(&self, source: &str, target: &str) -> Result<Availability, CapabilityError> {
        if !language_utils::is_supported(source, &self.supported_languages)
            || !language_utils::is_supported(target, &self.supported_languages)
        {
            return Ok(Availability::Unavailable);
        }

        if self.client.has_model().await? {
            Ok(Availability::Available)
        } else {
            Ok(Availability::Downloadable)
        }
    }

    async fn create(
        &self,
        source: &str,
        target: &str,
        on_progress: ProgressCallback,
    ) -> Result<Arc<dyn TranslatorEngine>, CapabilityError> {
        if !self.client.has_model().await? {
            self.client.pull(&on_progress).await?;
        }

        debug!("Created Ollama translator {}-{} ({})", source, target, self.client.model());

        Ok(Arc::new(OllamaTranslator {
            client: Arc::clone(&self.client),
            source: source.to_string(),
            target: target.to_string(),
        }))
    }
}

/// Translator engine bound to one language pair
#[derive(Debug)]
pub struct OllamaTranslator {
    client: Arc<OllamaClient>,
    source: String,
    target: String,
}

impl OllamaTranslator {
    fn system_prompt(&self) -> String {
        format!(
            "You are a professional translator. Translate the user's text from {} to {}. \
             Preserve formatting and maintain the original meaning and tone. \
             Reply with the translation only.",
            language_label(&self.source),
            language_label(&self.target)
        )
    }
}

#[async_trait]
impl TranslatorEngine for OllamaTranslator {
    async fn translate(&self, text: &str) -> Result<String, CapabilityError> {
        let translation = self
            .client
            .generate(text.to_string(), self.system_prompt())
            .await?;

        Ok(translation.trim().to_string())
    }
}

/// Detection capability over an Ollama model
#[derive(Debug)]
pub struct OllamaDetection {
    client: Arc<OllamaClient>,
}

impl OllamaDetection {
    pub fn new(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DetectionCapability for OllamaDetection {
    async fn create(&self, expected_languages: &[String]) -> Result<Arc<dyn DetectorEngine>, CapabilityError> {
        Ok(Arc::new(OllamaDetector {
            client: Arc::clone(&self.client),
            expected_languages: expected_languages.to_vec(),
        }))
    }
}

/// Detector asking the model for an ISO 639-1 code
#[derive(Debug)]
pub struct OllamaDetector {
    client: Arc<OllamaClient>,
    expected_languages: Vec<String>,
}

fn normalize_reply_code(code: &str) -> Option<String> {
    if code.eq_ignore_ascii_case(UNDETERMINED) {
        return Some(UNDETERMINED.to_string());
    }
    language_utils::normalize_to_part1(code).ok()
}

/// Extract a language code from a model reply.
///
/// A reply that is a bare tag is taken as is. In prose the answer usually
/// comes last, so tokens are scanned from the end, preferring expected
/// languages over any other code.
fn parse_detection(reply: &str, expected_languages: &[String]) -> DetectionCandidate {
    let trimmed = reply.trim().trim_matches(|c: char| !c.is_alphanumeric());
    if LANGUAGE_TAG.is_match(trimmed) {
        if let Some(code) = normalize_reply_code(trimmed) {
            return DetectionCandidate::new(code, 1.0);
        }
    }

    let codes: Vec<String> = LANGUAGE_CODE
        .captures_iter(reply)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
        .collect();

    let code = codes
        .iter()
        .rev()
        .find(|code| language_utils::is_supported(code, expected_languages))
        .cloned()
        .or_else(|| codes.iter().rev().find_map(|code| normalize_reply_code(code)))
        .unwrap_or_else(|| UNDETERMINED.to_string());

    DetectionCandidate::new(code, 1.0)
}

#[async_trait]
impl DetectorEngine for OllamaDetector {
    async fn detect(&self, text: &str) -> Result<Vec<DetectionCandidate>, CapabilityError> {
        let system = format!(
            "Identify the language of the user's text. Answer with its ISO 639-1 code only. \
             Expected languages: {}. Answer '{}' if you are not sure.",
            self.expected_languages.join(", "),
            UNDETERMINED
        );

        let reply = self.client.generate(text.to_string(), system).await?;
        Ok(vec![parse_detection(&reply, &self.expected_languages)])
    }
}
