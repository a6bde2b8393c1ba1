/*!
 * Language code utilities.
 *
 * Sentinels, the supported language table, locale mapping for the voice
 * capabilities and ISO 639 normalization of codes returned by detectors.
 */

use anyhow::{Result, anyhow};
use isolang::Language;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Source selector value meaning "detect at translate time"
pub const AUTO: &str = "auto";

/// Detector result meaning "no confident language guess"
pub const UNDETERMINED: &str = "und";

/// Source language used when detection is impossible
pub const DEFAULT_SOURCE_LANGUAGE: &str = "es";

/// Target language selected at startup
pub const DEFAULT_TARGET_LANGUAGE: &str = "en";

/// Languages offered by the selectors and expected by the detector
pub const SUPPORTED_LANGUAGES: [&str; 9] = ["en", "es", "fr", "de", "it", "pt", "zh", "ja", "ru"];

static FULL_LANGUAGE_CODES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("es", "es-ES"),
        ("fr", "fr-FR"),
        ("de", "de-DE"),
        ("it", "it-IT"),
        ("pt", "pt-PT"),
        ("zh", "zh-CN"),
        ("ja", "ja-JP"),
        ("ru", "ru-RU"),
        ("en", "en-US"),
    ])
});

/// ISO 639-2/B codes that differ from their ISO 639-2/T counterpart
const PART2B_TO_PART2T: [(&str, &str); 18] = [
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Whether `code` is the auto-detect sentinel
pub fn is_auto(code: &str) -> bool {
    code.eq_ignore_ascii_case(AUTO)
}

/// Whether `code` is one of `supported`
pub fn is_supported(code: &str, supported: &[String]) -> bool {
    supported.iter().any(|s| s == code)
}

/// Map a short code to the locale used by the speech capabilities.
///
/// Unknown codes fall back to the locale of `default_code`, then to that of
/// the built-in default source language.
pub fn full_language_code(code: &str, default_code: &str) -> &'static str {
    FULL_LANGUAGE_CODES
        .get(code)
        .or_else(|| FULL_LANGUAGE_CODES.get(default_code))
        .or_else(|| FULL_LANGUAGE_CODES.get(DEFAULT_SOURCE_LANGUAGE))
        .copied()
        .unwrap_or("es-ES")
}

/// Validate that a code is a known ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<()> {
    normalize_to_part1(code).map(|_| ())
}

/// Normalize a language code to ISO 639-1 (2-letter) format.
///
/// Accepts 2-letter codes, ISO 639-2/T and /B codes and BCP 47 tags such as
/// `pt-BR`; region subtags are dropped. Codes without a 2-letter form are
/// returned in ISO 639-2/T form.
pub fn normalize_to_part1(code: &str) -> Result<String> {
    let normalized = code.trim().to_lowercase();
    let primary = normalized
        .split(['-', '_'])
        .next()
        .unwrap_or_default();

    match primary.len() {
        2 => {
            if Language::from_639_1(primary).is_some() {
                return Ok(primary.to_string());
            }
        }
        3 => {
            let part2t = PART2B_TO_PART2T
                .iter()
                .find(|(b, _)| *b == primary)
                .map(|(_, t)| *t)
                .unwrap_or(primary);

            if let Some(lang) = Language::from_639_3(part2t) {
                return Ok(lang
                    .to_639_1()
                    .map(str::to_string)
                    .unwrap_or_else(|| part2t.to_string()));
            }
        }
        _ => {}
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Check if two language codes represent the same language
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_to_part1(code1), normalize_to_part1(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Get the English display name for a language code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part1(code)?;
    let lang = if normalized.len() == 2 {
        Language::from_639_1(&normalized)
    } else {
        Language::from_639_3(&normalized)
    }
    .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}
