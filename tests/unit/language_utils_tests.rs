/*!
 * Tests for language code utilities
 */

use lingo::language_utils::{
    self, AUTO, DEFAULT_SOURCE_LANGUAGE, SUPPORTED_LANGUAGES, full_language_code, is_supported,
};

fn supported() -> Vec<String> {
    SUPPORTED_LANGUAGES.iter().map(|c| c.to_string()).collect()
}

/// Every supported language has a display name and a locale of its own
#[test]
fn test_supportedLanguages_shouldHaveNamesAndLocales() {
    for code in SUPPORTED_LANGUAGES {
        assert!(language_utils::get_language_name(code).is_ok(), "no name for {}", code);
        assert!(
            full_language_code(code, DEFAULT_SOURCE_LANGUAGE).starts_with(code),
            "unexpected locale {} for {}",
            full_language_code(code, DEFAULT_SOURCE_LANGUAGE),
            code
        );
    }
}

#[test]
fn test_isSupported_withSentinelAndUnknownCodes_shouldBeFalse() {
    let supported = supported();

    assert!(is_supported("ja", &supported));
    assert!(!is_supported(AUTO, &supported));
    assert!(!is_supported("und", &supported));
    assert!(!is_supported("ko", &supported));
}

#[test]
fn test_defaultSourceLanguage_shouldBeSupported() {
    assert!(is_supported(DEFAULT_SOURCE_LANGUAGE, &supported()));
}

#[test]
fn test_languageCodesMatch_withDifferentForms_shouldMatch() {
    assert!(language_utils::language_codes_match("fr", "fre"));
    assert!(language_utils::language_codes_match("zh-CN", "zho"));
    assert!(!language_utils::language_codes_match("en", "es"));
    assert!(!language_utils::language_codes_match("en", "invalid"));
}

#[test]
fn test_validateLanguageCode_shouldRejectGarbage() {
    assert!(language_utils::validate_language_code("pt").is_ok());
    assert!(language_utils::validate_language_code("12").is_err());
}
