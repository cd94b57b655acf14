//! The fixed list of languages offered by the widget.
//!
//! The catalog drives both the language selectors and the locale tags handed
//! to the speech engine. Order is display order.

use serde::Serialize;

/// One selectable language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    /// Two-letter code sent to the translation endpoint
    pub code: &'static str,
    /// Display name for selectors
    pub name: &'static str,
    /// Locale tag used for speech synthesis
    pub speech_locale: &'static str,
}

const fn lang(code: &'static str, name: &'static str, speech_locale: &'static str) -> Language {
    Language {
        code,
        name,
        speech_locale,
    }
}

/// All supported languages, in selector order
pub const LANGUAGES: [Language; 15] = [
    lang("en", "English", "en-US"),
    lang("es", "Spanish", "es-ES"),
    lang("fr", "French", "fr-FR"),
    lang("de", "German", "de-DE"),
    lang("it", "Italian", "it-IT"),
    lang("pt", "Portuguese", "pt-PT"),
    lang("ru", "Russian", "ru-RU"),
    lang("ja", "Japanese", "ja-JP"),
    lang("ko", "Korean", "ko-KR"),
    lang("zh", "Chinese", "zh-CN"),
    lang("ar", "Arabic", "ar-SA"),
    lang("hi", "Hindi", "hi-IN"),
    lang("tr", "Turkish", "tr-TR"),
    lang("nl", "Dutch", "nl-NL"),
    lang("pl", "Polish", "pl-PL"),
];

pub fn languages() -> &'static [Language] {
    &LANGUAGES
}

/// Look up a catalog entry by its two-letter code
pub fn find(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code == code)
}

pub fn is_supported(code: &str) -> bool {
    find(code).is_some()
}

/// Locale tag for speech, or the raw code when the catalog has no mapping
pub fn speech_locale(code: &str) -> &str {
    find(code).map(|l| l.speech_locale).unwrap_or(code)
}

/// Display name for a code, falling back to the code itself
pub fn display_name(code: &str) -> &str {
    find(code).map(|l| l.name).unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mt::translator::validate_locale;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_fifteen_unique_codes() {
        let codes: HashSet<_> = languages().iter().map(|l| l.code).collect();
        assert_eq!(codes.len(), 15);
        assert_eq!(languages()[0].code, "en");
        assert_eq!(languages()[14].code, "pl");
    }

    #[test]
    fn test_speech_locale_mapping() {
        assert_eq!(speech_locale("en"), "en-US");
        assert_eq!(speech_locale("zh"), "zh-CN");
        assert_eq!(speech_locale("pt"), "pt-PT");
    }

    #[test]
    fn test_speech_locale_falls_back_to_raw_code() {
        assert_eq!(speech_locale("sv"), "sv");
    }

    #[test]
    fn test_every_speech_locale_is_well_formed() {
        for language in languages() {
            assert!(
                validate_locale(language.speech_locale).is_ok(),
                "{} has a malformed locale tag",
                language.code
            );
            assert!(language.speech_locale.starts_with(language.code));
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("ja"), "Japanese");
        assert_eq!(display_name("xx"), "xx");
        assert!(is_supported("nl"));
        assert!(!is_supported("sv"));
    }
}
