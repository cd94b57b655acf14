//! Line input of the interactive terminal session.
//!
//! A plain line replaces the source text. A line starting with `:` is a
//! command; `::` escapes a literal leading colon.

use thiserror::Error;

use crate::catalog;

pub const HELP: &str = "\
Type text to translate it. Commands:
  :source CODE   set the source language
  :target CODE   set the target language
  :swap          swap languages and texts
  :clear         clear both texts
  :copy          copy the translation to the clipboard
  :speak         read the translation aloud
  :say           read the source text aloud
  :theme         toggle dark mode
  :languages     list supported languages
  :help          show this help
  :quit          leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// New source text
    Text(String),
    Source(String),
    Target(String),
    Swap,
    Clear,
    Copy,
    SpeakTranslation,
    SpeakSource,
    Theme,
    Languages,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command ':{0}'. Type :help for the list of commands.")]
    Unknown(String),

    #[error(":{0} needs a language code")]
    MissingLanguage(&'static str),

    #[error("Unsupported language '{0}'. Supported: {1}")]
    UnsupportedLanguage(String, String),
}

/// Comma separated list of the catalog codes
pub fn supported_codes() -> String {
    catalog::languages()
        .iter()
        .map(|l| l.code)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Lowercased catalog code, or an error listing the valid ones
pub fn language_code(raw: &str) -> Result<String, CommandError> {
    let code = raw.trim().to_lowercase();
    if catalog::is_supported(&code) {
        Ok(code)
    } else {
        Err(CommandError::UnsupportedLanguage(raw.trim().to_string(), supported_codes()))
    }
}

pub fn parse(line: &str) -> Result<Input, CommandError> {
    let line = line.trim_end_matches(['\r', '\n']);

    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Input::Text(line.to_string()));
    };
    if rest.starts_with(':') {
        return Ok(Input::Text(rest.to_string()));
    }

    let mut parts = rest.trim().splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

    match name.as_str() {
        "source" | "from" => match arg {
            Some(code) => Ok(Input::Source(language_code(code)?)),
            None => Err(CommandError::MissingLanguage("source")),
        },
        "target" | "to" => match arg {
            Some(code) => Ok(Input::Target(language_code(code)?)),
            None => Err(CommandError::MissingLanguage("target")),
        },
        "swap" => Ok(Input::Swap),
        "clear" => Ok(Input::Clear),
        "copy" => Ok(Input::Copy),
        "speak" => Ok(Input::SpeakTranslation),
        "say" => Ok(Input::SpeakSource),
        "theme" => Ok(Input::Theme),
        "languages" | "langs" => Ok(Input::Languages),
        "help" | "h" | "?" => Ok(Input::Help),
        "quit" | "q" | "exit" => Ok(Input::Quit),
        _ => Err(CommandError::Unknown(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line_is_text() {
        assert_eq!(parse("Hello world\n"), Ok(Input::Text("Hello world".to_string())));
        assert_eq!(parse(""), Ok(Input::Text(String::new())));
        assert_eq!(parse("  indented"), Ok(Input::Text("  indented".to_string())));
    }

    #[test]
    fn test_double_colon_escapes() {
        assert_eq!(parse("::swap"), Ok(Input::Text(":swap".to_string())));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse(":swap"), Ok(Input::Swap));
        assert_eq!(parse(":clear"), Ok(Input::Clear));
        assert_eq!(parse(":copy"), Ok(Input::Copy));
        assert_eq!(parse(":speak"), Ok(Input::SpeakTranslation));
        assert_eq!(parse(":say"), Ok(Input::SpeakSource));
        assert_eq!(parse(":theme"), Ok(Input::Theme));
        assert_eq!(parse(":languages"), Ok(Input::Languages));
        assert_eq!(parse(":HELP"), Ok(Input::Help));
        assert_eq!(parse(":q\r\n"), Ok(Input::Quit));
    }

    #[test]
    fn test_language_commands() {
        assert_eq!(parse(":target FR"), Ok(Input::Target("fr".to_string())));
        assert_eq!(parse(":source   de "), Ok(Input::Source("de".to_string())));
        assert_eq!(parse(":to ja"), Ok(Input::Target("ja".to_string())));
    }

    #[test]
    fn test_language_command_errors() {
        assert_eq!(parse(":target"), Err(CommandError::MissingLanguage("target")));
        match parse(":source xx") {
            Err(CommandError::UnsupportedLanguage(code, list)) => {
                assert_eq!(code, "xx");
                assert!(list.starts_with("en, "));
            }
            other => panic!("Expected UnsupportedLanguage, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_command() {
        let err = parse(":frobnicate").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown command ':frobnicate'. Type :help for the list of commands."
        );
    }
}
