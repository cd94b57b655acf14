use thiserror::Error;

/// User-facing message for transport failures and non-success HTTP statuses.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

/// User-facing message for responses without a translated text.
pub const TRANSLATION_FAILED_MESSAGE: &str = "Translation failed";

/// Error types for the machine translation providers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MtError {
    /// Transport failure or non-success HTTP status
    #[error("Network error: {0}")]
    NetworkError(String),
    /// The endpoint answered but the body had no usable translation
    #[error("Translation error: {0}")]
    TranslationError(String),
    /// A language code that is not a well-formed locale identifier
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),
    /// Provider construction problems (bad endpoint, client build failure)
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl MtError {
    /// The message shown to the user for this failure.
    ///
    /// Details stay in the `Display` output, which is what gets logged.
    pub fn user_message(&self) -> String {
        match self {
            MtError::NetworkError(_) => NETWORK_ERROR_MESSAGE.to_string(),
            MtError::TranslationError(_) => TRANSLATION_FAILED_MESSAGE.to_string(),
            MtError::InvalidLocale(msg) | MtError::ConfigError(msg) => msg.clone(),
        }
    }
}

impl From<reqwest::Error> for MtError {
    fn from(err: reqwest::Error) -> Self {
        MtError::NetworkError(err.to_string())
    }
}

/// Result type for MT operations
pub type MtResult<T> = Result<T, MtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_hides_details_from_user() {
        let err = MtError::NetworkError("connection refused (os error 111)".to_string());
        assert_eq!(err.user_message(), NETWORK_ERROR_MESSAGE);
        assert!(err.to_string().contains("os error 111"));
    }

    #[test]
    fn test_missing_field_maps_to_translation_failed() {
        let err = MtError::TranslationError("missing 'translatedText'".to_string());
        assert_eq!(err.user_message(), "Translation failed");
    }

    #[test]
    fn test_invalid_locale_message_is_passed_through() {
        let err = MtError::InvalidLocale("Invalid locale code: x@y".to_string());
        assert_eq!(err.user_message(), "Invalid locale code: x@y");
    }
}
