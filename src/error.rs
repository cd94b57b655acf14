use serde::Serialize;
use thiserror::Error;

/// Shown when the service failed without saying why
pub const GENERIC_FAILURE_MESSAGE: &str = "Translation failed. Please try again.";

/// Errors surfaced to the user by the translation controller.
///
/// None of these are fatal. Each renders as exactly one message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum AppError {
    #[error("{0}")]
    Service(String),

    #[error("Source and target languages cannot be the same")]
    SameLanguage,

    #[error("Nothing to swap. Please enter some text first.")]
    NothingToSwap,

    #[error("Failed to copy to clipboard")]
    Clipboard,

    #[error("Text-to-speech is not supported on this system")]
    SpeechUnsupported,
}

impl AppError {
    /// Service error carrying the provider's message, or the generic one when blank
    pub fn service(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            AppError::Service(GENERIC_FAILURE_MESSAGE.to_string())
        } else {
            AppError::Service(message)
        }
    }

    /// Whether this error clears itself after the notice timeout
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::NothingToSwap | AppError::SpeechUnsupported)
    }
}
