//! Machine Translation trait and utilities
//!
//! This module defines the `MachineTranslator` trait for provider abstraction,
//! so the controller can drive a real endpoint (LibreTranslate) or a
//! deterministic mock without knowing which one it talks to.
//!
//! # Example
//!
//! ```ignore
//! use neural_translate::mt::{MachineTranslator, LibreTranslateProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = LibreTranslateProvider::from_env()?;
//!     let result = provider.translate("Hello, world!", "en", "es").await?;
//!     println!("{}", result); // "¡Hola, mundo!"
//!     Ok(())
//! }
//! ```

use crate::mt::error::{MtError, MtResult};
use async_trait::async_trait;
use icu_locale::Locale;

/// Generic trait for machine translation providers
///
/// Implementations of this trait handle the actual translation work,
/// whether through an HTTP API or deterministic logic (Mock).
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate a single text string from source to target language
    ///
    /// # Arguments
    ///
    /// * `text` - The text to translate
    /// * `source_locale` - Source language code (e.g., "en")
    /// * `target_locale` - Target language code (e.g., "es")
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The translated text
    /// * `Err(MtError)` - If the endpoint is unreachable or answers without a translation
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String>;

    /// Get the name of this translation provider
    ///
    /// Used for logging to identify which provider handled a translation.
    fn provider_name(&self) -> &str;
}

/// Normalize a locale code by stripping region information
///
/// - `en-US` → `en`
/// - `zh-Hans` → `zh`
/// - `en` → `en` (unchanged)
pub fn normalize_locale(locale: &str) -> String {
    locale.split(['-', '_']).next().unwrap_or(locale).to_lowercase()
}

/// Validate that a locale code is a well-formed locale identifier
///
/// # Example
///
/// ```ignore
/// validate_locale("en")?; // OK
/// validate_locale("en-US")?; // OK
/// validate_locale("invalid@code").unwrap_err(); // Error
/// ```
pub fn validate_locale(locale: &str) -> MtResult<()> {
    if locale.trim().is_empty() {
        return Err(MtError::InvalidLocale("Locale code is empty".to_string()));
    }

    locale
        .parse::<Locale>()
        .map(|_| ())
        .map_err(|e| MtError::InvalidLocale(format!("Invalid locale code '{}': {}", locale, e)))
}
