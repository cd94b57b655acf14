/// Machine Translation Module
///
/// This module provides the translation backends driven by the controller.
/// A provider turns one text and a language pair into one translated text;
/// everything about timing, ordering and display lives in the controller.
///
/// # Overview
///
/// 1. **MT Trait** - `MachineTranslator`, the async seam every backend implements
/// 2. **LibreTranslate Provider** - HTTP provider for LibreTranslate-compatible endpoints
/// 3. **Mock Provider** - Deterministic translator with call recording and simulated latency
/// 4. **Errors** - `MtError` with the user-facing message for each failure kind
///
/// # Example
///
/// ```ignore
/// use neural_translate::mt::{MachineTranslator, LibreTranslateProvider};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let provider = LibreTranslateProvider::new("http://localhost:5000", None)?;
///     let translated = provider.translate("Good morning", "en", "fr").await?;
///     println!("{}", translated);
///     Ok(())
/// }
/// ```
pub mod error;
pub mod libre_translate;
pub mod mock;
pub mod translator;

#[cfg(test)]
mod integration_tests;

pub use error::{MtError, MtResult, NETWORK_ERROR_MESSAGE, TRANSLATION_FAILED_MESSAGE};
pub use libre_translate::{DEFAULT_ENDPOINT, LibreTranslateProvider};
pub use mock::{MockCall, MockMode, MockTranslator};
pub use translator::{MachineTranslator, normalize_locale, validate_locale};
