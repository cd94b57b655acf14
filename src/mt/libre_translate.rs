//! LibreTranslate API provider for machine translation
//!
//! Posts `{q, source, target, format: "text"}` to `<endpoint>/translate` and
//! reads `translatedText` from the JSON answer.
//!
//! # Configuration
//!
//! `from_env()` reads `LIBRETRANSLATE_URL` (defaults to the public
//! instance) and the optional `LIBRETRANSLATE_API_KEY`.
//!
//! # Example
//!
//! ```ignore
//! use neural_translate::mt::{MachineTranslator, LibreTranslateProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = LibreTranslateProvider::from_env()?;
//!     let result = provider.translate("Hello", "en", "es").await?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```

use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::{MachineTranslator, normalize_locale, validate_locale};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Public LibreTranslate instance used when no endpoint is configured
pub const DEFAULT_ENDPOINT: &str = "https://libretranslate.com";

#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    q: &'a str,
    source: String,
    target: String,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateAnswer {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

/// LibreTranslate-compatible HTTP provider
#[derive(Clone)]
pub struct LibreTranslateProvider {
    /// Optional API key, required by some hosted instances
    api_key: Option<String>,
    /// HTTP client for async requests
    client: reqwest::Client,
    /// Base URL of the instance, without the `/translate` path
    base_url: String,
}

impl LibreTranslateProvider {
    /// Create a provider for the given instance
    ///
    /// # Arguments
    ///
    /// * `base_url` - Instance root, e.g. `https://libretranslate.com`
    /// * `api_key` - Optional API key; blank keys are ignored
    ///
    /// # Returns
    ///
    /// * `Err(MtError::ConfigError)` - If the URL is empty or not http(s)
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> MtResult<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(MtError::ConfigError(
                "Translation endpoint cannot be empty".to_string(),
            ));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(MtError::ConfigError(format!(
                "Translation endpoint must be an http(s) URL: {}",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("neural-translate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MtError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client,
            base_url,
        })
    }

    /// Create a provider from `LIBRETRANSLATE_URL` and `LIBRETRANSLATE_API_KEY`
    pub fn from_env() -> MtResult<Self> {
        let base_url = std::env::var("LIBRETRANSLATE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let api_key = std::env::var("LIBRETRANSLATE_API_KEY").ok();

        Self::new(base_url, api_key)
    }

    /// Full URL of the translate route
    pub fn translate_url(&self) -> String {
        format!("{}/translate", self.base_url)
    }
}

impl std::fmt::Debug for LibreTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibreTranslateProvider")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for LibreTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        validate_locale(source_locale)?;
        validate_locale(target_locale)?;

        if text.is_empty() {
            return Ok(String::new());
        }

        let body = TranslateBody {
            q: text,
            source: normalize_locale(source_locale),
            target: normalize_locale(target_locale),
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        debug!(url = %self.translate_url(), source = %body.source, target = %body.target, "Posting translation request");
        let response = self
            .client
            .post(self.translate_url())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MtError::NetworkError(format!(
                "Translation service error ({}): {}",
                status, error_text
            )));
        }

        let raw = response.text().await?;
        let answer: TranslateAnswer = serde_json::from_str(&raw).map_err(|e| {
            MtError::TranslationError(format!("Failed to parse API response: {}", e))
        })?;

        answer.translated_text.ok_or_else(|| {
            MtError::TranslationError(
                "Invalid API response: missing 'translatedText' field".to_string(),
            )
        })
    }

    fn provider_name(&self) -> &str {
        "LibreTranslate"
    }
}
