//! Mock Machine Translator for testing
//!
//! This module provides a deterministic, API-free translator for testing
//! the controller without network access. Every call is recorded so tests
//! can assert on how many requests reached the "network" and with which
//! arguments.
//!
//! # Example
//!
//! ```ignore
//! use neural_translate::mt::{MachineTranslator, MockTranslator, MockMode};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockTranslator::new(MockMode::Suffix);
//!     let result = mock.translate("hello", "en", "fr").await.unwrap();
//!     assert_eq!(result, "hello_fr");
//! }
//! ```

use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::MachineTranslator;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append target suffix: "hello" → "hello_fr"
    Suffix,

    /// Use predefined mappings for realistic translations
    /// (text, target_locale) → translation, falling back to `Suffix`
    Mappings(HashMap<(String, String), String>),

    /// Fail every call with this error
    Error(MtError),
}

/// One recorded `translate` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub text: String,
    pub source: String,
    pub target: String,
}

/// Mock translator that simulates various translation scenarios
///
/// Clones share the call log, so a test can hand one clone to the
/// controller and inspect the other.
#[derive(Debug, Clone)]
pub struct MockTranslator {
    mode: MockMode,
    /// Simulated network delay applied to every call
    delay: Duration,
    /// Extra delay per target language, replacing `delay` for that target
    target_delays: HashMap<String, Duration>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockTranslator {
    /// Create a new MockTranslator with the given mode
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            delay: Duration::ZERO,
            target_delays: HashMap::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a MockTranslator with simulated network delay
    ///
    /// ```ignore
    /// let mock = MockTranslator::with_delay(MockMode::Suffix, 50);
    /// // Each translation will take ~50ms
    /// ```
    pub fn with_delay(mode: MockMode, delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            ..Self::new(mode)
        }
    }

    /// Make calls targeting `target` take `delay_ms` instead of the default delay
    ///
    /// Used to make overlapping requests resolve out of order.
    pub fn with_target_delay(mut self, target: &str, delay_ms: u64) -> Self {
        self.target_delays
            .insert(target.to_string(), Duration::from_millis(delay_ms));
        self
    }

    /// Convenience constructor for `MockMode::Mappings`
    pub fn with_mappings<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>) -> Self {
        let map = pairs
            .into_iter()
            .map(|(text, target, translated)| {
                ((text.to_string(), target.to_string()), translated.to_string())
            })
            .collect();
        Self::new(MockMode::Mappings(map))
    }

    /// All calls received so far, in arrival order
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    fn record(&self, text: &str, source: &str, target: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(MockCall {
                text: text.to_string(),
                source: source.to_string(),
                target: target.to_string(),
            });
        }
    }

    async fn apply_delay(&self, target: &str) {
        let delay = self
            .target_delays
            .get(target)
            .copied()
            .unwrap_or(self.delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// Apply translation logic based on the mode
    fn apply_translation(&self, text: &str, target: &str) -> MtResult<String> {
        match &self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", text, target)),
            MockMode::Mappings(map) => {
                let key = (text.to_string(), target.to_string());
                Ok(map
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| format!("{}_{}", text, target)))
            }
            MockMode::Error(err) => Err(err.clone()),
        }
    }
}

#[async_trait]
impl MachineTranslator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        self.record(text, source_locale, target_locale);
        self.apply_delay(target_locale).await;
        self.apply_translation(text, target_locale)
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}
