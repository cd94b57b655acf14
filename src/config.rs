//! Controller timings and speech defaults.
//!
//! `ControllerConfig::default()` carries the widget's fixed values;
//! `from_env()` overlays the `NEURAL_TRANSLATE_*` variables on top.

use std::time::Duration;

use crate::catalog;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1200);
pub const DEFAULT_NOTICE_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_COPIED_TIMEOUT: Duration = Duration::from_secs(2);

/// Utterance parameters, in the 0.0–2.0 scale where 1.0 is the engine default
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeechSettings {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            rate: 0.9,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    /// Quiet period after the last edit before a request is issued
    pub debounce: Duration,
    /// How long transient errors stay visible
    pub notice_timeout: Duration,
    /// How long the "copied" flag stays set
    pub copied_timeout: Duration,
    pub default_source: String,
    pub default_target: String,
    pub dark_mode: bool,
    pub speech: SpeechSettings,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            notice_timeout: DEFAULT_NOTICE_TIMEOUT,
            copied_timeout: DEFAULT_COPIED_TIMEOUT,
            default_source: "en".to_string(),
            default_target: "es".to_string(),
            dark_mode: true,
            speech: SpeechSettings::default(),
        }
    }
}

impl ControllerConfig {
    /// Defaults overlaid with `NEURAL_TRANSLATE_DEBOUNCE_MS`,
    /// `NEURAL_TRANSLATE_SOURCE` and `NEURAL_TRANSLATE_TARGET`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` but reading variables through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup("NEURAL_TRANSLATE_DEBOUNCE_MS").filter(|s| !s.is_empty()) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.debounce = Duration::from_millis(ms),
                Err(e) => {
                    tracing::warn!(value = %raw, error = %e, "Ignoring invalid NEURAL_TRANSLATE_DEBOUNCE_MS")
                }
            }
        }

        for (key, slot) in [
            ("NEURAL_TRANSLATE_SOURCE", &mut config.default_source),
            ("NEURAL_TRANSLATE_TARGET", &mut config.default_target),
        ] {
            if let Some(code) = lookup(key).map(|s| s.trim().to_lowercase()) {
                if catalog::is_supported(&code) {
                    *slot = code;
                } else if !code.is_empty() {
                    tracing::warn!(%key, value = %code, "Ignoring unsupported language code");
                }
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.debounce, Duration::from_millis(1200));
        assert_eq!(config.notice_timeout, Duration::from_secs(3));
        assert_eq!(config.copied_timeout, Duration::from_secs(2));
        assert_eq!(config.default_source, "en");
        assert_eq!(config.default_target, "es");
        assert_eq!(config.speech.rate, 0.9);
        assert_eq!(config.speech.pitch, 1.0);
        assert_eq!(config.speech.volume, 1.0);
    }

    #[test]
    fn test_env_overlay() {
        let config = ControllerConfig::from_lookup(lookup_from(&[
            ("NEURAL_TRANSLATE_DEBOUNCE_MS", "300"),
            ("NEURAL_TRANSLATE_SOURCE", "FR"),
            ("NEURAL_TRANSLATE_TARGET", "de"),
        ]));
        assert_eq!(config.debounce, Duration::from_millis(300));
        assert_eq!(config.default_source, "fr");
        assert_eq!(config.default_target, "de");
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let config = ControllerConfig::from_lookup(lookup_from(&[
            ("NEURAL_TRANSLATE_DEBOUNCE_MS", "soon"),
            ("NEURAL_TRANSLATE_SOURCE", "klingon"),
        ]));
        assert_eq!(config.debounce, DEFAULT_DEBOUNCE);
        assert_eq!(config.default_source, "en");
    }
}
