//! Platform capabilities consumed by the controller: speech synthesis and
//! clipboard write.
//!
//! Both are synchronous and fire-and-forget from the controller's point of
//! view. Implementations report failure through `CapabilityError`; the
//! controller turns that into a user-facing message.

pub mod clipboard;
pub mod espeak;
pub mod mock;

use thiserror::Error;

pub use clipboard::{NoClipboard, SystemClipboard};
pub use espeak::EspeakPlayer;
pub use mock::{MemoryClipboard, RecordingSpeech, SpokenUtterance};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// The capability does not exist on this system
    #[error("{0} is not available")]
    Unavailable(String),
    /// The capability exists but the call failed
    #[error("{0}")]
    Failed(String),
}

/// One speech request, already resolved to a locale tag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Utterance<'a> {
    pub text: &'a str,
    pub locale: &'a str,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Text-to-speech engine with cancel-then-speak semantics
pub trait SpeechPlayer: Send + Sync {
    /// Stop whatever is currently being spoken. A no-op when idle.
    fn cancel(&self) -> Result<(), CapabilityError>;

    /// Start speaking without waiting for playback to finish
    fn speak(&self, utterance: &Utterance<'_>) -> Result<(), CapabilityError>;

    /// Whether an utterance is still playing
    fn is_speaking(&self) -> bool {
        false
    }

    fn name(&self) -> &str;
}

pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), CapabilityError>;
}

/// Speech player used when no engine was found; every call fails
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSpeech;

impl SpeechPlayer for NoSpeech {
    fn cancel(&self) -> Result<(), CapabilityError> {
        Ok(())
    }

    fn speak(&self, _utterance: &Utterance<'_>) -> Result<(), CapabilityError> {
        Err(CapabilityError::Unavailable("Speech synthesis".to_string()))
    }

    fn name(&self) -> &str {
        "none"
    }
}
