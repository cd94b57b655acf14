//! In-memory capabilities for tests and the `--mock` CLI mode.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{CapabilityError, Clipboard, SpeechPlayer, Utterance};

/// Owned copy of an `Utterance`
#[derive(Debug, Clone, PartialEq)]
pub struct SpokenUtterance {
    pub text: String,
    pub locale: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Speech player that records what it was asked to say
#[derive(Debug, Default)]
pub struct RecordingSpeech {
    spoken: Mutex<Vec<SpokenUtterance>>,
    cancels: AtomicUsize,
    unavailable: bool,
}

impl RecordingSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    /// A player whose `speak` always fails as unavailable
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn spoken(&self) -> Vec<SpokenUtterance> {
        self.spoken.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

impl SpeechPlayer for RecordingSpeech {
    fn cancel(&self) -> Result<(), CapabilityError> {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn speak(&self, utterance: &Utterance<'_>) -> Result<(), CapabilityError> {
        if self.unavailable {
            return Err(CapabilityError::Unavailable("Speech synthesis".to_string()));
        }
        if let Ok(mut spoken) = self.spoken.lock() {
            spoken.push(SpokenUtterance {
                text: utterance.text.to_string(),
                locale: utterance.locale.to_string(),
                rate: utterance.rate,
                pitch: utterance.pitch,
                volume: utterance.volume,
            });
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Clipboard backed by a string
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    writes: AtomicUsize,
    denied: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that rejects every write
    pub fn denied() -> Self {
        Self {
            denied: true,
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), CapabilityError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.denied {
            return Err(CapabilityError::Failed("write permission denied".to_string()));
        }
        let mut contents = self
            .contents
            .lock()
            .map_err(|_| CapabilityError::Failed("clipboard poisoned".to_string()))?;
        *contents = Some(text.to_string());
        Ok(())
    }
}
