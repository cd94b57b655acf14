//! Session state of the translation widget and its pure transitions.
//!
//! Nothing here touches timers, the network or the platform. The controller
//! owns a `SessionState` and drives these transitions from its event loop,
//! which keeps every rule testable without a runtime.

use serde::Serialize;

use crate::config::ControllerConfig;
use crate::error::AppError;

/// Where the current translation stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Status {
    /// No text, or nothing submitted yet
    #[default]
    Idle,
    /// A request is in flight
    Pending,
    /// `translated_text` holds the latest result
    Done,
    /// `error` holds the latest failure
    Failed,
}

/// The text and language pair handed to the translator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationRequest {
    pub source_text: String,
    pub source_lang: String,
    pub target_lang: String,
}

/// Sequence number attached to an issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn number(self) -> u64 {
        self.0
    }
}

/// Monotonic request counter.
///
/// Only the most recently issued ticket is current. Invalidating bumps the
/// counter without issuing, so every outstanding ticket goes stale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}

/// What a debounce expiry (or an explicit submit) decided to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Text was blank; state reset to idle
    Skipped,
    /// Languages were equal; state is `Failed` without a network call
    Rejected,
    /// A request should go out with this ticket
    Issued(Ticket, TranslationRequest),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    pub source_text: String,
    pub translated_text: String,
    pub source_lang: String,
    pub target_lang: String,
    pub status: Status,
    pub error: Option<AppError>,
    pub copied: bool,
    pub dark_mode: bool,
    #[serde(skip)]
    pub(crate) requests: RequestSequence,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(&ControllerConfig::default())
    }
}

impl SessionState {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            source_text: String::new(),
            translated_text: String::new(),
            source_lang: config.default_source.clone(),
            target_lang: config.default_target.clone(),
            status: Status::Idle,
            error: None,
            copied: false,
            dark_mode: config.dark_mode,
            requests: RequestSequence::default(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Pending
    }

    /// Number of characters (not bytes) in the source text
    pub fn char_count(&self) -> usize {
        self.source_text.chars().count()
    }

    pub fn has_source_text(&self) -> bool {
        !self.source_text.trim().is_empty()
    }

    pub fn request(&self) -> TranslationRequest {
        TranslationRequest {
            source_text: self.source_text.clone(),
            source_lang: self.source_lang.clone(),
            target_lang: self.target_lang.clone(),
        }
    }

    /// Drop the result and error and go idle. Responses still in flight are
    /// invalidated.
    pub fn reset_translation(&mut self) {
        self.requests.invalidate();
        self.translated_text.clear();
        self.error = None;
        self.status = Status::Idle;
    }

    /// Decide what a submission attempt does and move the state accordingly
    pub fn begin_submission(&mut self) -> Submission {
        if !self.has_source_text() {
            self.reset_translation();
            return Submission::Skipped;
        }

        if self.source_lang == self.target_lang {
            self.requests.invalidate();
            self.translated_text.clear();
            self.error = Some(AppError::SameLanguage);
            self.status = Status::Failed;
            return Submission::Rejected;
        }

        self.status = Status::Pending;
        self.error = None;
        let ticket = self.requests.issue();
        Submission::Issued(ticket, self.request())
    }

    /// Apply a resolved request. Returns `false` when the ticket is stale and
    /// nothing changed.
    pub fn apply_outcome(&mut self, ticket: Ticket, outcome: Result<String, AppError>) -> bool {
        if !self.requests.is_current(ticket) {
            return false;
        }

        match outcome {
            Ok(translated) => {
                self.translated_text = translated;
                self.error = None;
                self.status = Status::Done;
            }
            Err(err) => {
                self.translated_text.clear();
                self.error = Some(err);
                self.status = Status::Failed;
            }
        }
        true
    }

    /// Exchange languages and texts. Outstanding responses are invalidated
    /// and any error is dropped, so the swapped-in text never shows next to
    /// a stale failure. Only a `Done` session with text stays `Done`.
    pub fn swap(&mut self) -> Result<(), AppError> {
        if self.source_text.trim().is_empty() && self.translated_text.trim().is_empty() {
            return Err(AppError::NothingToSwap);
        }

        std::mem::swap(&mut self.source_lang, &mut self.target_lang);
        std::mem::swap(&mut self.source_text, &mut self.translated_text);
        self.requests.invalidate();
        self.error = None;
        if self.status != Status::Done || !self.has_source_text() {
            self.status = Status::Idle;
        }
        Ok(())
    }

    /// Empty both texts and drop error and copied flag. Languages stay.
    pub fn clear(&mut self) {
        self.source_text.clear();
        self.copied = false;
        self.reset_translation();
    }
}
