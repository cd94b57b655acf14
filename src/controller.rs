//! The translation controller.
//!
//! Owns the session state and everything that changes it over time: the
//! debounce timer, requests in flight, and the timers that clear transient
//! flags. All state changes go through one `watch` channel, so each
//! mutation is atomic and views can subscribe to re-render.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use neural_translate::{ControllerConfig, TranslationController};
//! use neural_translate::mt::LibreTranslateProvider;
//! use neural_translate::platform::{NoSpeech, SystemClipboard};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let controller = TranslationController::new(
//!         Arc::new(LibreTranslateProvider::from_env()?),
//!         Arc::new(NoSpeech),
//!         Arc::new(SystemClipboard),
//!         ControllerConfig::default(),
//!     );
//!     controller.set_source_text("Hello");
//!     let state = controller.translate_now().await;
//!     println!("{}", state.translated_text);
//!     Ok(())
//! }
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, error, info, warn};

use crate::catalog;
use crate::config::ControllerConfig;
use crate::error::AppError;
use crate::mt::{MachineTranslator, MtResult};
use crate::platform::{Clipboard, SpeechPlayer, Utterance};
use crate::session::{SessionState, Submission, Ticket, TranslationRequest};

/// Handles of every task that may still write to the session
#[derive(Default)]
struct Timers {
    debounce: Option<AbortHandle>,
    notice: Option<AbortHandle>,
    copied: Option<AbortHandle>,
    in_flight: Vec<AbortHandle>,
    closed: bool,
}

impl Timers {
    fn abort_all(&mut self) {
        for handle in [
            self.debounce.take(),
            self.notice.take(),
            self.copied.take(),
        ]
        .into_iter()
        .flatten()
        {
            handle.abort();
        }
        for handle in self.in_flight.drain(..) {
            handle.abort();
        }
    }
}

struct Shared {
    state: watch::Sender<SessionState>,
    translator: Arc<dyn MachineTranslator>,
    speech: Arc<dyn SpeechPlayer>,
    clipboard: Arc<dyn Clipboard>,
    config: ControllerConfig,
    timers: Mutex<Timers>,
}

/// Drives one translation session.
///
/// Must be created and used inside a Tokio runtime: timers and requests run
/// as spawned tasks. Dropping the controller tears the session down.
pub struct TranslationController {
    shared: Arc<Shared>,
}

impl TranslationController {
    pub fn new(
        translator: Arc<dyn MachineTranslator>,
        speech: Arc<dyn SpeechPlayer>,
        clipboard: Arc<dyn Clipboard>,
        config: ControllerConfig,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::new(&config));
        Self {
            shared: Arc::new(Shared {
                state,
                translator,
                speech,
                clipboard,
                config,
                timers: Mutex::new(Timers::default()),
            }),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.shared.config
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> SessionState {
        self.shared.state.borrow().clone()
    }

    /// Receiver that is notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.state.subscribe()
    }

    pub fn set_source_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.shared.edit(|s| {
            if s.source_text == text {
                return false;
            }
            s.source_text = text;
            true
        });
    }

    pub fn set_source_lang(&self, code: impl Into<String>) {
        let code = code.into();
        self.shared.edit(|s| {
            if s.source_lang == code {
                return false;
            }
            s.source_lang = code;
            true
        });
    }

    pub fn set_target_lang(&self, code: impl Into<String>) {
        let code = code.into();
        self.shared.edit(|s| {
            if s.target_lang == code {
                return false;
            }
            s.target_lang = code;
            true
        });
    }

    /// Exchange languages and texts, then re-translate after the debounce.
    ///
    /// With both texts empty the swap is refused and a transient
    /// `NothingToSwap` error is shown.
    pub fn swap(&self) -> Result<(), AppError> {
        let mut result = Ok(());
        let mut blank = false;
        self.shared.state.send_if_modified(|s| {
            result = s.swap();
            blank = !s.has_source_text();
            result.is_ok()
        });

        match result {
            Ok(()) => {
                debug!(blank, "Swapped languages and texts");
                if blank {
                    self.shared.disarm_debounce();
                } else {
                    self.shared.arm_debounce();
                }
                Ok(())
            }
            Err(err) => {
                self.shared.raise(err.clone());
                Err(err)
            }
        }
    }

    /// Empty both texts and drop error and copied flag. Languages stay.
    pub fn clear(&self) {
        self.shared.disarm_debounce();
        {
            let mut timers = self.shared.timers();
            if let Some(handle) = timers.copied.take() {
                handle.abort();
            }
        }
        self.shared.state.send_modify(SessionState::clear);
    }

    /// Put the translation on the clipboard. A no-op while it is empty.
    pub fn copy(&self) -> Result<(), AppError> {
        let text = self.shared.state.borrow().translated_text.clone();
        if text.is_empty() {
            return Ok(());
        }

        match self.shared.clipboard.write_text(&text) {
            Ok(()) => {
                debug!(chars = text.chars().count(), "Copied translation to clipboard");
                self.shared.mark_copied();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Clipboard write failed");
                self.shared.raise(AppError::Clipboard);
                Err(AppError::Clipboard)
            }
        }
    }

    /// Speak `text` in the locale mapped from `lang_code`.
    ///
    /// Cancels whatever is playing first. Playback is not awaited.
    pub fn speak(&self, text: &str, lang_code: &str) -> Result<(), AppError> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let speech = &self.config().speech;
        let utterance = Utterance {
            text,
            locale: catalog::speech_locale(lang_code),
            rate: speech.rate,
            pitch: speech.pitch,
            volume: speech.volume,
        };

        let player = &self.shared.speech;
        match player.cancel().and_then(|()| player.speak(&utterance)) {
            Ok(()) => {
                debug!(locale = utterance.locale, engine = player.name(), "Speaking");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, engine = player.name(), "Speech synthesis failed");
                self.shared.raise(AppError::SpeechUnsupported);
                Err(AppError::SpeechUnsupported)
            }
        }
    }

    pub fn speak_source(&self) -> Result<(), AppError> {
        let state = self.snapshot();
        self.speak(&state.source_text, &state.source_lang)
    }

    pub fn speak_translation(&self) -> Result<(), AppError> {
        let state = self.snapshot();
        self.speak(&state.translated_text, &state.target_lang)
    }

    pub fn is_speaking(&self) -> bool {
        self.shared.speech.is_speaking()
    }

    /// Flip the theme flag and return the new value
    pub fn toggle_dark_mode(&self) -> bool {
        let mut dark = false;
        self.shared.state.send_modify(|s| {
            s.dark_mode = !s.dark_mode;
            dark = s.dark_mode;
        });
        dark
    }

    /// Skip the debounce window: submit now and wait for the outcome
    pub async fn translate_now(&self) -> SessionState {
        self.shared.disarm_debounce();
        if let Some(task) = self.shared.submit() {
            if let Err(e) = task.await {
                debug!(error = %e, "Translation task did not complete");
            }
        }
        self.snapshot()
    }

    /// Cancel every timer and request task. Later operations still update
    /// the state but schedule nothing.
    pub fn shutdown(&self) {
        let mut timers = self.shared.timers();
        if !timers.closed {
            debug!(in_flight = timers.in_flight.len(), "Tearing down translation session");
        }
        timers.closed = true;
        timers.abort_all();
    }
}

impl Drop for TranslationController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Shared {
    fn timers(&self) -> MutexGuard<'_, Timers> {
        self.timers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply a text or language edit, then re-arm the debounce or, when the
    /// text is blank, reset right away.
    fn edit(self: &Arc<Self>, modify: impl FnOnce(&mut SessionState) -> bool) {
        let mut blank = false;
        let changed = self.state.send_if_modified(|s| {
            if !modify(s) {
                return false;
            }
            blank = !s.has_source_text();
            if blank {
                s.reset_translation();
            }
            true
        });

        if !changed {
            return;
        }
        if blank {
            self.disarm_debounce();
        } else {
            self.arm_debounce();
        }
    }

    fn arm_debounce(self: &Arc<Self>) {
        let shared = Arc::clone(self);
        let delay = self.config.debounce;

        let mut timers = self.timers();
        if timers.closed {
            return;
        }
        if let Some(previous) = timers.debounce.take() {
            previous.abort();
        }
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!("Debounce window elapsed");
            shared.submit();
        });
        timers.debounce = Some(task.abort_handle());
    }

    fn disarm_debounce(&self) {
        if let Some(handle) = self.timers().debounce.take() {
            handle.abort();
        }
    }

    /// Run the submission rules and spawn the request when one is issued
    fn submit(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        if self.timers().closed {
            return None;
        }

        let mut submission = Submission::Skipped;
        self.state.send_if_modified(|s| {
            let before = s.clone();
            submission = s.begin_submission();
            *s != before
        });

        match submission {
            Submission::Skipped => {
                debug!("Source text is empty; nothing to translate");
                None
            }
            Submission::Rejected => {
                info!("Source and target languages are the same; request not sent");
                None
            }
            Submission::Issued(ticket, request) => Some(self.spawn_request(ticket, request)),
        }
    }

    fn spawn_request(self: &Arc<Self>, ticket: Ticket, request: TranslationRequest) -> JoinHandle<()> {
        info!(
            ticket = ticket.number(),
            source = %request.source_lang,
            target = %request.target_lang,
            chars = request.source_text.chars().count(),
            provider = self.translator.provider_name(),
            "Submitting translation"
        );

        let shared = Arc::clone(self);
        let task = tokio::spawn(async move {
            let result = shared
                .translator
                .translate(&request.source_text, &request.source_lang, &request.target_lang)
                .await;
            shared.resolve(ticket, result);
        });

        let mut timers = self.timers();
        if timers.closed {
            task.abort();
        } else {
            timers.in_flight.retain(|handle| !handle.is_finished());
            timers.in_flight.push(task.abort_handle());
        }
        task
    }

    fn resolve(&self, ticket: Ticket, result: MtResult<String>) {
        let outcome = result.map_err(|e| {
            error!(ticket = ticket.number(), error = %e, "Translation error");
            AppError::service(e.user_message())
        });
        let succeeded = outcome.is_ok();

        if self.state.send_if_modified(|s| s.apply_outcome(ticket, outcome)) {
            debug!(ticket = ticket.number(), succeeded, "Applied translation response");
        } else {
            warn!(ticket = ticket.number(), "Discarding stale translation response");
        }
    }

    /// Show `err`; transient kinds clear themselves after the notice timeout
    /// unless something else replaced them first.
    fn raise(self: &Arc<Self>, err: AppError) {
        self.state.send_modify(|s| s.error = Some(err.clone()));
        if !err.is_transient() {
            return;
        }

        let shared = Arc::clone(self);
        let timeout = self.config.notice_timeout;
        let mut timers = self.timers();
        if timers.closed {
            return;
        }
        if let Some(previous) = timers.notice.take() {
            previous.abort();
        }
        let task = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            shared.state.send_if_modified(|s| {
                if s.error.as_ref() == Some(&err) {
                    s.error = None;
                    true
                } else {
                    false
                }
            });
        });
        timers.notice = Some(task.abort_handle());
    }

    fn mark_copied(self: &Arc<Self>) {
        self.state.send_modify(|s| s.copied = true);

        let shared = Arc::clone(self);
        let timeout = self.config.copied_timeout;
        let mut timers = self.timers();
        if timers.closed {
            return;
        }
        if let Some(previous) = timers.copied.take() {
            previous.abort();
        }
        let task = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            shared
                .state
                .send_if_modified(|s| std::mem::replace(&mut s.copied, false));
        });
        timers.copied = Some(task.abort_handle());
    }
}
