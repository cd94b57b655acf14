//! Core of a live translation widget.
//!
//! The user types text, picks a source and a target language, and gets a
//! translation fetched from a LibreTranslate-compatible endpoint once typing
//! pauses. The translation can be copied to the clipboard or read aloud.
//!
//! [`TranslationController`] owns the session and applies every rule:
//! debounced submission, latest-request-wins ordering, swap and clear, and
//! the transient notices. Backends plug in through [`mt::MachineTranslator`],
//! [`platform::SpeechPlayer`] and [`platform::Clipboard`].

pub mod catalog;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod mt;
pub mod platform;
pub mod session;

pub use catalog::{LANGUAGES, Language};
pub use config::{ControllerConfig, SpeechSettings};
pub use controller::TranslationController;
pub use error::{AppError, GENERIC_FAILURE_MESSAGE};
pub use session::{SessionState, Status, Ticket, TranslationRequest};
