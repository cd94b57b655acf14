use cli_clipboard::{ClipboardContext, ClipboardProvider};
use tracing::debug;

use super::{CapabilityError, Clipboard};

/// The desktop clipboard (X11/Wayland, macOS, Windows)
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl SystemClipboard {
    /// The desktop clipboard, or `None` when none can be opened (headless)
    pub fn detect() -> Option<Self> {
        match ClipboardContext::new() {
            Ok(_) => Some(SystemClipboard),
            Err(e) => {
                debug!(error = %e, "System clipboard unavailable");
                None
            }
        }
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), CapabilityError> {
        let mut ctx = ClipboardContext::new()
            .map_err(|e| CapabilityError::Unavailable(format!("Clipboard ({})", e)))?;
        ctx.set_contents(text.to_owned())
            .map_err(|e| CapabilityError::Failed(e.to_string()))
    }
}

/// Clipboard for headless sessions; every write fails
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn write_text(&self, _text: &str) -> Result<(), CapabilityError> {
        Err(CapabilityError::Unavailable("Clipboard".to_string()))
    }
}
