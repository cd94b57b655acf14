//! Speech through the `espeak-ng` command line engine.
//!
//! Each utterance is a child process; cancelling kills the current child.
//! The binary comes from `ESPEAK_BIN`, else `espeak-ng` or `espeak` on `PATH`.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

use tracing::{debug, info};

use super::{CapabilityError, SpeechPlayer, Utterance};

/// espeak-ng defaults that correspond to 1.0 on the utterance scale
const BASE_WPM: f32 = 175.0;
const BASE_PITCH: f32 = 50.0;
const BASE_AMPLITUDE: f32 = 100.0;

/// Regional voices espeak-ng ships; other locales use the base language voice
const REGIONAL_VOICES: [&str; 4] = ["en-us", "en-gb", "pt-br", "es-419"];

pub struct EspeakPlayer {
    bin: PathBuf,
    current: Mutex<Option<Child>>,
}

impl EspeakPlayer {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            current: Mutex::new(None),
        }
    }

    /// Locate an espeak binary, or `None` when speech is unavailable
    pub fn detect() -> Option<Self> {
        let bin = get_from_env_or_path("ESPEAK_BIN", "espeak-ng").or_else(|| get_from_path("espeak"))?;
        info!(bin = ?bin, "Detected espeak binary");
        Some(Self::new(bin))
    }
}

impl std::fmt::Debug for EspeakPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EspeakPlayer").field("bin", &self.bin).finish()
    }
}

/// espeak voice name for a locale tag: `en-US` → `en-us`, `fr-FR` → `fr`
pub fn espeak_voice(locale: &str) -> String {
    let lower = locale.to_lowercase().replace('_', "-");
    if REGIONAL_VOICES.contains(&lower.as_str()) {
        lower
    } else {
        lower.split('-').next().unwrap_or_default().to_string()
    }
}

/// Command line arguments for one utterance
pub fn espeak_args(utterance: &Utterance<'_>) -> Vec<String> {
    let wpm = (BASE_WPM * utterance.rate).round().clamp(80.0, 450.0) as i32;
    let pitch = (BASE_PITCH * utterance.pitch).round().clamp(0.0, 99.0) as i32;
    let amplitude = (BASE_AMPLITUDE * utterance.volume).round().clamp(0.0, 200.0) as i32;

    let mut args = Vec::with_capacity(9);
    let voice = espeak_voice(utterance.locale);
    if !voice.is_empty() {
        args.push("-v".to_string());
        args.push(voice);
    }
    args.extend([
        "-s".to_string(),
        wpm.to_string(),
        "-p".to_string(),
        pitch.to_string(),
        "-a".to_string(),
        amplitude.to_string(),
        "--".to_string(),
        utterance.text.to_string(),
    ]);
    args
}

impl SpeechPlayer for EspeakPlayer {
    fn cancel(&self) -> Result<(), CapabilityError> {
        let mut current = self
            .current
            .lock()
            .map_err(|_| CapabilityError::Failed("speech state poisoned".to_string()))?;
        if let Some(mut child) = current.take() {
            // Already exited is fine; wait() reaps it either way
            let _ = child.kill();
            let _ = child.wait();
            debug!("Cancelled current utterance");
        }
        Ok(())
    }

    fn speak(&self, utterance: &Utterance<'_>) -> Result<(), CapabilityError> {
        let args = espeak_args(utterance);
        debug!(bin = ?self.bin, ?args, "Spawning espeak");

        let child = Command::new(&self.bin)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    CapabilityError::Unavailable(format!("{}", self.bin.display()))
                }
                _ => CapabilityError::Failed(format!("failed to start espeak: {}", e)),
            })?;

        let mut current = self
            .current
            .lock()
            .map_err(|_| CapabilityError::Failed("speech state poisoned".to_string()))?;
        if let Some(mut previous) = current.replace(child) {
            let _ = previous.kill();
            let _ = previous.wait();
        }
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        let Ok(mut current) = self.current.lock() else {
            return false;
        };
        matches!(current.as_mut().map(Child::try_wait), Some(Ok(None)))
    }

    fn name(&self) -> &str {
        "espeak-ng"
    }
}

impl Drop for EspeakPlayer {
    fn drop(&mut self) {
        let _ = self.cancel();
    }
}

fn get_from_env_or_path(env_key: &str, default_bin: &str) -> Option<PathBuf> {
    if let Ok(p) = std::env::var(env_key) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return Some(pb);
        }
    }
    get_from_path(default_bin)
}

fn get_from_path(bin: &str) -> Option<PathBuf> {
    if bin.contains(std::path::MAIN_SEPARATOR) {
        let p = PathBuf::from(bin);
        return p.exists().then_some(p);
    }
    let paths = std::env::var("PATH").ok()?;
    paths
        .split(if cfg!(windows) { ';' } else { ':' })
        .map(|dir| Path::new(dir).join(bin))
        .find(|candidate| candidate.exists())
}
