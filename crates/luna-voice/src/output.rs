//! Voice output adapter over a platform synthesis engine.
//!
//! Bot answers arrive as markdown; before speaking, the text is reduced
//! to plain prose. Only one utterance plays at a time: a new speak call
//! cancels whatever is in flight, and disabling output mid-utterance
//! halts playback immediately.

use regex::Regex;
use std::sync::LazyLock;
use tokio::time::Duration;
use tracing::{debug, warn};

use luna_core::config::VoiceConfig;

use crate::error::VoiceError;

// =============================================================================
// Speech text sanitizer (compiled once, reused across calls)
// =============================================================================

struct SanitizePatterns {
    bold: Regex,
    italic: Regex,
    markup: Regex,
    whitespace: Regex,
}

static SANITIZE_PATTERNS: LazyLock<SanitizePatterns> = LazyLock::new(|| SanitizePatterns {
    bold: Regex::new(r"\*\*(.*?)\*\*").expect("Invalid bold regex"),
    italic: Regex::new(r"\*(.*?)\*").expect("Invalid italic regex"),
    markup: Regex::new(r"[#*`]").expect("Invalid markup regex"),
    whitespace: Regex::new(r"\s+").expect("Invalid whitespace regex"),
});

/// Reduce markdown-flavored answer text to plain speakable prose.
///
/// Bold and italic markers are unwrapped (keeping their content), stray
/// markup characters are removed, and all whitespace runs collapse to a
/// single space.
pub fn sanitize_speech_text(text: &str) -> String {
    let p = &*SANITIZE_PATTERNS;
    let text = p.bold.replace_all(text, "$1");
    let text = p.italic.replace_all(&text, "$1");
    let text = p.markup.replace_all(&text, "");
    let text = p.whitespace.replace_all(&text, " ");
    text.trim().to_string()
}

/// A synthesis voice offered by the platform engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceProfile {
    pub name: String,
    /// BCP 47 language tag, e.g. "en-US".
    pub language: String,
}

/// What to speak and how.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// Engine voice to use; `None` falls back to the engine default.
    pub voice: Option<String>,
    pub language: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Seam to the platform speech-synthesis engine.
pub trait SynthesisEngine: Send {
    fn voices(&self) -> Vec<VoiceProfile>;

    /// Begin speaking; replaces nothing, callers cancel first.
    fn speak(&mut self, utterance: &Utterance) -> Result<(), VoiceError>;

    /// Stop any in-flight utterance. Idempotent.
    fn cancel(&mut self);
}

const PREFERRED_NAME_HINTS: [&str; 6] = ["male", "daniel", "alex", "tom", "james", "david"];

/// Pick the deeper-sounding voice the widget prefers.
///
/// First any voice whose name carries one of the known male-voice hints
/// (regardless of language), then a vendor English voice, then any
/// English voice. `None` leaves the engine default in place.
pub fn select_voice(voices: &[VoiceProfile]) -> Option<&VoiceProfile> {
    let hinted = voices.iter().find(|v| {
        let name = v.name.to_lowercase();
        PREFERRED_NAME_HINTS.iter().any(|hint| name.contains(hint))
    });
    if hinted.is_some() {
        return hinted;
    }

    let english: Vec<&VoiceProfile> = voices
        .iter()
        .filter(|v| v.language.starts_with("en"))
        .collect();

    english
        .iter()
        .find(|v| v.name.contains("Google") || v.name.contains("Microsoft"))
        .copied()
        .or_else(|| english.first().copied())
}

/// Voice output adapter: one per mounted widget.
pub struct VoiceOutput {
    engine: Box<dyn SynthesisEngine>,
    config: VoiceConfig,
    enabled: bool,
    speaking: bool,
}

impl VoiceOutput {
    pub fn new(engine: Box<dyn SynthesisEngine>, config: &VoiceConfig) -> Self {
        Self {
            engine,
            enabled: config.output_enabled,
            config: config.clone(),
            speaking: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    /// How long to wait before auto-speaking a freshly arrived reply.
    pub fn auto_speak_delay(&self) -> Duration {
        Duration::from_millis(self.config.auto_speak_delay_ms)
    }

    /// Speak a bot answer. Inert while output is disabled; otherwise the
    /// newest call wins and any in-flight utterance is cancelled first.
    /// Engine failures end the speaking state silently.
    pub fn speak(&mut self, text: &str) {
        if !self.enabled {
            debug!("Voice output disabled; skipping utterance");
            return;
        }

        self.engine.cancel();
        let voices = self.engine.voices();
        let utterance = Utterance {
            text: sanitize_speech_text(text),
            voice: select_voice(&voices).map(|v| v.name.clone()),
            language: self.config.language.clone(),
            rate: self.config.rate,
            pitch: self.config.pitch,
            volume: self.config.volume,
        };
        match self.engine.speak(&utterance) {
            Ok(()) => self.speaking = true,
            Err(e) => {
                warn!(error = %e, "Synthesis failed");
                self.speaking = false;
            }
        }
    }

    /// Manual per-message trigger (the speaker icon on a bubble).
    /// Routes through the same enabled guard as auto-speak, so it is
    /// inert while output is muted.
    pub fn speak_message(&mut self, text: &str) {
        self.speak(text);
    }

    /// Speaker toggle. Turning output off mid-utterance halts playback.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled && self.speaking {
            self.engine.cancel();
            self.speaking = false;
        }
    }

    pub fn toggle_enabled(&mut self) {
        self.set_enabled(!self.enabled);
    }

    /// Engine callback: the current utterance finished or was cancelled.
    pub fn handle_finished(&mut self) {
        self.speaking = false;
    }
}

// =============================================================================
// Tests
// =============================================================================
