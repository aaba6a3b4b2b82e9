//! Voice input adapter over a platform recognition engine.
//!
//! Owns the toggle flow (start, stop, one retry on a failed start) and
//! translates engine events into effects the conversation layer applies:
//! interim transcripts land in the input box, a final transcript replaces
//! it, and only permission or hardware errors surface to the user.

use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

use luna_core::config::VoiceConfig;

use crate::error::VoiceError;
use crate::state::{CaptureState, StateMachine};

/// Why a recognition session failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    /// Microphone permission denied by the user or platform policy.
    PermissionDenied,
    /// No capture device present.
    NoMicrophone,
    /// The engine heard nothing before its silence timeout.
    NoSpeech,
    /// Engine-side network failure.
    Network,
    /// The session was aborted (e.g. by a stop call).
    Aborted,
    Other(String),
}

impl RecognitionErrorKind {
    /// User-facing alert for errors that need action; transient kinds
    /// (no speech, engine network hiccups) stay silent.
    pub fn alert_text(&self) -> Option<&'static str> {
        match self {
            RecognitionErrorKind::PermissionDenied => {
                Some("Microphone access denied. Please allow microphone access and try again.")
            }
            RecognitionErrorKind::NoMicrophone => {
                Some("No microphone was found. Please check your microphone settings.")
            }
            _ => None,
        }
    }
}

/// Event delivered by the recognition engine.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    /// The engine began capturing audio.
    Started,
    /// A provisional transcript; may be revised by later events.
    Interim(String),
    /// The definitive transcript for this session.
    Final(String),
    Error(RecognitionErrorKind),
    /// The engine ended the session (silence timeout or stop).
    Ended,
}

/// Seam to the platform speech-recognition engine.
pub trait RecognitionEngine: Send {
    /// Begin a capture session. May fail if the engine is busy or the
    /// device is not ready; the adapter retries once.
    fn start(&mut self) -> Result<(), VoiceError>;

    /// End the capture session. Idempotent.
    fn stop(&mut self);
}

/// Effect of an event for the conversation layer to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEffect {
    /// Replace the input box text with this provisional transcript.
    TranscriptUpdated(String),
    /// Capture finished; this text is ready to submit or edit.
    FinalTranscript(String),
    /// Show this message to the user.
    Alert(&'static str),
}

/// Voice input adapter: one per mounted widget.
pub struct VoiceInput {
    engine: Box<dyn RecognitionEngine>,
    state: StateMachine,
    transcript: String,
    retry_delay: Duration,
}

impl VoiceInput {
    pub fn new(engine: Box<dyn RecognitionEngine>, config: &VoiceConfig) -> Self {
        Self {
            engine,
            state: StateMachine::new(),
            transcript: String::new(),
            retry_delay: Duration::from_millis(config.start_retry_delay_ms),
        }
    }

    pub fn is_listening(&self) -> bool {
        self.state.current() == CaptureState::Listening
    }

    /// Latest transcript (interim or final) for this session.
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Mic button press. Stops an active session, otherwise clears the
    /// previous transcript and starts a new one, retrying a failed start
    /// once after a short delay. A second failure resets quietly.
    pub async fn toggle(&mut self) -> Result<(), VoiceError> {
        if self.is_listening() {
            self.engine.stop();
            self.state.transition(CaptureState::Idle)?;
            return Ok(());
        }

        self.transcript.clear();
        self.state.transition(CaptureState::Listening)?;
        if let Err(e) = self.engine.start() {
            debug!(error = %e, "Recognition start failed; retrying once");
            sleep(self.retry_delay).await;
            if let Err(e) = self.engine.start() {
                warn!(error = %e, "Recognition start retry failed");
                self.state.reset();
                return Err(e);
            }
        }
        Ok(())
    }

    /// Apply one engine event, returning the effect the caller should
    /// render, if any.
    pub fn handle_event(&mut self, event: RecognitionEvent) -> Option<InputEffect> {
        match event {
            RecognitionEvent::Started => {
                debug!("Recognition session started");
                None
            }
            RecognitionEvent::Interim(text) => {
                if !self.is_listening() {
                    return None;
                }
                self.transcript = text.clone();
                Some(InputEffect::TranscriptUpdated(text))
            }
            RecognitionEvent::Final(text) => {
                if self.state.transition(CaptureState::Finalized).is_err() {
                    return None;
                }
                self.transcript = text.clone();
                // Finalized is momentary; the session is over.
                let _ = self.state.transition(CaptureState::Idle);
                Some(InputEffect::FinalTranscript(text))
            }
            RecognitionEvent::Error(kind) => {
                warn!(?kind, "Recognition error");
                self.engine.stop();
                if self.state.transition(CaptureState::Errored).is_ok() {
                    let _ = self.state.transition(CaptureState::Idle);
                }
                kind.alert_text().map(InputEffect::Alert)
            }
            RecognitionEvent::Ended => {
                if self.is_listening() {
                    // Engine gave up (silence timeout); mirror it.
                    let _ = self.state.transition(CaptureState::Idle);
                }
                None
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
