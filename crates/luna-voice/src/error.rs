//! Voice subsystem errors.

use luna_core::LunaError;
use thiserror::Error;

/// Errors raised by the voice input and output adapters.
#[derive(Debug, Error)]
pub enum VoiceError {
    /// The platform offers no engine for the requested capability.
    #[error("Voice capability unavailable: {0}")]
    Unavailable(String),

    /// The underlying speech engine failed.
    #[error("Speech engine error: {0}")]
    Engine(String),

    /// A capture-state transition was not permitted.
    #[error("Voice state error: {0}")]
    State(String),
}

impl From<VoiceError> for LunaError {
    fn from(e: VoiceError) -> Self {
        LunaError::Voice(e.to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================
