//! Voice capture state machine with thread-safe transitions.
//!
//! Enforces valid state transitions for the capture lifecycle:
//! - Idle -> Listening (mic toggled on)
//! - Listening -> Finalized (final transcript delivered)
//! - Listening -> Errored (recognition error)
//! - Finalized -> Idle (transcript consumed)
//! - Errored -> Idle (error handled, ready to retry)
//! - Listening -> Idle (mic toggled off or engine ended)

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::error::VoiceError;

/// Operational state of the voice capture pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureState {
    /// No capture in progress. Ready to start.
    Idle,
    /// Actively listening; interim transcripts may arrive.
    Listening,
    /// A final transcript was produced and awaits consumption.
    Finalized,
    /// Recognition failed; the session must be acknowledged before retry.
    Errored,
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureState::Idle => write!(f, "Idle"),
            CaptureState::Listening => write!(f, "Listening"),
            CaptureState::Finalized => write!(f, "Finalized"),
            CaptureState::Errored => write!(f, "Errored"),
        }
    }
}

impl CaptureState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &CaptureState) -> bool {
        matches!(
            (self, target),
            (CaptureState::Idle, CaptureState::Listening)
                | (CaptureState::Listening, CaptureState::Finalized)
                | (CaptureState::Listening, CaptureState::Errored)
                | (CaptureState::Finalized, CaptureState::Idle)
                | (CaptureState::Errored, CaptureState::Idle)
                // Stop / engine-ended transition
                | (CaptureState::Listening, CaptureState::Idle)
        )
    }
}

/// Thread-safe state machine for capture state transitions.
///
/// Wraps `CaptureState` in an `Arc<Mutex<>>` so the recognition event
/// callback and the toggle path can share it. All transitions are
/// validated before being applied.
#[derive(Debug, Clone)]
pub struct StateMachine {
    state: Arc<Mutex<CaptureState>>,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// Create a new state machine initialized to `Idle`.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(CaptureState::Idle)),
        }
    }

    /// Returns the current state.
    pub fn current(&self) -> CaptureState {
        *self.state.lock().expect("state mutex poisoned")
    }

    /// Attempt to transition to the target state.
    ///
    /// Returns `Ok(())` if the transition is valid, or a
    /// `VoiceError::State` if it is not allowed from the current state.
    pub fn transition(&self, target: CaptureState) -> Result<(), VoiceError> {
        let mut state = self.state.lock().expect("state mutex poisoned");
        if state.can_transition_to(&target) {
            tracing::debug!("Capture state: {} -> {}", *state, target);
            *state = target;
            Ok(())
        } else {
            Err(VoiceError::State(format!(
                "Invalid state transition: {} -> {}",
                *state, target
            )))
        }
    }

    /// Force the state machine back to Idle (used for error recovery).
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("state mutex poisoned");
        tracing::warn!("Capture state machine reset to Idle from {}", *state);
        *state = CaptureState::Idle;
    }
}

// =============================================================================
// Tests
// =============================================================================
