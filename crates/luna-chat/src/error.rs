//! Error types for the conversational core.
//!
//! Deliberately small: the turn-handling policy absorbs backend and voice
//! failures into canned answers rather than surfacing them, so the only
//! errors that escape are input-validation ones.

use luna_core::LunaError;

/// Errors from the conversation orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Empty or whitespace-only input; the turn is a no-op.
    #[error("message cannot be empty")]
    EmptyMessage,
}

impl From<ChatError> for LunaError {
    fn from(err: ChatError) -> Self {
        LunaError::Chat(err.to_string())
    }
}
