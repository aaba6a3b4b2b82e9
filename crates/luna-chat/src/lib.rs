//! Conversational core of the Luna widget.
//!
//! Owns the session state machine for one mounted widget instance: message
//! history, suggested/follow-up question rotation, conversation-phase
//! classification, and the deterministic fallback policy used when the
//! backend is unreachable.

pub mod classifier;
pub mod error;
pub mod fallback;
pub mod orchestrator;
pub mod suggestions;

pub use classifier::ContextClassifier;
pub use error::ChatError;
pub use fallback::{FallbackResponder, FALLBACK_FOLLOW_UPS, FALLBACK_INITIAL_QUESTIONS};
pub use orchestrator::{ConversationOrchestrator, Session, TurnOutcome};
pub use suggestions::UsedQuestions;
