//! Voice input and output for the Luna chat widget.
//!
//! Wraps platform speech engines behind small traits so the conversation
//! layer never touches an engine directly: recognition drives the input
//! box through interim and final transcripts, and synthesis reads bot
//! answers aloud with a sanitized, markdown-free rendition of the text.

pub mod capability;
pub mod error;
pub mod input;
pub mod output;
pub mod state;

pub use capability::VoiceCapability;
pub use error::VoiceError;
pub use input::{
    InputEffect, RecognitionEngine, RecognitionErrorKind, RecognitionEvent, VoiceInput,
};
pub use output::{sanitize_speech_text, SynthesisEngine, Utterance, VoiceOutput, VoiceProfile};
pub use state::{CaptureState, StateMachine};
