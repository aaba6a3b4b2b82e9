//! Platform voice capability detection.
//!
//! Probed once at startup; the UI uses it to hide the mic and speaker
//! controls entirely when the platform engines are missing, instead of
//! failing on every press.

/// Which speech capabilities the platform engines offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VoiceCapability {
    pub recognition: bool,
    pub synthesis: bool,
}

impl VoiceCapability {
    /// Probe both engines once.
    pub fn detect(recognition: bool, synthesis: bool) -> Self {
        tracing::info!(recognition, synthesis, "Voice capabilities detected");
        Self {
            recognition,
            synthesis,
        }
    }

    /// Whether the mic button should be rendered at all.
    pub fn input_available(&self) -> bool {
        self.recognition
    }

    /// Whether the speaker toggle should be rendered at all.
    pub fn output_available(&self) -> bool {
        self.synthesis
    }
}

// =============================================================================
// Tests
// =============================================================================
