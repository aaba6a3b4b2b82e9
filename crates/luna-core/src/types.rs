//! Shared domain types for the Luna chat widget.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Bot => write!(f, "bot"),
        }
    }
}

/// Coarse topic tag for the current conversation, reclassified after every
/// bot turn. The backend uses it to pick better follow-up questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPhase {
    Initial,
    ContactPhase,
    PricingPhase,
    ResultsPhase,
    TeamPhase,
    ProcessPhase,
    General,
}

impl ConversationPhase {
    /// Wire representation, matching the backend's `conversationContext`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationPhase::Initial => "initial",
            ConversationPhase::ContactPhase => "contact_phase",
            ConversationPhase::PricingPhase => "pricing_phase",
            ConversationPhase::ResultsPhase => "results_phase",
            ConversationPhase::TeamPhase => "team_phase",
            ConversationPhase::ProcessPhase => "process_phase",
            ConversationPhase::General => "general",
        }
    }
}

impl fmt::Display for ConversationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single chat message. Immutable once appended; the session owns an
/// append-only ordered sequence of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Monotonic, time-derived identifier (epoch milliseconds, bumped on
    /// collision so two messages in the same millisecond stay ordered).
    pub id: i64,
    pub role: Role,
    pub content: String,
    /// Display timestamp, e.g. "14:05".
    pub timestamp: String,
    /// FAQ entry the backend matched this answer against, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_faq: Option<String>,
    #[serde(default)]
    pub is_error: bool,
}

impl Message {
    /// Build a user message with the given id.
    pub fn user(id: i64, content: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::User,
            content: content.into(),
            timestamp: display_time(),
            matched_faq: None,
            is_error: false,
        }
    }

    /// Build a bot message with the given id.
    pub fn bot(id: i64, content: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::Bot,
            content: content.into(),
            timestamp: display_time(),
            matched_faq: None,
            is_error: false,
        }
    }

    /// Attach the FAQ the backend matched.
    pub fn with_matched_faq(mut self, faq: Option<String>) -> Self {
        self.matched_faq = faq;
        self
    }
}

/// Current local time formatted for message bubbles.
pub fn display_time() -> String {
    Local::now().format("%H:%M").to_string()
}

/// Allocates monotonic, time-derived message ids.
///
/// Ids are epoch milliseconds; if two allocations land in the same
/// millisecond (or the clock steps backwards) the id is bumped past the
/// previous one so ordering by id always matches append order.
#[derive(Debug, Default)]
pub struct MessageIdAllocator {
    last: i64,
}

impl MessageIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id, strictly greater than any previously returned.
    pub fn next(&mut self) -> i64 {
        let now = Local::now().timestamp_millis();
        let id = if now > self.last { now } else { self.last + 1 };
        self.last = id;
        id
    }
}

/// The two disjoint suggestion pools displayed under the conversation.
///
/// The initial pool is fetched once at mount and shown until the first
/// turn; the follow-up pool is replaced after every bot turn, already
/// filtered against the used-question set by the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSet {
    pub initial: Vec<String>,
    pub follow_ups: Vec<String>,
    /// Whether the initial pool is the one currently displayed.
    pub show_initial: bool,
}

impl SuggestionSet {
    /// Seed the initial pool at mount time.
    pub fn with_initial(initial: Vec<String>) -> Self {
        Self {
            initial,
            follow_ups: Vec::new(),
            show_initial: true,
        }
    }

    /// Hide the initial chips (called when the first turn is sent).
    pub fn hide_initial(&mut self) {
        self.show_initial = false;
    }

    /// Replace the follow-up pool after a bot turn.
    pub fn set_follow_ups(&mut self, follow_ups: Vec<String>) {
        self.follow_ups = follow_ups;
        self.show_initial = false;
    }

    /// The chips currently displayed: at most `initial_limit` of the
    /// initial pool before the first turn, the follow-up pool after.
    pub fn displayed(&self, initial_limit: usize) -> &[String] {
        if self.show_initial {
            &self.initial[..self.initial.len().min(initial_limit)]
        } else {
            &self.follow_ups
        }
    }
}

/// Transient voice state mirroring the underlying speech engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceState {
    pub listening: bool,
    pub speaking: bool,
    pub output_enabled: bool,
}

impl Default for VoiceState {
    fn default() -> Self {
        Self {
            listening: false,
            speaking: false,
            output_enabled: true,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
