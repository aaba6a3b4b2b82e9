//! Conversation-phase classifier.
//!
//! Reclassifies the coarse topic tag after every bot turn by scanning the
//! lowered answer text against an ordered list of keyword groups. The
//! order is significant: contact beats pricing beats results beats team
//! beats process, and anything unmatched lands in `General`.

use luna_core::ConversationPhase;

const CONTACT_KEYWORDS: &[&str] = &["call", "contact", "email"];
const PRICING_KEYWORDS: &[&str] = &["pricing", "cost", "investment"];
const RESULTS_KEYWORDS: &[&str] = &["result", "%", "growth"];
const PROCESS_KEYWORDS: &[&str] = &["process", "discover", "build"];

/// Classifies bot answers into a [`ConversationPhase`].
///
/// Total and deterministic: the same lowered text always yields the same
/// phase, and every input yields some phase.
#[derive(Debug, Clone)]
pub struct ContextClassifier {
    /// Lowered first-name tokens of the team roster, matched alongside the
    /// literal "team" keyword.
    team_tokens: Vec<String>,
}

impl ContextClassifier {
    /// Build a classifier whose team-phase group includes the first names
    /// from `team` roster entries (formatted as "Name (Role)").
    pub fn new(team: &[String]) -> Self {
        let team_tokens = team
            .iter()
            .filter_map(|entry| entry.split_whitespace().next())
            .map(|name| name.to_lowercase())
            .collect();
        Self { team_tokens }
    }

    /// Classify a bot answer. First matching group wins.
    pub fn reclassify(&self, answer: &str) -> ConversationPhase {
        let text = answer.to_lowercase();

        if contains_any(&text, CONTACT_KEYWORDS) {
            ConversationPhase::ContactPhase
        } else if contains_any(&text, PRICING_KEYWORDS) {
            ConversationPhase::PricingPhase
        } else if contains_any(&text, RESULTS_KEYWORDS) {
            ConversationPhase::ResultsPhase
        } else if text.contains("team") || self.team_tokens.iter().any(|t| text.contains(t.as_str()))
        {
            ConversationPhase::TeamPhase
        } else if contains_any(&text, PROCESS_KEYWORDS) {
            ConversationPhase::ProcessPhase
        } else {
            ConversationPhase::General
        }
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

// =============================================================================
// Tests
// =============================================================================
