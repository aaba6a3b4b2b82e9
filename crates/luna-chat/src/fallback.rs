//! Deterministic offline fallback for failed chat turns.
//!
//! When the backend is unreachable (or reports failure), the widget never
//! shows a raw error: the outgoing user text is keyword-matched against a
//! fixed rule table and a canned answer is substituted for that turn. This
//! is a permanent substitute, not a retry.

use luna_core::config::ProfileConfig;

/// Canned initial suggestions used when the company-info preload fails.
pub const FALLBACK_INITIAL_QUESTIONS: [&str; 5] = [
    "What services do you offer?",
    "How can I contact your team?",
    "What results can I expect?",
    "How much do your solutions cost?",
    "Can you help with my project?",
];

/// Canned follow-up chips installed after a failed chat turn.
pub const FALLBACK_FOLLOW_UPS: [&str; 4] = [
    "What services do you offer?",
    "How can I contact your team?",
    "What are your pricing plans?",
    "Tell me about your team",
];

const CONNECTIVITY_PREFIX: &str = "I'm experiencing connectivity issues right now. ";

/// Synthesizes fallback answers from the configured company profile.
///
/// The rule table and its precedence are fixed; only the interpolated
/// contact details and roster come from configuration.
#[derive(Debug, Clone)]
pub struct FallbackResponder {
    profile: ProfileConfig,
}

impl FallbackResponder {
    pub fn new(profile: ProfileConfig) -> Self {
        Self { profile }
    }

    /// Deterministic canned answer for a failed turn, keyed on the
    /// outgoing user text. First matching rule wins.
    pub fn answer(&self, user_text: &str) -> String {
        let msg = user_text.to_lowercase();

        let body = if contains_any(&msg, &["service", "offer", "do"]) {
            format!(
                "We offer {}. Our services include smart chatbots, voice assistants, \
                 automation tools, and custom websites.",
                self.profile.services_line
            )
        } else if contains_any(&msg, &["contact", "reach", "call"]) {
            format!(
                "You can reach us at {} or call {}. We guarantee a 24-hour response time!",
                self.profile.contact_email, self.profile.contact_phone
            )
        } else if contains_any(&msg, &["price", "cost", "payment"]) {
            "Our pricing is tailored to your specific needs. Contact us for a personalized \
             quote and consultation."
                .to_string()
        } else if contains_any(&msg, &["team", "who"]) {
            format!("Our team includes {}.", self.profile.team.join(", "))
        } else {
            format!(
                "Please try asking about our services, pricing, or contact information. \
                 You can also reach us directly at {} or {}.",
                self.profile.contact_email, self.profile.contact_phone
            )
        };

        format!("{}{}", CONNECTIVITY_PREFIX, body)
    }

    /// The fixed four-item follow-up set shown after a failed turn.
    pub fn follow_ups(&self) -> Vec<String> {
        FALLBACK_FOLLOW_UPS.iter().map(|q| q.to_string()).collect()
    }

    /// The fixed five-item initial suggestion list used when the
    /// company-info preload fails.
    pub fn initial_questions() -> Vec<String> {
        FALLBACK_INITIAL_QUESTIONS
            .iter()
            .map(|q| q.to_string())
            .collect()
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn make_responder() -> FallbackResponder {
        FallbackResponder::new(ProfileConfig::default())
    }

    #[test]
    fn test_services_rule() {
        let r = make_responder();
        let answer = r.answer("What services do you offer?");
        assert!(answer.starts_with(CONNECTIVITY_PREFIX));
        assert!(answer.contains("We offer"));
        assert!(answer.contains("smart chatbots"));
    }

    #[test]
    fn test_contact_rule() {
        let r = make_responder();
        let answer = r.answer("How can I reach you?");
        assert!(answer.contains("hello@lunalabs.io"));
        assert!(answer.contains("24-hour response time"));
    }

    #[test]
    fn test_pricing_rule() {
        let r = make_responder();
        let answer = r.answer("how much is the cost?");
        assert!(answer.contains("pricing is tailored"));
    }

    #[test]
    fn test_team_rule() {
        let r = make_responder();
        let answer = r.answer("tell me about your team please");
        assert!(answer.contains("Our team includes"));
        assert!(answer.contains("Maya Lindqvist (Founder)"));
    }

    #[test]
    fn test_generic_rule() {
        let r = make_responder();
        let answer = r.answer("zzz qqq");
        assert!(answer.contains("Please try asking about"));
        assert!(answer.contains("hello@lunalabs.io"));
    }

    #[test]
    fn test_services_rule_precedes_contact() {
        let r = make_responder();
        // "do" belongs to the services group, which is checked before contact.
        let answer = r.answer("what do I call this");
        assert!(answer.contains("We offer"));
    }

    #[test]
    fn test_deterministic() {
        let r = make_responder();
        assert_eq!(r.answer("pricing?"), r.answer("pricing?"));
    }

    #[test]
    fn test_case_insensitive_matching() {
        let r = make_responder();
        let answer = r.answer("WHO ARE YOU");
        assert!(answer.contains("Our team includes"));
    }

    #[test]
    fn test_follow_ups_fixed_four() {
        let r = make_responder();
        let follow_ups = r.follow_ups();
        assert_eq!(follow_ups.len(), 4);
        assert_eq!(follow_ups[0], "What services do you offer?");
        assert_eq!(follow_ups[3], "Tell me about your team");
    }

    #[test]
    fn test_initial_questions_fixed_five() {
        let initial = FallbackResponder::initial_questions();
        assert_eq!(initial.len(), 5);
        assert_eq!(initial[0], "What services do you offer?");
        assert_eq!(initial[4], "Can you help with my project?");
    }

    #[test]
    fn test_custom_profile_interpolated() {
        let profile = ProfileConfig {
            contact_email: "us@example.org".to_string(),
            contact_phone: "+44 20 0000 0000".to_string(),
            team: vec!["Ada (CTO)".to_string()],
            services_line: "bespoke compilers".to_string(),
        };
        let r = FallbackResponder::new(profile);

        assert!(r.answer("contact?").contains("us@example.org"));
        assert!(r.answer("your team?").contains("Ada (CTO)"));
        assert!(r.answer("services?").contains("bespoke compilers"));
    }
}
