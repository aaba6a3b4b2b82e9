//! Conversation orchestrator: owns one widget session and mediates turns.
//!
//! Every user turn flows through here: validate, append the user message,
//! call the backend, then either apply the server answer or synthesize the
//! deterministic fallback. The awaiting flag is cleared in a final step on
//! both paths, and no turn ever surfaces a raw error to the user.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use luna_backend::{ChatApiRequest, ChatBackend, HistoryMessage};
use luna_core::config::LunaConfig;
use luna_core::{ConversationPhase, Message, MessageIdAllocator, SuggestionSet};

use crate::classifier::ContextClassifier;
use crate::error::ChatError;
use crate::fallback::FallbackResponder;
use crate::suggestions::UsedQuestions;

/// Conversation state for one mounted widget instance.
///
/// Lives for the lifetime of the widget; reset only by a full reload.
#[derive(Debug)]
pub struct Session {
    /// Identity for log correlation across turns.
    pub id: Uuid,
    /// Append-only ordered message history.
    pub messages: Vec<Message>,
    /// Suggestion chips (initial pool + rotating follow-ups).
    pub suggestions: SuggestionSet,
    /// Questions already clicked this session.
    pub used: UsedQuestions,
    /// Coarse topic tag, reclassified after each bot turn.
    pub phase: ConversationPhase,
    /// Text currently in the input box (voice interim results land here).
    pub pending_input: String,
    /// True while a chat call is outstanding (renders the typing
    /// indicator and disables submission).
    pub awaiting_response: bool,
    ids: MessageIdAllocator,
}

impl Session {
    fn new(used_reset_threshold: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
            suggestions: SuggestionSet::default(),
            used: UsedQuestions::new(used_reset_threshold),
            phase: ConversationPhase::Initial,
            pending_input: String::new(),
            awaiting_response: false,
            ids: MessageIdAllocator::new(),
        }
    }
}

/// What one completed turn produced, for the caller to render and speak.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub user_message: Message,
    pub bot_message: Message,
    /// Follow-up chips displayed after this turn.
    pub follow_ups: Vec<String>,
    pub phase: ConversationPhase,
    /// Whether the answer came from the offline fallback table.
    pub used_fallback: bool,
    /// Text to auto-speak after the arrival delay. Present only when the
    /// response carried follow-up questions (the original widget couples
    /// these two; preserved as specified).
    pub auto_speak: Option<String>,
}

/// Central coordinator for the conversation state machine.
pub struct ConversationOrchestrator {
    backend: Arc<dyn ChatBackend>,
    classifier: ContextClassifier,
    fallback: FallbackResponder,
    config: LunaConfig,
    session: Session,
}

impl ConversationOrchestrator {
    pub fn new(config: LunaConfig, backend: Arc<dyn ChatBackend>) -> Self {
        let classifier = ContextClassifier::new(&config.profile.team);
        let fallback = FallbackResponder::new(config.profile.clone());
        let session = Session::new(config.suggestions.used_reset_threshold);
        Self {
            backend,
            classifier,
            fallback,
            config,
            session,
        }
    }

    /// Seed the welcome message and preload the initial suggestion pool.
    ///
    /// The preload never surfaces an error: on any failure the fixed
    /// fallback list is substituted.
    pub async fn initialize(&mut self) {
        if self.session.messages.is_empty() {
            let welcome = format!(
                "Hi! I'm {}, your AI assistant from {}. I'm here to help answer any \
                 questions about our services, pricing, or how we can help your business. \
                 What would you like to know?",
                self.config.chat.assistant_name, self.config.chat.company_name
            );
            let id = self.session.ids.next();
            self.session.messages.push(Message::bot(id, welcome));
        }

        let initial = match self.backend.company_info().await {
            Ok(questions) if !questions.is_empty() => questions,
            Ok(_) => {
                debug!("Company info returned no questions; using fallback list");
                FallbackResponder::initial_questions()
            }
            Err(e) => {
                warn!(error = %e, "Company info preload failed; using fallback list");
                FallbackResponder::initial_questions()
            }
        };
        self.session.suggestions = SuggestionSet::with_initial(initial);
        info!(session_id = %self.session.id, "Conversation initialized");
    }

    /// Send a typed user turn.
    ///
    /// Empty or whitespace-only input is rejected as a no-op. Appends
    /// exactly one user message and exactly one bot message (server answer
    /// or fallback) per call.
    pub async fn send_turn(&mut self, text: &str) -> Result<TurnOutcome, ChatError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let history: Vec<HistoryMessage> = self
            .session
            .messages
            .iter()
            .rev()
            .take(self.config.chat.history_window)
            .rev()
            .map(HistoryMessage::from)
            .collect();

        let user_id = self.session.ids.next();
        let user_message = Message::user(user_id, trimmed);
        self.session.messages.push(user_message.clone());
        self.session.pending_input.clear();
        self.session.awaiting_response = true;
        self.session.suggestions.hide_initial();

        let request = ChatApiRequest {
            message: trimmed.to_string(),
            conversation_history: history,
            used_questions: self.session.used.as_slice().to_vec(),
            conversation_context: self.session.phase,
        };

        let outcome = match self.backend.send_chat(request).await {
            Ok(payload) => {
                let bot_id = self.session.ids.next();
                let bot_message = Message::bot(bot_id, payload.answer.clone())
                    .with_matched_faq(payload.matched_faq.clone());
                self.session.messages.push(bot_message.clone());

                self.session.phase = self.classifier.reclassify(&payload.answer);

                let auto_speak = match payload.follow_up_questions {
                    Some(follow_ups) => {
                        let fresh = self.session.used.filter_fresh(follow_ups);
                        self.session.suggestions.set_follow_ups(fresh);
                        Some(payload.answer.clone())
                    }
                    None => None,
                };

                if self.session.used.maybe_reset() {
                    debug!("Used-question set reset after successful turn");
                }

                TurnOutcome {
                    user_message,
                    bot_message,
                    follow_ups: self.session.suggestions.follow_ups.clone(),
                    phase: self.session.phase,
                    used_fallback: false,
                    auto_speak,
                }
            }
            Err(e) => {
                warn!(error = %e, "Chat call failed; substituting fallback answer");

                let answer = self.fallback.answer(trimmed);
                let bot_id = self.session.ids.next();
                let bot_message = Message::bot(bot_id, answer);
                self.session.messages.push(bot_message.clone());
                self.session
                    .suggestions
                    .set_follow_ups(self.fallback.follow_ups());

                TurnOutcome {
                    user_message,
                    bot_message,
                    follow_ups: self.session.suggestions.follow_ups.clone(),
                    phase: self.session.phase,
                    used_fallback: true,
                    auto_speak: None,
                }
            }
        };

        // Cleared last, on every path.
        self.session.awaiting_response = false;
        Ok(outcome)
    }

    /// Send a clicked suggestion chip, recording it in the used set first.
    pub async fn send_suggestion(&mut self, question: &str) -> Result<TurnOutcome, ChatError> {
        self.session.used.record(question);
        self.send_turn(question).await
    }

    /// Update the pending input text (typed or voice interim transcript).
    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.session.pending_input = text.into();
    }

    /// The chips currently displayed under the conversation.
    pub fn displayed_suggestions(&self) -> &[String] {
        self.session
            .suggestions
            .displayed(self.config.suggestions.initial_shown)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn messages(&self) -> &[Message] {
        &self.session.messages
    }

    pub fn phase(&self) -> ConversationPhase {
        self.session.phase
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.session.awaiting_response
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use luna_backend::{BackendError, ChatPayload};
    use luna_core::Role;

    /// Scripted backend double: pops one scripted result per chat call.
    struct ScriptedBackend {
        info: Mutex<Option<Vec<String>>>,
        turns: Mutex<VecDeque<Result<ChatPayload, ()>>>,
        requests: Mutex<Vec<ChatApiRequest>>,
    }

    impl ScriptedBackend {
        fn new(info: Option<Vec<String>>) -> Self {
            Self {
                info: Mutex::new(info),
                turns: Mutex::new(VecDeque::new()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn script_answer(&self, answer: &str, follow_ups: Option<Vec<&str>>) {
            self.turns.lock().unwrap().push_back(Ok(ChatPayload {
                answer: answer.to_string(),
                matched_faq: None,
                follow_up_questions: follow_ups
                    .map(|qs| qs.into_iter().map(String::from).collect()),
            }));
        }

        fn script_failure(&self) {
            self.turns.lock().unwrap().push_back(Err(()));
        }

        fn last_request(&self) -> ChatApiRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn send_chat(&self, request: ChatApiRequest) -> Result<ChatPayload, BackendError> {
            self.requests.lock().unwrap().push(request);
            match self.turns.lock().unwrap().pop_front() {
                Some(Ok(payload)) => Ok(payload),
                _ => Err(BackendError::Api("503 scripted outage".to_string())),
            }
        }

        async fn company_info(&self) -> Result<Vec<String>, BackendError> {
            match self.info.lock().unwrap().clone() {
                Some(questions) => Ok(questions),
                None => Err(BackendError::Api("blocked".to_string())),
            }
        }
    }

    async fn make_orchestrator(
        info: Option<Vec<String>>,
    ) -> (ConversationOrchestrator, Arc<ScriptedBackend>) {
        let backend = Arc::new(ScriptedBackend::new(info));
        let mut orch =
            ConversationOrchestrator::new(LunaConfig::default(), backend.clone());
        orch.initialize().await;
        (orch, backend)
    }

    // ---- Initialization ----

    #[tokio::test]
    async fn test_initialize_seeds_welcome_message() {
        let (orch, _) = make_orchestrator(Some(vec!["Q1".to_string()])).await;
        assert_eq!(orch.messages().len(), 1);
        assert_eq!(orch.messages()[0].role, Role::Bot);
        assert!(orch.messages()[0].content.contains("Luna"));
        assert!(orch.messages()[0].content.contains("Luna Labs"));
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent_for_welcome() {
        let (mut orch, _) = make_orchestrator(Some(vec!["Q1".to_string()])).await;
        orch.initialize().await;
        assert_eq!(orch.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_initialize_loads_suggestions() {
        let (orch, _) =
            make_orchestrator(Some(vec!["Q1".to_string(), "Q2".to_string()])).await;
        assert_eq!(orch.displayed_suggestions(), ["Q1", "Q2"]);
    }

    #[tokio::test]
    async fn test_initialize_preload_failure_uses_fallback_list() {
        let (orch, _) = make_orchestrator(None).await;
        // Five canned questions, capped at the display limit of four.
        assert_eq!(orch.displayed_suggestions().len(), 4);
        assert_eq!(orch.displayed_suggestions()[0], "What services do you offer?");
        assert_eq!(orch.session().suggestions.initial.len(), 5);
    }

    #[tokio::test]
    async fn test_initialize_empty_preload_uses_fallback_list() {
        let (orch, _) = make_orchestrator(Some(vec![])).await;
        assert_eq!(orch.session().suggestions.initial.len(), 5);
    }

    #[tokio::test]
    async fn test_initial_phase() {
        let (orch, _) = make_orchestrator(Some(vec![])).await;
        assert_eq!(orch.phase(), ConversationPhase::Initial);
    }

    // ---- Turn validation ----

    #[tokio::test]
    async fn test_empty_turn_is_noop() {
        let (mut orch, _) = make_orchestrator(Some(vec![])).await;
        let before = orch.messages().len();
        assert!(matches!(
            orch.send_turn("").await,
            Err(ChatError::EmptyMessage)
        ));
        assert!(matches!(
            orch.send_turn("   \t\n").await,
            Err(ChatError::EmptyMessage)
        ));
        assert_eq!(orch.messages().len(), before);
    }

    // ---- Exactly one user + one bot message per turn ----

    #[tokio::test]
    async fn test_turn_appends_exactly_one_pair_on_success() {
        let (mut orch, backend) = make_orchestrator(Some(vec![])).await;
        backend.script_answer("Hello!", Some(vec!["More?"]));

        let before = orch.messages().len();
        let outcome = orch.send_turn("hi").await.unwrap();
        assert_eq!(orch.messages().len(), before + 2);
        assert_eq!(outcome.user_message.role, Role::User);
        assert_eq!(outcome.bot_message.role, Role::Bot);
        assert!(!outcome.used_fallback);
    }

    #[tokio::test]
    async fn test_turn_appends_exactly_one_pair_on_failure() {
        let (mut orch, backend) = make_orchestrator(Some(vec![])).await;
        backend.script_failure();

        let before = orch.messages().len();
        let outcome = orch.send_turn("hi").await.unwrap();
        assert_eq!(orch.messages().len(), before + 2);
        assert!(outcome.used_fallback);
    }

    #[tokio::test]
    async fn test_input_is_trimmed() {
        let (mut orch, backend) = make_orchestrator(Some(vec![])).await;
        backend.script_answer("ok", None);
        let outcome = orch.send_turn("  hello  ").await.unwrap();
        assert_eq!(outcome.user_message.content, "hello");
    }

    #[tokio::test]
    async fn test_message_ids_monotonic() {
        let (mut orch, backend) = make_orchestrator(Some(vec![])).await;
        backend.script_answer("a", None);
        backend.script_answer("b", None);
        orch.send_turn("one").await.unwrap();
        orch.send_turn("two").await.unwrap();

        let ids: Vec<i64> = orch.messages().iter().map(|m| m.id).collect();
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    // ---- Awaiting flag ----

    #[tokio::test]
    async fn test_awaiting_cleared_after_success() {
        let (mut orch, backend) = make_orchestrator(Some(vec![])).await;
        backend.script_answer("ok", None);
        orch.send_turn("hi").await.unwrap();
        assert!(!orch.is_awaiting_response());
    }

    #[tokio::test]
    async fn test_awaiting_cleared_after_failure() {
        let (mut orch, backend) = make_orchestrator(Some(vec![])).await;
        backend.script_failure();
        orch.send_turn("hi").await.unwrap();
        assert!(!orch.is_awaiting_response());
    }

    // ---- Request payload ----

    #[tokio::test]
    async fn test_request_carries_history_window() {
        let (mut orch, backend) = make_orchestrator(Some(vec![])).await;
        for i in 0..5 {
            backend.script_answer(&format!("answer {}", i), None);
            orch.send_turn(&format!("question {}", i)).await.unwrap();
        }

        // History excludes the message being sent and is capped at 4.
        let req = backend.last_request();
        assert_eq!(req.conversation_history.len(), 4);
        assert_eq!(req.message, "question 4");
        assert_eq!(
            req.conversation_history.last().unwrap().content,
            "answer 3"
        );
    }

    #[tokio::test]
    async fn test_request_carries_used_and_phase() {
        let (mut orch, backend) = make_orchestrator(Some(vec![])).await;
        backend.script_answer("Our pricing is flexible.", Some(vec!["More?"]));
        orch.send_suggestion("How much do your solutions cost?")
            .await
            .unwrap();

        backend.script_answer("ok", None);
        orch.send_turn("next").await.unwrap();

        let req = backend.last_request();
        assert_eq!(
            req.used_questions,
            vec!["How much do your solutions cost?".to_string()]
        );
        assert_eq!(req.conversation_context, ConversationPhase::PricingPhase);
    }

    // ---- Follow-up rotation ----

    #[tokio::test]
    async fn test_follow_ups_filtered_against_used() {
        let (mut orch, backend) = make_orchestrator(Some(vec![])).await;

        // Use "Contact us?" first so the follow-up set must exclude it.
        backend.script_answer("Sure.", Some(vec![]));
        orch.send_suggestion("Contact us?").await.unwrap();

        backend.script_answer(
            "Our pricing...",
            Some(vec!["Contact us?", "Team info?"]),
        );
        let outcome = orch.send_turn("pricing please").await.unwrap();

        assert_eq!(outcome.follow_ups, vec!["Team info?".to_string()]);
        assert_eq!(outcome.phase, ConversationPhase::PricingPhase);
        assert_eq!(orch.displayed_suggestions(), ["Team info?"]);
    }

    #[tokio::test]
    async fn test_follow_ups_kept_when_response_has_none() {
        let (mut orch, backend) = make_orchestrator(Some(vec![])).await;
        backend.script_answer("first", Some(vec!["Keep me"]));
        orch.send_turn("one").await.unwrap();

        backend.script_answer("second", None);
        let outcome = orch.send_turn("two").await.unwrap();
        assert_eq!(outcome.follow_ups, vec!["Keep me".to_string()]);
    }

    #[tokio::test]
    async fn test_first_turn_hides_initial_suggestions() {
        let (mut orch, backend) = make_orchestrator(Some(vec!["Q1".to_string()])).await;
        assert_eq!(orch.displayed_suggestions(), ["Q1"]);

        backend.script_answer("ok", None);
        orch.send_turn("hi").await.unwrap();
        assert!(orch.displayed_suggestions().is_empty());
    }

    // ---- Used-question freshness reset ----

    #[tokio::test]
    async fn test_used_set_resets_past_threshold() {
        let (mut orch, backend) = make_orchestrator(Some(vec![])).await;

        for i in 0..9 {
            backend.script_answer("ok", Some(vec![]));
            orch.send_suggestion(&format!("question {}", i)).await.unwrap();
        }
        // Ninth entry pushed the set past 8, so it was cleared.
        assert!(orch.session().used.is_empty());
    }

    #[tokio::test]
    async fn test_used_set_grows_below_threshold() {
        let (mut orch, backend) = make_orchestrator(Some(vec![])).await;
        for i in 0..8 {
            backend.script_answer("ok", Some(vec![]));
            orch.send_suggestion(&format!("question {}", i)).await.unwrap();
        }
        assert_eq!(orch.session().used.len(), 8);
    }

    // ---- Fallback path ----

    #[tokio::test]
    async fn test_offline_services_scenario() {
        let (mut orch, backend) = make_orchestrator(None).await;
        backend.script_failure();

        let outcome = orch.send_turn("What services do you offer?").await.unwrap();
        assert!(outcome.used_fallback);
        assert!(outcome.bot_message.content.contains("We offer"));
        assert!(outcome
            .bot_message
            .content
            .starts_with("I'm experiencing connectivity issues"));
        assert_eq!(
            outcome.follow_ups,
            vec![
                "What services do you offer?".to_string(),
                "How can I contact your team?".to_string(),
                "What are your pricing plans?".to_string(),
                "Tell me about your team".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_fallback_keeps_phase() {
        let (mut orch, backend) = make_orchestrator(Some(vec![])).await;
        backend.script_answer("Our pricing is simple.", Some(vec![]));
        orch.send_turn("pricing").await.unwrap();
        assert_eq!(orch.phase(), ConversationPhase::PricingPhase);

        backend.script_failure();
        orch.send_turn("unrelated").await.unwrap();
        assert_eq!(orch.phase(), ConversationPhase::PricingPhase);
    }

    #[tokio::test]
    async fn test_fallback_does_not_auto_speak() {
        let (mut orch, backend) = make_orchestrator(Some(vec![])).await;
        backend.script_failure();
        let outcome = orch.send_turn("hello").await.unwrap();
        assert!(outcome.auto_speak.is_none());
    }

    // ---- Auto-speak coupling ----

    #[tokio::test]
    async fn test_auto_speak_present_with_follow_ups() {
        let (mut orch, backend) = make_orchestrator(Some(vec![])).await;
        backend.script_answer("Spoken answer.", Some(vec!["More?"]));
        let outcome = orch.send_turn("hi").await.unwrap();
        assert_eq!(outcome.auto_speak.as_deref(), Some("Spoken answer."));
    }

    #[tokio::test]
    async fn test_auto_speak_absent_without_follow_ups() {
        let (mut orch, backend) = make_orchestrator(Some(vec![])).await;
        backend.script_answer("Silent answer.", None);
        let outcome = orch.send_turn("hi").await.unwrap();
        assert!(outcome.auto_speak.is_none());
    }

    // ---- Matched FAQ ----

    #[tokio::test]
    async fn test_matched_faq_carried_onto_message() {
        let (mut orch, backend) = make_orchestrator(Some(vec![])).await;
        backend.turns.lock().unwrap().push_back(Ok(ChatPayload {
            answer: "From the FAQ.".to_string(),
            matched_faq: Some("services".to_string()),
            follow_up_questions: None,
        }));
        let outcome = orch.send_turn("hi").await.unwrap();
        assert_eq!(outcome.bot_message.matched_faq.as_deref(), Some("services"));
    }

    // ---- Pending input ----

    #[tokio::test]
    async fn test_pending_input_cleared_on_send() {
        let (mut orch, backend) = make_orchestrator(Some(vec![])).await;
        orch.set_pending_input("draft text");
        assert_eq!(orch.session().pending_input, "draft text");

        backend.script_answer("ok", None);
        orch.send_turn("draft text").await.unwrap();
        assert!(orch.session().pending_input.is_empty());
    }

    // ---- Reclassification over a conversation ----

    #[tokio::test]
    async fn test_phase_follows_answers() {
        let (mut orch, backend) = make_orchestrator(Some(vec![])).await;

        backend.script_answer("Email us at hello@lunalabs.io.", Some(vec![]));
        orch.send_turn("how do I get in touch").await.unwrap();
        assert_eq!(orch.phase(), ConversationPhase::ContactPhase);

        backend.script_answer("We saw 40% growth for clients.", Some(vec![]));
        orch.send_turn("numbers?").await.unwrap();
        assert_eq!(orch.phase(), ConversationPhase::ResultsPhase);

        backend.script_answer("Happy to help!", Some(vec![]));
        orch.send_turn("thanks").await.unwrap();
        assert_eq!(orch.phase(), ConversationPhase::General);
    }
}
