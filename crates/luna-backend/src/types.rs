//! Wire types for the chat backend API.
//!
//! Field names mirror the backend's JSON contract exactly (camelCase, with
//! the history entries keyed by `type` rather than `role`).

use serde::{Deserialize, Serialize};

use luna_core::{ConversationPhase, Message, Role};

/// One entry of the trailing conversation history sent with each turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryMessage {
    #[serde(rename = "type")]
    pub role: Role,
    pub content: String,
}

impl From<&Message> for HistoryMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.role,
            content: msg.content.clone(),
        }
    }
}

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatApiRequest {
    pub message: String,
    pub conversation_history: Vec<HistoryMessage>,
    pub used_questions: Vec<String>,
    pub conversation_context: ConversationPhase,
}

/// Response envelope for `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatApiResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<ChatPayload>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The answer payload of a successful chat turn.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPayload {
    pub answer: String,
    #[serde(default, rename = "matchedFAQ")]
    pub matched_faq: Option<String>,
    #[serde(default)]
    pub follow_up_questions: Option<Vec<String>>,
}

/// Response envelope for `GET /api/company-info`.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyInfoResponse {
    pub data: CompanyInfoPayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfoPayload {
    #[serde(default)]
    pub suggested_questions: Vec<String>,
}

// =============================================================================
// Tests
// =============================================================================
