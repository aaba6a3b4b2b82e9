//! Chat backend client over HTTP (JSON, CORS-style, no authentication).

use std::time::Duration;

use async_trait::async_trait;

use crate::error::BackendError;
use crate::types::{ChatApiRequest, ChatApiResponse, ChatPayload, CompanyInfoResponse};

/// The two calls the widget issues against the backend.
///
/// The orchestrator depends on this trait rather than on [`HttpBackend`]
/// directly so conversation logic can be tested against scripted doubles.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// `POST /api/chat` with one user turn.
    async fn send_chat(&self, request: ChatApiRequest) -> Result<ChatPayload, BackendError>;

    /// `GET /api/company-info`, returning the initial suggested questions.
    async fn company_info(&self) -> Result<Vec<String>, BackendError>;
}

/// Client for the Luna chat backend HTTP API.
#[derive(Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Build a client for the given base URL (trailing slash tolerated).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// The configured base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send_chat(&self, request: ChatApiRequest) -> Result<ChatPayload, BackendError> {
        let url = format!("{}/api/chat", self.base_url);
        tracing::debug!(context = %request.conversation_context, "Sending chat turn");
        let res = self.client.post(&url).json(&request).send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(BackendError::Api(format!("{} {}", status, body)));
        }

        let envelope: ChatApiResponse = res.json().await?;
        if !envelope.success {
            return Err(BackendError::Rejected(
                envelope
                    .error
                    .unwrap_or_else(|| "backend reported failure".to_string()),
            ));
        }
        envelope
            .data
            .ok_or_else(|| BackendError::Rejected("success without payload".to_string()))
    }

    async fn company_info(&self) -> Result<Vec<String>, BackendError> {
        let url = format!("{}/api/company-info", self.base_url);
        let res = self.client.get(&url).send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(BackendError::Api(format!("{} {}", status, body)));
        }

        let envelope: CompanyInfoResponse = res.json().await?;
        Ok(envelope.data.suggested_questions)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let backend = HttpBackend::new("https://api.example.com/", Duration::from_secs(5)).unwrap();
        assert_eq!(backend.base_url(), "https://api.example.com");
    }

    #[test]
    fn test_base_url_without_slash_kept() {
        let backend = HttpBackend::new("https://api.example.com", Duration::from_secs(5)).unwrap();
        assert_eq!(backend.base_url(), "https://api.example.com");
    }

    #[test]
    fn test_backend_is_cloneable() {
        let backend = HttpBackend::new("http://localhost:4000", Duration::from_secs(5)).unwrap();
        let clone = backend.clone();
        assert_eq!(backend.base_url(), clone.base_url());
    }
}
