//! HTTP client for the Luna chat backend.
//!
//! Wraps the two endpoints the widget consumes (`POST /api/chat` and
//! `GET /api/company-info`) behind the [`ChatBackend`] trait so the
//! conversation orchestrator can be driven by a scripted double in tests.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ChatBackend, HttpBackend};
pub use error::BackendError;
pub use types::{
    ChatApiRequest, ChatApiResponse, ChatPayload, CompanyInfoPayload, CompanyInfoResponse,
    HistoryMessage,
};
