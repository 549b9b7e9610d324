//! Interfaces to the FriendZone REST backend.
//!
//! The backend itself is an external collaborator; only the call shapes are
//! defined here so the stores can be driven by in-memory fakes in tests.

use async_trait::async_trait;
use friendzone_social::previews::ChatPreview;
use friendzone_social::KnockRequest;
use serde::Deserialize;
use thiserror::Error;

/// Errors surfaced by REST collaborators.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Network(String),
    #[error("backend rejected the request: {0}")]
    Rejected(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// One page of the chat-preview listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPage {
    pub chats: Vec<ChatPreview>,
    pub total_pages: u32,
}

/// Chat listing endpoint.
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn get_user_chats(&self, token: &str, page: u32) -> Result<ChatPage>;
}

/// Knock endpoints. Approval rules live server-side; these calls only report
/// what the server decided.
#[async_trait]
pub trait KnockService: Send + Sync {
    async fn get_knockers(&self, token: &str) -> Result<Vec<KnockRequest>>;
    async fn get_knocked(&self, token: &str) -> Result<Vec<KnockRequest>>;
    async fn accept_knock(&self, id: &str, token: &str) -> Result<()>;
    async fn decline_knock(&self, id: &str, token: &str) -> Result<()>;
    async fn knock_back(&self, id: &str, token: &str) -> Result<()>;
}
