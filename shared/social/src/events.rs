//! Realtime channel payloads and their wire representation.
//!
//! Socket frames arrive as `{"event": <name>, "payload": <body>}`; the event
//! names below match the backend's emitter verbatim.

use crate::previews::ChatPreview;
use crate::{KnockRequest, Result};
use serde::{Deserialize, Serialize};

/// Partial chat preview carried by `chatPreviewUpdate`. Absent fields keep
/// their current value when merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPreviewDelta {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub unread_count: Option<u32>,
    #[serde(default)]
    pub is_restricted: Option<bool>,
    #[serde(default)]
    pub first_message_by_knocker_id: Option<String>,
}

/// Events emitted on the shared realtime channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum ChatEvent {
    /// A chat was created for the current user (complete preview).
    NewChat(ChatPreview),
    /// Server confirmation of a chat the current user created; handled the
    /// same way as `NewChat`.
    ChatCreatedConfirmation(ChatPreview),
    /// Incremental update to an existing preview.
    ChatPreviewUpdate(ChatPreviewDelta),
    /// Some participant read a chat; only the current user's own reads clear
    /// the unread badge.
    #[serde(rename_all = "camelCase")]
    MessagesRead { chat_id: String, user_id: String },
    /// A knock changed state server-side.
    KnockStatusChanged(KnockRequest),
}

/// Decode a raw socket frame. Malformed frames are a recoverable error.
pub fn decode_event(frame: &str) -> Result<ChatEvent> {
    Ok(serde_json::from_str(frame)?)
}
