//! Chat preview rows and the ordering rules applied to them.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Placeholder bodies the backend emits for chats with no real activity.
/// Previews carrying one of these are hidden from the list.
const PLACEHOLDER_LAST_MESSAGES: [&str; 2] = ["No messages yet", "Start chatting!"];

/// Summary row representing a conversation's latest state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPreview {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub last_message: String,
    /// RFC 3339 string; previews with an unparsable timestamp sort last.
    pub timestamp: String,
    #[serde(default)]
    pub unread_count: u32,
    #[serde(default)]
    pub is_restricted: bool,
    /// Set when the chat was opened by a knocker's first message.
    #[serde(default)]
    pub first_message_by_knocker_id: Option<String>,
}

/// Parse a preview timestamp, `None` when it is not valid RFC 3339.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).ok()
}

/// Whether a preview represents a conversation with real activity.
pub fn has_real_activity(preview: &ChatPreview) -> bool {
    !preview.last_message.is_empty()
        && !PLACEHOLDER_LAST_MESSAGES.contains(&preview.last_message.as_str())
}

/// Most recent first; unparsable timestamps sort last (treated as oldest).
/// Equal or equally-unparsable timestamps tie-break by id ascending so the
/// order is fully deterministic.
pub fn compare_by_recency(a: &ChatPreview, b: &ChatPreview) -> Ordering {
    match (parse_timestamp(&a.timestamp), parse_timestamp(&b.timestamp)) {
        (Some(ta), Some(tb)) => tb.cmp(&ta).then_with(|| a.id.cmp(&b.id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    }
}
