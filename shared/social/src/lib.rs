//! Social-graph models shared across FriendZone client crates.

pub mod events;
pub mod knocks;
pub mod previews;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimal public profile of a counterparty user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Lifecycle of a knock as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KnockStatus {
    /// Knock sent, not yet acted on by the recipient.
    Pending,
    /// One direction accepted, the other still outstanding.
    Onesidedlock,
    /// Both directions accepted; the users are mutual.
    LockedIn,
    /// Knock rejected by the recipient.
    Declined,
}

impl KnockStatus {
    /// Raw wire string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            KnockStatus::Pending => "pending",
            KnockStatus::Onesidedlock => "onesidedlock",
            KnockStatus::LockedIn => "lockedIn",
            KnockStatus::Declined => "declined",
        }
    }
}

impl fmt::Display for KnockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directional knock edge in the social graph.
///
/// `user` is always the counterparty, never the current user. The same
/// logical relationship may appear once in a "received" list and once in a
/// "sent" list; consumers dedup by [`knocks::pair_key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnockRequest {
    pub id: String,
    pub user: UserSummary,
    pub status: KnockStatus,
    /// Creation/update time as an RFC 3339 string.
    pub timestamp: String,
}

/// Relationship of another user to the current user, derived from the two
/// knock lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Relation {
    Stranger,
    /// The other user knocked me.
    Knocker,
    /// I knocked the other user.
    Knocked,
    LockedIn,
}

/// Errors raised while decoding social-graph wire data.
#[derive(Debug, thiserror::Error)]
pub enum SocialError {
    #[error("malformed event frame: {0}")]
    MalformedEvent(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SocialError>;
