//! Friend requests and relationship status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{RequestId, UserId};

/// Status of a friend request. Resolved requests are removed, so only
/// `Pending` is ever stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Awaiting the recipient's answer.
    Pending,
}

/// An outstanding friend request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendRequest {
    /// Request id.
    pub id: RequestId,
    /// Sender.
    pub from_id: UserId,
    /// Recipient.
    pub to_id: UserId,
    /// Always pending while stored.
    pub status: RequestStatus,
    /// When the request was sent.
    pub created_at: DateTime<Utc>,
}

/// Relationship between a viewer and another user, as the viewer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    /// No relation.
    None,
    /// The viewer has a pending request to the target.
    Pending,
    /// Mutual friends.
    Friends,
}

impl fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Pending => write!(f, "pending"),
            Self::Friends => write!(f, "friends"),
        }
    }
}
