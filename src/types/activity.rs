//! Messages, notifications and stories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{MessageId, NotificationId, PostId, StoryId, UserId};
use super::media::MediaType;

/// A direct message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message id.
    pub id: MessageId,
    /// Sender.
    pub from_id: UserId,
    /// Recipient.
    pub to_id: UserId,
    /// Non-empty text.
    pub text: String,
    /// Send time.
    pub created_at: DateTime<Utc>,
}

/// What triggered a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Someone liked the recipient's post.
    Like,
    /// Someone sent the recipient a friend request.
    FriendRequest,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Like => write!(f, "like"),
            Self::FriendRequest => write!(f, "friend_request"),
        }
    }
}

/// An entry in a recipient's notification log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification id.
    pub id: NotificationId,
    /// Who the notification is for.
    pub recipient_id: UserId,
    /// Trigger.
    pub kind: NotificationKind,
    /// Who triggered it.
    pub actor_id: UserId,
    /// Liked post, for `Like`.
    pub subject_post_id: Option<PostId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Whether the recipient has opened the notifications view since.
    pub read: bool,
}

/// A time-boxed story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// Story id.
    pub id: StoryId,
    /// Author.
    pub author_id: UserId,
    /// Media kind.
    pub media_type: MediaType,
    /// Uploaded media URL.
    pub media_url: String,
    /// Creation time. Expiry is derived from this at read time.
    pub created_at: DateTime<Utc>,
}
