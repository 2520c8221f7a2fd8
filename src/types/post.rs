//! Posts, comments and moderation.

use std::collections::BTreeSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CommentId, PostId, UserId};
use super::media::MediaType;

/// Moderation status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Waiting for admin review.
    Pending,
    /// Visible in feeds.
    Approved,
    /// Rejected. Rejection deletes the post, so this is never stored.
    Rejected,
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Admin decision on a pending post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationDecision {
    /// Publish the post.
    Approve,
    /// Delete the post.
    Reject,
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment id.
    pub id: CommentId,
    /// Commenter.
    pub author_id: UserId,
    /// Non-blank text, stored as given.
    pub text: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A media post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Post id.
    pub id: PostId,
    /// Author.
    pub author_id: UserId,
    /// Media kind.
    pub media_type: MediaType,
    /// Uploaded media URL.
    pub media_url: String,
    /// Caption, may be empty.
    pub caption: String,
    /// Users who like the post.
    pub likes: BTreeSet<UserId>,
    /// Comments in append order.
    pub comments: Vec<Comment>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Moderation status.
    pub status: PostStatus,
}

impl Post {
    /// Number of likes.
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    /// Number of comments.
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// Whether `user` likes this post.
    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.likes.contains(user)
    }
}

/// Engagement counts for one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEngagement {
    /// Post id.
    pub post_id: PostId,
    /// Like count.
    pub likes: usize,
    /// Comment count.
    pub comments: usize,
}

/// Result of a like toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeOutcome {
    /// Whether the actor likes the post after the toggle.
    pub liked: bool,
    /// Like count after the toggle.
    pub like_count: usize,
}
