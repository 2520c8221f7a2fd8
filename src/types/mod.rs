//! Core types for the social graph kernel.

pub mod ids;
pub mod media;
pub mod user;
pub mod post;
pub mod social;
pub mod activity;

pub use ids::{UserId, PostId, CommentId, RequestId, MessageId, NotificationId, StoryId};
pub use media::{MediaType, MediaUpload};
pub use user::{User, Identity, ProfileUpdate};
pub use post::{Post, Comment, PostStatus, ModerationDecision, PostEngagement, LikeOutcome};
pub use social::{FriendRequest, RequestStatus, FriendshipStatus};
pub use activity::{Message, Notification, NotificationKind, Story};
