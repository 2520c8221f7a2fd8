//! Observers notified after each committed command.
//!
//! Presentation layers subscribe here and re-read state from the engine.
//! Events are delivered synchronously, in commit order, and only for
//! transitions that were actually applied.

use parking_lot::Mutex;
use serde::Serialize;

use crate::types::{
    CommentId, MessageId, NotificationId, NotificationKind, PostId, PostStatus, RequestId,
    StoryId, UserId,
};

/// A committed state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A profile was created or loaded into the engine.
    ProfileRegistered {
        /// Profile id.
        user_id: UserId,
        /// Whether the profile was newly created.
        created: bool,
    },
    /// Profile fields changed.
    ProfileUpdated {
        /// Profile id.
        user_id: UserId,
    },
    /// A friend request was sent.
    FriendRequestSent {
        /// Request id.
        request_id: RequestId,
        /// Sender.
        from_id: UserId,
        /// Recipient.
        to_id: UserId,
    },
    /// A friend request was accepted.
    FriendRequestAccepted {
        /// Request id.
        request_id: RequestId,
        /// Sender.
        from_id: UserId,
        /// Recipient.
        to_id: UserId,
    },
    /// A friend request was declined.
    FriendRequestDeclined {
        /// Request id.
        request_id: RequestId,
    },
    /// A user blocked another.
    UserBlocked {
        /// Blocker.
        blocker_id: UserId,
        /// Blocked user.
        target_id: UserId,
    },
    /// A post was created.
    PostCreated {
        /// Post id.
        post_id: PostId,
        /// Initial status.
        status: PostStatus,
    },
    /// A like was added or removed.
    LikeToggled {
        /// Post id.
        post_id: PostId,
        /// Liker.
        actor_id: UserId,
        /// State after the toggle.
        liked: bool,
    },
    /// A comment was appended.
    CommentAdded {
        /// Post id.
        post_id: PostId,
        /// Comment id.
        comment_id: CommentId,
    },
    /// A pending post was approved.
    PostApproved {
        /// Post id.
        post_id: PostId,
    },
    /// A post was rejected and deleted.
    PostRejected {
        /// Post id.
        post_id: PostId,
    },
    /// A user's points changed.
    PointsChanged {
        /// User id.
        user_id: UserId,
        /// Points after the change.
        points: i64,
    },
    /// A notification was appended to a recipient's log.
    NotificationEmitted {
        /// Notification id.
        notification_id: NotificationId,
        /// Recipient.
        recipient_id: UserId,
        /// Trigger.
        kind: NotificationKind,
    },
    /// A recipient's notifications were marked read.
    NotificationsRead {
        /// Recipient.
        user_id: UserId,
        /// How many flipped from unread.
        count: usize,
    },
    /// A story was created.
    StoryCreated {
        /// Story id.
        story_id: StoryId,
        /// Author.
        author_id: UserId,
    },
    /// A direct message was sent.
    MessageSent {
        /// Message id.
        message_id: MessageId,
        /// Sender.
        from_id: UserId,
        /// Recipient.
        to_id: UserId,
    },
}

/// Subscriber to engine events.
pub trait EngineObserver: Send + Sync {
    /// Called once per committed transition.
    fn on_event(&self, event: &EngineEvent);
}

/// Observer that ignores everything.
#[derive(Debug, Default)]
pub struct NoOpObserver;

impl EngineObserver for NoOpObserver {
    fn on_event(&self, _event: &EngineEvent) {}
}

/// Observer that records every event, for tests.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events in delivery order.
    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.lock().clone()
    }

    /// Drop recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EngineObserver for RecordingObserver {
    fn on_event(&self, event: &EngineEvent) {
        self.events.lock().push(event.clone());
    }
}
