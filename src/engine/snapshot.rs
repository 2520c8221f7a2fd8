//! Owned, serializable copy of engine state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::types::{FriendRequest, Message, Notification, Post, Story, User};
use super::Engine;

/// Point-in-time copy of all engine state.
///
/// Collections are in deterministic order: users by id, posts and stories
/// in creation order, messages and notifications grouped by partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the snapshot was taken. Excluded from the fingerprint.
    #[serde(skip)]
    pub taken_at: Option<DateTime<Utc>>,
    /// Users by id.
    pub users: Vec<User>,
    /// Pending friend requests in send order.
    pub friend_requests: Vec<FriendRequest>,
    /// Posts in creation order.
    pub posts: Vec<Post>,
    /// Stories in creation order, expired ones included until pruned.
    pub stories: Vec<Story>,
    /// Direct messages.
    pub messages: Vec<Message>,
    /// Notifications.
    pub notifications: Vec<Notification>,
}

impl Snapshot {
    /// Stable hash of the state; changes whenever any entity changes.
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(self)
    }
}

impl Engine {
    /// Copy the current state.
    pub fn snapshot(&self) -> Snapshot {
        let mut posts: Vec<Post> = self.content.newest_first().cloned().collect();
        posts.reverse();
        Snapshot {
            taken_at: Some(self.clock.now()),
            users: self.graph.users().cloned().collect(),
            friend_requests: self.graph.requests().to_vec(),
            posts,
            stories: self.stories.all().cloned().collect(),
            messages: self.messages.all().cloned().collect(),
            notifications: self.notifications.all().cloned().collect(),
        }
    }

    /// Fingerprint of the current state.
    pub fn fingerprint(&self) -> String {
        self.snapshot().fingerprint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::types::{User, UserId};

    #[test]
    fn test_fingerprint_tracks_state() {
        let mut engine = Engine::in_memory(EngineConfig::default());
        engine.register_user(User::new("u1", "Nino", "a"));
        engine.register_user(User::new("u2", "Bella", "b"));
        let before = engine.fingerprint();
        assert_eq!(before, engine.fingerprint());

        engine
            .send_message(&UserId::from("u1"), &UserId::from("u2"), "hi")
            .unwrap();
        let snapshot = engine.snapshot();
        assert_ne!(before, snapshot.fingerprint());
        assert_eq!(snapshot.messages.len(), 1);
        assert_eq!(snapshot.users.len(), 2);

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.fingerprint(), snapshot.fingerprint());
    }
}
