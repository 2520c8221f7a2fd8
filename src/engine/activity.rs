//! Stories, direct messages and notification queries.

use crate::error::{EngineError, EngineResult};
use crate::observer::EngineEvent;
use crate::state::StoryStore;
use crate::types::{MediaUpload, Message, MessageId, Notification, Story, StoryId, UserId};
use super::Engine;

impl Engine {
    /// Upload `media` and publish a story.
    pub async fn create_story(&mut self, author: &UserId, media: MediaUpload) -> EngineResult<Story> {
        self.require_user(author)?;
        let media_url = self.upload_media("stories", author, &media).await?;

        let story = Story {
            id: StoryId::generate(),
            author_id: author.clone(),
            media_type: media.media_type(),
            media_url,
            created_at: self.clock.now(),
        };
        self.stories.push(story.clone());

        tracing::info!(story_id = %story.id, author = %author, "Story created");
        self.emit(EngineEvent::StoryCreated {
            story_id: story.id,
            author_id: author.clone(),
        });
        Ok(story)
    }

    /// `author`'s stories still inside the visibility window, oldest first.
    pub fn list_active_stories_for(&self, author: &UserId) -> Vec<&Story> {
        self.stories
            .active_for(author, self.clock.now(), self.config.story_ttl())
    }

    /// Authors with at least one visible story, most recent first.
    pub fn list_active_authors(&self) -> Vec<UserId> {
        self.stories.active_authors(self.clock.now(), self.config.story_ttl())
    }

    /// Drop stories past the visibility window. Reads never depend on this.
    pub fn prune_expired_stories(&mut self) -> usize {
        let removed = self
            .stories
            .prune_expired(self.clock.now(), self.config.story_ttl());
        if removed > 0 {
            tracing::debug!(removed, "Expired stories pruned");
        }
        removed
    }

    /// Read access to the story store.
    pub fn stories(&self) -> &StoryStore {
        &self.stories
    }

    /// Send a direct message.
    pub fn send_message(&mut self, from: &UserId, to: &UserId, text: &str) -> EngineResult<Message> {
        if text.trim().is_empty() {
            return Err(EngineError::InvalidInput("message text is empty".to_string()));
        }
        if from == to {
            return Err(EngineError::InvalidInput("cannot message yourself".to_string()));
        }
        self.require_user(from)?;
        self.require_user(to)?;

        let message = Message {
            id: MessageId::generate(),
            from_id: from.clone(),
            to_id: to.clone(),
            text: text.to_string(),
            created_at: self.clock.now(),
        };
        self.messages.push(message.clone());

        tracing::info!(message_id = %message.id, from = %from, to = %to, "Message sent");
        self.emit(EngineEvent::MessageSent {
            message_id: message.id,
            from_id: from.clone(),
            to_id: to.clone(),
        });
        Ok(message)
    }

    /// Conversation between two users, oldest first.
    pub fn list_conversation(&self, a: &UserId, b: &UserId) -> Vec<&Message> {
        self.messages.conversation(a, b)
    }

    /// Mark all of `viewer`'s notifications read. Returns how many changed.
    pub fn mark_all_read(&mut self, viewer: &UserId) -> EngineResult<usize> {
        self.require_user(viewer)?;
        let count = self.notifications.mark_all_read(viewer);
        if count > 0 {
            tracing::info!(user = %viewer, count, "Notifications marked read");
            self.emit(EngineEvent::NotificationsRead {
                user_id: viewer.clone(),
                count,
            });
        }
        Ok(count)
    }

    /// `user`'s notifications, newest first.
    pub fn notifications_for(&self, user: &UserId) -> Vec<&Notification> {
        self.notifications.for_user(user)
    }

    /// Whether `user` has unread notifications.
    pub fn has_unread(&self, user: &UserId) -> bool {
        self.notifications.has_unread(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use chrono::{Duration, TimeZone, Utc};
    use crate::clock::ManualClock;
    use crate::config::EngineConfig;
    use crate::error::ErrorKind;
    use crate::types::User;

    fn engine_at(clock: Arc<ManualClock>) -> Engine {
        let mut engine = Engine::in_memory(EngineConfig::default()).with_clock(clock);
        for uid in ["u1", "u2"] {
            engine.register_user(User::new(uid, uid, "avatar"));
        }
        engine
    }

    #[tokio::test]
    async fn test_story_visible_until_window_closes() {
        let start = Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let mut engine = engine_at(clock.clone());
        let u1 = UserId::from("u1");

        engine
            .create_story(&u1, MediaUpload::new("s.jpg", "image/jpeg", vec![1]))
            .await
            .unwrap();

        clock.set(start + Duration::hours(23) + Duration::minutes(59));
        assert_eq!(engine.list_active_stories_for(&u1).len(), 1);
        assert_eq!(engine.list_active_authors(), vec![u1.clone()]);

        clock.set(start + Duration::hours(24) + Duration::minutes(1));
        assert!(engine.list_active_stories_for(&u1).is_empty());
        assert!(engine.list_active_authors().is_empty());
        // Lazy expiry: still stored until pruned.
        assert_eq!(engine.stories().len(), 1);
        assert_eq!(engine.prune_expired_stories(), 1);
    }

    #[test]
    fn test_messages_validate_and_order() {
        let start = Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let mut engine = engine_at(clock.clone());
        let u1 = UserId::from("u1");
        let u2 = UserId::from("u2");

        assert_eq!(engine.send_message(&u1, &u2, " \n").unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(
            engine.send_message(&u1, &UserId::from("ghost"), "hi").unwrap_err().kind(),
            ErrorKind::NotFound
        );

        engine.send_message(&u1, &u2, "hey").unwrap();
        clock.advance(Duration::seconds(30));
        engine.send_message(&u2, &u1, "hello back").unwrap();

        let texts: Vec<&str> = engine
            .list_conversation(&u2, &u1)
            .iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(texts, vec!["hey", "hello back"]);
    }
}
