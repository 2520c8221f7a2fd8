//! Ephemeral stories.
//!
//! A story is active while `now - created_at < ttl`. Expiry is evaluated at
//! read time; nothing is evicted unless `prune_expired` is called.

use std::collections::BTreeSet;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Story, UserId};

/// Whether `story` is visible at `now`.
pub fn is_active(story: &Story, now: DateTime<Utc>, ttl: Duration) -> bool {
    now.signed_duration_since(story.created_at) < ttl
}

/// Story store, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryStore {
    stories: Vec<Story>,
}

impl StoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a story.
    pub fn push(&mut self, story: Story) {
        self.stories.push(story);
    }

    /// Active stories by `author`, oldest first.
    pub fn active_for(&self, author: &UserId, now: DateTime<Utc>, ttl: Duration) -> Vec<&Story> {
        let mut active: Vec<&Story> = self
            .stories
            .iter()
            .filter(|s| s.author_id == *author && is_active(s, now, ttl))
            .collect();
        active.sort_by_key(|s| s.created_at);
        active
    }

    /// Distinct authors with at least one active story, most recent first.
    pub fn active_authors(&self, now: DateTime<Utc>, ttl: Duration) -> Vec<UserId> {
        let mut active: Vec<&Story> = self
            .stories
            .iter()
            .filter(|s| is_active(s, now, ttl))
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut seen = BTreeSet::new();
        active
            .into_iter()
            .filter(|s| seen.insert(s.author_id.clone()))
            .map(|s| s.author_id.clone())
            .collect()
    }

    /// Drop expired stories. Returns how many were removed.
    pub fn prune_expired(&mut self, now: DateTime<Utc>, ttl: Duration) -> usize {
        let before = self.stories.len();
        self.stories.retain(|s| is_active(s, now, ttl));
        before - self.stories.len()
    }

    /// All stored stories in creation order, expired included.
    pub fn all(&self) -> impl Iterator<Item = &Story> {
        self.stories.iter()
    }

    /// Number of stored stories, expired included.
    pub fn len(&self) -> usize {
        self.stories.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MediaType, StoryId};
    use chrono::TimeZone;

    fn story(author: &str, at: DateTime<Utc>) -> Story {
        Story {
            id: StoryId::generate(),
            author_id: UserId::from(author),
            media_type: MediaType::Image,
            media_url: "memory://s".to_string(),
            created_at: at,
        }
    }

    #[test]
    fn test_boundary_is_exclusive() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let ttl = Duration::hours(24);
        let s = story("u1", t);
        assert!(is_active(&s, t + Duration::hours(23) + Duration::minutes(59), ttl));
        assert!(!is_active(&s, t + Duration::hours(24), ttl));
        assert!(!is_active(&s, t + Duration::hours(24) + Duration::minutes(1), ttl));
    }

    #[test]
    fn test_active_authors_and_prune() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let ttl = Duration::hours(24);
        let mut store = StoryStore::new();
        store.push(story("u1", t));
        store.push(story("u2", t + Duration::hours(2)));
        store.push(story("u1", t + Duration::hours(3)));
        store.push(story("u3", t - Duration::hours(30)));

        let now = t + Duration::hours(4);
        assert_eq!(
            store.active_authors(now, ttl),
            vec![UserId::from("u1"), UserId::from("u2")]
        );

        let u1 = store.active_for(&UserId::from("u1"), now, ttl);
        assert_eq!(u1.len(), 2);
        assert!(u1[0].created_at < u1[1].created_at);

        assert_eq!(store.prune_expired(now, ttl), 1);
        assert_eq!(store.len(), 3);
    }
}
