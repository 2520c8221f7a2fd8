//! Posts, likes, comments and moderation.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult, Entity};
use crate::types::{Comment, Post, PostEngagement, PostId, PostStatus, User, UserId};

/// A like flip as applied to a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeTransition {
    /// Whether the actor likes the post now.
    pub liked: bool,
    /// Like count after the flip.
    pub like_count: usize,
}

/// Whether `viewer` can see `post`: authors always see their own posts,
/// everyone else sees approved posts by authors they have not blocked.
pub fn is_visible_to(post: &Post, viewer: &User) -> bool {
    post.author_id == viewer.id
        || (post.status == PostStatus::Approved && !viewer.has_blocked(&post.author_id))
}

/// Post store. Posts are kept in creation order; listings walk it backwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentStore {
    posts: Vec<Post>,
}

impl ContentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a post as the newest.
    pub fn insert(&mut self, post: Post) {
        self.posts.push(post);
    }

    /// Look up a post.
    pub fn post(&self, id: &PostId) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == *id)
    }

    /// Look up a post or fail with `NotFound`.
    pub fn require_post(&self, id: &PostId) -> EngineResult<&Post> {
        self.post(id).ok_or_else(|| EngineError::not_found(Entity::Post, id))
    }

    fn require_post_mut(&mut self, id: &PostId) -> EngineResult<&mut Post> {
        self.posts
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or_else(|| EngineError::not_found(Entity::Post, id))
    }

    /// Number of stored posts.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// All posts, newest first.
    pub fn newest_first(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().rev()
    }

    /// Flip `actor`'s like on a post.
    pub fn toggle_like(&mut self, id: &PostId, actor: &UserId) -> EngineResult<LikeTransition> {
        let post = self.require_post_mut(id)?;
        let liked = if post.likes.remove(actor) {
            false
        } else {
            post.likes.insert(actor.clone());
            true
        };
        Ok(LikeTransition {
            liked,
            like_count: post.likes.len(),
        })
    }

    /// Append a comment.
    pub fn add_comment(&mut self, id: &PostId, comment: Comment) -> EngineResult<()> {
        self.require_post_mut(id)?.comments.push(comment);
        Ok(())
    }

    /// Mark a post approved. Returns `false` if it already was.
    pub fn approve(&mut self, id: &PostId) -> EngineResult<bool> {
        let post = self.require_post_mut(id)?;
        let changed = post.status != PostStatus::Approved;
        post.status = PostStatus::Approved;
        Ok(changed)
    }

    /// Delete a post together with its likes and comments.
    pub fn remove(&mut self, id: &PostId) -> EngineResult<Post> {
        let index = self
            .posts
            .iter()
            .position(|p| p.id == *id)
            .ok_or_else(|| EngineError::not_found(Entity::Post, id))?;
        Ok(self.posts.remove(index))
    }

    /// Approved posts not authored by anyone `viewer` has blocked, newest first.
    pub fn feed_for<'a>(&'a self, viewer: &'a User) -> impl Iterator<Item = &'a Post> + 'a {
        self.newest_first().filter(move |p| {
            p.status == PostStatus::Approved && !viewer.has_blocked(&p.author_id)
        })
    }

    /// Look up a post `viewer` can see, or fail with `NotFound`.
    pub fn require_visible(&self, id: &PostId, viewer: &User) -> EngineResult<&Post> {
        self.require_post(id)
            .ok()
            .filter(|p| is_visible_to(p, viewer))
            .ok_or_else(|| EngineError::not_found(Entity::Post, id))
    }

    /// Posts by `owner`, newest first. Pending posts only when `include_pending`.
    pub fn by_author(&self, owner: &UserId, include_pending: bool) -> impl Iterator<Item = &Post> + '_ {
        let owner = owner.clone();
        self.newest_first().filter(move |p| {
            p.author_id == owner
                && match p.status {
                    PostStatus::Approved => true,
                    PostStatus::Pending => include_pending,
                    PostStatus::Rejected => false,
                }
        })
    }

    /// Pending posts, oldest first (review queue order).
    pub fn pending(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|p| p.status == PostStatus::Pending)
    }

    /// Engagement counts for the newest `limit` posts, newest first.
    pub fn engagement(&self, limit: usize) -> Vec<PostEngagement> {
        self.newest_first()
            .take(limit)
            .map(|p| PostEngagement {
                post_id: p.id,
                likes: p.like_count(),
                comments: p.comment_count(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::{CommentId, MediaType};
    use chrono::{Duration, Utc};
    use std::collections::BTreeSet;

    fn post(author: &str, status: PostStatus, offset_secs: i64) -> Post {
        Post {
            id: PostId::generate(),
            author_id: UserId::from(author),
            media_type: MediaType::Image,
            media_url: "memory://p".to_string(),
            caption: String::new(),
            likes: BTreeSet::new(),
            comments: Vec::new(),
            created_at: Utc::now() + Duration::seconds(offset_secs),
            status,
        }
    }

    #[test]
    fn test_toggle_like_flips_membership() {
        let mut store = ContentStore::new();
        let p = post("u1", PostStatus::Approved, 0);
        let id = p.id;
        store.insert(p);

        let first = store.toggle_like(&id, &UserId::from("u2")).unwrap();
        assert!(first.liked);
        assert_eq!(first.like_count, 1);

        let second = store.toggle_like(&id, &UserId::from("u2")).unwrap();
        assert!(!second.liked);
        assert!(store.post(&id).unwrap().likes.is_empty());

        let err = store.toggle_like(&PostId::generate(), &UserId::from("u2")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_feed_excludes_pending_and_blocked_newest_first() {
        let mut store = ContentStore::new();
        let old = post("u2", PostStatus::Approved, 0);
        let pending = post("u2", PostStatus::Pending, 1);
        let blocked = post("u3", PostStatus::Approved, 2);
        let new = post("u4", PostStatus::Approved, 3);
        let (old_id, new_id) = (old.id, new.id);
        for p in [old, pending, blocked, new] {
            store.insert(p);
        }

        let mut viewer = User::new("u1", "Nino", "a");
        viewer.blocked_users.insert(UserId::from("u3"));

        let feed: Vec<PostId> = store.feed_for(&viewer).map(|p| p.id).collect();
        assert_eq!(feed, vec![new_id, old_id]);
    }

    #[test]
    fn test_visibility_hides_pending_and_blocked_authors() {
        let mut store = ContentStore::new();
        let pending = post("u2", PostStatus::Pending, 0);
        let blocked = post("u3", PostStatus::Approved, 1);
        let open = post("u4", PostStatus::Approved, 2);
        let (pending_id, blocked_id, open_id) = (pending.id, blocked.id, open.id);
        for p in [pending, blocked, open] {
            store.insert(p);
        }

        let mut viewer = User::new("u1", "Nino", "a");
        viewer.blocked_users.insert(UserId::from("u3"));
        assert_eq!(store.require_visible(&pending_id, &viewer).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(store.require_visible(&blocked_id, &viewer).unwrap_err().kind(), ErrorKind::NotFound);
        assert!(store.require_visible(&open_id, &viewer).is_ok());

        // Authors see their own pending posts.
        let author = User::new("u2", "Bella", "b");
        assert!(store.require_visible(&pending_id, &author).is_ok());
    }

    #[test]
    fn test_by_author_and_review_queue() {
        let mut store = ContentStore::new();
        store.insert(post("u2", PostStatus::Approved, 0));
        store.insert(post("u2", PostStatus::Pending, 1));
        store.insert(post("u3", PostStatus::Pending, 2));
        let owner = UserId::from("u2");

        assert_eq!(store.by_author(&owner, true).count(), 2);
        assert_eq!(store.by_author(&owner, false).count(), 1);
        assert_eq!(store.pending().count(), 2);
    }

    #[test]
    fn test_remove_and_comment() {
        let mut store = ContentStore::new();
        let p = post("u1", PostStatus::Pending, 0);
        let id = p.id;
        store.insert(p);

        store
            .add_comment(
                &id,
                Comment {
                    id: CommentId::generate(),
                    author_id: UserId::from("u2"),
                    text: "nice".into(),
                    created_at: Utc::now(),
                },
            )
            .unwrap();
        assert_eq!(store.engagement(10)[0].comments, 1);

        assert!(store.approve(&id).unwrap());
        assert!(!store.approve(&id).unwrap());

        let removed = store.remove(&id).unwrap();
        assert_eq!(removed.comments.len(), 1);
        assert!(store.is_empty());
        assert_eq!(store.remove(&id).unwrap_err().kind(), ErrorKind::NotFound);
    }
}
