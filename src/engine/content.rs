//! Post, like, comment and moderation commands and queries.

use std::collections::BTreeSet;

use crate::error::{EngineError, EngineResult};
use crate::observer::EngineEvent;
use crate::types::{
    Comment, CommentId, LikeOutcome, MediaUpload, ModerationDecision, NotificationKind, Post,
    PostEngagement, PostId, PostStatus, UserId,
};
use super::Engine;

impl Engine {
    /// Upload `media` and create a post.
    ///
    /// Admin posts are approved immediately; everyone else's wait for review.
    pub async fn create_post(
        &mut self,
        author: &UserId,
        media: Option<MediaUpload>,
        caption: &str,
    ) -> EngineResult<Post> {
        let media = media.ok_or_else(|| EngineError::InvalidInput("a post needs media".to_string()))?;
        self.require_user(author)?;

        let media_url = self.upload_media("posts", author, &media).await?;
        let status = if self.is_admin(author) {
            PostStatus::Approved
        } else {
            PostStatus::Pending
        };
        let post = Post {
            id: PostId::generate(),
            author_id: author.clone(),
            media_type: media.media_type(),
            media_url,
            caption: caption.to_string(),
            likes: BTreeSet::new(),
            comments: Vec::new(),
            created_at: self.clock.now(),
            status,
        };
        self.content.insert(post.clone());

        tracing::info!(post_id = %post.id, author = %author, status = %status, "Post created");
        self.emit(EngineEvent::PostCreated { post_id: post.id, status });
        Ok(post)
    }

    /// Flip `actor`'s like on a post.
    ///
    /// Liking someone else's post credits the author and notifies them;
    /// unliking reverses the credit. Notifications are never retracted.
    pub fn toggle_like(&mut self, post_id: &PostId, actor: &UserId) -> EngineResult<LikeOutcome> {
        let author = self.visible_post_author(post_id, actor)?;

        let transition = self.content.toggle_like(post_id, actor)?;
        if let Some(delta) = self.ledger.for_like(&author, actor, transition.liked) {
            self.apply_points(&delta)?;
        }
        if transition.liked && author != *actor {
            self.notify(&author, NotificationKind::Like, actor, Some(*post_id));
        }

        tracing::info!(
            post_id = %post_id,
            actor = %actor,
            liked = transition.liked,
            like_count = transition.like_count,
            "Like toggled"
        );
        self.emit(EngineEvent::LikeToggled {
            post_id: *post_id,
            actor_id: actor.clone(),
            liked: transition.liked,
        });
        Ok(LikeOutcome {
            liked: transition.liked,
            like_count: transition.like_count,
        })
    }

    /// Append a comment. The author earns comment-received points and the
    /// commenter earns comment-made points, even when they are the same user.
    pub fn add_comment(
        &mut self,
        post_id: &PostId,
        actor: &UserId,
        text: &str,
    ) -> EngineResult<Comment> {
        if text.trim().is_empty() {
            return Err(EngineError::InvalidInput("comment text is empty".to_string()));
        }
        let author = self.visible_post_author(post_id, actor)?;

        let comment = Comment {
            id: CommentId::generate(),
            author_id: actor.clone(),
            text: text.to_string(),
            created_at: self.clock.now(),
        };
        self.content.add_comment(post_id, comment.clone())?;
        for delta in self.ledger.for_comment(&author, actor) {
            self.apply_points(&delta)?;
        }

        tracing::info!(post_id = %post_id, comment_id = %comment.id, actor = %actor, "Comment added");
        self.emit(EngineEvent::CommentAdded {
            post_id: *post_id,
            comment_id: comment.id,
        });
        Ok(comment)
    }

    /// Approve or reject a post. Rejection deletes it.
    pub fn set_moderation(
        &mut self,
        actor: &UserId,
        post_id: &PostId,
        decision: ModerationDecision,
    ) -> EngineResult<()> {
        self.require_admin(actor)?;
        match decision {
            ModerationDecision::Approve => {
                if self.content.approve(post_id)? {
                    tracing::info!(post_id = %post_id, moderator = %actor, "Post approved");
                    self.emit(EngineEvent::PostApproved { post_id: *post_id });
                } else {
                    tracing::debug!(post_id = %post_id, "Post already approved");
                }
            }
            ModerationDecision::Reject => {
                let removed = self.content.remove(post_id)?;
                tracing::info!(
                    post_id = %post_id,
                    moderator = %actor,
                    likes = removed.like_count(),
                    comments = removed.comment_count(),
                    "Post rejected and deleted"
                );
                self.emit(EngineEvent::PostRejected { post_id: *post_id });
            }
        }
        Ok(())
    }

    /// Author of a post `actor` can see. Pending posts and posts by blocked
    /// authors are `NotFound` to everyone but their author.
    fn visible_post_author(&self, post_id: &PostId, actor: &UserId) -> EngineResult<UserId> {
        let viewer = self.require_user(actor)?;
        let author = self.content.require_visible(post_id, viewer)?.author_id.clone();
        self.require_user(&author)?;
        Ok(author)
    }

    /// Approved posts from authors `viewer` has not blocked, newest first.
    pub fn list_feed(&self, viewer: &UserId) -> EngineResult<Vec<&Post>> {
        let viewer = self.require_user(viewer)?;
        Ok(self.content.feed_for(viewer).collect())
    }

    /// Posts on `owner`'s profile, newest first. Owners also see their
    /// pending posts.
    pub fn list_profile_posts(&self, viewer: &UserId, owner: &UserId) -> EngineResult<Vec<&Post>> {
        self.require_user(viewer)?;
        self.require_user(owner)?;
        Ok(self.content.by_author(owner, viewer == owner).collect())
    }

    /// Review queue, oldest first. Admins only.
    pub fn pending_review(&self, actor: &UserId) -> EngineResult<Vec<&Post>> {
        self.require_admin(actor)?;
        Ok(self.content.pending().collect())
    }

    /// Like and comment counts for the newest `limit` posts.
    pub fn engagement_stats(&self, limit: usize) -> Vec<PostEngagement> {
        self.content.engagement(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::error::ErrorKind;
    use crate::types::{MediaType, User};

    fn engine() -> Engine {
        let mut engine = Engine::in_memory(EngineConfig::default().with_admin("u1"));
        for uid in ["u1", "u2"] {
            engine.register_user(User::new(uid, uid, "avatar"));
        }
        engine
    }

    fn video() -> Option<MediaUpload> {
        Some(MediaUpload::new("clip.mp4", "video/mp4", vec![0; 16]))
    }

    #[tokio::test]
    async fn test_create_post_status_by_privilege() {
        let mut engine = engine();
        let admin_post = engine.create_post(&UserId::from("u1"), video(), "city").await.unwrap();
        assert_eq!(admin_post.status, PostStatus::Approved);
        assert_eq!(admin_post.media_type, MediaType::Video);
        assert!(admin_post.media_url.starts_with("memory://blobs/posts/u1/"));

        let user_post = engine.create_post(&UserId::from("u2"), video(), "beach").await.unwrap();
        assert_eq!(user_post.status, PostStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_post_requires_media() {
        let mut engine = engine();
        let err = engine.create_post(&UserId::from("u2"), None, "x").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let empty = Some(MediaUpload::new("a.png", "image/png", Vec::new()));
        let err = engine.create_post(&UserId::from("u2"), empty, "x").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(engine.engagement_stats(10).len(), 0);
    }

    #[tokio::test]
    async fn test_moderation_requires_admin() {
        let mut engine = engine();
        let post = engine.create_post(&UserId::from("u2"), video(), "").await.unwrap();

        let err = engine
            .set_moderation(&UserId::from("u2"), &post.id, ModerationDecision::Approve)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(engine.pending_review(&UserId::from("u2")).unwrap_err().kind(), ErrorKind::Unauthorized);

        assert_eq!(engine.pending_review(&UserId::from("u1")).unwrap().len(), 1);
        engine
            .set_moderation(&UserId::from("u1"), &post.id, ModerationDecision::Approve)
            .unwrap();
        assert!(engine.pending_review(&UserId::from("u1")).unwrap().is_empty());
        assert_eq!(engine.list_feed(&UserId::from("u2")).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_profile_posts_show_pending_to_owner_only() {
        let mut engine = engine();
        let u2 = UserId::from("u2");
        engine.create_post(&u2, video(), "").await.unwrap();

        assert_eq!(engine.list_profile_posts(&u2, &u2).unwrap().len(), 1);
        assert!(engine.list_profile_posts(&UserId::from("u1"), &u2).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hidden_posts_cannot_be_engaged() {
        let mut engine = engine();
        let u1 = UserId::from("u1");
        let u2 = UserId::from("u2");
        let pending = engine.create_post(&u2, video(), "").await.unwrap();

        assert_eq!(engine.toggle_like(&pending.id, &u1).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(engine.add_comment(&pending.id, &u1, "hi").unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(engine.user(&u2).unwrap().points, 0);
        // The author can still interact with their own pending post.
        assert!(engine.toggle_like(&pending.id, &u2).unwrap().liked);

        engine.set_moderation(&u1, &pending.id, ModerationDecision::Approve).unwrap();
        engine.block_user(&u1, &u2).await.unwrap();
        assert_eq!(engine.toggle_like(&pending.id, &u1).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(engine.user(&u2).unwrap().points, 0);
    }

    #[test]
    fn test_blank_comment_rejected() {
        let mut engine = engine();
        let err = engine
            .add_comment(&PostId::generate(), &UserId::from("u2"), "   ")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = engine
            .add_comment(&PostId::generate(), &UserId::from("u2"), "hi")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
