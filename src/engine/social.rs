//! Friend graph commands and queries.

use crate::error::EngineResult;
use crate::observer::EngineEvent;
use crate::state::SocialGraph;
use crate::types::{FriendRequest, FriendshipStatus, NotificationKind, RequestId, User, UserId};
use super::Engine;

impl Engine {
    /// Send a friend request and notify the recipient.
    pub fn send_friend_request(&mut self, from: &UserId, to: &UserId) -> EngineResult<FriendRequest> {
        let request = self
            .graph
            .send_request(from, to, RequestId::generate(), self.clock.now())?;

        tracing::info!(
            request_id = %request.id,
            from = %from,
            to = %to,
            "Friend request sent"
        );
        self.emit(EngineEvent::FriendRequestSent {
            request_id: request.id,
            from_id: from.clone(),
            to_id: to.clone(),
        });
        self.notify(to, NotificationKind::FriendRequest, from, None);
        Ok(request)
    }

    /// Accept a request addressed to `actor`.
    ///
    /// Both updated profiles are written to the profile store before the
    /// friendship becomes visible.
    pub async fn accept_friend_request(
        &mut self,
        actor: &UserId,
        request_id: &RequestId,
    ) -> EngineResult<FriendRequest> {
        let mut staged = self.graph.clone();
        let request = staged.accept(actor, request_id)?;

        let changed = changed_profiles(&staged, &[&request.from_id, &request.to_id]);
        if let Err(e) = self.profiles.save_profiles(&changed).await {
            tracing::warn!(
                request_id = %request_id,
                error = %e,
                "Friendship write failed, request left pending"
            );
            return Err(e.into());
        }
        self.graph = staged;

        tracing::info!(
            request_id = %request.id,
            from = %request.from_id,
            to = %request.to_id,
            "Friend request accepted"
        );
        self.emit(EngineEvent::FriendRequestAccepted {
            request_id: request.id,
            from_id: request.from_id.clone(),
            to_id: request.to_id.clone(),
        });
        Ok(request)
    }

    /// Decline a request addressed to `actor`.
    pub fn decline_friend_request(
        &mut self,
        actor: &UserId,
        request_id: &RequestId,
    ) -> EngineResult<FriendRequest> {
        let request = self.graph.decline(actor, request_id)?;
        tracing::info!(request_id = %request.id, by = %actor, "Friend request declined");
        self.emit(EngineEvent::FriendRequestDeclined { request_id: request.id });
        Ok(request)
    }

    /// `blocker` blocks `target` and both lose the friendship.
    ///
    /// Returns `false` when nothing changed (already blocked, not friends).
    pub async fn block_user(&mut self, blocker: &UserId, target: &UserId) -> EngineResult<bool> {
        let mut staged = self.graph.clone();
        if !staged.block(blocker, target)? {
            tracing::debug!(blocker = %blocker, target = %target, "Block already in place");
            return Ok(false);
        }

        let changed = changed_profiles(&staged, &[blocker, target]);
        if let Err(e) = self.profiles.save_profiles(&changed).await {
            tracing::warn!(
                blocker = %blocker,
                target = %target,
                error = %e,
                "Block write failed, graph unchanged"
            );
            return Err(e.into());
        }
        self.graph = staged;

        tracing::info!(blocker = %blocker, target = %target, "User blocked");
        self.emit(EngineEvent::UserBlocked {
            blocker_id: blocker.clone(),
            target_id: target.clone(),
        });
        Ok(true)
    }

    /// Relationship from `viewer` to `target`.
    pub fn friendship_status(&self, viewer: &UserId, target: &UserId) -> FriendshipStatus {
        self.graph.friendship_status(viewer, target)
    }

    /// Incoming pending requests, oldest first.
    pub fn pending_requests_for(&self, user: &UserId) -> Vec<&FriendRequest> {
        self.graph.pending_requests_for(user)
    }

    /// Friend profiles of `user`.
    pub fn friends_of(&self, user: &UserId) -> EngineResult<Vec<&User>> {
        self.graph.friends_of(user)
    }

    /// Users by points, highest first.
    pub fn ranking(&self) -> Vec<&User> {
        self.graph.ranking()
    }

    /// Check that `id` is a known user.
    pub(super) fn require_user(&self, id: &UserId) -> EngineResult<&User> {
        self.graph.require_user(id)
    }
}

fn changed_profiles(graph: &SocialGraph, ids: &[&UserId]) -> Vec<User> {
    ids.iter().filter_map(|id| graph.user(id).cloned()).collect()
}
