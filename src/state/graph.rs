//! Social graph: users, friendships, pending requests and blocks.
//!
//! ## Invariants
//!
//! - `a.friends ∋ b` iff `b.friends ∋ a`
//! - After `block(a, b)` neither side lists the other as a friend
//! - At most one pending request per ordered (from, to) pair

use std::collections::BTreeMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult, Entity};
use crate::types::{FriendRequest, FriendshipStatus, RequestId, RequestStatus, User, UserId};

/// Users plus the friend-request set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialGraph {
    users: BTreeMap<UserId, User>,
    /// Pending requests in send order.
    requests: Vec<FriendRequest>,
}

impl SocialGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user.
    ///
    /// The incoming friend set wins: known users it names gain the reverse
    /// edge, known users it omits lose theirs. Edges naming unknown users
    /// are kept for when those users arrive.
    pub fn upsert_user(&mut self, user: User) {
        let id = user.id.clone();
        for (other_id, other) in self.users.iter_mut() {
            if *other_id == id {
                continue;
            }
            if user.friends.contains(other_id) {
                other.friends.insert(id.clone());
            } else {
                other.friends.remove(&id);
            }
        }
        self.users.insert(id, user);
    }

    /// Look up a user.
    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.get(id)
    }

    /// Look up a user or fail with `NotFound`.
    pub fn require_user(&self, id: &UserId) -> EngineResult<&User> {
        self.users
            .get(id)
            .ok_or_else(|| EngineError::not_found(Entity::User, id))
    }

    pub(crate) fn require_user_mut(&mut self, id: &UserId) -> EngineResult<&mut User> {
        self.users
            .get_mut(id)
            .ok_or_else(|| EngineError::not_found(Entity::User, id))
    }

    /// Whether `id` is known.
    pub fn contains(&self, id: &UserId) -> bool {
        self.users.contains_key(id)
    }

    /// All users, ordered by id.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    /// Number of users.
    pub fn num_users(&self) -> usize {
        self.users.len()
    }

    /// All pending requests in send order.
    pub fn requests(&self) -> &[FriendRequest] {
        &self.requests
    }

    /// Look up a pending request.
    pub fn request(&self, id: &RequestId) -> Option<&FriendRequest> {
        self.requests.iter().find(|r| r.id == *id)
    }

    /// Record a pending request from `from` to `to`.
    pub fn send_request(
        &mut self,
        from: &UserId,
        to: &UserId,
        id: RequestId,
        now: DateTime<Utc>,
    ) -> EngineResult<FriendRequest> {
        if from == to {
            return Err(EngineError::InvalidInput(
                "cannot send a friend request to yourself".to_string(),
            ));
        }
        let sender = self.require_user(from)?;
        let recipient = self.require_user(to)?;
        if sender.has_blocked(to) || recipient.has_blocked(from) {
            return Err(EngineError::Conflict(format!(
                "{from} and {to} have a block between them"
            )));
        }
        if self
            .requests
            .iter()
            .any(|r| r.from_id == *from && r.to_id == *to)
        {
            return Err(EngineError::Conflict(format!(
                "friend request from {from} to {to} already pending"
            )));
        }

        let request = FriendRequest {
            id,
            from_id: from.clone(),
            to_id: to.clone(),
            status: RequestStatus::Pending,
            created_at: now,
        };
        self.requests.push(request.clone());
        Ok(request)
    }

    fn take_request_for(&mut self, actor: &UserId, id: &RequestId) -> EngineResult<FriendRequest> {
        let index = self
            .requests
            .iter()
            .position(|r| r.id == *id)
            .ok_or_else(|| EngineError::not_found(Entity::FriendRequest, id))?;
        if self.requests[index].to_id != *actor {
            return Err(EngineError::Unauthorized(format!(
                "{actor} is not the recipient of request {id}"
            )));
        }
        Ok(self.requests.remove(index))
    }

    /// Accept a request addressed to `actor`: both users become friends and
    /// the request is removed.
    ///
    /// Fails with `Conflict` if either side has blocked the other.
    pub fn accept(&mut self, actor: &UserId, id: &RequestId) -> EngineResult<FriendRequest> {
        if let Some(pending) = self.request(id) {
            // Both endpoints must exist before anything is removed.
            let from = self.require_user(&pending.from_id)?;
            let to = self.require_user(&pending.to_id)?;
            if pending.to_id == *actor && (from.has_blocked(&to.id) || to.has_blocked(&from.id)) {
                return Err(EngineError::Conflict(format!(
                    "{} and {} have a block between them",
                    from.id, to.id
                )));
            }
        }

        let request = self.take_request_for(actor, id)?;
        self.require_user_mut(&request.from_id)?
            .friends
            .insert(request.to_id.clone());
        self.require_user_mut(&request.to_id)?
            .friends
            .insert(request.from_id.clone());
        Ok(request)
    }

    /// Decline a request addressed to `actor`.
    pub fn decline(&mut self, actor: &UserId, id: &RequestId) -> EngineResult<FriendRequest> {
        self.take_request_for(actor, id)
    }

    /// `blocker` blocks `target`, ending any friendship and dropping pending
    /// requests in both directions.
    ///
    /// Returns `false` if the block was already fully in place.
    pub fn block(&mut self, blocker: &UserId, target: &UserId) -> EngineResult<bool> {
        if blocker == target {
            return Err(EngineError::InvalidInput("cannot block yourself".to_string()));
        }
        self.require_user(target)?;

        let blocker_user = self.require_user_mut(blocker)?;
        let newly_blocked = blocker_user.blocked_users.insert(target.clone());
        let unfriended = blocker_user.friends.remove(target);
        let unfriended_back = self.require_user_mut(target)?.friends.remove(blocker);

        let before = self.requests.len();
        self.requests.retain(|r| {
            !((r.from_id == *blocker && r.to_id == *target)
                || (r.from_id == *target && r.to_id == *blocker))
        });
        let dropped = self.requests.len() != before;

        Ok(newly_blocked || unfriended || unfriended_back || dropped)
    }

    /// Relationship from `viewer`'s side.
    pub fn friendship_status(&self, viewer: &UserId, target: &UserId) -> FriendshipStatus {
        if self.users.get(viewer).is_some_and(|u| u.is_friend(target)) {
            FriendshipStatus::Friends
        } else if self
            .requests
            .iter()
            .any(|r| r.from_id == *viewer && r.to_id == *target)
        {
            FriendshipStatus::Pending
        } else {
            FriendshipStatus::None
        }
    }

    /// Incoming pending requests for `user`, oldest first.
    pub fn pending_requests_for(&self, user: &UserId) -> Vec<&FriendRequest> {
        self.requests.iter().filter(|r| r.to_id == *user).collect()
    }

    /// Friend profiles of `user`, ordered by id.
    pub fn friends_of(&self, user: &UserId) -> EngineResult<Vec<&User>> {
        let user = self.require_user(user)?;
        Ok(user
            .friends
            .iter()
            .filter_map(|id| self.users.get(id))
            .collect())
    }

    /// Users by points descending, ties by id.
    pub fn ranking(&self) -> Vec<&User> {
        let mut users: Vec<&User> = self.users.values().collect();
        users.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.id.cmp(&b.id)));
        users
    }

    /// Check that no user is both a friend and blocked, from either side.
    pub fn is_block_disjoint(&self) -> bool {
        self.users.values().all(|u| {
            u.friends.iter().all(|f| {
                !u.has_blocked(f) && self.users.get(f).map_or(true, |other| !other.has_blocked(&u.id))
            })
        })
    }

    /// Check the symmetry invariant over all known users.
    pub fn is_symmetric(&self) -> bool {
        self.users.values().all(|u| {
            u.friends.iter().all(|f| {
                self.users
                    .get(f)
                    .map_or(true, |other| other.friends.contains(&u.id))
            })
        })
    }
}
