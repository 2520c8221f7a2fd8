//! Points ledger.
//!
//! Points live on the user record and change only through like and comment
//! transitions. Balances are floored at zero.

use crate::config::PointRules;
use crate::error::EngineResult;
use crate::types::UserId;
use super::graph::SocialGraph;

/// A single balance adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointsDelta {
    /// User whose balance changes.
    pub user_id: UserId,
    /// Signed change.
    pub delta: i64,
}

/// Applies [`PointRules`] to the social graph's user balances.
#[derive(Debug, Clone, Default)]
pub struct PointsLedger {
    rules: PointRules,
}

impl PointsLedger {
    /// Ledger with the given rules.
    pub fn new(rules: PointRules) -> Self {
        Self { rules }
    }

    /// Adjustment for a like flip. Self-likes earn nothing in either
    /// direction, so like/unlike always nets to zero.
    pub fn for_like(&self, author: &UserId, actor: &UserId, liked: bool) -> Option<PointsDelta> {
        if author == actor {
            return None;
        }
        let delta = if liked {
            self.rules.like_received
        } else {
            -self.rules.like_received
        };
        Some(PointsDelta {
            user_id: author.clone(),
            delta,
        })
    }

    /// Adjustments for a comment: author first, then commenter. When the
    /// commenter is the author both awards land on the same user.
    pub fn for_comment(&self, author: &UserId, commenter: &UserId) -> [PointsDelta; 2] {
        [
            PointsDelta {
                user_id: author.clone(),
                delta: self.rules.comment_received,
            },
            PointsDelta {
                user_id: commenter.clone(),
                delta: self.rules.comment_made,
            },
        ]
    }

    /// Apply an adjustment, returning the new balance.
    pub fn apply(&self, graph: &mut SocialGraph, delta: &PointsDelta) -> EngineResult<i64> {
        let user = graph.require_user_mut(&delta.user_id)?;
        user.points = user.points.saturating_add(delta.delta).max(0);
        Ok(user.points)
    }
}
