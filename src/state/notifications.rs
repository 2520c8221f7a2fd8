//! Per-recipient notification log.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use crate::types::{Notification, UserId};

/// Append-only notification log, partitioned by recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationLog {
    by_recipient: BTreeMap<UserId, Vec<Notification>>,
}

impl NotificationLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification to its recipient's log.
    pub fn push(&mut self, notification: Notification) {
        self.by_recipient
            .entry(notification.recipient_id.clone())
            .or_default()
            .push(notification);
    }

    /// Notifications for `user`, newest first.
    pub fn for_user(&self, user: &UserId) -> Vec<&Notification> {
        self.by_recipient
            .get(user)
            .map(|log| log.iter().rev().collect())
            .unwrap_or_default()
    }

    /// Mark every notification of `user` read. Returns how many changed.
    pub fn mark_all_read(&mut self, user: &UserId) -> usize {
        let Some(log) = self.by_recipient.get_mut(user) else {
            return 0;
        };
        let mut flipped = 0;
        for notification in log.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            flipped += 1;
        }
        flipped
    }

    /// Whether `user` has anything unread.
    pub fn has_unread(&self, user: &UserId) -> bool {
        self.by_recipient
            .get(user)
            .is_some_and(|log| log.iter().any(|n| !n.read))
    }

    /// Total notifications across recipients.
    pub fn len(&self) -> usize {
        self.by_recipient.values().map(Vec::len).sum()
    }

    /// Check if the log is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every notification, grouped by recipient in id order.
    pub fn all(&self) -> impl Iterator<Item = &Notification> {
        self.by_recipient.values().flatten()
    }
}
