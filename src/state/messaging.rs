//! Direct messages, partitioned by conversation.

use std::collections::BTreeMap;

use crate::types::{Message, UserId};

/// Unordered pair of participants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConversationKey(UserId, UserId);

impl ConversationKey {
    /// Key for the conversation between `a` and `b`, in either order.
    pub fn new(a: &UserId, b: &UserId) -> Self {
        if a <= b {
            Self(a.clone(), b.clone())
        } else {
            Self(b.clone(), a.clone())
        }
    }
}

impl std::fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.0, self.1)
    }
}

/// Message store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageStore {
    conversations: BTreeMap<ConversationKey, Vec<Message>>,
}

impl MessageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to its conversation.
    pub fn push(&mut self, message: Message) {
        let key = ConversationKey::new(&message.from_id, &message.to_id);
        self.conversations.entry(key).or_default().push(message);
    }

    /// Messages between `a` and `b`, oldest first.
    pub fn conversation(&self, a: &UserId, b: &UserId) -> Vec<&Message> {
        let mut messages: Vec<&Message> = self
            .conversations
            .get(&ConversationKey::new(a, b))
            .map(|c| c.iter().collect())
            .unwrap_or_default();
        // Stable: equal timestamps keep send order.
        messages.sort_by_key(|m| m.created_at);
        messages
    }

    /// Every message, grouped by conversation.
    pub fn all(&self) -> impl Iterator<Item = &Message> {
        self.conversations.values().flatten()
    }

    /// Number of conversations.
    pub fn num_conversations(&self) -> usize {
        self.conversations.len()
    }
}
