//! In-memory state stores composed by the engine.
//!
//! Stores are synchronous and validate only what they own; cross-store
//! effects (points, notifications) are sequenced by [`crate::Engine`].

pub mod graph;
pub mod content;
pub mod points;
pub mod notifications;
pub mod stories;
pub mod messaging;

pub use graph::SocialGraph;
pub use content::{ContentStore, LikeTransition};
pub use points::{PointsLedger, PointsDelta};
pub use notifications::NotificationLog;
pub use stories::{StoryStore, is_active};
pub use messaging::{MessageStore, ConversationKey};
