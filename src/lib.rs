//! # social-graph-kernel
//!
//! Social graph and engagement state engine.
//!
//! The kernel owns the state behind a small social app: profiles, a
//! symmetric friend graph with requests and blocks, moderated posts with
//! likes and comments, points, notifications, expiring stories and direct
//! messages.
//!
//! ## Architecture
//!
//! ```text
//! command → Engine ─→ BlobStorage / ProfileStore (await, may fail)
//!              │
//!              ├─→ SocialGraph · ContentStore · PointsLedger
//!              │   NotificationLog · StoryStore · MessageStore
//!              └─→ EngineObserver (committed events)
//! ```
//!
//! ## Guarantees
//!
//! - Friendship is symmetric and disjoint from blocking
//! - A failed command leaves state unchanged
//! - Liking then unliking restores points exactly
//! - Users are never notified about their own actions
//! - Same state → same [`Snapshot::fingerprint`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod error;
pub mod config;
pub mod clock;
pub mod canonical;
pub mod observer;
pub mod telemetry;
pub mod state;
pub mod store;
pub mod engine;

// Re-exports
pub use types::{
    UserId, PostId, CommentId, RequestId, MessageId, NotificationId, StoryId,
    MediaType, MediaUpload, User, Identity, ProfileUpdate,
    Post, Comment, PostStatus, ModerationDecision, PostEngagement, LikeOutcome,
    FriendRequest, RequestStatus, FriendshipStatus,
    Message, Notification, NotificationKind, Story,
};
pub use error::{EngineError, EngineResult, Entity, ErrorKind};
pub use config::{ConfigError, EngineConfig, PointRules, MAX_STORY_TTL_SECS};
pub use clock::{Clock, SystemClock, ManualClock};
pub use observer::{EngineEvent, EngineObserver, NoOpObserver, RecordingObserver};
pub use store::{
    BlobStorage, ProfileStore, CollaboratorError, InMemoryBlobStorage, InMemoryProfileStore,
};
#[cfg(feature = "postgres")]
pub use store::{PostgresConfig, PostgresProfileStore};
pub use engine::{Engine, Snapshot};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};

/// Schema version of serialized snapshots.
/// Increment on breaking changes to any persisted type.
pub const SNAPSHOT_SCHEMA_VERSION: &str = "1.0.0";
