//! The engagement state engine.
//!
//! [`Engine`] is the composition root: it owns every state store, the
//! configuration, the clock and the collaborators, and is the only mutator
//! of state. Commands validate fully before touching state; commands that
//! call a collaborator await it first and commit only on success.
//!
//! ```text
//! command ─→ validate ─→ [await collaborator] ─→ commit ─→ observers
//!                 │                 │
//!                 └──── Err ────────┴──→ state unchanged
//! ```

mod activity;
mod content;
mod profile;
mod snapshot;
mod social;

use std::sync::Arc;
use chrono::{DateTime, Utc};

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::observer::{EngineEvent, EngineObserver};
use crate::state::{ContentStore, MessageStore, NotificationLog, PointsLedger, PointsDelta, SocialGraph, StoryStore};
use crate::store::{BlobStorage, InMemoryBlobStorage, InMemoryProfileStore, ProfileStore};
use crate::types::{
    MediaUpload, Notification, NotificationId, NotificationKind, Post, PostId, User, UserId,
};

pub use snapshot::Snapshot;

/// Social graph and engagement state engine.
pub struct Engine {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    profiles: Arc<dyn ProfileStore>,
    blobs: Arc<dyn BlobStorage>,
    observers: Vec<Arc<dyn EngineObserver>>,
    graph: SocialGraph,
    content: ContentStore,
    stories: StoryStore,
    messages: MessageStore,
    notifications: NotificationLog,
    ledger: PointsLedger,
}

impl Engine {
    /// Create an engine over the given collaborators, using wall-clock time.
    pub fn new(
        config: EngineConfig,
        profiles: Arc<dyn ProfileStore>,
        blobs: Arc<dyn BlobStorage>,
    ) -> Self {
        let ledger = PointsLedger::new(config.points.clone());
        Self {
            config,
            clock: Arc::new(SystemClock),
            profiles,
            blobs,
            observers: Vec::new(),
            graph: SocialGraph::new(),
            content: ContentStore::new(),
            stories: StoryStore::new(),
            messages: MessageStore::new(),
            notifications: NotificationLog::new(),
            ledger,
        }
    }

    /// Create an engine backed by in-memory collaborators.
    pub fn in_memory(config: EngineConfig) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryProfileStore::new()),
            Arc::new(InMemoryBlobStorage::new()),
        )
    }

    /// Replace the time source (builder style).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Register an observer for committed events.
    pub fn subscribe(&mut self, observer: Arc<dyn EngineObserver>) {
        self.observers.push(observer);
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current time according to the engine clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Whether `id` holds elevated privilege.
    pub fn is_admin(&self, id: &UserId) -> bool {
        self.config.is_admin(id)
    }

    /// Look up a user.
    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.graph.user(id)
    }

    /// Look up a post.
    pub fn post(&self, id: &PostId) -> Option<&Post> {
        self.content.post(id)
    }

    /// Read access to the social graph.
    pub fn graph(&self) -> &SocialGraph {
        &self.graph
    }

    fn emit(&self, event: EngineEvent) {
        for observer in &self.observers {
            observer.on_event(&event);
        }
    }

    fn notify(
        &mut self,
        recipient: &UserId,
        kind: NotificationKind,
        actor: &UserId,
        subject_post_id: Option<PostId>,
    ) -> NotificationId {
        let id = NotificationId::generate();
        self.notifications.push(Notification {
            id,
            recipient_id: recipient.clone(),
            kind,
            actor_id: actor.clone(),
            subject_post_id,
            created_at: self.clock.now(),
            read: false,
        });
        tracing::debug!(
            notification_id = %id,
            recipient = %recipient,
            kind = %kind,
            "Notification emitted"
        );
        self.emit(EngineEvent::NotificationEmitted {
            notification_id: id,
            recipient_id: recipient.clone(),
            kind,
        });
        id
    }

    fn apply_points(&mut self, delta: &PointsDelta) -> EngineResult<i64> {
        let points = self.ledger.apply(&mut self.graph, delta)?;
        self.emit(EngineEvent::PointsChanged {
            user_id: delta.user_id.clone(),
            points,
        });
        Ok(points)
    }

    fn require_admin(&self, actor: &UserId) -> EngineResult<()> {
        if self.config.is_admin(actor) {
            Ok(())
        } else {
            Err(EngineError::Unauthorized(format!("{actor} is not a moderator")))
        }
    }

    /// Upload `file` under `{folder}/{uid}/{millis}_{name}`.
    async fn upload_media(
        &self,
        folder: &str,
        owner: &UserId,
        file: &MediaUpload,
    ) -> EngineResult<String> {
        if file.is_empty() {
            return Err(EngineError::InvalidInput("media file is empty".to_string()));
        }
        let path = format!(
            "{folder}/{owner}/{}_{}",
            self.clock.now().timestamp_millis(),
            file.sanitized_file_name()
        );
        match self.blobs.upload(file, &path).await {
            Ok(url) => Ok(url),
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Media upload failed, command aborted");
                Err(e.into())
            }
        }
    }
}
