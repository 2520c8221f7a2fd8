//! External collaborators: blob storage and the persistent profile store.
//!
//! The engine awaits these before committing any local state, so a failed
//! call leaves the engine unchanged.

pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;

use async_trait::async_trait;

use crate::types::{MediaUpload, User, UserId};

/// Error reported by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    /// Media upload rejected.
    #[error("Upload failed for {path}: {reason}")]
    Upload {
        /// Target storage path.
        path: String,
        /// Backend message.
        reason: String,
    },
    /// Document store read or write failed.
    #[error("Profile store error: {0}")]
    ProfileStore(String),
    /// Document store refused the write.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

/// Blob storage for post, story and profile media.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Upload `file` at `path` and return its public download URL.
    async fn upload(&self, file: &MediaUpload, path: &str) -> Result<String, CollaboratorError>;
}

/// Persistent document store for user profiles.
///
/// Profile fields and friend-graph changes are written through here.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Load a profile, `None` if it has never been written.
    async fn load_profile(&self, id: &UserId) -> Result<Option<User>, CollaboratorError>;

    /// Create or replace a profile document.
    async fn save_profile(&self, user: &User) -> Result<(), CollaboratorError>;

    /// Write several profiles. The default writes them one by one.
    async fn save_profiles(&self, users: &[User]) -> Result<(), CollaboratorError> {
        for user in users {
            self.save_profile(user).await?;
        }
        Ok(())
    }
}

pub use memory::{InMemoryBlobStorage, InMemoryProfileStore};

#[cfg(feature = "postgres")]
pub use postgres::{PostgresConfig, PostgresProfileStore};
