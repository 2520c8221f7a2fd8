//! In-memory collaborators for tests and embedded use.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::types::{MediaUpload, User, UserId};
use super::{BlobStorage, CollaboratorError, ProfileStore};

/// In-memory blob storage.
///
/// URLs are `{base_url}/{path}`. Can be switched into a failing mode to
/// exercise upload error paths.
#[derive(Debug, Default)]
pub struct InMemoryBlobStorage {
    base_url: String,
    blobs: RwLock<BTreeMap<String, Vec<u8>>>,
    failing: AtomicBool,
}

impl InMemoryBlobStorage {
    /// Create an empty store serving from `memory://blobs`.
    pub fn new() -> Self {
        Self::with_base_url("memory://blobs")
    }

    /// Create an empty store with a custom URL prefix.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            blobs: RwLock::new(BTreeMap::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent upload fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    /// Check if nothing has been uploaded.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }

    /// Stored paths in order.
    pub fn paths(&self) -> Vec<String> {
        self.blobs.read().keys().cloned().collect()
    }
}

#[async_trait]
impl BlobStorage for InMemoryBlobStorage {
    async fn upload(&self, file: &MediaUpload, path: &str) -> Result<String, CollaboratorError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CollaboratorError::Upload {
                path: path.to_string(),
                reason: "storage unavailable".to_string(),
            });
        }
        self.blobs.write().insert(path.to_string(), file.bytes.clone());
        Ok(format!("{}/{}", self.base_url, path))
    }
}

/// In-memory profile document store.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<BTreeMap<UserId, User>>,
    read_only: AtomicBool,
}

impl InMemoryProfileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with profiles.
    pub fn with_profiles(users: impl IntoIterator<Item = User>) -> Self {
        let store = Self::new();
        {
            let mut profiles = store.profiles.write();
            for user in users {
                profiles.insert(user.id.clone(), user);
            }
        }
        store
    }

    /// Reject all writes with `PermissionDenied` (or accept them again).
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Current stored document for `id`.
    pub fn get(&self, id: &UserId) -> Option<User> {
        self.profiles.read().get(id).cloned()
    }

    /// Number of stored profiles.
    pub fn len(&self) -> usize {
        self.profiles.read().len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.profiles.read().is_empty()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn load_profile(&self, id: &UserId) -> Result<Option<User>, CollaboratorError> {
        Ok(self.profiles.read().get(id).cloned())
    }

    async fn save_profile(&self, user: &User) -> Result<(), CollaboratorError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(CollaboratorError::PermissionDenied(format!(
                "write to users/{} rejected",
                user.id
            )));
        }
        self.profiles.write().insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn save_profiles(&self, users: &[User]) -> Result<(), CollaboratorError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(CollaboratorError::PermissionDenied(format!(
                "batch write of {} profiles rejected",
                users.len()
            )));
        }
        let mut profiles = self.profiles.write();
        for user in users {
            profiles.insert(user.id.clone(), user.clone());
        }
        Ok(())
    }
}
