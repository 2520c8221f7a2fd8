//! Engine error taxonomy.

use std::fmt;

use crate::store::CollaboratorError;

/// Kind of entity referenced by a `NotFound` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    /// User profile.
    User,
    /// Post.
    Post,
    /// Friend request.
    FriendRequest,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "User"),
            Self::Post => write!(f, "Post"),
            Self::FriendRequest => write!(f, "Friend request"),
        }
    }
}

/// Coarse classification of an [`EngineError`], for matching in callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Empty text, missing media, self-targeting.
    InvalidInput,
    /// Unknown user, post or request.
    NotFound,
    /// Actor may not perform the operation.
    Unauthorized,
    /// Duplicate of existing state.
    Conflict,
    /// Identity, storage or document store call failed.
    CollaboratorFailure,
}

/// Error returned by every engine command and fallible query.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    /// Input rejected before touching state.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind.
        entity: Entity,
        /// Id as given.
        id: String,
    },
    /// Actor lacks permission.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// Operation duplicates existing state.
    #[error("Conflict: {0}")]
    Conflict(String),
    /// A collaborator call failed; no local state was applied.
    #[error("Collaborator failure: {0}")]
    CollaboratorFailure(#[from] CollaboratorError),
}

impl EngineError {
    /// Build a `NotFound` error.
    pub fn not_found(entity: Entity, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::CollaboratorFailure(_) => ErrorKind::CollaboratorFailure,
        }
    }
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_display() {
        let err = EngineError::not_found(Entity::Post, "p1");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Post not found: p1");

        let err: EngineError = CollaboratorError::ProfileStore("offline".into()).into();
        assert_eq!(err.kind(), ErrorKind::CollaboratorFailure);
    }
}
