//! User profiles and identity.

use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};

use super::ids::UserId;
use super::media::MediaUpload;

/// A user profile.
///
/// `friends` is kept symmetric by the social graph. `blocked_users` is
/// one-directional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Profile id (identity provider uid).
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Avatar URL.
    pub avatar: String,
    /// Reputation score, never negative.
    pub points: i64,
    /// Free-form biography.
    pub bio: Option<String>,
    /// Cover photo URL.
    pub cover_photo: Option<String>,
    /// Profile music URL.
    pub profile_music_url: Option<String>,
    /// Sign-in email, when the identity provider supplied one.
    pub email: Option<String>,
    /// Mutual friends.
    pub friends: BTreeSet<UserId>,
    /// Users this user has blocked.
    pub blocked_users: BTreeSet<UserId>,
}

impl User {
    /// Create a bare profile with zero points and no relations.
    pub fn new(id: impl Into<UserId>, name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: avatar.into(),
            points: 0,
            bio: None,
            cover_photo: None,
            profile_music_url: None,
            email: None,
            friends: BTreeSet::new(),
            blocked_users: BTreeSet::new(),
        }
    }

    /// Set the starting points (builder style).
    pub fn with_points(mut self, points: i64) -> Self {
        self.points = points.max(0);
        self
    }

    /// Whether `other` is a friend.
    pub fn is_friend(&self, other: &UserId) -> bool {
        self.friends.contains(other)
    }

    /// Whether this user has blocked `other`.
    pub fn has_blocked(&self, other: &UserId) -> bool {
        self.blocked_users.contains(other)
    }
}

/// Identity supplied by the authentication provider on sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider uid.
    pub uid: String,
    /// Display name, if the provider has one yet.
    pub display_name: Option<String>,
    /// Photo URL.
    pub photo_url: Option<String>,
    /// Email address.
    pub email: Option<String>,
}

impl Identity {
    /// Identity with only a uid.
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: None,
            photo_url: None,
            email: None,
        }
    }
}

/// Editable profile fields.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// New display name (must not be blank).
    pub name: String,
    /// New biography.
    pub bio: String,
    /// New profile music URL.
    pub music_url: String,
    /// Replacement avatar to upload.
    pub avatar: Option<MediaUpload>,
    /// Replacement cover photo to upload.
    pub cover: Option<MediaUpload>,
}
