//! Identity resolution and profile editing.

use crate::error::{EngineError, EngineResult};
use crate::observer::EngineEvent;
use crate::types::{Identity, ProfileUpdate, User, UserId};
use super::Engine;

impl Engine {
    /// Load the profile for a signed-in identity, creating it on first sign-in.
    ///
    /// A user the engine already holds keeps its live points and graph edges;
    /// only the stored profile fields are taken from the document, and the
    /// merged profile is written back when it differs.
    pub async fn get_or_create_profile(&mut self, identity: &Identity) -> EngineResult<User> {
        if identity.uid.trim().is_empty() {
            return Err(EngineError::InvalidInput("identity has no uid".to_string()));
        }
        let id = UserId::new(identity.uid.clone());

        if let Some(stored) = self.profiles.load_profile(&id).await? {
            let Some(live) = self.graph.user(&id).cloned() else {
                self.graph.upsert_user(stored.clone());
                tracing::info!(user = %id, "Profile loaded");
                self.emit(EngineEvent::ProfileRegistered { user_id: id, created: false });
                return Ok(stored);
            };

            let merged = User {
                points: live.points,
                friends: live.friends,
                blocked_users: live.blocked_users,
                ..stored.clone()
            };
            if merged != stored {
                if let Err(e) = self.profiles.save_profile(&merged).await {
                    tracing::warn!(user = %id, error = %e, "Profile refresh write failed");
                    return Err(e.into());
                }
            }
            *self.graph.require_user_mut(&id)? = merged.clone();

            tracing::info!(user = %id, points = merged.points, "Profile refreshed");
            self.emit(EngineEvent::ProfileRegistered { user_id: id, created: false });
            return Ok(merged);
        }

        // Held in memory but never stored: persist the live profile as is.
        let (profile, created) = match self.graph.user(&id) {
            Some(live) => (live.clone(), false),
            None => (self.new_profile(identity), true),
        };
        if let Err(e) = self.profiles.save_profile(&profile).await {
            tracing::warn!(user = %id, error = %e, "Profile creation failed");
            return Err(e.into());
        }
        self.graph.upsert_user(profile.clone());

        tracing::info!(user = %id, name = %profile.name, created, "Profile saved");
        self.emit(EngineEvent::ProfileRegistered { user_id: id, created });
        Ok(profile)
    }

    /// Add a known profile without touching the profile store.
    ///
    /// For hosts restoring state they already hold, and for tests.
    pub fn register_user(&mut self, user: User) {
        let id = user.id.clone();
        self.graph.upsert_user(user);
        self.emit(EngineEvent::ProfileRegistered { user_id: id, created: false });
    }

    /// Edit `actor`'s profile. Replacement images are uploaded and the
    /// document written before the change is applied locally.
    pub async fn update_profile(&mut self, actor: &UserId, update: ProfileUpdate) -> EngineResult<User> {
        let name = update.name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidInput("display name is empty".to_string()));
        }
        let mut staged = self.require_user(actor)?.clone();

        if let Some(avatar) = &update.avatar {
            staged.avatar = self.upload_media("avatars", actor, avatar).await?;
        }
        if let Some(cover) = &update.cover {
            staged.cover_photo = Some(self.upload_media("covers", actor, cover).await?);
        }
        staged.name = name.to_string();
        staged.bio = non_blank(&update.bio);
        staged.profile_music_url = non_blank(&update.music_url);

        if let Err(e) = self.profiles.save_profile(&staged).await {
            tracing::warn!(user = %actor, error = %e, "Profile write failed, update discarded");
            return Err(e.into());
        }
        *self.graph.require_user_mut(actor)? = staged.clone();

        tracing::info!(user = %actor, "Profile updated");
        self.emit(EngineEvent::ProfileUpdated { user_id: actor.clone() });
        Ok(staged)
    }

    fn new_profile(&self, identity: &Identity) -> User {
        let uid = identity.uid.as_str();
        let name = identity
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .or_else(|| self.name_from_app_email(identity.email.as_deref()))
            .unwrap_or_else(|| self.config.default_display_name.clone());
        let avatar = identity
            .photo_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| self.config.default_avatar(uid));

        let mut user = User::new(uid, name, avatar);
        user.email = identity.email.clone();
        user.bio = Some(self.config.welcome_bio.clone());
        user.cover_photo = Some(self.config.default_cover(uid));
        user
    }

    /// App-issued emails are `{login}@{domain}`; the login is a usable name
    /// when the provider has not propagated a display name yet.
    fn name_from_app_email(&self, email: Option<&str>) -> Option<String> {
        let domain = self.config.app_email_domain.as_deref()?;
        let (local, host) = email?.rsplit_once('@')?;
        if host.eq_ignore_ascii_case(domain) && !local.is_empty() {
            Some(local.to_string())
        } else {
            None
        }
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::config::EngineConfig;
    use crate::error::ErrorKind;
    use crate::store::{InMemoryBlobStorage, InMemoryProfileStore};
    use crate::types::MediaUpload;

    fn engine() -> (Engine, Arc<InMemoryProfileStore>, Arc<InMemoryBlobStorage>) {
        let profiles = Arc::new(InMemoryProfileStore::new());
        let blobs = Arc::new(InMemoryBlobStorage::new());
        let engine = Engine::new(EngineConfig::default(), profiles.clone(), blobs.clone());
        (engine, profiles, blobs)
    }

    #[tokio::test]
    async fn test_first_sign_in_creates_profile_with_defaults() {
        let (mut engine, profiles, _) = engine();
        let mut identity = Identity::new("abc");
        identity.email = Some("nino@ninovisk.app".to_string());

        let user = engine.get_or_create_profile(&identity).await.unwrap();
        assert_eq!(user.name, "nino");
        assert_eq!(user.points, 0);
        assert_eq!(user.avatar, "https://picsum.photos/seed/abc/100/100");
        assert_eq!(user.bio.as_deref(), Some("Welcome to NinoVisk!"));
        assert_eq!(profiles.get(&user.id), Some(user.clone()));
        assert!(engine.user(&user.id).is_some());
    }

    #[tokio::test]
    async fn test_name_fallbacks() {
        let (mut engine, _, _) = engine();

        let mut named = Identity::new("a");
        named.display_name = Some("Bella".into());
        named.email = Some("bella@ninovisk.app".into());
        assert_eq!(engine.get_or_create_profile(&named).await.unwrap().name, "Bella");

        let mut foreign = Identity::new("b");
        foreign.email = Some("charlie@example.com".into());
        assert_eq!(engine.get_or_create_profile(&foreign).await.unwrap().name, "New User");
    }

    #[tokio::test]
    async fn test_existing_profile_is_loaded_not_overwritten() {
        let stored = User::new("u1", "Nino", "https://a/1.png").with_points(1520);
        let profiles = Arc::new(InMemoryProfileStore::with_profiles([stored.clone()]));
        let mut engine = Engine::new(
            EngineConfig::default(),
            profiles.clone(),
            Arc::new(InMemoryBlobStorage::new()),
        );

        let user = engine.get_or_create_profile(&Identity::new("u1")).await.unwrap();
        assert_eq!(user, stored);
    }

    #[tokio::test]
    async fn test_repeat_sign_in_keeps_live_points_and_edges() {
        let (mut engine, profiles, _) = engine();
        let identity = Identity::new("u1");
        let u1 = UserId::from("u1");
        engine.get_or_create_profile(&identity).await.unwrap();
        engine.register_user(User::new("u2", "Bella", "b"));
        engine.block_user(&u1, &UserId::from("u2")).await.unwrap();

        let media = MediaUpload::new("p.jpg", "image/jpeg", vec![1]);
        let post = engine.create_post(&u1, Some(media), "").await.unwrap();
        engine.add_comment(&post.id, &u1, "first").unwrap();
        assert_eq!(engine.user(&u1).unwrap().points, 3);

        let again = engine.get_or_create_profile(&identity).await.unwrap();
        assert_eq!(again.points, 3);
        assert!(again.has_blocked(&UserId::from("u2")));
        assert_eq!(engine.user(&u1).unwrap().points, 3);
        assert_eq!(profiles.get(&u1).unwrap().points, 3);
    }

    #[tokio::test]
    async fn test_update_profile_uploads_then_commits() {
        let (mut engine, profiles, blobs) = engine();
        let user = engine.get_or_create_profile(&Identity::new("u1")).await.unwrap();

        let update = ProfileUpdate {
            name: " Nino ".into(),
            bio: "vibes".into(),
            music_url: String::new(),
            avatar: Some(MediaUpload::new("me.png", "image/png", vec![9])),
            cover: None,
        };
        let updated = engine.update_profile(&user.id, update).await.unwrap();
        assert_eq!(updated.name, "Nino");
        assert_eq!(updated.bio.as_deref(), Some("vibes"));
        assert_eq!(updated.profile_music_url, None);
        assert!(updated.avatar.starts_with("memory://blobs/avatars/u1/"));
        assert_eq!(blobs.len(), 1);
        assert_eq!(profiles.get(&user.id).unwrap().name, "Nino");
    }

    #[tokio::test]
    async fn test_update_profile_failure_leaves_profile_untouched() {
        let (mut engine, profiles, blobs) = engine();
        let user = engine.get_or_create_profile(&Identity::new("u1")).await.unwrap();

        blobs.set_failing(true);
        let update = ProfileUpdate {
            name: "Renamed".into(),
            cover: Some(MediaUpload::new("c.jpg", "image/jpeg", vec![1])),
            ..Default::default()
        };
        let err = engine.update_profile(&user.id, update).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CollaboratorFailure);
        assert_eq!(engine.user(&user.id).unwrap().name, user.name);

        blobs.set_failing(false);
        profiles.set_read_only(true);
        let update = ProfileUpdate { name: "Renamed".into(), ..Default::default() };
        assert_eq!(
            engine.update_profile(&user.id, update).await.unwrap_err().kind(),
            ErrorKind::CollaboratorFailure
        );
        assert_eq!(engine.user(&user.id).unwrap().name, user.name);

        let blank = ProfileUpdate { name: "  ".into(), ..Default::default() };
        assert_eq!(
            engine.update_profile(&user.id, blank).await.unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }
}
