//! Engine configuration.
//!
//! ## Environment
//!
//! `EngineConfig::from_env()` starts from the defaults and applies:
//! - `SOCIAL_ADMIN_IDS`: comma-separated admin user ids
//! - `SOCIAL_STORY_TTL_SECS`: story visibility window (default: 86400)
//! - `SOCIAL_APP_EMAIL_DOMAIN`: domain of app-issued sign-in emails
//! - `SOCIAL_WELCOME_BIO`: bio given to new profiles

use std::collections::BTreeSet;
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Longest accepted story window: one year.
pub const MAX_STORY_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// Configuration rejected while loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Document is not valid JSON for [`EngineConfig`].
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is outside its accepted range.
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Points awarded per engagement event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointRules {
    /// Awarded to a post author per like from someone else.
    pub like_received: i64,
    /// Awarded to a post author per comment.
    pub comment_received: i64,
    /// Awarded to the commenter.
    pub comment_made: i64,
}

impl Default for PointRules {
    fn default() -> Self {
        Self {
            like_received: 1,
            comment_received: 2,
            comment_made: 1,
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Users with elevated privilege: auto-approved posts and moderation rights.
    pub admin_ids: BTreeSet<UserId>,
    /// How long a story stays visible, in seconds.
    pub story_ttl_secs: i64,
    /// Point rules.
    pub points: PointRules,
    /// Domain of app-issued emails; the local part doubles as a fallback display name.
    pub app_email_domain: Option<String>,
    /// Display name used when the identity has none.
    pub default_display_name: String,
    /// Bio given to new profiles.
    pub welcome_bio: String,
    /// Avatar URL template for new profiles; `{uid}` is substituted.
    pub avatar_url_template: String,
    /// Cover photo URL template for new profiles; `{uid}` is substituted.
    pub cover_url_template: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            admin_ids: BTreeSet::new(),
            story_ttl_secs: 24 * 60 * 60,
            points: PointRules::default(),
            app_email_domain: Some("ninovisk.app".to_string()),
            default_display_name: "New User".to_string(),
            welcome_bio: "Welcome to NinoVisk!".to_string(),
            avatar_url_template: "https://picsum.photos/seed/{uid}/100/100".to_string(),
            cover_url_template: "https://picsum.photos/seed/{uid}/1200/400".to_string(),
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `SOCIAL_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(ids) = std::env::var("SOCIAL_ADMIN_IDS") {
            config.admin_ids = ids
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(UserId::from)
                .collect();
        }
        if let Some(ttl) = std::env::var("SOCIAL_STORY_TTL_SECS")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|ttl| (1..=MAX_STORY_TTL_SECS).contains(ttl))
        {
            config.story_ttl_secs = ttl;
        }
        if let Ok(domain) = std::env::var("SOCIAL_APP_EMAIL_DOMAIN") {
            let domain = domain.trim().to_string();
            config.app_email_domain = if domain.is_empty() { None } else { Some(domain) };
        }
        if let Ok(bio) = std::env::var("SOCIAL_WELCOME_BIO") {
            config.welcome_bio = bio;
        }

        config
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_STORY_TTL_SECS).contains(&self.story_ttl_secs) {
            return Err(ConfigError::Invalid(format!(
                "story_ttl_secs must be in 1..={MAX_STORY_TTL_SECS}, got {}",
                self.story_ttl_secs
            )));
        }
        Ok(())
    }

    /// Add an admin (builder style).
    pub fn with_admin(mut self, id: impl Into<UserId>) -> Self {
        self.admin_ids.insert(id.into());
        self
    }

    /// Whether `id` holds elevated privilege.
    pub fn is_admin(&self, id: &UserId) -> bool {
        self.admin_ids.contains(id)
    }

    /// Story visibility window, clamped to `1..=MAX_STORY_TTL_SECS` for
    /// configs built by hand without [`EngineConfig::validate`].
    pub fn story_ttl(&self) -> Duration {
        Duration::seconds(self.story_ttl_secs.clamp(1, MAX_STORY_TTL_SECS))
    }

    /// Default avatar for `uid`.
    pub fn default_avatar(&self, uid: &str) -> String {
        self.avatar_url_template.replace("{uid}", uid)
    }

    /// Default cover photo for `uid`.
    pub fn default_cover(&self, uid: &str) -> String {
        self.cover_url_template.replace("{uid}", uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.story_ttl(), Duration::hours(24));
        assert_eq!(config.points.comment_received, 2);
        assert_eq!(config.default_avatar("u9"), "https://picsum.photos/seed/u9/100/100");
    }

    #[test]
    fn test_from_json_partial() {
        let config = EngineConfig::from_json(r#"{"admin_ids": ["u1"], "story_ttl_secs": 60}"#).unwrap();
        assert!(config.is_admin(&UserId::from("u1")));
        assert!(!config.is_admin(&UserId::from("u2")));
        assert_eq!(config.story_ttl_secs, 60);
        assert_eq!(config.welcome_bio, "Welcome to NinoVisk!");
    }

    #[test]
    fn test_story_ttl_out_of_range_is_rejected() {
        let huge = format!(r#"{{"story_ttl_secs": {}}}"#, i64::MAX);
        assert!(matches!(EngineConfig::from_json(&huge), Err(ConfigError::Invalid(_))));
        assert!(matches!(
            EngineConfig::from_json(r#"{"story_ttl_secs": -5}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(EngineConfig::from_json("{"), Err(ConfigError::Parse(_))));

        // Hand-built configs never panic.
        let config = EngineConfig { story_ttl_secs: i64::MAX, ..EngineConfig::default() };
        assert_eq!(config.story_ttl(), Duration::seconds(MAX_STORY_TTL_SECS));
        let config = EngineConfig { story_ttl_secs: -1, ..EngineConfig::default() };
        assert_eq!(config.story_ttl(), Duration::seconds(1));
    }
}
