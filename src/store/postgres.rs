//! PostgreSQL profile document store.
//!
//! ## Configuration
//!
//! All settings can be configured via environment variables:
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DB_MAX_CONNECTIONS`: Maximum pool size (default: 10)
//! - `DB_MIN_CONNECTIONS`: Minimum idle connections (default: 2)
//! - `DB_CONNECT_TIMEOUT_SECS`: Connection timeout (default: 10)
//! - `DB_IDLE_TIMEOUT_SECS`: Idle connection timeout (default: 300)
//! - `DB_MAX_LIFETIME_SECS`: Max connection lifetime (default: 1800)
//!
//! Each profile is one JSONB document keyed by user id, mirroring the
//! `users/{uid}` document layout of the hosted store.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::Row;
use std::time::Duration;

use crate::types::{User, UserId};
use super::{CollaboratorError, ProfileStore};

/// Table holding profile documents.
pub const PROFILE_TABLE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS social_profiles (
    user_id     TEXT PRIMARY KEY,
    document    JSONB NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

/// Configuration for PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL.
    pub database_url: String,
    /// Maximum connections in pool (default: 10).
    pub max_connections: u32,
    /// Minimum idle connections to keep warm (default: 2).
    pub min_connections: u32,
    /// Connection acquire timeout in seconds (default: 10).
    pub connect_timeout_secs: u64,
    /// Idle connection timeout in seconds (default: 300 = 5 min).
    pub idle_timeout_secs: u64,
    /// Maximum connection lifetime in seconds (default: 1800 = 30 min).
    pub max_lifetime_secs: u64,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Load configuration from environment variables with production defaults.
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost/social".to_string()),
            max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            min_connections: env_or("DB_MIN_CONNECTIONS", 2),
            connect_timeout_secs: env_or("DB_CONNECT_TIMEOUT_SECS", 10),
            idle_timeout_secs: env_or("DB_IDLE_TIMEOUT_SECS", 300),
            max_lifetime_secs: env_or("DB_MAX_LIFETIME_SECS", 1800),
        }
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// PostgreSQL-backed [`ProfileStore`].
pub struct PostgresProfileStore {
    pool: PgPool,
}

fn db_error(e: sqlx::Error) -> CollaboratorError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("42501") => {
            CollaboratorError::PermissionDenied(db.message().to_string())
        }
        _ => CollaboratorError::ProfileStore(e.to_string()),
    }
}

impl PostgresProfileStore {
    /// Create a new store with the given configuration.
    pub async fn new(config: PostgresConfig) -> Result<Self, sqlx::Error> {
        tracing::info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            connect_timeout_secs = config.connect_timeout_secs,
            "Initializing PostgreSQL connection pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .test_before_acquire(true)
            .connect(&config.database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a store from environment variables.
    pub async fn from_env() -> Result<Self, sqlx::Error> {
        Self::new(PostgresConfig::from_env()).await
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the profile table if missing.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(PROFILE_TABLE_SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Get the connection pool for health checks.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check if the database is reachable.
    pub async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

const UPSERT_PROFILE: &str = r#"
    INSERT INTO social_profiles (user_id, document, updated_at)
    VALUES ($1, $2, now())
    ON CONFLICT (user_id) DO UPDATE SET
        document = EXCLUDED.document,
        updated_at = EXCLUDED.updated_at
"#;

#[async_trait]
impl ProfileStore for PostgresProfileStore {
    async fn load_profile(&self, id: &UserId) -> Result<Option<User>, CollaboratorError> {
        let row = sqlx::query("SELECT document FROM social_profiles WHERE user_id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        match row {
            Some(r) => {
                let Json(user): Json<User> = r.try_get("document").map_err(db_error)?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    async fn save_profile(&self, user: &User) -> Result<(), CollaboratorError> {
        sqlx::query(UPSERT_PROFILE)
            .bind(user.id.as_str())
            .bind(Json(user))
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn save_profiles(&self, users: &[User]) -> Result<(), CollaboratorError> {
        // Friend-graph writes touch two documents; commit them together.
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        for user in users {
            sqlx::query(UPSERT_PROFILE)
                .bind(user.id.as_str())
                .bind(Json(user))
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }
        tx.commit().await.map_err(db_error)?;
        tracing::debug!(count = users.len(), "Profiles written");
        Ok(())
    }
}
