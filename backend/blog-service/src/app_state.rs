//! Central application state
//!
//! Everything a handler needs is built once at startup and shared through
//! `web::Data<AppState>`. Nothing here is mutated after construction.

use crate::config::{Config, StorageBackend};
use crate::db::{self, MemoryStore, PgPostRepository, PgUserRepository, PostRepository, UserRepository};
use crate::security::CredentialHasher;
use crate::services::{CredentialService, PostService};
use anyhow::Context;
use crypto_core::{JwtSettings, TokenService};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub credentials: CredentialService,
    pub posts: PostService,
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    pub fn new(
        tokens: Arc<TokenService>,
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        hasher: CredentialHasher,
    ) -> Self {
        Self {
            tokens,
            credentials: CredentialService::new(users.clone(), hasher),
            posts: PostService::new(posts),
            users,
        }
    }

    /// State backed by a fresh `MemoryStore`
    pub fn in_memory(tokens: Arc<TokenService>, hasher: CredentialHasher) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(tokens, store.clone(), store, hasher)
    }

    /// Build the state described by `config`, connecting to storage as needed
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let ttl = chrono::Duration::try_seconds(config.jwt.ttl_seconds)
            .context("JWT_TTL_SECONDS is out of range")?;
        let jwt_settings = JwtSettings::new(config.jwt.secret.clone()).with_ttl(ttl);
        let tokens = Arc::new(
            TokenService::new(&jwt_settings).context("Failed to initialize token service")?,
        );

        let hasher = CredentialHasher::from_settings(
            config.password_hash.memory_kib,
            config.password_hash.iterations,
            config.password_hash.parallelism,
        )
        .context("Failed to configure password hashing")?;

        match config.storage {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                Ok(Self::in_memory(tokens, hasher))
            }
            StorageBackend::Postgres => {
                let pool = db::create_pool(&config.database.url, config.database.max_connections)
                    .await
                    .context("Failed to connect to PostgreSQL")?;
                tracing::info!(
                    max_connections = config.database.max_connections,
                    "Database pool created"
                );

                if config.database.run_migrations {
                    db::run_migrations(&pool)
                        .await
                        .context("Failed to run database migrations")?;
                    tracing::info!("Database migrations applied");
                }

                Ok(Self::new(
                    tokens,
                    Arc::new(PgUserRepository::new(pool.clone())),
                    Arc::new(PgPostRepository::new(pool)),
                    hasher,
                ))
            }
        }
    }
}
