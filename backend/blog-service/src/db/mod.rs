/// Database access layer
///
/// This module provides:
/// - Repository traits the services depend on (`UserRepository`, `PostRepository`)
/// - PostgreSQL implementations (`user_repo`, `post_repo`)
/// - An in-process implementation of both traits (`memory`)
/// - Pool creation and migrations
pub mod memory;
pub mod post_repo;
pub mod user_repo;

pub use memory::MemoryStore;
pub use post_repo::PgPostRepository;
pub use user_repo::PgUserRepository;

use crate::models::{NewPost, NewUser, Post, PostPatch, User};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use thiserror::Error;

pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    /// A foreign key points at a row that does not exist
    #[error("Referenced row does not exist: {0}")]
    MissingReference(String),

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            if db_err.is_unique_violation() {
                return RepositoryError::Conflict(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return RepositoryError::MissingReference(constraint);
            }
        }
        RepositoryError::Database(err)
    }
}

/// Persistence for user records
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. A taken username yields `RepositoryError::Conflict`.
    async fn create(&self, new_user: NewUser) -> RepositoryResult<User>;

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;

    /// Cheap round trip used by the health endpoint
    async fn ping(&self) -> RepositoryResult<()>;
}

/// Persistence for blog posts. Every returned `Post` has its author populated.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert(&self, new_post: NewPost) -> RepositoryResult<Post>;

    /// All posts, ordered by id
    async fn find_all(&self) -> RepositoryResult<Vec<Post>>;

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Post>>;

    /// Apply `patch` and bump `updated_at`. `None` if the post does not exist.
    async fn update(&self, id: i64, patch: &PostPatch) -> RepositoryResult<Option<Post>>;

    /// Hard delete. `false` if the post does not exist.
    async fn remove(&self, id: i64) -> RepositoryResult<bool>;
}

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../migrations").run(pool).await
}
