/// In-process storage implementing both repository traits
///
/// Used with `STORAGE_BACKEND=memory` for local development and by the test
/// suites. Data lives for the lifetime of the process. A single lock guards
/// both tables, so every write is atomic and post reads see a consistent
/// author.
use super::{PostRepository, RepositoryError, RepositoryResult, UserRepository};
use crate::models::{NewPost, NewUser, Post, PostPatch, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredPost {
    id: i64,
    content: String,
    media_url: Option<String>,
    author_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, StoredPost>,
    last_user_id: i64,
    last_post_id: i64,
}

impl Tables {
    fn hydrate(&self, post: &StoredPost) -> RepositoryResult<Post> {
        let author = self.users.get(&post.author_id).ok_or_else(|| {
            RepositoryError::MissingReference(format!("user {}", post.author_id))
        })?;

        Ok(Post {
            id: post.id,
            content: post.content.clone(),
            media_url: post.media_url.clone(),
            created_at: post.created_at,
            updated_at: post.updated_at,
            author: author.to_public(),
        })
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: NewUser) -> RepositoryResult<User> {
        let mut tables = self.tables.write().await;

        if tables
            .users
            .values()
            .any(|u| u.username == new_user.username)
        {
            return Err(RepositoryError::Conflict("users_username_key".to_string()));
        }

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            username: new_user.username,
            password_hash: new_user.password_hash,
            is_admin: new_user.is_admin,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn insert(&self, new_post: NewPost) -> RepositoryResult<Post> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&new_post.author_id) {
            return Err(RepositoryError::MissingReference(format!(
                "user {}",
                new_post.author_id
            )));
        }

        tables.last_post_id += 1;
        let now = Utc::now();
        let stored = StoredPost {
            id: tables.last_post_id,
            content: new_post.content,
            media_url: new_post.media_url,
            author_id: new_post.author_id,
            created_at: now,
            updated_at: now,
        };
        let post = tables.hydrate(&stored)?;
        tables.posts.insert(stored.id, stored);

        Ok(post)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Post>> {
        let tables = self.tables.read().await;
        tables.posts.values().map(|p| tables.hydrate(p)).collect()
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Post>> {
        let tables = self.tables.read().await;
        tables.posts.get(&id).map(|p| tables.hydrate(p)).transpose()
    }

    async fn update(&self, id: i64, patch: &PostPatch) -> RepositoryResult<Option<Post>> {
        let mut tables = self.tables.write().await;

        let updated = match tables.posts.get_mut(&id) {
            Some(stored) => {
                if let Some(content) = &patch.content {
                    stored.content = content.clone();
                }
                if let Some(media_url) = &patch.media_url {
                    stored.media_url = Some(media_url.clone());
                }
                stored.updated_at = Utc::now();
                stored.clone()
            }
            None => return Ok(None),
        };

        tables.hydrate(&updated).map(Some)
    }

    async fn remove(&self, id: i64) -> RepositoryResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.posts.remove(&id).is_some())
    }
}
