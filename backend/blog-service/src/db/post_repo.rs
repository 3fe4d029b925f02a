/// Post repository - PostgreSQL storage for blog posts
///
/// Every query joins `users` so callers always receive the author alongside
/// the post.
use super::{PostRepository, RepositoryResult};
use crate::models::{NewPost, Post, PostPatch, PostRow};
use async_trait::async_trait;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn insert(&self, new_post: NewPost) -> RepositoryResult<Post> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            WITH inserted AS (
                INSERT INTO blog_posts (content, media_url, author_id)
                VALUES ($1, $2, $3)
                RETURNING id, content, media_url, author_id, created_at, updated_at
            )
            SELECT p.id, p.content, p.media_url, p.created_at, p.updated_at,
                   u.id AS author_id, u.username AS author_username, u.is_admin AS author_is_admin
            FROM inserted p
            JOIN users u ON u.id = p.author_id
            "#,
        )
        .bind(&new_post.content)
        .bind(&new_post.media_url)
        .bind(new_post.author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT p.id, p.content, p.media_url, p.created_at, p.updated_at,
                   u.id AS author_id, u.username AS author_username, u.is_admin AS author_is_admin
            FROM blog_posts p
            JOIN users u ON u.id = p.author_id
            ORDER BY p.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT p.id, p.content, p.media_url, p.created_at, p.updated_at,
                   u.id AS author_id, u.username AS author_username, u.is_admin AS author_is_admin
            FROM blog_posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Post::from))
    }

    async fn update(&self, id: i64, patch: &PostPatch) -> RepositoryResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            WITH updated AS (
                UPDATE blog_posts
                SET content = COALESCE($2, content),
                    media_url = COALESCE($3, media_url),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING id, content, media_url, author_id, created_at, updated_at
            )
            SELECT p.id, p.content, p.media_url, p.created_at, p.updated_at,
                   u.id AS author_id, u.username AS author_username, u.is_admin AS author_is_admin
            FROM updated p
            JOIN users u ON u.id = p.author_id
            "#,
        )
        .bind(id)
        .bind(&patch.content)
        .bind(&patch.media_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Post::from))
    }

    async fn remove(&self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
