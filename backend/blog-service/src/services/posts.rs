/// Post service - creation, retrieval, update and deletion of blog posts
use crate::db::PostRepository;
use crate::error::{AppError, Result};
use crate::models::{NewPost, Post, PostPatch};
use std::sync::Arc;

const POST_NOT_FOUND: &str = "Blog post not found";

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Create a post owned by `author_id`
    ///
    /// Blank content is rejected. An empty media URL is stored as absent.
    pub async fn create(
        &self,
        author_id: i64,
        content: Option<&str>,
        media_url: Option<&str>,
    ) -> Result<Post> {
        let content = match content {
            Some(c) if !c.trim().is_empty() => c.to_string(),
            _ => return Err(AppError::InvalidInput("Content is required".to_string())),
        };

        let post = self
            .posts
            .insert(NewPost {
                author_id,
                content,
                media_url: media_url.filter(|m| !m.is_empty()).map(str::to_string),
            })
            .await?;

        tracing::info!(post_id = post.id, author_id, "Blog post created");
        Ok(post)
    }

    pub async fn find_all(&self) -> Result<Vec<Post>> {
        Ok(self.posts.find_all().await?)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Post> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(POST_NOT_FOUND.to_string()))
    }

    /// Apply `patch` to an existing post
    pub async fn update(&self, id: i64, patch: &PostPatch) -> Result<Post> {
        let post = self
            .posts
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound(POST_NOT_FOUND.to_string()))?;

        tracing::info!(post_id = id, "Blog post updated");
        Ok(post)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.posts.remove(id).await? {
            return Err(AppError::NotFound(POST_NOT_FOUND.to_string()));
        }

        tracing::info!(post_id = id, "Blog post deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, UserRepository};
    use crate::models::NewUser;

    async fn setup() -> (PostService, i64) {
        let store = Arc::new(MemoryStore::new());
        let author = store
            .create(NewUser {
                username: "alice".into(),
                password_hash: "hash".into(),
                is_admin: false,
            })
            .await
            .unwrap();
        (PostService::new(store), author.id)
    }

    #[tokio::test]
    async fn test_create_then_fetch() {
        let (service, author_id) = setup().await;
        let created = service
            .create(author_id, Some("hello"), Some("http://x/a.png"))
            .await
            .unwrap();

        let fetched = service.find_by_id(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.author.id, author_id);
        assert_eq!(fetched.author.username, "alice");
        assert_eq!(fetched.media_url.as_deref(), Some("http://x/a.png"));
    }

    #[tokio::test]
    async fn test_create_requires_content() {
        let (service, author_id) = setup().await;
        for content in [None, Some(""), Some("   ")] {
            let err = service.create(author_id, content, None).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn test_update_content_keeps_media() {
        let (service, author_id) = setup().await;
        let post = service
            .create(author_id, Some("v1"), Some("http://x/a.png"))
            .await
            .unwrap();

        let patch = PostPatch::from_input(Some("v2".into()), None);
        let updated = service.update(post.id, &patch).await.unwrap();
        assert_eq!(updated.content, "v2");
        assert_eq!(updated.media_url.as_deref(), Some("http://x/a.png"));

        let patch = PostPatch::from_input(Some(String::new()), Some("http://x/b.png".into()));
        let updated = service.update(post.id, &patch).await.unwrap();
        assert_eq!(updated.content, "v2");
        assert_eq!(updated.media_url.as_deref(), Some("http://x/b.png"));
    }

    #[tokio::test]
    async fn test_missing_post_is_not_found() {
        let (service, _) = setup().await;

        assert!(matches!(
            service.find_by_id(404).await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            service.update(404, &PostPatch::default()).await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            service.delete(404).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_post() {
        let (service, author_id) = setup().await;
        let post = service.create(author_id, Some("bye"), None).await.unwrap();

        service.delete(post.id).await.unwrap();
        assert!(service.find_all().await.unwrap().is_empty());
        assert!(service.find_by_id(post.id).await.is_err());
    }
}
