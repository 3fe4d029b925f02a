/// Data models for blog-service
///
/// - `User`: stored identity record (never serialized; carries the password hash)
/// - `PublicUser`: the outward-facing view of a user
/// - `Post`: a blog post with its author populated
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            is_admin: self.is_admin,
        }
    }
}

/// Input for persisting a new user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "testuser")]
    pub username: String,
    #[schema(example = false)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "This is a blog post")]
    pub content: String,
    #[schema(example = "http://example.com/image.jpg")]
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: PublicUser,
}

/// `blog_posts` row joined with its author
#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: i64,
    pub content: String,
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: i64,
    pub author_username: String,
    pub author_is_admin: bool,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            content: row.content,
            media_url: row.media_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
            author: PublicUser {
                id: row.author_id,
                username: row.author_username,
                is_admin: row.author_is_admin,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: i64,
    pub content: String,
    pub media_url: Option<String>,
}

/// Changes to apply to a post. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub content: Option<String>,
    pub media_url: Option<String>,
}

impl PostPatch {
    /// Build a patch from client input, where an empty value means "unchanged".
    ///
    /// This keeps the long-standing API behavior: a client can neither blank
    /// out the content nor clear the media URL through an update.
    pub fn from_input(content: Option<String>, media_url: Option<String>) -> Self {
        Self {
            content: content.filter(|c| !c.is_empty()),
            media_url: media_url.filter(|m| !m.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_user_hides_hash() {
        let user = User {
            id: 3,
            username: "alice".into(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$salt$hash".into(),
            is_admin: false,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(user.to_public()).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["username"], "alice");
        assert_eq!(json["isAdmin"], false);
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn test_patch_treats_empty_as_unchanged() {
        let patch = PostPatch::from_input(Some(String::new()), Some("http://x/y.png".into()));
        assert_eq!(patch.content, None);
        assert_eq!(patch.media_url.as_deref(), Some("http://x/y.png"));

        assert_eq!(
            PostPatch::from_input(None, Some(String::new())),
            PostPatch::default()
        );
    }

    #[test]
    fn test_post_serializes_camel_case() {
        let now = Utc::now();
        let post = Post {
            id: 1,
            content: "hello".into(),
            media_url: None,
            created_at: now,
            updated_at: now,
            author: PublicUser {
                id: 2,
                username: "bob".into(),
                is_admin: true,
            },
        };

        let json = serde_json::to_value(&post).unwrap();
        assert!(json.get("mediaUrl").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["author"]["isAdmin"], true);
    }
}
