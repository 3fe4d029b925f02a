/// Post handlers - HTTP endpoints for blog post operations
///
/// Reads are public. Create, update and delete sit behind
/// `JwtAuthMiddleware`; update and delete additionally require the caller to
/// be the author or an admin.
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::error::{ErrorResponse, Result};
use crate::middleware::AuthenticatedUser;
use crate::models::{Post, PostPatch};
use crate::services::ensure_can_modify;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[schema(example = "This is a blog post")]
    pub content: Option<String>,
    #[schema(example = "http://example.com/image.jpg")]
    pub media_url: Option<String>,
}

/// Omitted or empty fields leave the stored value unchanged
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub content: Option<String>,
    pub media_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostEnvelope {
    #[schema(example = "Blog post created")]
    pub message: String,
    pub blog_post: Post,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Blog post deleted successfully!")]
    pub message: String,
}

/// Create a blog post owned by the caller
#[utoipa::path(
    post,
    path = "/blog",
    tag = "posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Blog post created", body = PostEnvelope),
        (status = 400, description = "Content missing", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let post = state
        .posts
        .create(
            user.id(),
            payload.content.as_deref(),
            payload.media_url.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Created().json(PostEnvelope {
        message: "Blog post created".to_string(),
        blog_post: post,
    }))
}

/// List all blog posts
#[utoipa::path(
    get,
    path = "/blog",
    tag = "posts",
    responses(
        (status = 200, description = "All blog posts", body = [Post])
    )
)]
pub async fn list_posts(state: web::Data<AppState>) -> Result<HttpResponse> {
    let posts = state.posts.find_all().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Get a blog post by ID
#[utoipa::path(
    get,
    path = "/blog/{id}",
    tag = "posts",
    params(("id" = i64, Path, description = "Blog post ID")),
    responses(
        (status = 200, description = "Blog post", body = Post),
        (status = 404, description = "Blog post not found", body = ErrorResponse)
    )
)]
pub async fn get_post(state: web::Data<AppState>, id: web::Path<i64>) -> Result<HttpResponse> {
    let post = state.posts.find_by_id(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Update a blog post (author or admin)
#[utoipa::path(
    put,
    path = "/blog/{id}",
    tag = "posts",
    params(("id" = i64, Path, description = "Blog post ID")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Blog post updated", body = PostEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the author or an admin", body = ErrorResponse),
        (status = 404, description = "Blog post not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    id: web::Path<i64>,
    payload: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    let post = state.posts.find_by_id(id).await?;
    ensure_can_modify(user.claims(), &post, "edit")?;

    let payload = payload.into_inner();
    let patch = PostPatch::from_input(payload.content, payload.media_url);
    let updated = state.posts.update(id, &patch).await?;

    Ok(HttpResponse::Ok().json(PostEnvelope {
        message: "Blog post updated".to_string(),
        blog_post: updated,
    }))
}

/// Delete a blog post (author or admin)
#[utoipa::path(
    delete,
    path = "/blog/{id}",
    tag = "posts",
    params(("id" = i64, Path, description = "Blog post ID")),
    responses(
        (status = 200, description = "Blog post deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the author or an admin", body = ErrorResponse),
        (status = 404, description = "Blog post not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    let post = state.posts.find_by_id(id).await?;
    ensure_can_modify(user.claims(), &post, "delete")?;

    state.posts.delete(id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Blog post deleted successfully!".to_string(),
    }))
}
